//! Section location over a whole document
//!
//! `compute_sections` is the pure core: pre-extracted page tokens and a
//! candidate set in, sections out. `locate` drives a [`PageSource`] page by
//! page and feeds the result to it.

use crate::candidates::{candidate_set, CandidateSet};
use crate::extractor::PositionedToken;
use crate::mapper::PageViewport;
use crate::matcher::match_page;
use crate::sections::{resolve_page, Section, FALLBACK_HEIGHT};
use crate::SectionError;
use rayon::prelude::*;
use serde_json::{Map, Value};

/// Options for section location
#[derive(Debug, Clone)]
pub struct LocatorConfig {
    /// Width in pixels every page is rendered at (default: 600)
    pub display_width: f32,
    /// Height of the last section on a page (default: 150)
    pub fallback_height: f32,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            display_width: 600.0,
            fallback_height: FALLBACK_HEIGHT,
        }
    }
}

/// Tokens of one page together with the viewport they are rendered in
#[derive(Debug, Clone)]
pub struct PageTokens {
    /// Page number (1-indexed)
    pub page: u32,
    pub viewport: PageViewport,
    /// Tokens in native PDF space
    pub tokens: Vec<PositionedToken>,
}

impl PageTokens {
    pub fn new(page: u32, viewport: PageViewport, tokens: Vec<PositionedToken>) -> Self {
        Self {
            page,
            viewport,
            tokens,
        }
    }

    pub fn scale(&self) -> f32 {
        self.viewport.scale
    }

    pub fn pixel_width(&self) -> f32 {
        self.viewport.pixel_width()
    }

    pub fn pixel_height(&self) -> f32 {
        self.viewport.pixel_height()
    }
}

/// Anything that can hand out page tokens in page order
pub trait PageSource {
    fn page_count(&self) -> Result<u32, SectionError>;

    /// Tokens of `page` (1-indexed), with a viewport `display_width` pixels wide
    fn page_tokens(&self, page: u32, display_width: f32) -> Result<PageTokens, SectionError>;
}

/// Pre-extracted pages; entry `i` is page `i + 1`
impl PageSource for Vec<PageTokens> {
    fn page_count(&self) -> Result<u32, SectionError> {
        Ok(self.len() as u32)
    }

    fn page_tokens(&self, page: u32, display_width: f32) -> Result<PageTokens, SectionError> {
        let index = page.checked_sub(1).ok_or(SectionError::PageOutOfRange(page))?;
        let stored = self
            .get(index as usize)
            .ok_or(SectionError::PageOutOfRange(page))?;
        Ok(PageTokens {
            page,
            viewport: PageViewport::new(stored.viewport.geometry, display_width),
            tokens: stored.tokens.clone(),
        })
    }
}

/// Locate sections on already extracted pages
///
/// Pages are matched in parallel. The output keeps the order of `pages`, and
/// within a page sections run top to bottom.
pub fn compute_sections(
    pages: &[PageTokens],
    candidates: &CandidateSet,
    config: &LocatorConfig,
) -> Vec<Section> {
    let per_page: Vec<Vec<Section>> = pages
        .par_iter()
        .map(|page| {
            let detections = match_page(&page.tokens, &page.viewport, candidates);
            log::debug!("page {}: {} headings detected", page.page, detections.len());
            resolve_page(detections, config.fallback_height)
        })
        .collect();
    per_page.into_iter().flatten().collect()
}

/// Fetch every page from `source` in order, then locate the record's sections
///
/// Any page failing to decode aborts the whole run; no partial list is
/// returned.
pub fn locate<S: PageSource + ?Sized>(
    source: &S,
    record: &Map<String, Value>,
    config: &LocatorConfig,
) -> Result<Vec<Section>, SectionError> {
    let candidates = candidate_set(record);
    let page_count = source.page_count()?;

    let mut pages = Vec::with_capacity(page_count as usize);
    for page in 1..=page_count {
        pages.push(source.page_tokens(page, config.display_width)?);
    }

    if page_count > 0 && pages.iter().all(|p| p.tokens.is_empty()) {
        log::warn!("document has no extractable text on any of its {} pages", page_count);
    }

    let sections = compute_sections(&pages, &candidates, config);
    log::debug!(
        "{} sections from {} candidates over {} pages",
        sections.len(),
        candidates.len(),
        page_count
    );
    Ok(sections)
}
