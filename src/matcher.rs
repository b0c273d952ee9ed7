//! Heading detection by substring containment
//!
//! A token is a heading candidate when its lower-cased text contains one of
//! the candidate labels. Labels are tried in candidate-set order and the first
//! hit wins, so a token yields at most one detection. Containment is
//! deliberately loose: "Programming Languages" matches the label "languages"
//! even when it is not the real heading.

use crate::candidates::CandidateSet;
use crate::extractor::PositionedToken;
use crate::mapper::PageViewport;

/// A heading match on one page before its height is resolved
#[derive(Debug, Clone, PartialEq)]
pub struct RawDetection {
    /// Display-cased label ("Skills")
    pub label: String,
    pub x: f32,
    pub y: f32,
    /// Always the full rendered page width
    pub width: f32,
    /// Scaled token height, a placeholder until boundaries are resolved
    pub height: f32,
    pub page: u32,
}

/// Capitalize the first letter of a label
pub fn display_label(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// First candidate label contained in `text`, case-insensitively
pub fn first_match<'a>(text: &str, candidates: &'a CandidateSet) -> Option<&'a str> {
    let lowered = text.to_lowercase();
    candidates.iter().find(|label| lowered.contains(label))
}

/// Scan a page's tokens for headings
///
/// Tokens whose position cannot be mapped are skipped with a warning.
pub fn match_page(
    tokens: &[PositionedToken],
    viewport: &PageViewport,
    candidates: &CandidateSet,
) -> Vec<RawDetection> {
    if candidates.is_empty() {
        return Vec::new();
    }

    let mut detections = Vec::new();
    for token in tokens {
        let Some(label) = first_match(&token.text, candidates) else {
            continue;
        };
        let Some(mapped) = viewport.map_token(token) else {
            log::warn!(
                "page {}: skipping token {:?} with unusable position",
                token.page,
                token.text
            );
            continue;
        };
        log::debug!(
            "page {}: {:?} matched label {:?} at y={:.1}",
            token.page,
            token.text,
            label,
            mapped.y
        );
        detections.push(RawDetection {
            label: display_label(label),
            x: mapped.x,
            y: mapped.y,
            width: mapped.width,
            height: mapped.height,
            page: token.page,
        });
    }
    detections
}
