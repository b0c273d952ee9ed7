//! Locate resume sections on PDF pages
//!
//! This crate provides:
//! - Positioned text extraction from PDF pages
//! - Matching of page text against the keys of a structured record
//! - Section boundaries in page-pixel coordinates, ready to highlight

pub mod candidates;
pub mod extractor;
pub mod locator;
pub mod mapper;
pub mod matcher;
pub mod overlay;
pub mod sections;
pub mod tracker;

pub use candidates::{candidate_set, CandidateSet};
pub use extractor::{extract_tokens, PageGeometry, PdfDocument, PositionedToken};
pub use locator::{compute_sections, locate, LocatorConfig, PageSource, PageTokens};
pub use sections::{filter_by_page, Section, FALLBACK_HEIGHT};
pub use tracker::{SectionState, SectionTracker};

use serde_json::{Map, Value};
use std::path::Path;

/// Locate the record's sections in a PDF file
pub fn locate_sections<P: AsRef<Path>>(
    path: P,
    record: &Map<String, Value>,
    config: &LocatorConfig,
) -> Result<Vec<Section>, SectionError> {
    let doc = PdfDocument::load(path)?;
    locate(&doc, record, config)
}

/// Locate the record's sections in a PDF held in memory
pub fn locate_sections_mem(
    buffer: &[u8],
    record: &Map<String, Value>,
    config: &LocatorConfig,
) -> Result<Vec<Section>, SectionError> {
    let doc = PdfDocument::load_mem(buffer)?;
    locate(&doc, record, config)
}

/// Parse a JSON record; anything but an object is rejected
pub fn parse_record(json: &str) -> Result<Map<String, Value>, SectionError> {
    match serde_json::from_str::<Value>(json)? {
        Value::Object(map) => Ok(map),
        other => Err(SectionError::Record(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SectionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PDF parsing error: {0}")]
    Parse(String),
    #[error("PDF is encrypted")]
    Encrypted,
    #[error("Invalid PDF structure")]
    InvalidStructure,
    #[error("Page {0} does not exist")]
    PageOutOfRange(u32),
    #[error("Invalid record: {0}")]
    Record(String),
}

impl From<lopdf::Error> for SectionError {
    fn from(e: lopdf::Error) -> Self {
        SectionError::Parse(e.to_string())
    }
}

impl From<serde_json::Error> for SectionError {
    fn from(e: serde_json::Error) -> Self {
        SectionError::Record(e.to_string())
    }
}
