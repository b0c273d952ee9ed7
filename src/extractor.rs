//! Positioned text extraction from PDF using lopdf
//!
//! This module walks page content streams and produces one token per text
//! showing operator, with the text-space-to-page transform it was drawn with.
//! It is the document side of section location: page count, page geometry
//! and per-page tokens in native PDF space.

use crate::locator::{PageSource, PageTokens};
use crate::mapper::PageViewport;
use crate::SectionError;
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

/// US Letter, used when a page carries no MediaBox anywhere in its tree
const LETTER_BOX: [f32; 4] = [0.0, 0.0, 612.0, 792.0];

const IDENTITY: [f32; 6] = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

/// A run of text with its position on the page
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedToken {
    /// The text content
    pub text: String,
    /// X origin (PDF coordinates)
    pub x: f32,
    /// Y origin (PDF coordinates, origin at bottom-left)
    pub y: f32,
    /// Rendered font size
    pub height: f32,
    /// Text-space to page-space transform `[a, b, c, d, e, f]`
    pub transform: [f32; 6],
    /// Page number (1-indexed)
    pub page: u32,
}

impl PositionedToken {
    /// Build a token from a transform, taking the origin from its translation
    pub fn from_transform(text: impl Into<String>, transform: [f32; 6], height: f32, page: u32) -> Self {
        Self {
            text: text.into(),
            x: transform[4],
            y: transform[5],
            height,
            transform,
            page,
        }
    }
}

/// Native page box in PDF units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    /// Lower-left x of the MediaBox
    pub origin_x: f32,
    /// Lower-left y of the MediaBox
    pub origin_y: f32,
    pub width: f32,
    pub height: f32,
}

impl PageGeometry {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            origin_x: 0.0,
            origin_y: 0.0,
            width,
            height,
        }
    }

    fn from_box(rect: [f32; 4]) -> Result<Self, SectionError> {
        let (x0, x1) = (rect[0].min(rect[2]), rect[0].max(rect[2]));
        let (y0, y1) = (rect[1].min(rect[3]), rect[1].max(rect[3]));
        let geometry = Self {
            origin_x: x0,
            origin_y: y0,
            width: x1 - x0,
            height: y1 - y0,
        };
        if !(geometry.width > 0.0 && geometry.height > 0.0) {
            return Err(SectionError::InvalidStructure);
        }
        Ok(geometry)
    }
}

/// A decoded PDF, ready to hand out page tokens
pub struct PdfDocument {
    doc: Document,
    pages: BTreeMap<u32, ObjectId>,
}

impl std::fmt::Debug for PdfDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfDocument")
            .field("pages", &self.pages.len())
            .finish()
    }
}

impl PdfDocument {
    /// Load a PDF from disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SectionError> {
        Self::from_document(Document::load(path)?)
    }

    /// Load a PDF from a memory buffer
    pub fn load_mem(buffer: &[u8]) -> Result<Self, SectionError> {
        Self::from_document(Document::load_mem(buffer)?)
    }

    fn from_document(doc: Document) -> Result<Self, SectionError> {
        if doc.is_encrypted() {
            return Err(SectionError::Encrypted);
        }
        let pages = doc.get_pages();
        Ok(Self { doc, pages })
    }

    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page_id(&self, page: u32) -> Result<ObjectId, SectionError> {
        self.pages
            .get(&page)
            .copied()
            .ok_or(SectionError::PageOutOfRange(page))
    }

    /// MediaBox of a page, inherited from the page tree when needed
    pub fn page_geometry(&self, page: u32) -> Result<PageGeometry, SectionError> {
        let page_id = self.page_id(page)?;
        match resolve_inherited(&self.doc, page_id, b"MediaBox")? {
            Some(obj) => {
                let array = obj.as_array().map_err(|_| SectionError::InvalidStructure)?;
                PageGeometry::from_box(box_from_array(&self.doc, array)?)
            }
            None => {
                log::warn!("page {} has no MediaBox, assuming US Letter", page);
                PageGeometry::from_box(LETTER_BOX)
            }
        }
    }

    /// Tokens of one page in native PDF space
    pub fn tokens(&self, page: u32) -> Result<Vec<PositionedToken>, SectionError> {
        extract_page_tokens(&self.doc, self.page_id(page)?, page)
    }

    /// Tokens of every page, in page order
    pub fn all_tokens(&self) -> Result<Vec<PositionedToken>, SectionError> {
        let mut all = Vec::new();
        for (&page, &page_id) in &self.pages {
            all.extend(extract_page_tokens(&self.doc, page_id, page)?);
        }
        Ok(all)
    }
}

impl PageSource for PdfDocument {
    fn page_count(&self) -> Result<u32, SectionError> {
        Ok(PdfDocument::page_count(self))
    }

    fn page_tokens(&self, page: u32, display_width: f32) -> Result<PageTokens, SectionError> {
        let viewport = PageViewport::new(self.page_geometry(page)?, display_width);
        let tokens = self.tokens(page)?;
        Ok(PageTokens::new(page, viewport, tokens))
    }
}

/// Extract every positioned token from a PDF file
pub fn extract_tokens<P: AsRef<Path>>(path: P) -> Result<Vec<PositionedToken>, SectionError> {
    PdfDocument::load(path)?.all_tokens()
}

/// Extract every positioned token from a memory buffer
pub fn extract_tokens_mem(buffer: &[u8]) -> Result<Vec<PositionedToken>, SectionError> {
    PdfDocument::load_mem(buffer)?.all_tokens()
}

/// Look up a key on the page dictionary, following /Parent when absent
///
/// A /Parent chain that revisits a node is `InvalidStructure`.
fn resolve_inherited<'a>(
    doc: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Result<Option<&'a Object>, SectionError> {
    let mut visited = HashSet::new();
    let mut current_id = page_id;
    loop {
        if !visited.insert(current_id) {
            log::warn!("cyclic /Parent chain at object {:?}", current_id);
            return Err(SectionError::InvalidStructure);
        }
        let dict = doc.get_object(current_id).and_then(|o| o.as_dict())?;

        if let Ok(value) = dict.get(key) {
            return Ok(Some(deref(doc, value)));
        }

        match dict.get(b"Parent") {
            Ok(parent) => current_id = parent.as_reference()?,
            Err(_) => return Ok(None),
        }
    }
}

fn deref<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

fn box_from_array(doc: &Document, array: &[Object]) -> Result<[f32; 4], SectionError> {
    if array.len() != 4 {
        return Err(SectionError::InvalidStructure);
    }
    let mut rect = [0.0f32; 4];
    for (slot, obj) in rect.iter_mut().zip(array) {
        *slot = get_number(deref(doc, obj)).ok_or(SectionError::InvalidStructure)?;
    }
    Ok(rect)
}

/// Multiply two 2D transformation matrices
/// Matrix format: [a, b, c, d, e, f] representing:
/// | a  b  0 |
/// | c  d  0 |
/// | e  f  1 |
fn multiply_matrices(m1: &[f32; 6], m2: &[f32; 6]) -> [f32; 6] {
    [
        m1[0] * m2[0] + m1[1] * m2[2],
        m1[0] * m2[1] + m1[1] * m2[3],
        m1[2] * m2[0] + m1[3] * m2[2],
        m1[2] * m2[1] + m1[3] * m2[3],
        m1[4] * m2[0] + m1[5] * m2[2] + m2[4],
        m1[4] * m2[1] + m1[5] * m2[3] + m2[5],
    ]
}

/// Text state carried across operators inside one content stream
struct TextState {
    ctm: [f32; 6],
    ctm_stack: Vec<[f32; 6]>,
    font: String,
    font_size: f32,
    leading: Option<f32>,
    text_matrix: [f32; 6],
    line_matrix: [f32; 6],
    in_text_block: bool,
}

impl TextState {
    fn new() -> Self {
        Self {
            ctm: IDENTITY,
            ctm_stack: Vec::new(),
            font: String::new(),
            font_size: 12.0,
            leading: None,
            text_matrix: IDENTITY,
            line_matrix: IDENTITY,
            in_text_block: false,
        }
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        // Td operands are in text space; apply them through the line matrix
        let translate = [1.0, 0.0, 0.0, 1.0, tx, ty];
        self.line_matrix = multiply_matrices(&translate, &self.line_matrix);
        self.text_matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        let leading = self.leading.unwrap_or(self.font_size * 1.2);
        self.move_line(0.0, -leading);
    }

    fn token(&self, text: String, page: u32) -> PositionedToken {
        let transform = multiply_matrices(&self.text_matrix, &self.ctm);
        let height = effective_font_size(self.font_size, &transform);
        PositionedToken::from_transform(text, transform, height, page)
    }
}

/// Extract positioned tokens from a single page
fn extract_page_tokens(
    doc: &Document,
    page_id: ObjectId,
    page_num: u32,
) -> Result<Vec<PositionedToken>, SectionError> {
    use lopdf::content::Content;

    let mut tokens = Vec::new();

    let fonts = doc.get_page_fonts(page_id).unwrap_or_default();

    let content_data = doc
        .get_page_content(page_id)
        .map_err(|e| SectionError::Parse(e.to_string()))?;
    let content = Content::decode(&content_data).map_err(|e| SectionError::Parse(e.to_string()))?;

    let mut state = TextState::new();

    for op in &content.operations {
        let operands = &op.operands;
        match op.operator.as_str() {
            "q" => state.ctm_stack.push(state.ctm),
            "Q" => {
                if let Some(saved) = state.ctm_stack.pop() {
                    state.ctm = saved;
                }
            }
            "cm" if operands.len() >= 6 => {
                let matrix = matrix_from_operands(operands);
                state.ctm = multiply_matrices(&matrix, &state.ctm);
            }
            "BT" => {
                state.in_text_block = true;
                state.text_matrix = IDENTITY;
                state.line_matrix = IDENTITY;
            }
            "ET" => state.in_text_block = false,
            "Tf" if operands.len() >= 2 => {
                if let Ok(name) = operands[0].as_name() {
                    state.font = String::from_utf8_lossy(name).to_string();
                }
                if let Some(size) = get_number(&operands[1]) {
                    state.font_size = size;
                }
            }
            "TL" if !operands.is_empty() => {
                state.leading = get_number(&operands[0]);
            }
            "Td" if operands.len() >= 2 => {
                let tx = get_number(&operands[0]).unwrap_or(0.0);
                let ty = get_number(&operands[1]).unwrap_or(0.0);
                state.move_line(tx, ty);
            }
            "TD" if operands.len() >= 2 => {
                let tx = get_number(&operands[0]).unwrap_or(0.0);
                let ty = get_number(&operands[1]).unwrap_or(0.0);
                state.leading = Some(-ty);
                state.move_line(tx, ty);
            }
            "Tm" if operands.len() >= 6 => {
                state.text_matrix = matrix_from_operands(operands);
                state.line_matrix = state.text_matrix;
            }
            "T*" => state.next_line(),
            "Tj" if !operands.is_empty() => {
                let text = decode_operand(&operands[0], doc, &fonts, &state.font);
                push_token(&mut tokens, &state, text, page_num);
            }
            "TJ" if !operands.is_empty() => {
                if let Ok(array) = operands[0].as_array() {
                    let combined: String = array
                        .iter()
                        .filter_map(|item| decode_operand(item, doc, &fonts, &state.font))
                        .collect();
                    push_token(&mut tokens, &state, Some(combined), page_num);
                }
            }
            "'" if !operands.is_empty() => {
                state.next_line();
                let text = decode_operand(&operands[0], doc, &fonts, &state.font);
                push_token(&mut tokens, &state, text, page_num);
            }
            "\"" if operands.len() >= 3 => {
                state.next_line();
                let text = decode_operand(&operands[2], doc, &fonts, &state.font);
                push_token(&mut tokens, &state, text, page_num);
            }
            _ => {}
        }
    }

    log::debug!("page {}: {} tokens", page_num, tokens.len());
    Ok(tokens)
}

fn push_token(tokens: &mut Vec<PositionedToken>, state: &TextState, text: Option<String>, page: u32) {
    if !state.in_text_block {
        return;
    }
    if let Some(text) = text {
        if !text.trim().is_empty() {
            tokens.push(state.token(text, page));
        }
    }
}

fn matrix_from_operands(operands: &[Object]) -> [f32; 6] {
    let mut matrix = IDENTITY;
    for (i, operand) in operands.iter().take(6).enumerate() {
        matrix[i] = get_number(operand).unwrap_or(IDENTITY[i]);
    }
    matrix
}

/// Helper to get f32 from Object
fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Compute effective font size from base size and a text-to-page matrix
fn effective_font_size(base_size: f32, matrix: &[f32; 6]) -> f32 {
    let scale_x = (matrix[0].powi(2) + matrix[1].powi(2)).sqrt();
    let scale_y = (matrix[2].powi(2) + matrix[3].powi(2)).sqrt();
    base_size * scale_x.max(scale_y)
}

/// Decode a string operand with the current font's encoding
fn decode_operand(
    obj: &Object,
    doc: &Document,
    fonts: &BTreeMap<Vec<u8>, &Dictionary>,
    current_font: &str,
) -> Option<String> {
    let Object::String(bytes, _) = obj else {
        return None;
    };

    if let Some(font_dict) = fonts.get(current_font.as_bytes()) {
        if let Ok(encoding) = font_dict.get_font_encoding(doc) {
            if let Ok(text) = Document::decode_text(&encoding, bytes) {
                return Some(text);
            }
        }
    }

    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|chunk| u16::from_be_bytes([chunk[0], chunk[1]]))
            .collect();
        return Some(String::from_utf16_lossy(&utf16));
    }

    Some(bytes.iter().map(|&b| b as char).collect())
}
