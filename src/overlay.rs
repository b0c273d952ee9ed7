//! Highlight rectangles for located sections
//!
//! Turns sections into colored boxes over a rendered page and can emit a
//! standalone SVG overlay sized to that page.

use crate::sections::{filter_by_page, Section};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// An RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Colors for headings that show up on most resumes
static KNOWN_LABELS: Lazy<HashMap<&'static str, Rgb>> = Lazy::new(|| {
    HashMap::from([
        ("skills", Rgb(0x3b, 0x82, 0xf6)),
        ("experience", Rgb(0x10, 0xb9, 0x81)),
        ("education", Rgb(0xf5, 0x9e, 0x0b)),
        ("projects", Rgb(0x8b, 0x5c, 0xf6)),
        ("summary", Rgb(0xec, 0x48, 0x99)),
        ("certifications", Rgb(0x14, 0xb8, 0xa6)),
        ("languages", Rgb(0xef, 0x44, 0x44)),
        ("contact", Rgb(0x64, 0x74, 0x8b)),
        ("awards", Rgb(0xea, 0xb3, 0x08)),
        ("interests", Rgb(0x84, 0xcc, 0x16)),
        ("publications", Rgb(0x06, 0xb6, 0xd4)),
        ("volunteer", Rgb(0xf9, 0x73, 0x16)),
    ])
});

const FALLBACK_COLORS: [Rgb; 6] = [
    Rgb(0x63, 0x66, 0xf1),
    Rgb(0xd9, 0x46, 0xef),
    Rgb(0x22, 0xc5, 0x5e),
    Rgb(0xf4, 0x3f, 0x5e),
    Rgb(0x0e, 0xa5, 0xe9),
    Rgb(0xa1, 0x62, 0x07),
];

/// Color lookup per label
#[derive(Debug, Clone, Default)]
pub struct Palette {
    overrides: HashMap<String, Rgb>,
}

impl Palette {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin a color for a label (case-insensitive)
    pub fn with_color(mut self, label: &str, color: Rgb) -> Self {
        self.overrides.insert(label.to_lowercase(), color);
        self
    }

    /// Color for a label; unknown labels get a stable color from the fallback list
    pub fn color_for(&self, label: &str) -> Rgb {
        let key = label.to_lowercase();
        if let Some(color) = self.overrides.get(&key) {
            return *color;
        }
        if let Some(color) = KNOWN_LABELS.get(key.as_str()) {
            return *color;
        }
        // FNV-1a over the label bytes
        let hash = key
            .bytes()
            .fold(0xcbf2_9ce4_8422_2325u64, |h, b| (h ^ b as u64).wrapping_mul(0x100_0000_01b3));
        FALLBACK_COLORS[(hash % FALLBACK_COLORS.len() as u64) as usize]
    }
}

/// A rectangle to draw over the rendered page
#[derive(Debug, Clone, PartialEq)]
pub struct Highlight {
    pub label: String,
    pub page: u32,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub color: Rgb,
}

/// Highlights for one page
pub fn highlights_for_page(sections: &[Section], page: u32, palette: &Palette) -> Vec<Highlight> {
    filter_by_page(sections, page)
        .into_iter()
        .map(|s| Highlight {
            color: palette.color_for(&s.label),
            label: s.label,
            page: s.page,
            x: s.x,
            y: s.y,
            width: s.width,
            height: s.height,
        })
        .collect()
}

/// SVG overlay for a page rendered at `pixel_width` x `pixel_height`
///
/// Rectangles span the section's width from the page's left edge; the label is
/// drawn at the heading's x.
pub fn render_svg(pixel_width: f32, pixel_height: f32, highlights: &[Highlight]) -> String {
    let mut svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w:.0}\" height=\"{h:.0}\" viewBox=\"0 0 {w:.2} {h:.2}\">\n",
        w = pixel_width,
        h = pixel_height
    );
    for hl in highlights {
        let color = hl.color.hex();
        let label = escape_xml(&hl.label);
        svg.push_str(&format!(
            "  <rect x=\"0\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"{}\" fill-opacity=\"0.2\" stroke=\"{}\" stroke-width=\"2\"><title>{}</title></rect>\n",
            hl.y,
            hl.width,
            hl.height.max(0.0),
            color,
            color,
            label
        ));
        svg.push_str(&format!(
            "  <text x=\"{:.2}\" y=\"{:.2}\" font-family=\"sans-serif\" font-size=\"12\" fill=\"{}\">{}</text>\n",
            hl.x,
            hl.y + 12.0,
            color,
            label
        ));
    }
    svg.push_str("</svg>\n");
    svg
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
