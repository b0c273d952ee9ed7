//! Section boundaries from heading detections
//!
//! Each page is handled on its own: detections are ordered top to bottom and
//! every section extends down to the next heading on the same page. The last
//! section on a page has no following heading and gets a fixed height.

use crate::matcher::RawDetection;
use serde::{Deserialize, Serialize};

/// Height in display pixels of the last section on a page
pub const FALLBACK_HEIGHT: f32 = 150.0;

/// A located section in page pixels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub label: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Page number (1-indexed)
    pub page: u32,
}

/// Order one page's detections and assign final heights
///
/// Detections at the same y produce a zero-height section.
pub fn resolve_page(mut detections: Vec<RawDetection>, fallback_height: f32) -> Vec<Section> {
    // sort_by is stable, equal y keeps detection order
    detections.sort_by(|a, b| a.y.total_cmp(&b.y));

    let next_ys: Vec<Option<f32>> = detections
        .iter()
        .skip(1)
        .map(|d| Some(d.y))
        .chain(std::iter::once(None))
        .collect();

    detections
        .into_iter()
        .zip(next_ys)
        .map(|(d, next_y)| Section {
            height: next_y.map_or(fallback_height, |next| next - d.y),
            label: d.label,
            x: d.x,
            y: d.y,
            width: d.width,
            page: d.page,
        })
        .collect()
}

/// Sections on one page, in their stored order
pub fn filter_by_page(sections: &[Section], page: u32) -> Vec<Section> {
    sections.iter().filter(|s| s.page == page).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_detection(label: &str, y: f32) -> RawDetection {
        RawDetection {
            label: label.to_string(),
            x: 10.0,
            y,
            width: 600.0,
            height: 12.0,
            page: 1,
        }
    }

    #[test]
    fn test_heights_from_gaps() {
        let sections = resolve_page(
            vec![
                make_detection("Skills", 700.0),
                make_detection("Education", 500.0),
                make_detection("Experience", 100.0),
            ],
            FALLBACK_HEIGHT,
        );
        let labels: Vec<&str> = sections.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Experience", "Education", "Skills"]);
        assert_eq!(sections[0].height, 400.0);
        assert_eq!(sections[1].height, 200.0);
        assert_eq!(sections[2].height, FALLBACK_HEIGHT);
    }

    #[test]
    fn test_single_detection_gets_fallback() {
        let sections = resolve_page(vec![make_detection("Skills", 42.0)], FALLBACK_HEIGHT);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].height, 150.0);
        assert_eq!(sections[0].width, 600.0);
        assert_eq!(sections[0].x, 10.0);
    }

    #[test]
    fn test_empty_page() {
        assert!(resolve_page(Vec::new(), FALLBACK_HEIGHT).is_empty());
    }

    #[test]
    fn test_equal_y_gives_zero_height() {
        let sections = resolve_page(
            vec![make_detection("Skills", 300.0), make_detection("Projects", 300.0)],
            FALLBACK_HEIGHT,
        );
        assert_eq!(sections[0].label, "Skills");
        assert_eq!(sections[0].height, 0.0);
        assert_eq!(sections[1].label, "Projects");
        assert_eq!(sections[1].height, FALLBACK_HEIGHT);
    }

    #[test]
    fn test_custom_fallback() {
        let sections = resolve_page(vec![make_detection("Skills", 1.0)], 80.0);
        assert_eq!(sections[0].height, 80.0);
    }

    #[test]
    fn test_filter_by_page() {
        let mut on_two = make_detection("Projects", 50.0);
        on_two.page = 2;
        let mut sections = resolve_page(vec![make_detection("Skills", 10.0)], FALLBACK_HEIGHT);
        sections.extend(resolve_page(vec![on_two], FALLBACK_HEIGHT));

        let page_two = filter_by_page(&sections, 2);
        assert_eq!(page_two.len(), 1);
        assert_eq!(page_two[0].label, "Projects");
        assert!(filter_by_page(&sections, 3).is_empty());
    }
}
