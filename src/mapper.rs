//! PDF space to page-pixel space
//!
//! PDF coordinates have their origin at the bottom-left of the page with y
//! growing upward. Overlays are drawn over a page rendered at a fixed display
//! width, with the origin at the top-left and y growing downward. Every page
//! is scaled so that its width equals the display width.

use crate::extractor::{PageGeometry, PositionedToken};

/// A page as it is rendered on screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageViewport {
    pub geometry: PageGeometry,
    /// Pixels per PDF unit
    pub scale: f32,
}

/// A token's box in page pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MappedBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PageViewport {
    /// Viewport that renders `geometry` at `display_width` pixels wide
    pub fn new(geometry: PageGeometry, display_width: f32) -> Self {
        Self {
            geometry,
            scale: display_width / geometry.width,
        }
    }

    /// Viewport with an explicit scale factor
    pub fn with_scale(geometry: PageGeometry, scale: f32) -> Self {
        Self { geometry, scale }
    }

    /// Rendered page width in pixels
    pub fn pixel_width(&self) -> f32 {
        self.geometry.width * self.scale
    }

    /// Rendered page height in pixels
    pub fn pixel_height(&self) -> f32 {
        self.geometry.height * self.scale
    }

    /// Map a native point and height into page pixels
    ///
    /// The returned width always spans the full rendered page.
    pub fn map(&self, x: f32, y: f32, height: f32) -> MappedBox {
        let local_x = x - self.geometry.origin_x;
        let local_y = y - self.geometry.origin_y;
        MappedBox {
            x: local_x * self.scale,
            y: (self.geometry.height - local_y) * self.scale,
            width: self.pixel_width(),
            height: height * self.scale,
        }
    }

    /// Map a token, or `None` if its position cannot be placed on the page
    pub fn map_token(&self, token: &PositionedToken) -> Option<MappedBox> {
        if !(token.x.is_finite() && token.y.is_finite() && token.height.is_finite()) {
            return None;
        }
        let mapped = self.map(token.x, token.y, token.height);
        mapped.y.is_finite().then_some(mapped)
    }
}
