//! Geometry state
//!
//! Viewport size and scroll offsets. Layout is computed elsewhere; this
//! module only holds the numbers the host and scroll handling mutate.

/// Browsing window metrics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    /// Vertical window scroll offset
    pub scroll_top: f64,
    pub scroll_left: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            scroll_top: 0.0,
            scroll_left: 0.0,
        }
    }

    /// Scroll to position; offsets never go negative
    pub fn scroll_to(&mut self, x: f64, y: f64) {
        self.scroll_left = x.max(0.0);
        self.scroll_top = y.max(0.0);
    }

    pub fn scroll_by(&mut self, dx: f64, dy: f64) {
        self.scroll_to(self.scroll_left + dx, self.scroll_top + dy);
    }

    /// Bottom edge of the visible area in document coordinates
    pub fn bottom(&self) -> f64 {
        self.scroll_top + self.height
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1024.0, 768.0)
    }
}
