pub const DEFAULT_MOBILE_BREAKPOINT: u16 = 80;

/// Tracks whether the terminal is narrow enough for the compact layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    width: u16,
    breakpoint: u16,
}

impl Viewport {
    pub fn new(width: u16, breakpoint: u16) -> Self {
        Self { width, breakpoint }
    }

    /// Returns true if the mobile flag flipped.
    pub fn resize(&mut self, width: u16) -> bool {
        let was_mobile = self.is_mobile();
        self.width = width;
        was_mobile != self.is_mobile()
    }

    pub fn is_mobile(&self) -> bool {
        self.width < self.breakpoint
    }
}
