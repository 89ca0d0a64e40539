pub const MOBILE_BREAKPOINT_PX: f64 = 768.0;
const FALLBACK_WIDTH: f64 = 1280.0;

/// Responsive state shared through context; computed once per resize for
/// the whole page.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: FALLBACK_WIDTH,
            height: 720.0,
        }
    }
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        let fallback = Self::default();
        Self {
            width: if width.is_finite() && width > 0.0 { width } else { fallback.width },
            height: if height.is_finite() && height > 0.0 { height } else { fallback.height },
        }
    }

    /// Touch layout: single card, swipe navigation, tap opens the preview.
    pub fn is_mobile(&self) -> bool {
        self.width < MOBILE_BREAKPOINT_PX
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breakpoint_splits_mobile_and_desktop() {
        assert!(Viewport::new(375.0, 812.0).is_mobile());
        assert!(Viewport::new(767.9, 600.0).is_mobile());
        assert!(!Viewport::new(768.0, 600.0).is_mobile());
        assert!(!Viewport::new(1440.0, 900.0).is_mobile());
    }

    #[test]
    fn unusable_dimensions_fall_back_to_desktop() {
        let viewport = Viewport::new(f64::NAN, 0.0);
        assert_eq!(viewport, Viewport::default());
        assert!(!viewport.is_mobile());
    }
}
