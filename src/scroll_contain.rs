//! Keeps wheel scrolling inside a tall screenshot until the screenshot hits
//! its own edge, then lets the page take over.
//!
//! Scroll extents are cached and refreshed on resize so a wheel tick never
//! forces a layout read. Offsets are applied once per animation frame.

const EDGE_EPSILON: f64 = 1.0;
const LINE_HEIGHT_PX: f64 = 16.0;

pub const DELTA_MODE_PIXEL: u32 = 0;
pub const DELTA_MODE_LINE: u32 = 1;
pub const DELTA_MODE_PAGE: u32 = 2;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub scroll_height: f64,
    pub client_height: f64,
}

impl ScrollMetrics {
    pub fn max_offset(&self) -> f64 {
        (self.scroll_height - self.client_height).max(0.0)
    }

    pub fn is_at_top(&self) -> bool {
        self.scroll_top <= EDGE_EPSILON
    }

    pub fn is_at_bottom(&self) -> bool {
        self.scroll_top >= self.max_offset() - EDGE_EPSILON
    }

    pub fn can_scroll(&self, delta: f64) -> bool {
        (delta < 0.0 && !self.is_at_top()) || (delta > 0.0 && !self.is_at_bottom())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WheelOutcome {
    /// Prevent default and stop propagation. `request_frame` is true only
    /// for the first intercepted tick of a frame.
    Intercept { request_frame: bool },
    PassThrough,
}

pub fn normalize_wheel_delta(delta: f64, delta_mode: u32, page_height: f64) -> f64 {
    match delta_mode {
        DELTA_MODE_LINE => delta * LINE_HEIGHT_PX,
        DELTA_MODE_PAGE => delta * page_height,
        _ => delta,
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollContainment {
    metrics: ScrollMetrics,
    pending_delta: f64,
    frame_requested: bool,
}

impl ScrollContainment {
    pub fn new(metrics: ScrollMetrics) -> Self {
        let mut containment = Self::default();
        containment.resize(metrics.scroll_height, metrics.client_height);
        containment.sync_offset(metrics.scroll_top);
        containment
    }

    pub fn metrics(&self) -> ScrollMetrics {
        self.metrics
    }

    pub fn resize(&mut self, scroll_height: f64, client_height: f64) {
        self.metrics.scroll_height = scroll_height.max(0.0);
        self.metrics.client_height = client_height.max(0.0);
        self.metrics.scroll_top = self.metrics.scroll_top.clamp(0.0, self.metrics.max_offset());
    }

    /// Offset reported by the element itself (touch scrolling, scrollbar drag).
    pub fn sync_offset(&mut self, scroll_top: f64) {
        self.metrics.scroll_top = scroll_top.clamp(0.0, self.metrics.max_offset());
    }

    pub fn on_wheel(&mut self, delta: f64) -> WheelOutcome {
        let projected = ScrollMetrics {
            scroll_top: (self.metrics.scroll_top + self.pending_delta)
                .clamp(0.0, self.metrics.max_offset()),
            ..self.metrics
        };

        if !projected.can_scroll(delta) {
            return WheelOutcome::PassThrough;
        }

        self.pending_delta += delta;
        let request_frame = !self.frame_requested;
        self.frame_requested = true;
        WheelOutcome::Intercept { request_frame }
    }

    /// Returns the offset to write to the element, if it moved.
    pub fn flush_frame(&mut self) -> Option<f64> {
        self.frame_requested = false;
        let delta = std::mem::take(&mut self.pending_delta);
        if delta == 0.0 {
            return None;
        }

        let next = (self.metrics.scroll_top + delta).clamp(0.0, self.metrics.max_offset());
        if next == self.metrics.scroll_top {
            return None;
        }

        self.metrics.scroll_top = next;
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tall_image() -> ScrollContainment {
        ScrollContainment::new(ScrollMetrics {
            scroll_top: 0.0,
            scroll_height: 2_400.0,
            client_height: 400.0,
        })
    }

    #[test]
    fn scrolling_up_at_top_passes_through() {
        let mut containment = tall_image();
        assert_eq!(containment.on_wheel(-50.0), WheelOutcome::PassThrough);
    }

    #[test]
    fn scrolling_down_inside_region_is_intercepted_and_batched() {
        let mut containment = tall_image();

        assert_eq!(
            containment.on_wheel(100.0),
            WheelOutcome::Intercept { request_frame: true }
        );
        assert_eq!(
            containment.on_wheel(100.0),
            WheelOutcome::Intercept { request_frame: false }
        );
        assert_eq!(containment.flush_frame(), Some(200.0));
        assert_eq!(containment.flush_frame(), None);

        assert_eq!(
            containment.on_wheel(-20.0),
            WheelOutcome::Intercept { request_frame: true }
        );
        assert_eq!(containment.flush_frame(), Some(180.0));
    }

    #[test]
    fn reaching_bottom_hands_scroll_back_to_page() {
        let mut containment = tall_image();

        assert!(matches!(containment.on_wheel(5_000.0), WheelOutcome::Intercept { .. }));
        assert_eq!(containment.flush_frame(), Some(2_000.0));
        assert!(containment.metrics().is_at_bottom());
        assert_eq!(containment.on_wheel(10.0), WheelOutcome::PassThrough);
        assert!(matches!(containment.on_wheel(-10.0), WheelOutcome::Intercept { .. }));
    }

    #[test]
    fn pending_delta_counts_toward_edge_detection() {
        let mut containment = tall_image();

        assert!(matches!(containment.on_wheel(1_990.0), WheelOutcome::Intercept { .. }));
        assert!(matches!(containment.on_wheel(20.0), WheelOutcome::Intercept { .. }));
        assert_eq!(containment.on_wheel(20.0), WheelOutcome::PassThrough);
    }

    #[test]
    fn image_shorter_than_viewport_never_intercepts() {
        let mut containment = ScrollContainment::new(ScrollMetrics {
            scroll_top: 0.0,
            scroll_height: 300.0,
            client_height: 400.0,
        });

        assert_eq!(containment.on_wheel(100.0), WheelOutcome::PassThrough);
        assert_eq!(containment.on_wheel(-100.0), WheelOutcome::PassThrough);
    }

    #[test]
    fn resize_clamps_cached_offset() {
        let mut containment = tall_image();
        containment.sync_offset(1_800.0);
        containment.resize(1_000.0, 400.0);

        assert_eq!(containment.metrics().scroll_top, 600.0);
        assert!(containment.metrics().is_at_bottom());
    }

    #[test]
    fn line_and_page_deltas_are_converted_to_pixels() {
        assert_eq!(normalize_wheel_delta(3.0, DELTA_MODE_LINE, 400.0), 48.0);
        assert_eq!(normalize_wheel_delta(1.0, DELTA_MODE_PAGE, 400.0), 400.0);
        assert_eq!(normalize_wheel_delta(12.5, DELTA_MODE_PIXEL, 400.0), 12.5);
    }
}
