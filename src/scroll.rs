//! Page scrolling as an injected capability instead of a global instance.

use std::rc::Rc;

/// Height of the sticky navigation bar kept clear when jumping to a section.
pub const NAV_OFFSET_PX: f64 = -80.0;

#[derive(Clone, Debug, PartialEq)]
pub enum ScrollTarget {
    Top,
    Offset(f64),
    Element(String),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollOptions {
    pub smooth: bool,
    pub offset: f64,
}

impl ScrollOptions {
    pub fn smooth() -> Self {
        Self {
            smooth: true,
            offset: 0.0,
        }
    }

    pub fn instant() -> Self {
        Self {
            smooth: false,
            offset: 0.0,
        }
    }

    pub fn with_offset(self, offset: f64) -> Self {
        Self { offset, ..self }
    }
}

pub trait ScrollController {
    fn scroll_to(&self, target: ScrollTarget, options: ScrollOptions);
}

#[derive(Clone)]
pub struct ScrollHandle(Rc<dyn ScrollController>);

impl ScrollHandle {
    pub fn new(controller: Rc<dyn ScrollController>) -> Self {
        Self(controller)
    }

    pub fn scroll_to(&self, target: ScrollTarget, options: ScrollOptions) {
        self.0.scroll_to(target, options);
    }

    pub fn to_top(&self) {
        self.scroll_to(ScrollTarget::Top, ScrollOptions::smooth());
    }
}

impl PartialEq for ScrollHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// Document position of an element whose viewport-relative top is
/// `element_top`.
pub fn absolute_position(element_top: f64, current_scroll: f64, offset: f64) -> f64 {
    (element_top + current_scroll + offset).max(0.0)
}

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserScroll;

#[cfg(target_arch = "wasm32")]
mod browser {
    use super::{absolute_position, ScrollController, ScrollOptions, ScrollTarget};
    use web_sys::{window, ScrollBehavior, ScrollToOptions};

    #[derive(Clone, Copy, Default)]
    pub struct BrowserScroll;

    impl ScrollController for BrowserScroll {
        fn scroll_to(&self, target: ScrollTarget, options: ScrollOptions) {
            let Some(win) = window() else {
                return;
            };
            let current = win.scroll_y().unwrap_or(0.0);

            let position = match target {
                ScrollTarget::Top => 0.0,
                ScrollTarget::Offset(value) => (value + options.offset).max(0.0),
                ScrollTarget::Element(id) => {
                    let Some(element) = win.document().and_then(|d| d.get_element_by_id(&id)) else {
                        log::debug!("scroll target #{id} not found");
                        return;
                    };
                    absolute_position(
                        element.get_bounding_client_rect().top(),
                        current,
                        options.offset,
                    )
                }
            };

            let scroll_options = ScrollToOptions::new();
            scroll_options.set_top(position);
            scroll_options.set_behavior(if options.smooth {
                ScrollBehavior::Smooth
            } else {
                ScrollBehavior::Instant
            });
            win.scroll_to_with_scroll_to_options(&scroll_options);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingScroll {
        calls: RefCell<Vec<(ScrollTarget, ScrollOptions)>>,
    }

    impl ScrollController for RecordingScroll {
        fn scroll_to(&self, target: ScrollTarget, options: ScrollOptions) {
            self.calls.borrow_mut().push((target, options));
        }
    }

    #[test]
    fn handle_forwards_to_injected_controller() {
        let recorder = Rc::new(RecordingScroll::default());
        let handle = ScrollHandle::new(recorder.clone());

        handle.to_top();
        handle.scroll_to(
            ScrollTarget::Element("realizacje".to_string()),
            ScrollOptions::instant().with_offset(NAV_OFFSET_PX),
        );

        let calls = recorder.calls.borrow();
        assert_eq!(calls[0], (ScrollTarget::Top, ScrollOptions::smooth()));
        assert_eq!(calls[1].0, ScrollTarget::Element("realizacje".to_string()));
        assert!(!calls[1].1.smooth);
        assert_eq!(calls[1].1.offset, NAV_OFFSET_PX);
    }

    #[test]
    fn handles_compare_by_identity() {
        let controller: Rc<dyn ScrollController> = Rc::new(RecordingScroll::default());
        let first = ScrollHandle::new(controller.clone());
        let second = ScrollHandle::new(controller);
        let other = ScrollHandle::new(Rc::new(RecordingScroll::default()));

        assert!(first == second);
        assert!(first != other);
    }

    #[test]
    fn element_position_accounts_for_scroll_and_nav() {
        assert_eq!(absolute_position(120.0, 1_000.0, NAV_OFFSET_PX), 1_040.0);
        assert_eq!(absolute_position(10.0, 0.0, NAV_OFFSET_PX), 0.0);
    }
}
