use crate::{
    catalog::GalleryTimings,
    scheduler::{start_rotation, start_scroll_reveal, Scheduler},
};
use std::{cell::RefCell, rc::Rc};

pub const REVEAL_COMPLETE: f64 = 100.0;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CardState {
    pub current_image_index: usize,
    pub is_hovered: bool,
    pub scroll_reveal_progress: f64,
    pub image_failed: bool,
}

struct CardInner<S: Scheduler> {
    state: CardState,
    image_count: usize,
    active: bool,
    // Set by a click until the next pointer or activity change.
    suspended: bool,
    disposed: bool,
    rotation: Option<S::Handle>,
    reveal: Option<S::Handle>,
}

impl<S: Scheduler> CardInner<S> {
    fn wants_rotation(&self) -> bool {
        !self.disposed
            && self.active
            && !self.suspended
            && !self.state.is_hovered
            && self.image_count > 1
    }

    fn wants_reveal(&self) -> bool {
        !self.disposed
            && !self.suspended
            && self.state.is_hovered
            && self.state.scroll_reveal_progress < REVEAL_COMPLETE
    }

    fn advance_image(&mut self) -> bool {
        if self.state.is_hovered || self.image_count <= 1 {
            return false;
        }

        self.state.current_image_index = (self.state.current_image_index + 1) % self.image_count;
        true
    }

    fn cancel_timers(&mut self) {
        self.rotation = None;
        self.reveal = None;
    }
}

/// One mockup tile: cycles through its screenshots while idle and slowly
/// scrolls the current screenshot while hovered. The two timers never run
/// at the same time.
pub struct CardController<S: Scheduler> {
    scheduler: S,
    timings: GalleryTimings,
    inner: Rc<RefCell<CardInner<S>>>,
    on_change: Rc<dyn Fn()>,
}

impl<S: Scheduler> CardController<S> {
    pub fn new(
        scheduler: S,
        image_count: usize,
        timings: GalleryTimings,
        on_change: Rc<dyn Fn()>,
    ) -> Self {
        let controller = Self {
            scheduler,
            timings,
            inner: Rc::new(RefCell::new(CardInner {
                state: CardState::default(),
                image_count,
                active: true,
                suspended: false,
                disposed: false,
                rotation: None,
                reveal: None,
            })),
            on_change,
        };
        controller.sync_timers();
        controller
    }

    pub fn state(&self) -> CardState {
        self.inner.borrow().state.clone()
    }

    pub fn show_indicators(&self) -> bool {
        self.inner.borrow().image_count > 1
    }

    pub fn set_project(&self, image_count: usize) {
        {
            let mut inner = self.inner.borrow_mut();
            inner.cancel_timers();
            inner.image_count = image_count;
            inner.suspended = false;
            inner.state = CardState {
                is_hovered: inner.state.is_hovered,
                ..CardState::default()
            };
        }
        self.sync_timers();
        self.notify();
    }

    pub fn set_active(&self, active: bool) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.active == active && !inner.suspended {
                return;
            }
            inner.active = active;
            inner.suspended = false;
        }
        self.sync_timers();
        self.notify();
    }

    pub fn pointer_enter(&self) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.state.is_hovered && !inner.suspended {
                return;
            }
            inner.state.is_hovered = true;
            inner.state.scroll_reveal_progress = 0.0;
            inner.suspended = false;
        }
        self.sync_timers();
        self.notify();
    }

    pub fn pointer_leave(&self) {
        {
            let mut inner = self.inner.borrow_mut();
            inner.state.is_hovered = false;
            inner.state.scroll_reveal_progress = 0.0;
            inner.suspended = false;
        }
        self.sync_timers();
        self.notify();
    }

    /// Indicator dot. Restarts the rotation period so the chosen image
    /// stays up for a full interval.
    pub fn select_image(&self, index: usize) -> bool {
        {
            let mut inner = self.inner.borrow_mut();
            if index >= inner.image_count {
                log::debug!("ignoring indicator {index} of {}", inner.image_count);
                return false;
            }
            inner.state.current_image_index = index;
            inner.rotation = None;
        }
        self.sync_timers();
        self.notify();
        true
    }

    /// Cancels pending rotation and reveal before the caller emits the click.
    pub fn activate(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.cancel_timers();
        inner.suspended = true;
    }

    /// Undoes `activate` when the click did not lead anywhere.
    pub fn resume(&self) {
        {
            let mut inner = self.inner.borrow_mut();
            if !inner.suspended {
                return;
            }
            inner.suspended = false;
        }
        self.sync_timers();
        self.notify();
    }

    pub fn image_failed(&self) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.state.image_failed {
                return;
            }
            inner.state.image_failed = true;
        }
        self.notify();
    }

    pub fn teardown(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.disposed = true;
        inner.cancel_timers();
    }

    fn sync_timers(&self) {
        let (start_rotation_timer, start_reveal_timer) = {
            let mut inner = self.inner.borrow_mut();
            if !inner.wants_rotation() {
                inner.rotation = None;
            }
            if !inner.wants_reveal() {
                inner.reveal = None;
            }
            (
                inner.wants_rotation() && inner.rotation.is_none(),
                inner.wants_reveal() && inner.reveal.is_none(),
            )
        };

        if start_rotation_timer {
            let handle = self.spawn_rotation();
            self.inner.borrow_mut().rotation = Some(handle);
        }
        if start_reveal_timer {
            let handle = self.spawn_reveal();
            self.inner.borrow_mut().reveal = Some(handle);
        }
    }

    fn spawn_rotation(&self) -> S::Handle {
        let weak = Rc::downgrade(&self.inner);
        let notify = self.on_change.clone();

        start_rotation(&self.scheduler, self.timings.card_rotation_ms, move || {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let advanced = inner.borrow_mut().advance_image();
            if advanced {
                notify();
            }
        })
    }

    fn spawn_reveal(&self) -> S::Handle {
        let weak = Rc::downgrade(&self.inner);
        let notify = self.on_change.clone();

        start_scroll_reveal(
            &self.scheduler,
            self.timings.reveal_tick_ms,
            self.timings.reveal_step,
            move |progress| {
                let Some(inner) = weak.upgrade() else {
                    return;
                };
                let changed = {
                    let mut inner = inner.borrow_mut();
                    let clamped = progress.clamp(0.0, REVEAL_COMPLETE);
                    if !inner.state.is_hovered || clamped <= inner.state.scroll_reveal_progress {
                        false
                    } else {
                        inner.state.scroll_reveal_progress = clamped;
                        if clamped >= REVEAL_COMPLETE {
                            inner.reveal = None;
                        }
                        true
                    }
                };
                if changed {
                    notify();
                }
            },
        )
    }

    fn notify(&self) {
        (self.on_change)();
    }
}

pub fn placeholder_image(title: &str) -> String {
    let svg = format!(
        "<svg xmlns='http://www.w3.org/2000/svg' width='1200' height='800' viewBox='0 0 1200 800'>\
         <rect width='1200' height='800' fill='#1f2933'/>\
         <text x='600' y='400' fill='#e4e7eb' font-family='sans-serif' font-size='56' \
         text-anchor='middle' dominant-baseline='middle'>{}</text></svg>",
        escape_xml(title)
    );
    format!("data:image/svg+xml,{}", urlencoding::encode(&svg))
}

fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for character in value.chars() {
        match character {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}
