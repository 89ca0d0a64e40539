use crate::{
    catalog::{GalleryTimings, Project},
    overlay::{OverlayController, OverlayError},
    scheduler::{start_rotation, Scheduler},
};
use std::{cell::RefCell, rc::Rc};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GalleryState {
    pub active_project_index: usize,
    /// False during the cooldown that follows manual navigation.
    pub rotation_enabled: bool,
    pub hovered: Option<usize>,
    pub preview_open: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwipeDirection {
    Left,
    Right,
}

/// Horizontal movement has to dominate; then either distance or speed is
/// enough.
pub fn classify_swipe(
    dx: f64,
    dy: f64,
    elapsed_ms: f64,
    timings: &GalleryTimings,
) -> Option<SwipeDirection> {
    if dx == 0.0 || dx.abs() <= dy.abs() {
        return None;
    }

    let velocity = if elapsed_ms > 0.0 { dx.abs() / elapsed_ms } else { 0.0 };
    if dx.abs() > timings.swipe_distance_px || velocity > timings.swipe_velocity_px_per_ms {
        Some(if dx < 0.0 {
            SwipeDirection::Left
        } else {
            SwipeDirection::Right
        })
    } else {
        None
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SwipeTracker {
    start: Option<(f64, f64, f64)>,
}

impl SwipeTracker {
    pub fn begin(&mut self, x: f64, y: f64, time_ms: f64) {
        self.start = Some((x, y, time_ms));
    }

    pub fn finish(
        &mut self,
        x: f64,
        y: f64,
        time_ms: f64,
        timings: &GalleryTimings,
    ) -> Option<SwipeDirection> {
        let (start_x, start_y, start_time) = self.start.take()?;
        classify_swipe(x - start_x, y - start_y, time_ms - start_time, timings)
    }

    pub fn cancel(&mut self) {
        self.start = None;
    }
}

struct GalleryInner<S: Scheduler> {
    state: GalleryState,
    project_count: usize,
    disposed: bool,
    rotation: Option<S::Handle>,
    cooldown: Option<S::Handle>,
}

impl<S: Scheduler> GalleryInner<S> {
    fn wants_rotation(&self) -> bool {
        !self.disposed
            && self.state.rotation_enabled
            && self.state.hovered.is_none()
            && !self.state.preview_open
            && self.project_count > 1
    }
}

struct GalleryCore<S: Scheduler> {
    scheduler: S,
    timings: GalleryTimings,
    on_change: Rc<dyn Fn()>,
    on_modal: Rc<dyn Fn(bool)>,
    inner: RefCell<GalleryInner<S>>,
}

impl<S: Scheduler> GalleryCore<S> {
    fn sync_rotation(self: &Rc<Self>) {
        let start = {
            let mut inner = self.inner.borrow_mut();
            if !inner.wants_rotation() {
                inner.rotation = None;
            }
            inner.wants_rotation() && inner.rotation.is_none()
        };

        if start {
            let weak = Rc::downgrade(self);
            let handle = start_rotation(&self.scheduler, self.timings.project_rotation_ms, move || {
                if let Some(core) = weak.upgrade() {
                    core.advance();
                }
            });
            self.inner.borrow_mut().rotation = Some(handle);
        }
    }

    fn advance(&self) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.project_count == 0 {
                return;
            }
            inner.state.active_project_index =
                (inner.state.active_project_index + 1) % inner.project_count;
        }
        (self.on_change)();
    }

    fn select(self: &Rc<Self>, index: usize) -> bool {
        let weak = Rc::downgrade(self);
        {
            let mut inner = self.inner.borrow_mut();
            if inner.disposed || index >= inner.project_count {
                log::debug!("ignoring selection {index} of {}", inner.project_count);
                return false;
            }
            if inner.state.preview_open {
                log::debug!("ignoring selection {index} behind the open preview");
                return false;
            }
            inner.state.active_project_index = index;
            inner.state.rotation_enabled = false;
            inner.rotation = None;
            // Replacing the handle cancels any cooldown still pending.
            inner.cooldown = Some(self.scheduler.once(
                self.timings.manual_cooldown_ms,
                Box::new(move || {
                    if let Some(core) = weak.upgrade() {
                        core.end_cooldown();
                    }
                }),
            ));
        }
        (self.on_change)();
        true
    }

    fn end_cooldown(self: &Rc<Self>) {
        {
            let mut inner = self.inner.borrow_mut();
            inner.cooldown = None;
            inner.state.rotation_enabled = true;
        }
        log::debug!("gallery rotation re-enabled");
        self.sync_rotation();
        (self.on_change)();
    }
}

/// Cycles the featured project, pausing for manual navigation, hover and
/// the open preview.
pub struct GalleryController<S: Scheduler> {
    core: Rc<GalleryCore<S>>,
}

impl<S: Scheduler> GalleryController<S> {
    pub fn new(
        scheduler: S,
        project_count: usize,
        timings: GalleryTimings,
        on_change: Rc<dyn Fn()>,
        on_modal: Rc<dyn Fn(bool)>,
    ) -> Self {
        let core = Rc::new(GalleryCore {
            scheduler,
            timings,
            on_change,
            on_modal,
            inner: RefCell::new(GalleryInner {
                state: GalleryState {
                    active_project_index: 0,
                    rotation_enabled: true,
                    hovered: None,
                    preview_open: false,
                },
                project_count,
                disposed: false,
                rotation: None,
                cooldown: None,
            }),
        });
        core.sync_rotation();
        Self { core }
    }

    pub fn state(&self) -> GalleryState {
        self.core.inner.borrow().state.clone()
    }

    pub fn timings(&self) -> GalleryTimings {
        self.core.timings
    }

    pub fn advance(&self) {
        self.core.advance();
    }

    pub fn select(&self, index: usize) -> bool {
        self.core.select(index)
    }

    pub fn next(&self) -> bool {
        let (active, count) = self.position();
        count > 0 && self.select((active + 1) % count)
    }

    pub fn previous(&self) -> bool {
        let (active, count) = self.position();
        count > 0 && self.select((active + count - 1) % count)
    }

    pub fn swipe(&self, direction: SwipeDirection) -> bool {
        match direction {
            SwipeDirection::Left => self.next(),
            SwipeDirection::Right => self.previous(),
        }
    }

    pub fn hover(&self, index: usize) {
        self.core.inner.borrow_mut().state.hovered = Some(index);
        self.core.sync_rotation();
        (self.core.on_change)();
    }

    pub fn leave(&self) {
        self.core.inner.borrow_mut().state.hovered = None;
        self.core.sync_rotation();
        (self.core.on_change)();
    }

    pub fn open_preview(
        &self,
        project: &Project,
        overlay: &OverlayController<S>,
    ) -> Result<(), OverlayError> {
        overlay.open(project.clone())?;

        let was_open = {
            let mut inner = self.core.inner.borrow_mut();
            std::mem::replace(&mut inner.state.preview_open, true)
        };
        self.core.sync_rotation();
        if !was_open {
            (self.core.on_modal)(true);
        }
        (self.core.on_change)();
        Ok(())
    }

    pub fn close_preview(&self, overlay: &OverlayController<S>) {
        overlay.close();

        let was_open = {
            let mut inner = self.core.inner.borrow_mut();
            std::mem::replace(&mut inner.state.preview_open, false)
        };
        if was_open {
            self.core.sync_rotation();
            (self.core.on_modal)(false);
            (self.core.on_change)();
        }
    }

    /// Navigating away with the preview open still releases the modal flag.
    pub fn teardown(&self) {
        let was_open = {
            let mut inner = self.core.inner.borrow_mut();
            inner.disposed = true;
            inner.rotation = None;
            inner.cooldown = None;
            std::mem::replace(&mut inner.state.preview_open, false)
        };
        if was_open {
            (self.core.on_modal)(false);
        }
    }

    fn position(&self) -> (usize, usize) {
        let inner = self.core.inner.borrow();
        (inner.state.active_project_index, inner.project_count)
    }
}
