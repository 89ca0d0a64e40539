//! Full-screen preview of a client site in an embedded frame.
//!
//! There is no load timeout: if the embedded page never reports completion
//! the overlay stays in `Loading`.

use crate::{catalog::Project, scheduler::Scheduler};
use std::{cell::RefCell, rc::Rc};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OverlayError {
    #[error("project `{0}` has no preview url")]
    MissingUrl(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverlayPhase {
    Closed,
    Loading,
    Loaded,
    /// Hidden, but still holding the outgoing project for the exit transition.
    Closing,
}

#[derive(Clone, Debug, PartialEq)]
pub struct OverlayState {
    pub is_open: bool,
    pub target_project: Option<Project>,
    pub is_frame_loading: bool,
    pub generation: u32,
}

impl OverlayState {
    fn closed() -> Self {
        Self {
            is_open: false,
            target_project: None,
            is_frame_loading: false,
            generation: 0,
        }
    }

    pub fn phase(&self) -> OverlayPhase {
        match (self.is_open, self.target_project.is_some(), self.is_frame_loading) {
            (true, _, true) => OverlayPhase::Loading,
            (true, _, false) => OverlayPhase::Loaded,
            (false, true, _) => OverlayPhase::Closing,
            (false, false, _) => OverlayPhase::Closed,
        }
    }

    /// The "open in new tab" link, available whenever there is a project.
    pub fn external_url(&self) -> Option<&str> {
        self.target_project.as_ref().map(|project| project.url.as_str())
    }
}

struct OverlayInner<S: Scheduler> {
    state: OverlayState,
    linger: Option<S::Handle>,
}

pub struct OverlayController<S: Scheduler> {
    scheduler: S,
    linger_ms: u32,
    inner: Rc<RefCell<OverlayInner<S>>>,
    on_change: Rc<dyn Fn()>,
}

impl<S: Scheduler> OverlayController<S> {
    pub fn new(scheduler: S, linger_ms: u32, on_change: Rc<dyn Fn()>) -> Self {
        Self {
            scheduler,
            linger_ms,
            inner: Rc::new(RefCell::new(OverlayInner {
                state: OverlayState::closed(),
                linger: None,
            })),
            on_change,
        }
    }

    pub fn state(&self) -> OverlayState {
        self.inner.borrow().state.clone()
    }

    pub fn phase(&self) -> OverlayPhase {
        self.inner.borrow().state.phase()
    }

    /// Every successful call starts a fresh load, even for the project that
    /// is already showing.
    pub fn open(&self, project: Project) -> Result<(), OverlayError> {
        if !project.has_preview() {
            log::warn!("preview requested for `{}` without a url", project.id);
            return Err(OverlayError::MissingUrl(project.id));
        }

        {
            let mut inner = self.inner.borrow_mut();
            inner.linger = None;
            let generation = inner.state.generation.wrapping_add(1);
            log::info!("opening preview of `{}`", project.id);
            inner.state = OverlayState {
                is_open: true,
                target_project: Some(project),
                is_frame_loading: true,
                generation,
            };
        }
        self.notify();
        Ok(())
    }

    pub fn frame_loaded(&self) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.state.phase() != OverlayPhase::Loading {
                return;
            }
            inner.state.is_frame_loading = false;
        }
        log::debug!("preview frame loaded");
        self.notify();
    }

    pub fn close(&self) {
        {
            let mut inner = self.inner.borrow_mut();
            if !inner.state.is_open {
                return;
            }
            inner.state.is_open = false;
            inner.state.is_frame_loading = false;
            inner.linger = Some(self.spawn_linger());
        }
        log::debug!("closing preview");
        self.notify();
    }

    pub fn teardown(&self) {
        self.inner.borrow_mut().linger = None;
    }

    fn spawn_linger(&self) -> S::Handle {
        let weak = Rc::downgrade(&self.inner);
        let notify = self.on_change.clone();

        self.scheduler.once(
            self.linger_ms,
            Box::new(move || {
                let Some(inner) = weak.upgrade() else {
                    return;
                };
                let cleared = {
                    let mut inner = inner.borrow_mut();
                    if inner.state.is_open {
                        false
                    } else {
                        inner.state.target_project = None;
                        true
                    }
                };
                if cleared {
                    notify();
                }
            }),
        )
    }

    fn notify(&self) {
        (self.on_change)();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{catalog::sample_project, scheduler::testing::VirtualScheduler};

    fn overlay(scheduler: &VirtualScheduler) -> OverlayController<VirtualScheduler> {
        OverlayController::new(scheduler.clone(), 400, Rc::new(|| {}))
    }

    fn malgosia() -> Project {
        sample_project(
            "fryzjerka-malgosia",
            "Fryzjerka Małgosia",
            2,
            "https://www.fryzjerkamalgosia.pl/",
        )
    }

    #[test]
    fn open_load_close_linger_sequence() {
        let scheduler = VirtualScheduler::new();
        let overlay = overlay(&scheduler);

        overlay.open(malgosia()).expect("project has a url");
        let state = overlay.state();
        assert_eq!(state.phase(), OverlayPhase::Loading);
        assert!(state.is_frame_loading);
        assert_eq!(
            state.target_project.as_ref().map(|project| project.title.as_str()),
            Some("Fryzjerka Małgosia")
        );

        overlay.frame_loaded();
        assert!(!overlay.state().is_frame_loading);
        assert_eq!(overlay.phase(), OverlayPhase::Loaded);

        overlay.close();
        let state = overlay.state();
        assert!(!state.is_open);
        assert!(state.target_project.is_some());
        assert_eq!(state.phase(), OverlayPhase::Closing);

        scheduler.advance(399);
        assert!(overlay.state().target_project.is_some());
        scheduler.advance(1);
        assert_eq!(overlay.state().target_project, None);
        assert_eq!(overlay.phase(), OverlayPhase::Closed);
    }

    #[test]
    fn empty_url_never_starts_loading() {
        let scheduler = VirtualScheduler::new();
        let overlay = overlay(&scheduler);

        let result = overlay.open(sample_project("bez-adresu", "Bez adresu", 1, "  "));
        assert_eq!(result, Err(OverlayError::MissingUrl("bez-adresu".to_string())));
        assert_eq!(overlay.phase(), OverlayPhase::Closed);
        assert_eq!(overlay.state().target_project, None);
    }

    #[test]
    fn reopening_same_project_shows_spinner_again() {
        let scheduler = VirtualScheduler::new();
        let overlay = overlay(&scheduler);

        overlay.open(malgosia()).expect("opens");
        overlay.frame_loaded();
        let first_generation = overlay.state().generation;

        overlay.open(malgosia()).expect("opens");
        let state = overlay.state();
        assert!(state.is_frame_loading);
        assert_ne!(state.generation, first_generation);
    }

    #[test]
    fn reopening_during_linger_keeps_new_project() {
        let scheduler = VirtualScheduler::new();
        let overlay = overlay(&scheduler);

        overlay.open(malgosia()).expect("opens");
        overlay.close();
        scheduler.advance(200);
        overlay
            .open(sample_project("stolarz", "Warsztat Stolarski", 1, "https://example.org/"))
            .expect("opens");
        scheduler.advance(1_000);

        let state = overlay.state();
        assert!(state.is_open);
        assert_eq!(
            state.target_project.map(|project| project.id),
            Some("stolarz".to_string())
        );
        assert_eq!(scheduler.active_timers(), 0);
    }

    #[test]
    fn load_signal_outside_loading_is_ignored() {
        let scheduler = VirtualScheduler::new();
        let overlay = overlay(&scheduler);

        overlay.frame_loaded();
        assert_eq!(overlay.phase(), OverlayPhase::Closed);

        overlay.open(malgosia()).expect("opens");
        overlay.close();
        overlay.frame_loaded();
        assert_eq!(overlay.phase(), OverlayPhase::Closing);
    }

    #[test]
    fn spinner_persists_without_load_signal() {
        let scheduler = VirtualScheduler::new();
        let overlay = overlay(&scheduler);

        overlay.open(malgosia()).expect("opens");
        scheduler.advance(10 * 60 * 1_000);
        assert_eq!(overlay.phase(), OverlayPhase::Loading);
        assert_eq!(overlay.state().external_url(), Some("https://www.fryzjerkamalgosia.pl/"));
    }
}
