//! Repeating and one-shot timers behind a small trait so the gallery
//! controllers run unchanged in the browser and under a virtual clock.
//!
//! Every timer is represented by an owned handle. Dropping the handle is the
//! only way to cancel it, so whoever owns the handle owns the timer's
//! lifetime.

pub trait Scheduler: Clone + 'static {
    type Handle: 'static;

    fn repeat(&self, period_ms: u32, tick: Box<dyn FnMut()>) -> Self::Handle;

    fn once(&self, delay_ms: u32, fire: Box<dyn FnOnce()>) -> Self::Handle;
}

pub fn start_rotation<S: Scheduler>(
    scheduler: &S,
    interval_ms: u32,
    on_tick: impl FnMut() + 'static,
) -> S::Handle {
    scheduler.repeat(interval_ms, Box::new(on_tick))
}

/// Reports accumulated progress (`step_per_tick * ticks`) on every tick.
/// Clamping to 100 and dropping the handle once there is up to the caller.
pub fn start_scroll_reveal<S: Scheduler>(
    scheduler: &S,
    tick_ms: u32,
    step_per_tick: f64,
    mut on_progress: impl FnMut(f64) + 'static,
) -> S::Handle {
    let mut progress = 0.0_f64;
    scheduler.repeat(
        tick_ms,
        Box::new(move || {
            progress += step_per_tick;
            on_progress(progress);
        }),
    )
}

#[cfg(target_arch = "wasm32")]
pub use browser::{BrowserScheduler, BrowserTimer};

#[cfg(target_arch = "wasm32")]
mod browser {
    use super::Scheduler;
    use gloo_timers::callback::{Interval, Timeout};

    #[derive(Clone, Copy, Default, PartialEq, Eq)]
    pub struct BrowserScheduler;

    /// Cleared on drop by the underlying gloo timer.
    pub enum BrowserTimer {
        Interval(Interval),
        Timeout(Timeout),
    }

    impl Scheduler for BrowserScheduler {
        type Handle = BrowserTimer;

        fn repeat(&self, period_ms: u32, tick: Box<dyn FnMut()>) -> BrowserTimer {
            BrowserTimer::Interval(Interval::new(period_ms, tick))
        }

        fn once(&self, delay_ms: u32, fire: Box<dyn FnOnce()>) -> BrowserTimer {
            BrowserTimer::Timeout(Timeout::new(delay_ms, fire))
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::VirtualScheduler;
    use super::*;
    use std::{cell::Cell, cell::RefCell, rc::Rc};

    #[test]
    fn rotation_ticks_every_period_until_handle_dropped() {
        let scheduler = VirtualScheduler::new();
        let ticks = Rc::new(Cell::new(0));
        let handle = {
            let ticks = ticks.clone();
            start_rotation(&scheduler, 4_000, move || ticks.set(ticks.get() + 1))
        };

        scheduler.advance(3_999);
        assert_eq!(ticks.get(), 0);
        scheduler.advance(1);
        assert_eq!(ticks.get(), 1);
        scheduler.advance(8_000);
        assert_eq!(ticks.get(), 3);

        drop(handle);
        scheduler.advance(20_000);
        assert_eq!(ticks.get(), 3);
        assert_eq!(scheduler.active_timers(), 0);
    }

    #[test]
    fn scroll_reveal_reports_accumulated_progress() {
        let scheduler = VirtualScheduler::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let _handle = {
            let seen = seen.clone();
            start_scroll_reveal(&scheduler, 40, 2.5, move |progress| {
                seen.borrow_mut().push(progress)
            })
        };

        scheduler.advance(120);
        assert_eq!(*seen.borrow(), vec![2.5, 5.0, 7.5]);
    }

    #[test]
    fn once_fires_a_single_time() {
        let scheduler = VirtualScheduler::new();
        let fired = Rc::new(Cell::new(0));
        let _handle = {
            let fired = fired.clone();
            scheduler.once(400, Box::new(move || fired.set(fired.get() + 1)))
        };

        scheduler.advance(10_000);
        assert_eq!(fired.get(), 1);
        assert_eq!(scheduler.active_timers(), 0);
    }

    #[test]
    fn repeating_timer_can_cancel_itself_from_its_own_callback() {
        let scheduler = VirtualScheduler::new();
        let slot: Rc<RefCell<Option<<VirtualScheduler as Scheduler>::Handle>>> =
            Rc::new(RefCell::new(None));
        let ticks = Rc::new(Cell::new(0));

        let handle = {
            let slot = slot.clone();
            let ticks = ticks.clone();
            start_rotation(&scheduler, 10, move || {
                ticks.set(ticks.get() + 1);
                if ticks.get() == 2 {
                    let own = slot.borrow_mut().take();
                    drop(own);
                }
            })
        };
        *slot.borrow_mut() = Some(handle);

        scheduler.advance(100);
        assert_eq!(ticks.get(), 2);
        assert_eq!(scheduler.active_timers(), 0);
    }
}
