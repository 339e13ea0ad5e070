//! PlaybackController - navigation plus the auto-advance timer.
//!
//! Wraps [`PlaybackState`] and owns the repeating timer that drives
//! auto-advance. The timer only exists while auto-advance is on: it is
//! created lazily the first time [`PlaybackController::next_tick`] is polled
//! in the playing state, and dropped as soon as a navigation operation turns
//! auto-advance off (pause, reset, reaching the terminal stage). Dropping the
//! controller drops the timer with it.

use std::time::Duration;

use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tracing::debug;

use crate::domain::playback::{PlaybackState, Transition};
use crate::domain::stage::Stage;

/// Default delay between automatic steps.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(4);

/// Owns the playback position and the auto-advance timer.
#[derive(Debug)]
pub struct PlaybackController {
    state: PlaybackState,
    interval: Duration,
    timer: Option<Interval>,
}

impl PlaybackController {
    /// Creates a paused controller at the first stage.
    pub fn new(interval: Duration) -> Self {
        Self {
            state: PlaybackState::new(),
            interval,
            timer: None,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn stage(&self) -> Stage {
        self.state.stage()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// True while a timer is armed.
    pub fn has_live_timer(&self) -> bool {
        self.timer.is_some()
    }

    pub fn advance(&mut self) -> Transition {
        let transition = self.state.advance();
        self.sync_timer(&transition);
        transition
    }

    pub fn retreat(&mut self) -> Transition {
        let transition = self.state.retreat();
        self.sync_timer(&transition);
        transition
    }

    pub fn reset(&mut self) -> Transition {
        let transition = self.state.reset();
        self.sync_timer(&transition);
        transition
    }

    pub fn toggle_play(&mut self) -> Transition {
        let transition = self.state.toggle_play();
        self.sync_timer(&transition);
        transition
    }

    /// Waits for the next auto-advance deadline.
    ///
    /// Never resolves while paused. The caller is expected to call
    /// [`advance`](Self::advance) when this returns. Cancel safe.
    pub async fn next_tick(&mut self) {
        if !self.state.is_auto_advancing() {
            return std::future::pending().await;
        }

        let period = self.interval;
        let timer = self.timer.get_or_insert_with(|| {
            debug!(interval_ms = period.as_millis() as u64, "Auto-advance timer armed");
            let mut timer = time::interval_at(Instant::now() + period, period);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
            timer
        });
        timer.tick().await;
    }

    fn sync_timer(&mut self, transition: &Transition) {
        // A fresh start gets a full period before the first step
        if !transition.is_playing || transition.started_playing() {
            if self.timer.take().is_some() {
                debug!(stage = %transition.to, "Auto-advance timer dropped");
            }
        }
    }
}

impl Default for PlaybackController {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL)
    }
}
