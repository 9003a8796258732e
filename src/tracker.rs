//! Polling trackers built on top of the probe.
//!
//! Both trackers answer the same three questions on every poll: did the user
//! just go idle or unidle, how long is it worth waiting before polling again,
//! and what is the current idle time. [`IdleTracker`] classifies against an
//! idle-time threshold; [`SaverTracker`] follows the screensaver's own
//! activation state instead.

use std::time::Duration;

use tracing::debug;

use crate::probe::{ProbeError, SaverSource, query_state};
use crate::snapshot::SaverState;

/// Default poll interval while already idle (5 seconds).
pub const DEFAULT_POLL_WHEN_IDLE: Duration = Duration::from_secs(5);

/// Default poll interval while the extension or saver is disabled (2 minutes).
pub const DEFAULT_POLL_WHEN_DISABLED: Duration = Duration::from_secs(120);

/// Default idle threshold (1 minute).
pub const DEFAULT_IDLE_THRESHOLD: Duration = Duration::from_secs(60);

/// State change observed by a poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleTransition {
    /// The user just went idle.
    Idle,
    /// The user just became active again.
    Unidle,
    /// Idle information is unavailable (extension missing or saver
    /// disabled). Reported on every poll while that holds.
    Disabled,
}

impl IdleTransition {
    /// Get the transition as a lowercase string for display output.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Unidle => "unidle",
            Self::Disabled => "disabled",
        }
    }
}

/// Result of one tracker poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollReport {
    /// Transition since the previous poll, if any.
    pub change: Option<IdleTransition>,

    /// Suggested wait before the next poll is worthwhile.
    pub next_poll: Duration,

    /// Current idle time; zero when unavailable.
    pub idle: Duration,
}

/// Tracker that declares the user idle once idle time exceeds a threshold.
#[derive(Debug)]
pub struct IdleTracker {
    idle_threshold: Duration,
    poll_when_idle: Duration,
    poll_when_disabled: Duration,

    /// Classification from the previous poll. Starts empty so the first
    /// poll always reports whether the user is idle.
    was_idle: Option<bool>,
}

impl IdleTracker {
    /// Create a tracker with the given threshold and poll intervals.
    pub fn new(
        idle_threshold: Duration,
        poll_when_idle: Duration,
        poll_when_disabled: Duration,
    ) -> Self {
        Self {
            idle_threshold,
            poll_when_idle,
            poll_when_disabled,
            was_idle: None,
        }
    }

    /// Poll once and classify.
    ///
    /// An unavailable extension yields a `Disabled` report with the
    /// disabled poll interval. Transport failures propagate; there is no
    /// recovery at this layer.
    pub fn poll<S: SaverSource>(&mut self, source: &mut S) -> Result<PollReport, ProbeError> {
        let Some(snapshot) = query_state(source)? else {
            debug!("Idle information unavailable, suggesting disabled interval");
            return Ok(PollReport {
                change: Some(IdleTransition::Disabled),
                next_poll: self.poll_when_disabled,
                idle: Duration::ZERO,
            });
        };

        let idle = Duration::from_millis(u64::from(snapshot.idle_ms));
        let is_idle = idle > self.idle_threshold;

        // While unidle, the earliest the threshold can be crossed is when
        // the remaining gap elapses; poll again then.
        let next_poll = if is_idle {
            self.poll_when_idle
        } else {
            self.idle_threshold.saturating_sub(idle)
        };

        let change = if self.was_idle == Some(is_idle) {
            None
        } else if is_idle {
            Some(IdleTransition::Idle)
        } else {
            Some(IdleTransition::Unidle)
        };

        if let Some(transition) = change {
            debug!("Idle transition: {:?} (idle {:?})", transition, idle);
        }

        self.was_idle = Some(is_idle);
        Ok(PollReport {
            change,
            next_poll,
            idle,
        })
    }
}

impl Default for IdleTracker {
    fn default() -> Self {
        Self::new(
            DEFAULT_IDLE_THRESHOLD,
            DEFAULT_POLL_WHEN_IDLE,
            DEFAULT_POLL_WHEN_DISABLED,
        )
    }
}

/// Tracker that declares the user idle when the screensaver activates.
#[derive(Debug)]
pub struct SaverTracker {
    poll_when_idle: Duration,
    poll_when_disabled: Duration,

    /// Saver state from the previous poll. Seeded with `Disabled` so the
    /// first poll against a working saver reports a transition.
    last_state: SaverState,
}

impl SaverTracker {
    /// Create a tracker with the given poll intervals.
    pub fn new(poll_when_idle: Duration, poll_when_disabled: Duration) -> Self {
        Self {
            poll_when_idle,
            poll_when_disabled,
            last_state: SaverState::Disabled,
        }
    }

    /// Poll once and classify against the saver's activation state.
    pub fn poll<S: SaverSource>(&mut self, source: &mut S) -> Result<PollReport, ProbeError> {
        let Some(snapshot) = query_state(source)? else {
            debug!("Idle information unavailable, suggesting disabled interval");
            return Ok(PollReport {
                change: Some(IdleTransition::Disabled),
                next_poll: self.poll_when_disabled,
                idle: Duration::ZERO,
            });
        };

        if snapshot.state == SaverState::Disabled {
            self.last_state = SaverState::Disabled;
            return Ok(PollReport {
                change: Some(IdleTransition::Disabled),
                next_poll: self.poll_when_disabled,
                idle: Duration::ZERO,
            });
        }

        // Saver off: til_or_since is the time until it would activate, so
        // that is the next interesting moment. Saver active: no way to know
        // when the user returns, fall back to the idle interval.
        let next_poll = if snapshot.state == SaverState::Off {
            Duration::from_millis(u64::from(snapshot.til_or_since_ms))
        } else {
            self.poll_when_idle
        };

        let change = if snapshot.state == self.last_state {
            None
        } else if snapshot.state == SaverState::Off {
            Some(IdleTransition::Unidle)
        } else {
            Some(IdleTransition::Idle)
        };

        if let Some(transition) = change {
            debug!(
                "Saver transition: {:?} ({} -> {})",
                transition,
                self.last_state.as_str(),
                snapshot.state.as_str()
            );
        }

        self.last_state = snapshot.state;
        Ok(PollReport {
            change,
            next_poll,
            idle: Duration::from_millis(u64::from(snapshot.idle_ms)),
        })
    }
}

impl Default for SaverTracker {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_WHEN_IDLE, DEFAULT_POLL_WHEN_DISABLED)
    }
}
