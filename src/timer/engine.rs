use std::time::Duration;

use super::scheduler::{TickId, TickScheduler};

pub const MIN_MINUTES: u32 = 1;
pub const MAX_MINUTES: u32 = 60;
pub const DEFAULT_MINUTES: u32 = 25;

const TICK_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimerStatus {
    /// Not running, full duration remaining.
    #[default]
    Idle,
    Running,
    /// Not running, part of the duration already spent.
    Paused,
}

/// Immutable view of the engine handed to the rendering side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerSnapshot {
    pub status: TimerStatus,
    pub configured_secs: u32,
    pub remaining_secs: u32,
}

impl TimerSnapshot {
    pub fn is_running(&self) -> bool {
        self.status == TimerStatus::Running
    }
}

/// Result of feeding one tick to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Stale or unexpected tick; nothing changed.
    Ignored,
    /// One second elapsed.
    Changed(TimerSnapshot),
    /// The countdown hit zero. The engine is already back to Idle with the
    /// full duration restored; this is the post-reset snapshot.
    Completed(TimerSnapshot),
}

/// Coerce typed minute input into 1..=60.
///
/// Reads a leading integer the way a form field would (`"12min"` is 12).
/// Anything without one, as well as zero and negatives, becomes 1; values
/// above 60 become 60.
pub fn coerce_minutes(input: &str) -> u32 {
    let trimmed = input.trim();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let digits = &digits[..end];
    if digits.is_empty() || negative {
        return MIN_MINUTES;
    }
    // Too many digits for i64 still means "way above the maximum".
    let value = digits.parse::<i64>().unwrap_or(i64::MAX);
    clamp_minutes(value)
}

pub fn clamp_minutes(minutes: i64) -> u32 {
    if minutes < MIN_MINUTES as i64 {
        MIN_MINUTES
    } else if minutes > MAX_MINUTES as i64 {
        MAX_MINUTES
    } else {
        minutes as u32
    }
}

/// Countdown state machine.
///
/// Owns the scheduler so that every transition which stops the countdown
/// also cancels the tick source that was driving it.
pub struct TimerEngine<S: TickScheduler> {
    configured_secs: u32,
    remaining_secs: u32,
    status: TimerStatus,
    ticker: Option<TickId>,
    scheduler: S,
}

impl<S: TickScheduler> TimerEngine<S> {
    pub fn with_minutes(scheduler: S, minutes: i64) -> Self {
        let configured_secs = clamp_minutes(minutes) * 60;
        Self {
            configured_secs,
            remaining_secs: configured_secs,
            status: TimerStatus::Idle,
            ticker: None,
            scheduler,
        }
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            status: self.status,
            configured_secs: self.configured_secs,
            remaining_secs: self.remaining_secs,
        }
    }

    pub fn status(&self) -> TimerStatus {
        self.status
    }

    pub fn configured_minutes(&self) -> u32 {
        self.configured_secs / 60
    }

    /// Tick source currently driving the countdown, if any.
    pub fn active_ticker(&self) -> Option<TickId> {
        self.ticker
    }

    #[cfg(test)]
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Apply a typed minute value. Always ends in Idle.
    pub fn configure(&mut self, input: &str) -> TimerSnapshot {
        self.set_duration(coerce_minutes(input))
    }

    fn set_duration(&mut self, minutes: u32) -> TimerSnapshot {
        self.configured_secs = minutes * 60;
        tracing::debug!(minutes, "timer configured");
        self.reset()
    }

    pub fn start(&mut self) -> TimerSnapshot {
        if self.status == TimerStatus::Running {
            return self.snapshot();
        }
        self.ticker = Some(self.scheduler.schedule(TICK_PERIOD));
        self.status = TimerStatus::Running;
        tracing::debug!(remaining = self.remaining_secs, "timer started");
        self.snapshot()
    }

    pub fn pause(&mut self) -> TimerSnapshot {
        if self.status != TimerStatus::Running {
            return self.snapshot();
        }
        self.stop_ticker();
        self.status = TimerStatus::Paused;
        tracing::debug!(remaining = self.remaining_secs, "timer paused");
        self.snapshot()
    }

    pub fn reset(&mut self) -> TimerSnapshot {
        self.stop_ticker();
        self.remaining_secs = self.configured_secs;
        self.status = TimerStatus::Idle;
        self.snapshot()
    }

    /// Advance by one second if `id` is the live tick source.
    pub fn tick(&mut self, id: TickId) -> TickOutcome {
        if self.status != TimerStatus::Running || self.ticker != Some(id) {
            tracing::trace!(tick_id = id.0, "stale tick dropped");
            return TickOutcome::Ignored;
        }

        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs > 0 {
            return TickOutcome::Changed(self.snapshot());
        }

        tracing::info!(minutes = self.configured_minutes(), "pomodoro completed");
        TickOutcome::Completed(self.reset())
    }

    fn stop_ticker(&mut self) {
        if let Some(id) = self.ticker.take() {
            self.scheduler.cancel(id);
        }
    }
}
