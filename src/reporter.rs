//! Fixed-interval timer that refreshes the elapsed time while playing.
use std::time::{Duration, Instant};

pub const DEFAULT_TICK: Duration = Duration::from_secs(1);

#[derive(Debug)]
pub struct PositionReporter {
    interval: Duration,
    next_due: Option<Instant>,
}

impl PositionReporter {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    /// First tick fires one interval after `now`. Restarting a running
    /// reporter re-anchors it.
    pub fn start(&mut self, now: Instant) {
        self.next_due = Some(now + self.interval);
    }

    pub fn stop(&mut self) {
        self.next_due = None;
    }

    /// Returns true when a tick is due. Ticks missed while the UI was busy
    /// collapse into one.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                let mut next = due + self.interval;
                if next <= now {
                    next = now + self.interval;
                }
                self.next_due = Some(next);
                true
            }
            _ => false,
        }
    }

    /// Time left until the next tick, if running.
    pub fn time_to_next(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(now))
    }
}

/// Formats seconds as `MM:SS`. Minutes keep growing past 99.
pub fn format_elapsed(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0. {
        seconds as u64
    } else {
        0
    };
    format!("{:02}:{:02}", total / 60, total % 60)
}
