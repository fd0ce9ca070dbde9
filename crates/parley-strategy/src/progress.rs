use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use parley_models::Deadline;

/// Monotonic millisecond time source.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> u64;
}

/// Milliseconds elapsed since the clock was created.
#[derive(Debug)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: AtomicU64,
}

impl ManualClock {
    pub fn new(now_ms: u64) -> Self {
        Self {
            now_ms: AtomicU64::new(now_ms),
        }
    }

    pub fn set(&self, now_ms: u64) {
        self.now_ms.store(now_ms, Ordering::SeqCst);
    }

    pub fn advance(&self, delta_ms: u64) {
        self.now_ms.fetch_add(delta_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}

/// Fraction of the negotiation that has elapsed, 0 at the start and 1 at the deadline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Progress {
    Time { start_ms: u64, duration_ms: u64 },
    Rounds { current: u32, total: u32 },
}

impl Progress {
    /// Start tracking `deadline` from the clock's current instant.
    pub fn start(deadline: Deadline, clock: &dyn Clock) -> Self {
        match deadline {
            Deadline::Time { duration_ms } => Progress::Time {
                start_ms: clock.now_ms(),
                duration_ms,
            },
            Deadline::Rounds { rounds } => Progress::Rounds {
                current: 0,
                total: rounds,
            },
        }
    }

    pub fn get(&self, now_ms: u64) -> f64 {
        let fraction = match *self {
            Progress::Time {
                start_ms,
                duration_ms,
            } => {
                if duration_ms == 0 {
                    return 1.0;
                }
                now_ms.saturating_sub(start_ms) as f64 / duration_ms as f64
            }
            Progress::Rounds { current, total } => {
                if total == 0 {
                    return 1.0;
                }
                current as f64 / total as f64
            }
        };
        fraction.clamp(0.0, 1.0)
    }

    /// Count one round. Time-based progress ignores this.
    pub fn advance(&mut self) {
        if let Progress::Rounds { current, total } = self {
            *current = current.saturating_add(1).min(*total);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_progress_is_clamped_fraction() {
        let clock = ManualClock::new(1_000);
        let progress = Progress::start(Deadline::Time { duration_ms: 10_000 }, &clock);

        assert_eq!(progress.get(1_000), 0.0);
        assert_eq!(progress.get(6_000), 0.5);
        assert_eq!(progress.get(11_000), 1.0);
        assert_eq!(progress.get(50_000), 1.0);
        // Clock readings before the start never go negative.
        assert_eq!(progress.get(0), 0.0);
    }

    #[test]
    fn rounds_progress_advances_per_turn() {
        let clock = ManualClock::default();
        let mut progress = Progress::start(Deadline::Rounds { rounds: 4 }, &clock);

        assert_eq!(progress.get(0), 0.0);
        progress.advance();
        assert_eq!(progress.get(0), 0.25);
        for _ in 0..10 {
            progress.advance();
        }
        assert_eq!(progress.get(0), 1.0);
    }

    #[test]
    fn zero_length_deadline_is_complete() {
        let clock = ManualClock::default();
        let progress = Progress::start(Deadline::Time { duration_ms: 0 }, &clock);
        assert_eq!(progress.get(0), 1.0);
    }

    #[test]
    fn manual_clock_moves_on_demand() {
        let clock = ManualClock::new(5);
        clock.advance(10);
        assert_eq!(clock.now_ms(), 15);
        clock.set(2);
        assert_eq!(clock.now_ms(), 2);
    }

    #[test]
    fn monotonic_clock_does_not_go_backwards() {
        let clock = MonotonicClock::new();
        let first = clock.now_ms();
        assert!(clock.now_ms() >= first);
    }
}
