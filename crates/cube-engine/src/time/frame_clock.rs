use std::time::{Duration, Instant};

/// Monotonic millisecond time source.
///
/// The frame loop reads time only through this trait so tick decisions can be
/// driven by scripted clocks in tests.
pub trait Clock {
    /// Milliseconds elapsed since an arbitrary fixed origin.
    fn now_millis(&self) -> u64;
}

/// Wall clock backed by `Instant`.
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Minimum whole-millisecond interval between ticks for a target rate.
///
/// 60 Hz gives 16 ms (1000 / 60 truncated).
pub fn tick_interval_millis(target_hz: u32) -> u64 {
    (1000.0 / f64::from(target_hz.max(1))) as u64
}

/// Fixed-minimum-interval gate.
///
/// A tick is due once strictly more than `interval` milliseconds have passed
/// since the previous tick. The baseline is reset to the sampled "now" on
/// every tick: drift is not compensated and missed ticks are never replayed.
#[derive(Debug, Clone)]
pub struct TickGate {
    last: u64,
    interval: u64,
}

impl TickGate {
    /// Creates a gate whose baseline is `now`.
    pub fn new(now: u64, interval: u64) -> Self {
        Self {
            last: now,
            interval,
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval)
    }

    /// Returns `true` and moves the baseline to `now` when a tick is due.
    pub fn try_tick(&mut self, now: u64) -> bool {
        if now.saturating_sub(self.last) > self.interval {
            self.last = now;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sixty_hz_truncates_to_sixteen_ms() {
        assert_eq!(tick_interval_millis(60), 16);
        assert_eq!(tick_interval_millis(30), 33);
        assert_eq!(tick_interval_millis(0), 1000);
        assert_eq!(TickGate::new(0, 16).interval(), Duration::from_millis(16));
    }

    #[test]
    fn tick_requires_strictly_more_than_interval() {
        let mut gate = TickGate::new(0, 16);
        assert!(!gate.try_tick(10));
        assert!(!gate.try_tick(16));
        assert!(gate.try_tick(17));
    }

    #[test]
    fn baseline_resets_to_now_without_catch_up() {
        let mut gate = TickGate::new(0, 16);
        // A long stall yields exactly one tick, not a burst.
        assert!(gate.try_tick(500));
        assert!(!gate.try_tick(501));
        assert!(!gate.try_tick(516));
        assert!(gate.try_tick(517));
    }

    #[test]
    fn clock_going_backwards_never_ticks() {
        let mut gate = TickGate::new(100, 16);
        assert!(!gate.try_tick(50));
    }

    #[test]
    fn system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now_millis();
        let b = clock.now_millis();
        assert!(b >= a);
    }
}
