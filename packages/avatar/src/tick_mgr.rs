//! See `TickMgr`.

use std::time::Duration;
use tokio::time::Instant;


/// Desired duration of a tick.
pub const TICK: Duration = Duration::from_millis(50);


/// Schedules fixed-rate ticks, skipping ahead when running behind rather than
/// bursting to catch up.
#[derive(Debug, Clone)]
pub struct TickMgr {
    tick: u64,
    tick_duration: Duration,
    next_tick: Instant,
}

impl TickMgr {
    /// Construct with the first tick scheduled for now.
    pub fn new() -> Self {
        Self::with_tick_duration(TICK)
    }

    pub fn with_tick_duration(tick_duration: Duration) -> Self {
        assert!(!tick_duration.is_zero(), "zero tick duration");
        TickMgr {
            tick: 0,
            tick_duration,
            next_tick: Instant::now(),
        }
    }

    /// Get the number of the current tick.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Get the time that the next tick is scheduled to occur ideally.
    ///
    /// Inputs available before this instant should be processed by that tick.
    pub fn next_tick(&self) -> Instant {
        self.next_tick
    }

    /// Call this after doing a tick, so as to schedule the next one. Returns
    /// the number of ticks skipped for running behind.
    pub fn on_tick_done(&mut self) -> u32 {
        self.tick += 1;

        self.next_tick += self.tick_duration;
        let now = Instant::now();
        if self.next_tick >= now {
            return 0;
        }
        let behind_nanos = (now - self.next_tick).as_nanos();
        let tick_nanos = self.tick_duration.as_nanos();
        // poor man's div_ceil
        let behind_ticks = match behind_nanos % tick_nanos {
            0 => behind_nanos / tick_nanos,
            _ => behind_nanos / tick_nanos + 1,
        };
        let behind_ticks = u32::try_from(behind_ticks).unwrap_or(u32::MAX);
        warn!("running too slow, skipping {behind_ticks} ticks");
        self.next_tick += self.tick_duration * behind_ticks;
        behind_ticks
    }
}


#[tokio::test(start_paused = true)]
async fn test_tick_schedule() {
    let mut tick_mgr = TickMgr::new();
    let start = tick_mgr.next_tick();

    assert_eq!(tick_mgr.on_tick_done(), 0);
    assert_eq!(tick_mgr.next_tick(), start + TICK);
    assert_eq!(tick_mgr.tick(), 1);

    tokio::time::advance(TICK * 3 + Duration::from_millis(10)).await;
    assert_eq!(tick_mgr.on_tick_done(), 2);
    assert_eq!(tick_mgr.tick(), 2);
    assert_eq!(tick_mgr.next_tick(), start + TICK * 4);
    assert!(tick_mgr.next_tick() >= Instant::now());
}
