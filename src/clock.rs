use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Source of time for the shell's state machines.
///
/// `now` is monotonic and drives every timer (toast expiry, idle decay,
/// prompt delays). `epoch_millis` is wall-clock time and is only used for
/// values that get persisted, such as the install dismissal timestamp.
pub trait Clock {
    fn now(&self) -> Instant;
    fn epoch_millis(&self) -> i64;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn epoch_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Hand-driven clock for tests. Clones share the same time.
#[derive(Clone)]
pub struct ManualClock {
    origin: Instant,
    elapsed: Rc<Cell<Duration>>,
    epoch_origin: i64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::starting_at_epoch(1_700_000_000_000)
    }

    pub fn starting_at_epoch(epoch_millis: i64) -> Self {
        Self {
            origin: Instant::now(),
            elapsed: Rc::new(Cell::new(Duration::ZERO)),
            epoch_origin: epoch_millis,
        }
    }

    pub fn advance(&self, by: Duration) {
        self.elapsed.set(self.elapsed.get() + by);
    }

    pub fn advance_millis(&self, millis: u64) {
        self.advance(Duration::from_millis(millis));
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.elapsed.get()
    }

    fn epoch_millis(&self) -> i64 {
        self.epoch_origin + self.elapsed.get().as_millis() as i64
    }
}
