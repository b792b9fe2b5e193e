use chrono::{DateTime, Duration, SubsecRound, Utc};
use parking_lot::Mutex;

/// Wall clock that never hands out the same instant twice.
///
/// History entries are identified by their timestamp, so two edits landing in
/// the same microsecond still need distinct values.
#[derive(Debug, Default)]
pub struct MonotonicClock {
    last: Mutex<Option<DateTime<Utc>>>,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.advance(Utc::now())
    }

    fn advance(&self, wall: DateTime<Utc>) -> DateTime<Utc> {
        // 截断到微秒，保证经 JSON 往返后仍能精确匹配
        let wall = wall.trunc_subsecs(6);
        let mut last = self.last.lock();
        let next = match *last {
            Some(prev) if wall <= prev => prev + Duration::microseconds(1),
            _ => wall,
        };
        *last = Some(next);
        next
    }
}
