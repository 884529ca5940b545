//! Time abstraction and Taipei-local timestamp rendering.
//!
//! Check-in timestamps are always rendered in the school's timezone
//! (`Asia/Taipei`), independent of server locale. Taipei is a fixed UTC+8
//! with no daylight saving, so a `chrono::FixedOffset` is sufficient.
//! The `Clock` trait enables deterministic tests; production code uses
//! `RealClock`.

use std::{
    fmt,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use chrono::{DateTime, FixedOffset, Utc};

const TAIPEI_UTC_OFFSET_SECS: i32 = 8 * 60 * 60;

fn taipei_offset() -> FixedOffset {
    FixedOffset::east_opt(TAIPEI_UTC_OFFSET_SECS).expect("UTC+8 is a valid fixed offset")
}

/// Clock abstraction for timestamp generation.
///
/// Production code uses `RealClock`; tests inject `TestClock` to pin the
/// current date and time.
pub trait Clock: Send + Sync + fmt::Debug {
    /// Returns the current system time.
    fn now_system(&self) -> SystemTime;
}

/// Real clock implementation using system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealClock;

impl RealClock {
    /// Creates a new real clock instance.
    pub fn new() -> Self {
        Self
    }
}

impl Clock for RealClock {
    fn now_system(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Test clock with controllable system time.
#[derive(Debug, Clone)]
pub struct TestClock {
    /// System time as nanoseconds since `UNIX_EPOCH`.
    system_ns: Arc<AtomicU64>,
}

impl TestClock {
    /// Creates a test clock starting at the current time.
    pub fn new() -> Self {
        Self::with_start_time(SystemTime::now())
    }

    /// Creates a test clock starting at a specific time.
    pub fn with_start_time(start: SystemTime) -> Self {
        let since_epoch = start.duration_since(UNIX_EPOCH).unwrap_or_default();
        Self {
            system_ns: Arc::new(AtomicU64::new(
                u64::try_from(since_epoch.as_nanos().min(u128::from(u64::MAX))).unwrap_or(0),
            )),
        }
    }

    /// Advances the clock by the specified duration.
    pub fn advance(&self, duration: Duration) {
        let duration_ns = u64::try_from(duration.as_nanos().min(u128::from(u64::MAX))).unwrap_or(0);
        self.system_ns.fetch_add(duration_ns, Ordering::AcqRel);
    }
}

impl Default for TestClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TestClock {
    fn now_system(&self) -> SystemTime {
        let ns = self.system_ns.load(Ordering::Acquire);
        UNIX_EPOCH + Duration::from_nanos(ns)
    }
}

/// A check-in instant rendered in Taipei local time.
///
/// `today` doubles as the roster date-column header, so its format must
/// stay in lockstep with how the attendance sheets name their columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalStamp {
    /// Local date, `YYYY-MM-DD`. Matches the roster date-column header.
    pub today: String,
    /// Local time of day, `HH:MM`. Written into the attendance cell.
    pub time: String,
    /// Local date and time, `YYYY/MM/DD HH:MM`. Shown on pages and in
    /// notifications.
    pub datetime: String,
}

impl LocalStamp {
    /// Renders a system time in Taipei local time.
    pub fn from_system(now: SystemTime) -> Self {
        let local = DateTime::<Utc>::from(now).with_timezone(&taipei_offset());
        Self {
            today: local.format("%Y-%m-%d").to_string(),
            time: local.format("%H:%M").to_string(),
            datetime: local.format("%Y/%m/%d %H:%M").to_string(),
        }
    }

    /// Renders the current instant of the given clock.
    pub fn now(clock: &dyn Clock) -> Self {
        Self::from_system(clock.now_system())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_stamp_renders_in_taipei_time() {
        // 2023-11-14T22:13:20Z is 2023-11-15 06:13:20 in Taipei.
        let stamp = LocalStamp::from_system(UNIX_EPOCH + Duration::from_secs(1_700_000_000));
        assert_eq!(stamp.today, "2023-11-15");
        assert_eq!(stamp.time, "06:13");
        assert_eq!(stamp.datetime, "2023/11/15 06:13");
    }

    #[test]
    fn test_clock_starts_where_told() {
        let start = UNIX_EPOCH + Duration::from_secs(1_772_677_800);
        let clock = TestClock::with_start_time(start);
        assert_eq!(clock.now_system(), start);

        let stamp = LocalStamp::now(&clock);
        assert_eq!(stamp.today, "2026-03-05");
        assert_eq!(stamp.time, "10:30");
    }

    #[test]
    fn test_clock_advances() {
        let clock = TestClock::with_start_time(UNIX_EPOCH + Duration::from_secs(1_000));
        clock.advance(Duration::from_secs(60));
        assert_eq!(clock.now_system(), UNIX_EPOCH + Duration::from_secs(1_060));
    }

    #[test]
    fn midnight_rollover_changes_the_date_column() {
        // 15:59:30Z is 23:59:30 Taipei; one minute later the local date flips.
        let clock = TestClock::with_start_time(UNIX_EPOCH + Duration::from_secs(1_700_063_970));
        let before = LocalStamp::now(&clock);
        clock.advance(Duration::from_secs(60));
        let after = LocalStamp::now(&clock);
        assert_ne!(before.today, after.today);
    }
}
