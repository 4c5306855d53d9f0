use chrono::{DateTime, Local, NaiveDateTime};

/// Source of wall-clock time for record headers and output file names.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Local system time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Clock frozen at a given instant. Makes record output reproducible.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(NaiveDateTime);

impl FixedClock {
    pub fn new(instant: NaiveDateTime) -> Self {
        Self(instant)
    }

    pub fn from_timestamp(secs: i64) -> Option<Self> {
        DateTime::from_timestamp(secs, 0).map(|t| Self(t.naive_utc()))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_system_clock_now_is_recent() {
        let clock = SystemClock;
        let delta = Local::now().naive_local() - clock.now();
        assert!(delta.num_seconds().abs() < 1);
    }

    #[test]
    fn test_fixed_clock_does_not_move() {
        let instant = NaiveDate::from_ymd_opt(2021, 2, 19)
            .and_then(|d| d.and_hms_opt(12, 30, 5))
            .unwrap();
        let clock = FixedClock::new(instant);

        assert_eq!(clock.now(), instant);
        assert_eq!(clock.now(), clock.now());
    }

    #[test]
    fn test_fixed_clock_from_timestamp() {
        let clock = FixedClock::from_timestamp(0).unwrap();
        assert_eq!(clock.now().and_utc().timestamp(), 0);
    }
}
