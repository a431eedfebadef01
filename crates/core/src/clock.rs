use chrono::{Local, NaiveDateTime};

/// Source of registration timestamps, in local wall-clock time.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Local, NaiveDate};

    use super::{Clock, FixedClock, SystemClock};

    #[test]
    fn fixed_clock_is_stable() {
        let instant = NaiveDate::from_ymd_opt(2025, 11, 3)
            .and_then(|date| date.and_hms_opt(10, 0, 0))
            .expect("valid timestamp");
        let clock = FixedClock(instant);

        assert_eq!(clock.now(), instant);
        assert_eq!(clock.now(), clock.now());
    }

    #[test]
    fn system_clock_reads_local_wall_time() {
        let before = Local::now();
        let reading = SystemClock.now();
        let after = Local::now();

        let earliest = before.naive_local().min(after.naive_local());
        let latest = before.naive_local().max(after.naive_local());
        assert!(reading >= earliest - Duration::seconds(1));
        assert!(reading <= latest + Duration::seconds(1));
    }
}
