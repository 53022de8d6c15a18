use std::fmt::{Debug, Formatter};

use chrono::{DateTime, TimeDelta, Utc};

#[derive(Copy, Clone, Eq, PartialEq)]
#[must_use]
pub struct Interval {
    /// Inclusive.
    pub start: DateTime<Utc>,

    /// Exclusive.
    pub end: DateTime<Utc>,
}

impl Debug for Interval {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}..{:?}", self.start, self.end)
    }
}

impl Interval {
    pub const fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// The `days` preceding `end`, starting no earlier than the earliest representable instant.
    pub fn trailing_days(end: DateTime<Utc>, days: u32) -> Self {
        let start = TimeDelta::try_days(i64::from(days))
            .and_then(|span| end.checked_sub_signed(span))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        Self::new(start, end)
    }

    #[must_use]
    pub fn contains(self, other: DateTime<Utc>) -> bool {
        (self.start <= other) && (other < self.end)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn trailing_days_ok() {
        let end = Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();
        let interval = Interval::trailing_days(end, 7);
        assert_eq!(interval.start, Utc.with_ymd_and_hms(2025, 3, 3, 12, 0, 0).unwrap());
        assert!(interval.contains(interval.start));
        assert!(!interval.contains(end));
    }

    #[test]
    fn trailing_days_saturates() {
        let end = Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();
        let interval = Interval::trailing_days(end, u32::MAX);
        assert_eq!(interval.start, DateTime::<Utc>::MIN_UTC);
        assert!(interval.contains(Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap()));
    }
}
