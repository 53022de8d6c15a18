use std::fmt::{Debug, Display, Formatter};

use chrono::TimeDelta;

use crate::Quantity;

pub type Days = Quantity<0, 1, 0>;

impl Days {
    /// Nearest whole number of days, for calendar arithmetic.
    pub fn to_time_delta(self) -> Option<TimeDelta> {
        if !self.is_finite() {
            return None;
        }
        #[expect(clippy::cast_possible_truncation)]
        let days = self.0.0.round() as i64;
        TimeDelta::try_days(days)
    }
}

impl From<TimeDelta> for Days {
    fn from(time_delta: TimeDelta) -> Self {
        Self::new(time_delta.as_seconds_f64() / 86400.0)
    }
}

impl Display for Days {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1} d", self.0)
    }
}

impl Debug for Days {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}d", self.0)
    }
}
