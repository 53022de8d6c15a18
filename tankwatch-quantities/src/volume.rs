use std::{
    fmt::{Debug, Display, Formatter},
    ops::Div,
};

use crate::{Days, LitresPerDay, Percent, Quantity};

pub type Litres = Quantity<1, 0, 0>;

impl Litres {
    /// Fill level of this volume in a tank of the given capacity.
    pub fn fill_of(self, capacity: Self) -> Percent {
        Quantity::new(100.0 * (self / capacity))
    }
}

impl Display for Litres {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.0} L", self.0)
    }
}

impl Debug for Litres {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}L", self.0)
    }
}

impl Div<LitresPerDay> for Litres {
    type Output = Days;

    fn div(self, rhs: LitresPerDay) -> Self::Output {
        Quantity(self.0 / rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_fill_of() {
        assert_abs_diff_eq!(Litres::from(250.0).fill_of(Litres::from(1000.0)).get(), 25.0);
    }

    #[test]
    fn test_days_remaining() {
        let days = Litres::from(500.0) / LitresPerDay::from(40.0);
        assert_abs_diff_eq!(days.get(), 12.5);
    }

    #[test]
    fn test_display() {
        assert_eq!(Litres::from(1234.4).to_string(), "1234 L");
    }
}
