use std::{
    fmt::{Debug, Display, Formatter},
    ops::{Div, Mul, RangeInclusive},
};

use crate::{Days, Litres, PercentPerDay, Quantity};

/// Fill level as a percentage of the tank capacity.
pub type Percent = Quantity<0, 0, 1>;

impl Percent {
    pub const FULL: Self = Self::new(100.0);

    /// Nominal sensor range.
    pub const RANGE: RangeInclusive<Self> = Self::ZERO..=Self::FULL;

    /// Convert the percentage into `0.0..=1.0`.
    #[must_use]
    pub const fn to_ratio(self) -> f64 {
        0.01 * self.0.0
    }

    /// Finite and within the nominal sensor range.
    #[must_use]
    pub fn is_valid_level(self) -> bool {
        self.is_finite() && Self::RANGE.contains(&self)
    }
}

impl Display for Percent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1} %", self.0)
    }
}

impl Debug for Percent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}%", self.0)
    }
}

/// Volume of the fill level in a tank of the given capacity.
impl Mul<Litres> for Percent {
    type Output = Litres;

    fn mul(self, capacity: Litres) -> Self::Output {
        capacity * self.to_ratio()
    }
}

impl Div<PercentPerDay> for Percent {
    type Output = Days;

    fn div(self, rhs: PercentPerDay) -> Self::Output {
        Quantity(self.0 / rhs.0)
    }
}
