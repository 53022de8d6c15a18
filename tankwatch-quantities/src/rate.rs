use std::{
    fmt::{Debug, Display, Formatter},
    ops::Mul,
};

use crate::{Days, Litres, Quantity};

pub type LitresPerDay = Quantity<1, -1, 0>;

/// Percentage points of the tank capacity per day.
pub type PercentPerDay = Quantity<0, -1, 1>;

impl PercentPerDay {
    /// Convert to a volume rate for a tank of the given capacity.
    pub fn of_capacity(self, capacity: Litres) -> LitresPerDay {
        Quantity::new(capacity.get() * self.0.0 * 0.01)
    }
}

impl Display for LitresPerDay {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1} L/d", self.0)
    }
}

impl Debug for LitresPerDay {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}L/d", self.0)
    }
}

impl Display for PercentPerDay {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} %/d", self.0)
    }
}

impl Debug for PercentPerDay {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3}%/d", self.0)
    }
}

impl Mul<Days> for LitresPerDay {
    type Output = Litres;

    fn mul(self, rhs: Days) -> Self::Output {
        Quantity(self.0 * rhs.0)
    }
}
