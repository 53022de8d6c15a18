pub mod fill;
pub mod rate;
pub mod time;
pub mod volume;

use std::ops::{Div, Mul};

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

pub use self::{
    fill::Percent,
    rate::{LitresPerDay, PercentPerDay},
    time::Days,
    volume::Litres,
};

/// Dimensioned scalar: litres, days and fill fraction of a tank capacity.
#[derive(
    Clone,
    Copy,
    Deserialize,
    Eq,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
    derive_more::Add,
    derive_more::AddAssign,
    derive_more::From,
    derive_more::FromStr,
    derive_more::Neg,
    derive_more::Sub,
    derive_more::SubAssign,
    derive_more::Sum,
)]
#[serde(transparent)]
#[from(i32, f64, OrderedFloat<f64>)]
#[must_use]
pub struct Quantity<const VOLUME: isize, const TIME: isize, const FILL: isize>(
    pub OrderedFloat<f64>,
);

impl<const VOLUME: isize, const TIME: isize, const FILL: isize> Quantity<VOLUME, TIME, FILL> {
    pub const ZERO: Self = Self(OrderedFloat(0.0));

    pub const fn new(value: f64) -> Self {
        Self(OrderedFloat(value))
    }

    #[must_use]
    pub const fn get(self) -> f64 {
        self.0.0
    }

    #[must_use]
    pub const fn is_finite(self) -> bool {
        self.0.0.is_finite()
    }

    /// Finite and strictly positive.
    #[must_use]
    pub fn is_positive(self) -> bool {
        self.is_finite() && self > Self::ZERO
    }
}

impl<const VOLUME: isize, const TIME: isize, const FILL: isize> Mul<f64>
    for Quantity<VOLUME, TIME, FILL>
{
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self(self.0 * rhs)
    }
}

impl<const VOLUME: isize, const TIME: isize, const FILL: isize> Div<f64>
    for Quantity<VOLUME, TIME, FILL>
{
    type Output = Self;

    fn div(self, rhs: f64) -> Self::Output {
        Self(self.0 / rhs)
    }
}

impl<const VOLUME: isize, const TIME: isize, const FILL: isize> Div<Self>
    for Quantity<VOLUME, TIME, FILL>
{
    type Output = f64;

    fn div(self, rhs: Self) -> Self::Output {
        self.0.0 / rhs.0.0
    }
}
