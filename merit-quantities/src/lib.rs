pub mod cost;
pub mod emission;
pub mod percent;
pub mod power;
pub mod rate;

use std::ops::{Div, Mul};

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// Scalar tagged with the exponents of its physical dimensions.
///
/// Only the conversions that make sense are implemented explicitly per type alias,
/// so that, for example, a fuel price cannot be added to a power output.
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
#[from(i32, f64, OrderedFloat<f64>)]
#[serde(transparent)]
#[must_use]
pub struct Quantity<const POWER: isize, const TIME: isize, const MASS: isize, const COST: isize>(
    pub OrderedFloat<f64>,
);

impl<const POWER: isize, const TIME: isize, const MASS: isize, const COST: isize>
    Quantity<POWER, TIME, MASS, COST>
{
    pub const ZERO: Self = Self(OrderedFloat(0.0));

    pub const fn new(value: f64) -> Self {
        Self(OrderedFloat(value))
    }

    pub const fn abs(mut self) -> Self {
        self.0 = OrderedFloat(self.0.0.abs());
        self
    }

    /// Round to one decimal place.
    ///
    /// The formatter works on the exact binary value and breaks ties to even,
    /// so `6.25` becomes `6.2` and `0.35` (actually `0.34999…`) becomes `0.3`.
    pub fn round_to_tenths(self) -> Self {
        format!("{:.1}", self.0.0).parse::<f64>().map_or(self, Self::new)
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.0.0.is_finite()
    }
}

impl<const POWER: isize, const TIME: isize, const MASS: isize, const COST: isize>
    From<Quantity<POWER, TIME, MASS, COST>> for f64
{
    fn from(quantity: Quantity<POWER, TIME, MASS, COST>) -> Self {
        quantity.0.0
    }
}

impl<const POWER: isize, const TIME: isize, const MASS: isize, const COST: isize> Mul<f64>
    for Quantity<POWER, TIME, MASS, COST>
{
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self(self.0 * rhs)
    }
}

impl<const POWER: isize, const TIME: isize, const MASS: isize, const COST: isize> Div<f64>
    for Quantity<POWER, TIME, MASS, COST>
{
    type Output = Self;

    fn div(self, rhs: f64) -> Self::Output {
        Self(self.0 / rhs)
    }
}

impl<const POWER: isize, const TIME: isize, const MASS: isize, const COST: isize> Div<Self>
    for Quantity<POWER, TIME, MASS, COST>
{
    type Output = OrderedFloat<f64>;

    fn div(self, rhs: Self) -> Self::Output {
        self.0 / rhs.0
    }
}
