pub mod cost;
pub mod rate;
pub mod volume;

use std::ops::{Div, Mul};

use serde::{Deserialize, Serialize};

/// Dimensioned quantity: `VOLUME` is the power of cubic meters,
/// `COST` is the power of tenge.
#[derive(
    Clone,
    Copy,
    Deserialize,
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
pub struct Quantity<T, const VOLUME: isize, const COST: isize>(pub T);

impl<T, const VOLUME: isize, const COST: isize> Quantity<T, VOLUME, COST>
where
    Self: PartialOrd,
{
    pub fn min(mut self, rhs: Self) -> Self {
        if rhs < self {
            self = rhs;
        }
        self
    }

    pub fn max(mut self, rhs: Self) -> Self {
        if rhs > self {
            self = rhs;
        }
        self
    }
}

impl<const VOLUME: isize, const COST: isize> Quantity<f64, VOLUME, COST> {
    pub const ZERO: Self = Self(0.0);
}

impl<T, const VOLUME: isize, const COST: isize> Mul<T> for Quantity<T, VOLUME, COST>
where
    T: Mul<T>,
{
    type Output = Quantity<T::Output, VOLUME, COST>;

    fn mul(self, rhs: T) -> Self::Output {
        Quantity(self.0 * rhs)
    }
}

impl<T, const VOLUME: isize, const COST: isize> Div<T> for Quantity<T, VOLUME, COST>
where
    T: Div<T>,
{
    type Output = Quantity<T::Output, VOLUME, COST>;

    fn div(self, rhs: T) -> Self::Output {
        Quantity(self.0 / rhs)
    }
}
