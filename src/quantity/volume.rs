use std::{
    fmt::{Debug, Display, Formatter},
    ops::Mul,
};

use crate::quantity::{Quantity, cost::Tenge, rate::CubicMeterRate};

/// Cubic meters on the water register.
pub type CubicMeters = Quantity<f64, 1, 0>;

impl Display for CubicMeters {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} m³", self.0)
    }
}

impl Debug for CubicMeters {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}m³", self.0)
    }
}

impl Mul<CubicMeterRate> for CubicMeters {
    type Output = Tenge;

    fn mul(self, rhs: CubicMeterRate) -> Self::Output {
        Tenge::from(self.0 * rhs.0)
    }
}
