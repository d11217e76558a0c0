use std::fmt::{Debug, Display, Formatter};

use crate::quantity::Quantity;

/// Tenge per cubic meter, the tariff dimension.
pub type CubicMeterRate = Quantity<f64, -1, 1>;

impl Display for CubicMeterRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} ₸/m³", self.0)
    }
}

impl Debug for CubicMeterRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}₸/m³", self.0)
    }
}
