use std::fmt::{Debug, Display, Formatter};

use crate::quantity::Quantity;

/// Kazakhstani tenge.
pub type Tenge = Quantity<f64, 0, 1>;

impl Display for Tenge {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} ₸", self.0)
    }
}

impl Debug for Tenge {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}₸", self.0)
    }
}
