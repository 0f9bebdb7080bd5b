use std::fmt::{Debug, Display, Formatter};

use crate::Quantity;

pub type Percent = Quantity<0, 0, 0, 0>;

impl Percent {
    pub const HUNDRED: Self = Self::new(100.0);

    #[must_use]
    pub fn to_proportion(self) -> f64 {
        self.0.0 / 100.0
    }
}

impl Display for Percent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}%", self.0)
    }
}

impl Debug for Percent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}
