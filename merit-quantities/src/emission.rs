use std::{
    fmt::{Debug, Display, Formatter},
    ops::Mul,
};

use crate::{
    Quantity,
    rate::{MegawattHourRate, TonneRate},
};

/// Tonnes of CO₂ emitted per megawatt-hour produced.
pub type EmissionIntensity = Quantity<-1, -1, 1, 0>;

impl Display for EmissionIntensity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3} t/MWh", self.0)
    }
}

impl Debug for EmissionIntensity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}t/MWh", self.0)
    }
}

impl Mul<TonneRate> for EmissionIntensity {
    type Output = MegawattHourRate;

    fn mul(self, rhs: TonneRate) -> Self::Output {
        Quantity(self.0 * rhs.0)
    }
}
