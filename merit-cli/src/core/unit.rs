use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use bon::Builder;
use comfy_table::Color;
use merit_quantities::power::Megawatts;

use crate::core::error::DispatchError;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum UnitKind {
    /// Burns gas and pays for the emitted CO₂.
    GasFired,

    /// Burns kerosene.
    Turbojet,

    /// Free, but only delivers the available share of its capacity.
    WindTurbine,
}

impl UnitKind {
    pub const fn is_thermal(self) -> bool {
        !matches!(self, Self::WindTurbine)
    }

    pub const fn color(self) -> Color {
        match self {
            Self::GasFired => Color::DarkYellow,
            Self::Turbojet => Color::Red,
            Self::WindTurbine => Color::Cyan,
        }
    }
}

impl Display for UnitKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GasFired => write!(f, "gas-fired"),
            Self::Turbojet => write!(f, "turbojet"),
            Self::WindTurbine => write!(f, "wind-turbine"),
        }
    }
}

impl FromStr for UnitKind {
    type Err = DispatchError;

    fn from_str(kind: &str) -> Result<Self, Self::Err> {
        match kind {
            "gasfired" | "gas-fired" => Ok(Self::GasFired),
            "turbojet" => Ok(Self::Turbojet),
            "windturbine" | "wind-turbine" => Ok(Self::WindTurbine),
            _ => Err(DispatchError::UnknownKind(kind.to_string())),
        }
    }
}

/// Power-generating unit as requested by the caller.
#[derive(Clone, Debug, Builder)]
pub struct Unit {
    /// Unique name, also the key in the production plan.
    #[builder(into)]
    pub name: String,

    pub kind: UnitKind,

    /// Share of the fuel energy converted into electricity.
    #[builder(default = 1.0)]
    pub efficiency: f64,

    pub pmax: Megawatts,

    /// Minimum output while running, absent means the unit may produce any amount.
    pub pmin: Option<Megawatts>,
}

impl Unit {
    pub fn pmin(&self) -> Megawatts {
        self.pmin.unwrap_or(Megawatts::ZERO)
    }

    pub const fn is_wind(&self) -> bool {
        matches!(self.kind, UnitKind::WindTurbine)
    }
}
