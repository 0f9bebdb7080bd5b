use merit_quantities::{cost::HourlyCost, power::Megawatts};
use serde::Serialize;

use crate::core::{merit_order::MeritOrder, unit::Unit};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Allocation {
    pub name: String,

    /// Output rounded to one decimal place.
    #[serde(rename = "p")]
    pub power: Megawatts,
}

/// Output of every unit, in the order the units were requested.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ProductionPlan(Vec<Allocation>);

impl ProductionPlan {
    /// Plan with every unit switched off.
    pub fn idle(units: &[Unit]) -> Self {
        Self(
            units
                .iter()
                .map(|unit| Allocation { name: unit.name.clone(), power: Megawatts::ZERO })
                .collect(),
        )
    }

    /// Set the output of the unit at the position, rounding it right away.
    pub(super) fn assign(&mut self, position: usize, power: Megawatts) {
        self.0[position].power = power.round_to_tenths();
    }

    pub fn allocations(&self) -> &[Allocation] {
        &self.0
    }

    pub fn total(&self) -> Megawatts {
        self.0.iter().map(|allocation| allocation.power).sum()
    }

    /// Fuel and emission cost of running the plan for an hour.
    pub fn hourly_cost(&self, merit_order: &MeritOrder<'_>) -> HourlyCost {
        merit_order.iter().map(|entry| self.0[entry.position].power * entry.cost).sum()
    }
}
