use merit_quantities::{emission::EmissionIntensity, rate::MegawattHourRate};

use crate::core::{
    error::DispatchError,
    fuels::FuelPrices,
    unit::{Unit, UnitKind},
};

/// Tonnes of CO₂ emitted per megawatt-hour by a gas-fired plant.
pub const DEFAULT_EMISSION_FACTOR: EmissionIntensity = EmissionIntensity::new(0.3);

/// Marginal cost of one megawatt-hour for each kind of unit.
#[derive(Copy, Clone)]
pub struct CostModel {
    pub fuel_prices: FuelPrices,
    pub emission_factor: EmissionIntensity,
}

impl CostModel {
    pub fn cost_of(&self, unit: &Unit) -> Result<MegawattHourRate, DispatchError> {
        if unit.kind.is_thermal() && !(unit.efficiency.is_finite() && unit.efficiency > 0.0) {
            return Err(DispatchError::NonPositiveEfficiency {
                name: unit.name.clone(),
                efficiency: unit.efficiency,
            });
        }
        Ok(match unit.kind {
            UnitKind::GasFired => {
                self.fuel_prices.gas / unit.efficiency
                    + self.emission_factor * self.fuel_prices.co2
            }
            UnitKind::Turbojet => self.fuel_prices.kerosene / unit.efficiency,
            UnitKind::WindTurbine => MegawattHourRate::ZERO,
        })
    }
}
