use bon::Builder;
use merit_quantities::{emission::EmissionIntensity, percent::Percent, power::Megawatts};

use crate::{
    core::{
        cost::{CostModel, DEFAULT_EMISSION_FACTOR},
        error::DispatchError,
        fuels::FuelPrices,
        merit_order::{Entry, MeritOrder},
        plan::ProductionPlan,
        unit::Unit,
    },
    prelude::*,
};

/// Greedy merit-order dispatcher.
///
/// The dispatcher does not check whether the fleet can cover the load at all:
/// if it cannot, the returned plan simply produces less than requested.
#[derive(Builder)]
pub struct Dispatcher<'a> {
    /// Total requested output.
    load: Megawatts,

    fuel_prices: FuelPrices,
    units: &'a [Unit],

    /// CO₂ emitted per megawatt-hour by gas-fired units.
    #[builder(default = DEFAULT_EMISSION_FACTOR)]
    emission_factor: EmissionIntensity,
}

impl Dispatcher<'_> {
    /// Rank the units by their marginal cost.
    pub fn merit_order(&self) -> Result<MeritOrder<'_>, DispatchError> {
        MeritOrder::try_new(
            self.units,
            &CostModel { fuel_prices: self.fuel_prices, emission_factor: self.emission_factor },
        )
    }

    /// Build the production plan.
    ///
    /// Wind turbines go first and deliver whatever the wind allows. The thermal units are then
    /// loaded in the merit order, each up to its `pmax`, while making sure that:
    ///
    /// - a running unit produces at least its own `pmin`;
    /// - the next unit in the merit order still has room to reach its `pmin`;
    /// - two units of equal cost share the load when the second one is needed only at its `pmin`.
    #[instrument(skip_all, fields(load = %self.load, n_units = self.units.len()))]
    pub fn dispatch(&self) -> Result<ProductionPlan, DispatchError> {
        self.validate()?;
        let merit_order = self.merit_order()?;
        debug!(?merit_order, "ranked");

        let mut plan = ProductionPlan::idle(self.units);
        let mut remaining = self.load;

        for entry in merit_order.iter().filter(|entry| entry.unit.is_wind()) {
            let production =
                (entry.unit.pmax * self.fuel_prices.wind.to_proportion()).min(remaining);
            plan.assign(entry.position, production);
            remaining -= production;
            if remaining <= Megawatts::ZERO {
                break;
            }
        }
        debug!(%remaining, "wind dispatched");

        let mut rank = 0;
        while remaining > Megawatts::ZERO
            && let Some(current) = merit_order.get(rank)
        {
            if current.unit.is_wind() {
                rank += 1;
                continue;
            }
            let next = merit_order.get(rank + 1);

            if let Some(next) = next
                && current.splits_with(next, remaining)
            {
                let current_production = (remaining - next.unit.pmin()).min(current.unit.pmax);
                plan.assign(current.position, current_production);
                remaining -= current_production;

                let next_production = next.unit.pmin();
                plan.assign(next.position, next_production);
                remaining -= next_production;

                trace!(
                    current = %current.unit.name,
                    next = %next.unit.name,
                    %remaining,
                    "split",
                );
                rank += 2;
                continue;
            }

            let production = Self::production(current, next, remaining);
            plan.assign(current.position, production);
            remaining -= production;
            trace!(unit = %current.unit.name, %production, %remaining, "dispatched");
            rank += 1;
        }

        if remaining > Megawatts::ZERO {
            warn!(%remaining, "the fleet cannot cover the load");
        }
        Ok(plan)
    }

    /// Output of a unit that does not share the load with the next one.
    fn production(
        current: &Entry<'_>,
        next: Option<&Entry<'_>>,
        remaining: Megawatts,
    ) -> Megawatts {
        let pmax = current.unit.pmax;
        let mut production = pmax.min(remaining);

        // Leave enough for the next unit to run at its minimum:
        if let Some(next) = next
            && next.unit.pmin() > Megawatts::ZERO
            && remaining > pmax
            && remaining - pmax < next.unit.pmin()
        {
            production = remaining - next.unit.pmin();
        }

        // A running unit cannot go below its minimum:
        let pmin = current.unit.pmin();
        if pmin > Megawatts::ZERO && production < pmin && remaining >= pmin {
            production = pmin;
        }

        production.min(remaining)
    }

    fn validate(&self) -> Result<(), DispatchError> {
        if !self.load.is_finite() || self.load < Megawatts::ZERO {
            return Err(DispatchError::NegativeLoad(self.load));
        }
        let wind = self.fuel_prices.wind;
        if !(Percent::ZERO..=Percent::HUNDRED).contains(&wind) || !wind.is_finite() {
            return Err(DispatchError::WindOutOfRange(wind));
        }
        for unit in self.units {
            for (field, value) in [("pmax", Some(unit.pmax)), ("pmin", unit.pmin)] {
                if let Some(value) = value
                    && (!value.is_finite() || value < Megawatts::ZERO)
                {
                    return Err(DispatchError::NegativeBound {
                        name: unit.name.clone(),
                        field,
                        value,
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;
    use merit_quantities::rate::{MegawattHourRate, TonneRate};

    use super::*;
    use crate::core::unit::UnitKind;

    fn fuel_prices(wind: f64) -> FuelPrices {
        FuelPrices {
            gas: MegawattHourRate::new(13.4),
            kerosene: MegawattHourRate::new(50.8),
            co2: TonneRate::new(20.0),
            wind: Percent::new(wind),
        }
    }

    fn unit(name: &str, kind: UnitKind, efficiency: f64, pmin: f64, pmax: f64) -> Unit {
        Unit::builder()
            .name(name)
            .kind(kind)
            .efficiency(efficiency)
            .pmin(Megawatts::new(pmin))
            .pmax(Megawatts::new(pmax))
            .build()
    }

    fn fleet() -> Vec<Unit> {
        vec![
            unit("gasfiredbig1", UnitKind::GasFired, 0.53, 100.0, 460.0),
            unit("gasfiredbig2", UnitKind::GasFired, 0.53, 100.0, 460.0),
            unit("gasfiredsomewhatsmaller", UnitKind::GasFired, 0.37, 40.0, 210.0),
            unit("tj1", UnitKind::Turbojet, 0.3, 0.0, 16.0),
            unit("windpark1", UnitKind::WindTurbine, 1.0, 0.0, 150.0),
            unit("windpark2", UnitKind::WindTurbine, 1.0, 0.0, 36.0),
        ]
    }

    fn dispatch(load: f64, wind: f64, units: &[Unit]) -> Vec<f64> {
        Dispatcher::builder()
            .load(Megawatts::new(load))
            .fuel_prices(fuel_prices(wind))
            .units(units)
            .build()
            .dispatch()
            .unwrap()
            .allocations()
            .iter()
            .map(|allocation| f64::from(allocation.power))
            .collect()
    }

    #[test]
    fn single_gas_plant_with_wind() {
        let units = [
            unit("windpark1", UnitKind::WindTurbine, 1.0, 0.0, 150.0),
            unit("gasfiredbig1", UnitKind::GasFired, 0.53, 100.0, 460.0),
            unit("turbojet1", UnitKind::Turbojet, 0.3, 0.0, 16.0),
        ];
        let plan = Dispatcher::builder()
            .load(Megawatts::new(480.0))
            .fuel_prices(fuel_prices(60.0))
            .units(&units)
            .build()
            .dispatch()
            .unwrap();
        let names =
            plan.allocations().iter().map(|allocation| allocation.name.as_str()).collect_vec();
        assert_eq!(names, ["windpark1", "gasfiredbig1", "turbojet1"]);
        let powers =
            plan.allocations().iter().map(|allocation| f64::from(allocation.power)).collect_vec();
        assert_eq!(powers, [90.0, 390.0, 0.0]);
        assert_eq!(plan.total(), Megawatts::new(480.0));
    }

    #[test]
    fn windy_day() {
        assert_eq!(dispatch(480.0, 60.0, &fleet()), [368.4, 0.0, 0.0, 0.0, 90.0, 21.6]);
    }

    #[test]
    fn high_load() {
        assert_eq!(dispatch(910.0, 60.0, &fleet()), [460.0, 338.4, 0.0, 0.0, 90.0, 21.6]);
    }

    /// Two plants of the same cost share the load, the second one at its minimum.
    #[test]
    fn calm_day_splits_equal_cost() {
        assert_eq!(dispatch(480.0, 0.0, &fleet()), [380.0, 100.0, 0.0, 0.0, 0.0, 0.0]);
    }

    /// The cheaper plant leaves room for the next one to reach its minimum.
    #[test]
    fn headroom_for_next_pmin() {
        let units = [
            unit("gas", UnitKind::GasFired, 0.5, 0.0, 100.0),
            unit("tj", UnitKind::Turbojet, 0.5, 50.0, 200.0),
        ];
        assert_eq!(dispatch(120.0, 0.0, &units), [70.0, 50.0]);
    }

    /// Known quirk: the first unit is forced back up to its own minimum after reserving
    /// the headroom, so the next unit ends up below its minimum.
    #[test]
    fn headroom_then_own_pmin_leaves_next_below_pmin() {
        let units = [
            unit("gas", UnitKind::GasFired, 0.5, 80.0, 100.0),
            unit("tj", UnitKind::Turbojet, 0.5, 50.0, 200.0),
        ];
        assert_eq!(dispatch(120.0, 0.0, &units), [80.0, 40.0]);
    }

    /// Known quirk: reserving the next unit's minimum can push the current one below zero.
    #[test]
    fn headroom_can_go_negative() {
        let units = [
            unit("gas", UnitKind::GasFired, 0.5, 0.0, 10.0),
            unit("tj", UnitKind::Turbojet, 0.5, 50.0, 200.0),
        ];
        assert_eq!(dispatch(30.0, 0.0, &units), [-20.0, 50.0]);
    }

    /// Known quirk: a load below the only plant's minimum is still served.
    #[test]
    fn load_below_pmin() {
        let units = [unit("gas", UnitKind::GasFired, 0.5, 100.0, 460.0)];
        assert_eq!(dispatch(50.0, 0.0, &units), [50.0]);
    }

    #[test]
    fn wind_first() {
        let units = [
            unit("windpark", UnitKind::WindTurbine, 1.0, 0.0, 100.0),
            unit("gas", UnitKind::GasFired, 0.5, 60.0, 200.0),
            unit("tj", UnitKind::Turbojet, 0.3, 0.0, 100.0),
        ];
        // The wind covers 90 MW, the gas plant takes the rest:
        assert_eq!(dispatch(150.0, 90.0, &units), [90.0, 60.0, 0.0]);
    }

    #[test]
    fn wind_covers_everything() {
        let units = [
            unit("gas", UnitKind::GasFired, 0.5, 0.0, 100.0),
            unit("windpark1", UnitKind::WindTurbine, 1.0, 0.0, 100.0),
            unit("windpark2", UnitKind::WindTurbine, 1.0, 0.0, 100.0),
        ];
        assert_eq!(dispatch(50.0, 100.0, &units), [0.0, 50.0, 0.0]);
    }

    #[test]
    fn insufficient_capacity_is_under_delivered() {
        let units = [
            unit("windpark", UnitKind::WindTurbine, 1.0, 0.0, 100.0),
            unit("tj", UnitKind::Turbojet, 0.3, 0.0, 16.0),
        ];
        assert_eq!(dispatch(1000.0, 50.0, &units), [50.0, 16.0]);
    }

    #[test]
    fn zero_load() {
        assert_eq!(dispatch(0.0, 60.0, &fleet()), [0.0; 6]);
    }

    #[test]
    fn missing_pmin_is_zero() {
        let units = [
            Unit::builder()
                .name("tj")
                .kind(UnitKind::Turbojet)
                .efficiency(0.3)
                .pmax(Megawatts::new(16.0))
                .build(),
        ];
        assert_eq!(dispatch(10.0, 0.0, &units), [10.0]);
    }

    #[test]
    fn custom_emission_factor_changes_merit_order() {
        let units = [
            unit("gas", UnitKind::GasFired, 0.5, 0.0, 100.0),
            unit("tj", UnitKind::Turbojet, 0.5, 0.0, 100.0),
        ];
        // Gas: 26.8 + 10 × 20 = 226.8 €/MWh, turbojet: 101.6 €/MWh.
        let plan = Dispatcher::builder()
            .load(Megawatts::new(50.0))
            .fuel_prices(fuel_prices(0.0))
            .units(&units)
            .emission_factor(EmissionIntensity::new(10.0))
            .build()
            .dispatch()
            .unwrap();
        assert_eq!(plan.allocations()[0].power, Megawatts::ZERO);
        assert_eq!(plan.allocations()[1].power, Megawatts::new(50.0));
    }

    #[test]
    fn outputs_are_rounded() {
        let units = [unit("windpark", UnitKind::WindTurbine, 1.0, 0.0, 77.77)];
        assert_eq!(dispatch(100.0, 33.0, &units), [25.7]);
    }

    #[test]
    fn ties_round_like_the_formatter() {
        let units = [unit("windpark", UnitKind::WindTurbine, 1.0, 0.0, 12.5)];
        assert_eq!(dispatch(100.0, 50.0, &units), [6.2]);
    }

    #[test]
    fn invariants_hold() {
        let cases = [(0.0, 0.0), (123.4, 17.0), (480.0, 60.0), (777.7, 5.0), (1400.0, 100.0)];
        for (load, wind) in cases {
            let units = fleet();
            let plan = Dispatcher::builder()
                .load(Megawatts::new(load))
                .fuel_prices(fuel_prices(wind))
                .units(&units)
                .build()
                .dispatch()
                .unwrap();
            assert_eq!(plan.allocations().len(), units.len());
            for (allocation, unit) in plan.allocations().iter().zip(&units) {
                assert_eq!(allocation.name, unit.name);
                assert!(allocation.power >= Megawatts::ZERO);
                assert!(allocation.power <= unit.pmax + Megawatts::new(0.05));
            }
            let capacity: f64 = units
                .iter()
                .map(|unit| {
                    if unit.is_wind() {
                        f64::from(unit.pmax) * wind / 100.0
                    } else {
                        f64::from(unit.pmax)
                    }
                })
                .sum();
            if capacity >= load {
                approx::assert_abs_diff_eq!(f64::from(plan.total()), load, epsilon = 0.6);
            }
        }
    }

    #[test]
    fn deterministic() {
        assert_eq!(dispatch(777.7, 5.0, &fleet()), dispatch(777.7, 5.0, &fleet()));
    }

    #[test]
    fn rejects_zero_efficiency() {
        let units = [unit("gas", UnitKind::GasFired, 0.0, 0.0, 100.0)];
        let error = Dispatcher::builder()
            .load(Megawatts::new(50.0))
            .fuel_prices(fuel_prices(0.0))
            .units(&units)
            .build()
            .dispatch()
            .unwrap_err();
        assert!(matches!(error, DispatchError::NonPositiveEfficiency { .. }));
    }

    #[test]
    fn rejects_negative_load() {
        let error = Dispatcher::builder()
            .load(Megawatts::new(-1.0))
            .fuel_prices(fuel_prices(0.0))
            .units(&fleet())
            .build()
            .dispatch()
            .unwrap_err();
        assert_eq!(error, DispatchError::NegativeLoad(Megawatts::new(-1.0)));
    }

    #[test]
    fn rejects_wind_out_of_range() {
        let error = Dispatcher::builder()
            .load(Megawatts::new(1.0))
            .fuel_prices(fuel_prices(120.0))
            .units(&fleet())
            .build()
            .dispatch()
            .unwrap_err();
        assert_eq!(error, DispatchError::WindOutOfRange(Percent::new(120.0)));
    }

    #[test]
    fn rejects_negative_pmax() {
        let units = [unit("tj", UnitKind::Turbojet, 0.3, 0.0, -16.0)];
        let error = Dispatcher::builder()
            .load(Megawatts::new(1.0))
            .fuel_prices(fuel_prices(0.0))
            .units(&units)
            .build()
            .dispatch()
            .unwrap_err();
        assert!(matches!(error, DispatchError::NegativeBound { field: "pmax", .. }));
    }
}
