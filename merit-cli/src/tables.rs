use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};
use merit_quantities::power::Megawatts;

use crate::core::{merit_order::MeritOrder, plan::ProductionPlan};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .enforce_styling();
    table
}

/// Units ranked by marginal cost.
pub fn build_merit_order_table(merit_order: &MeritOrder<'_>) -> Table {
    let mut table = new_table();
    table.set_header(vec!["#", "Name", "Type", "Cost", "Pmin", "Pmax"]);
    for (rank, entry) in merit_order.iter().enumerate() {
        table.add_row(vec![
            Cell::new(rank + 1).add_attribute(Attribute::Dim),
            Cell::new(&entry.unit.name),
            Cell::new(entry.unit.kind).fg(entry.unit.kind.color()),
            Cell::new(entry.cost).set_alignment(CellAlignment::Right),
            Cell::new(entry.unit.pmin())
                .set_alignment(CellAlignment::Right)
                .add_attribute(Attribute::Dim),
            Cell::new(entry.unit.pmax)
                .set_alignment(CellAlignment::Right)
                .add_attribute(Attribute::Dim),
        ]);
    }
    table
}

/// Planned output per unit, in input order.
pub fn build_plan_table(merit_order: &MeritOrder<'_>, plan: &ProductionPlan) -> Table {
    let mut entries = merit_order.iter().collect::<Vec<_>>();
    entries.sort_by_key(|entry| entry.position);

    let mut table = new_table();
    table.set_header(vec!["Name", "Power", "Hourly"]);
    for entry in entries {
        let power = plan.allocations()[entry.position].power;
        table.add_row(vec![
            Cell::new(&entry.unit.name),
            Cell::new(power).set_alignment(CellAlignment::Right).fg(if power <= Megawatts::ZERO {
                Color::Reset
            } else if entry.unit.kind.is_thermal() && power < entry.unit.pmin() {
                // Below the minimum, see the headroom reservation in the dispatcher:
                Color::Red
            } else {
                Color::Green
            }),
            Cell::new(power * entry.cost).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use merit_quantities::{
        percent::Percent,
        rate::{MegawattHourRate, TonneRate},
    };

    use super::*;
    use crate::core::{
        dispatcher::Dispatcher,
        fuels::FuelPrices,
        unit::{Unit, UnitKind},
    };

    #[test]
    fn merit_order_then_input_order() {
        let units = [
            Unit::builder()
                .name("tj1")
                .kind(UnitKind::Turbojet)
                .efficiency(0.3)
                .pmax(Megawatts::new(16.0))
                .build(),
            Unit::builder()
                .name("windpark1")
                .kind(UnitKind::WindTurbine)
                .pmax(Megawatts::new(150.0))
                .build(),
        ];
        let dispatcher = Dispatcher::builder()
            .load(Megawatts::new(100.0))
            .fuel_prices(FuelPrices {
                gas: MegawattHourRate::new(13.4),
                kerosene: MegawattHourRate::new(50.8),
                co2: TonneRate::new(20.0),
                wind: Percent::new(60.0),
            })
            .units(&units)
            .build();
        let merit_order = dispatcher.merit_order().unwrap();
        let plan = dispatcher.dispatch().unwrap();

        let ranked = build_merit_order_table(&merit_order).to_string();
        assert!(ranked.find("windpark1").unwrap() < ranked.find("tj1").unwrap());
        assert!(!ranked.contains("90.0 MW"));

        let plan_table = build_plan_table(&merit_order, &plan).to_string();
        assert!(plan_table.find("tj1").unwrap() < plan_table.find("windpark1").unwrap());
        assert!(plan_table.contains("90.0 MW"));
        assert!(plan_table.contains("10.0 MW"));
    }
}
