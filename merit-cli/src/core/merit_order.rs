use std::collections::HashSet;

use merit_quantities::{power::Megawatts, rate::MegawattHourRate};

use crate::core::{cost::CostModel, error::DispatchError, unit::Unit};

/// Unit annotated with its marginal cost and its position in the request.
#[derive(Copy, Clone, Debug)]
pub struct Entry<'a> {
    /// Index of the unit in the caller's list.
    pub position: usize,

    pub unit: &'a Unit,
    pub cost: MegawattHourRate,
}

impl Entry<'_> {
    /// Whether this unit and the next one must share the remaining load,
    /// with the next one running exactly at its minimum.
    pub fn splits_with(&self, next: &Self, remaining: Megawatts) -> bool {
        next.cost == self.cost
            && remaining > self.unit.pmax
            && next.unit.pmin() > Megawatts::ZERO
            && remaining <= self.unit.pmax + next.unit.pmin()
    }
}

/// Units sorted from the cheapest to the most expensive.
///
/// Units of equal cost keep their original relative order.
#[derive(Debug)]
pub struct MeritOrder<'a>(Vec<Entry<'a>>);

impl<'a> MeritOrder<'a> {
    pub fn try_new(units: &'a [Unit], cost_model: &CostModel) -> Result<Self, DispatchError> {
        let mut names = HashSet::with_capacity(units.len());
        let mut entries = Vec::with_capacity(units.len());
        for (position, unit) in units.iter().enumerate() {
            if !names.insert(unit.name.as_str()) {
                return Err(DispatchError::DuplicateName(unit.name.clone()));
            }
            entries.push(Entry { position, unit, cost: cost_model.cost_of(unit)? });
        }
        entries.sort_by_key(|entry| entry.cost);
        Ok(Self(entries))
    }

    pub fn get(&self, rank: usize) -> Option<&Entry<'a>> {
        self.0.get(rank)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry<'a>> {
        self.0.iter()
    }
}
