//! Request document of `POST /productionplan`.

use merit_quantities::{
    emission::EmissionIntensity,
    percent::Percent,
    power::Megawatts,
    rate::{MegawattHourRate, TonneRate},
};
use serde_json::{Map, Value};

use crate::core::{
    dispatcher::Dispatcher,
    error::DispatchError,
    fuels::FuelPrices,
    unit::{Unit, UnitKind},
};

const GAS: &str = "gas(euro/MWh)";
const KEROSENE: &str = "kerosine(euro/MWh)";
const CO2: &str = "co2(euro/ton)";
const WIND: &str = "wind(%)";

const REQUIRED_POWERPLANT_FIELDS: [&str; 4] = ["name", "type", "efficiency", "pmax"];

/// Rejected payload, the message is returned to the client as is.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum PayloadError {
    #[error("Invalid JSON payload")]
    InvalidJson,

    #[error("Field '{field}' must be {expected}")]
    Field { field: &'static str, expected: &'static str },

    #[error("Fuel '{0}' is missing or not a number")]
    Fuel(&'static str),

    #[error("Powerplant at index {0} must be an object")]
    PowerplantNotObject(usize),

    #[error("Powerplant at index {index} is missing field '{field}'")]
    MissingPowerplantField { index: usize, field: &'static str },

    #[error("Powerplant at index {index}, field '{field}' must be {expected}")]
    PowerplantField { index: usize, field: &'static str, expected: &'static str },

    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

#[derive(Debug)]
pub struct Payload {
    pub load: Megawatts,
    pub fuel_prices: FuelPrices,
    pub units: Vec<Unit>,
}

impl Payload {
    pub fn from_slice(body: &[u8]) -> Result<Self, PayloadError> {
        let document: Value =
            serde_json::from_slice(body).map_err(|_| PayloadError::InvalidJson)?;
        Self::try_from(&document)
    }

    pub fn dispatcher(&self, emission_factor: EmissionIntensity) -> Dispatcher<'_> {
        Dispatcher::builder()
            .load(self.load)
            .fuel_prices(self.fuel_prices)
            .units(&self.units)
            .emission_factor(emission_factor)
            .build()
    }
}

impl TryFrom<&Value> for Payload {
    type Error = PayloadError;

    fn try_from(document: &Value) -> Result<Self, Self::Error> {
        let document = match document.as_object() {
            Some(document) if !document.is_empty() => document,
            _ => return Err(PayloadError::InvalidJson),
        };

        let load = document
            .get("load")
            .and_then(Value::as_f64)
            .ok_or(PayloadError::Field { field: "load", expected: "a number" })?;
        let fuels = document
            .get("fuels")
            .and_then(Value::as_object)
            .ok_or(PayloadError::Field { field: "fuels", expected: "an object" })?;
        let powerplants = document
            .get("powerplants")
            .and_then(Value::as_array)
            .ok_or(PayloadError::Field { field: "powerplants", expected: "a list" })?;

        let fuel_prices = parse_fuels(fuels)?;

        if powerplants.is_empty() {
            return Err(PayloadError::Field {
                field: "powerplants",
                expected: "a non-empty list",
            });
        }
        let units = powerplants
            .iter()
            .enumerate()
            .map(|(index, powerplant)| parse_powerplant(index, powerplant))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { load: Megawatts::new(load), fuel_prices, units })
    }
}

fn parse_fuels(fuels: &Map<String, Value>) -> Result<FuelPrices, PayloadError> {
    let price = |key: &'static str| {
        fuels.get(key).and_then(Value::as_f64).ok_or(PayloadError::Fuel(key))
    };
    Ok(FuelPrices {
        gas: MegawattHourRate::new(price(GAS)?),
        kerosene: MegawattHourRate::new(price(KEROSENE)?),
        co2: TonneRate::new(price(CO2)?),
        wind: Percent::new(price(WIND)?),
    })
}

fn parse_powerplant(index: usize, powerplant: &Value) -> Result<Unit, PayloadError> {
    let powerplant = powerplant.as_object().ok_or(PayloadError::PowerplantNotObject(index))?;
    for field in REQUIRED_POWERPLANT_FIELDS {
        if !powerplant.contains_key(field) {
            return Err(PayloadError::MissingPowerplantField { index, field });
        }
    }

    let string = |field: &'static str| {
        powerplant.get(field).and_then(Value::as_str).ok_or(PayloadError::PowerplantField {
            index,
            field,
            expected: "a string",
        })
    };
    let number = |field: &'static str| {
        powerplant.get(field).and_then(Value::as_f64).ok_or(PayloadError::PowerplantField {
            index,
            field,
            expected: "a number",
        })
    };

    let name = string("name")?;
    let kind = string("type")?;
    let efficiency = number("efficiency")?;
    let pmax = number("pmax")?;
    let pmin = if powerplant.contains_key("pmin") { Some(number("pmin")?) } else { None };

    Ok(Unit::builder()
        .name(name)
        .kind(kind.parse::<UnitKind>()?)
        .efficiency(efficiency)
        .pmax(Megawatts::new(pmax))
        .maybe_pmin(pmin.map(Megawatts::new))
        .build())
}
