use merit_quantities::{
    percent::Percent,
    rate::{MegawattHourRate, TonneRate},
};

/// Market prices and weather conditions valid for one request.
#[derive(Copy, Clone, Debug)]
pub struct FuelPrices {
    pub gas: MegawattHourRate,
    pub kerosene: MegawattHourRate,
    pub co2: TonneRate,

    /// Share of the nameplate wind capacity that is actually deliverable.
    pub wind: Percent,
}
