use chrono::NaiveDateTime;

use crate::{
    core::{inputs::HourlyInputs, record::HourRecord, system::EnergySystem},
    prelude::*,
    quantity::{cost::Cost, energy::KilowattHours},
};

/// No storage: every hour is settled with the grid.
pub struct GridSystem<'a> {
    inputs: HourlyInputs<'a>,

    /// Whether the production offsets the consumption.
    with_solar: bool,

    total_cost: Cost,
}

impl<'a> GridSystem<'a> {
    pub const fn new(inputs: HourlyInputs<'a>, with_solar: bool) -> Self {
        Self { inputs, with_solar, total_cost: Cost::ZERO }
    }
}

impl EnergySystem for GridSystem<'_> {
    fn step(&mut self, time: NaiveDateTime) -> Result<HourRecord> {
        let sample = self.inputs.sample_at(time)?;
        let grid_import =
            if self.with_solar { -sample.balance() } else { sample.consumption };
        let cost = (grid_import * sample.price).round_to_cents();
        self.total_cost += cost;
        Ok(HourRecord::new(sample, KilowattHours::ZERO, cost, self.total_cost))
    }

    fn storage_level(&self) -> KilowattHours {
        KilowattHours::ZERO
    }
}
