use chrono::NaiveDateTime;

use crate::{
    core::{
        inputs::HourlyInputs,
        record::HourRecord,
        settlement::Flow,
        storage::StorageDevice,
        system::EnergySystem,
    },
    prelude::*,
    quantity::{cost::Cost, energy::KilowattHours},
};

/// The storage takes whatever it can, the grid settles the rest.
pub struct GreedySystem<'a> {
    inputs: HourlyInputs<'a>,
    device: StorageDevice,
    total_cost: Cost,
}

impl<'a> GreedySystem<'a> {
    pub const fn new(inputs: HourlyInputs<'a>, device: StorageDevice) -> Self {
        Self { inputs, device, total_cost: Cost::ZERO }
    }
}

impl EnergySystem for GreedySystem<'_> {
    fn step(&mut self, time: NaiveDateTime) -> Result<HourRecord> {
        let sample = self.inputs.sample_at(time)?;
        let balance = sample.balance();
        let cost = Flow::exchange(&mut self.device, balance, balance).cost(&self.device, sample.price);
        self.total_cost += cost;
        Ok(HourRecord::new(sample, self.device.level(), cost, self.total_cost))
    }

    fn storage_level(&self) -> KilowattHours {
        self.device.level()
    }
}
