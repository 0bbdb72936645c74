use chrono::NaiveDateTime;

use crate::{
    core::{
        inputs::HourlyInputs,
        record::HourRecord,
        settlement::Flow,
        storage::StorageDevice,
        system::EnergySystem,
        window::{Daylight, Window},
    },
    prelude::*,
    quantity::{cost::Cost, energy::KilowattHours, rate::KilowattHourRate},
};

/// Uses the storage only when the hour price beats the window average by more than the wear.
///
/// Expensive hours sell the surplus and drain the storage for the deficit.
/// Cheap hours store the surplus and buy the deficit. Negative prices fill up the storage.
pub struct ThresholdSystem<'a> {
    inputs: HourlyInputs<'a>,
    daylight: &'a dyn Daylight,
    device: StorageDevice,

    /// Current window and its average price.
    window: Option<(Window, KilowattHourRate)>,

    total_cost: Cost,
}

impl<'a> ThresholdSystem<'a> {
    pub const fn new(
        inputs: HourlyInputs<'a>,
        daylight: &'a dyn Daylight,
        device: StorageDevice,
    ) -> Self {
        Self { inputs, daylight, device, window: None, total_cost: Cost::ZERO }
    }

    fn average_price(&mut self, time: NaiveDateTime) -> Result<KilowattHourRate> {
        if let Some((window, average)) = self.window
            && window.contains(time)
        {
            return Ok(average);
        }
        let window = Window::containing(time, self.daylight)?;
        let prices = self.inputs.prices.between(window.start, window.end);
        ensure!(!prices.is_empty(), "no prices for the window starting at {time}");

        #[expect(clippy::cast_precision_loss)]
        let average =
            prices.iter().map(|(_, price)| *price).sum::<KilowattHourRate>() / prices.len() as f64;
        debug!(kind = %window.kind, %average, "new window");
        self.window = Some((window, average));
        Ok(average)
    }
}

impl EnergySystem for ThresholdSystem<'_> {
    fn step(&mut self, time: NaiveDateTime) -> Result<HourRecord> {
        let sample = self.inputs.sample_at(time)?;
        let average = self.average_price(time)?;
        let balance = sample.balance();
        // The margin is the wear of the whole hour, not of a single kilowatt-hour:
        let margin = KilowattHourRate::from(self.device.operation_cost(balance).0);
        let is_expensive = sample.price >= average + margin;

        let flow = if !sample.price.is_non_negative() {
            if balance >= KilowattHours::ZERO {
                Flow::exchange(&mut self.device, balance, balance)
            } else {
                Flow::grid_only(balance).with_grid_charge(self.device.fill())
            }
        } else if is_expensive == (balance < KilowattHours::ZERO) {
            // Drain on expensive deficit, store on cheap surplus:
            Flow::exchange(&mut self.device, balance, balance)
        } else {
            Flow::grid_only(balance)
        };

        let cost = flow.cost(&self.device, sample.price);
        self.total_cost += cost;
        Ok(HourRecord::new(sample, self.device.level(), cost, self.total_cost))
    }

    fn storage_level(&self) -> KilowattHours {
        self.device.level()
    }
}
