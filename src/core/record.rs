use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{
    core::inputs::HourlySample,
    quantity::{cost::Cost, energy::KilowattHours, rate::KilowattHourRate},
};

/// Display row of a single settled hour.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourRecord {
    pub time: NaiveDateTime,
    pub price: KilowattHourRate,
    pub consumption: KilowattHours,
    pub production: KilowattHours,
    pub storage_level: KilowattHours,
    pub cost: Cost,
    pub cumulative_cost: Cost,
}

impl HourRecord {
    pub const fn new(
        sample: HourlySample,
        storage_level: KilowattHours,
        cost: Cost,
        cumulative_cost: Cost,
    ) -> Self {
        Self {
            time: sample.time,
            price: sample.price,
            consumption: sample.consumption,
            production: sample.production,
            storage_level,
            cost,
            cumulative_cost,
        }
    }
}
