//! Storage device arguments.

use clap::Parser;

use crate::{
    core::storage::{StorageBounds, StorageDevice},
    prelude::*,
    quantity::{cost::Cost, energy::KilowattHours},
};

#[must_use]
#[derive(Copy, Clone, Parser)]
pub struct StorageBoundsArgs {
    /// Storage capacity in kilowatt-hours.
    #[clap(long = "capacity", env = "STORAGE_CAPACITY", default_value = "5.0")]
    pub capacity: KilowattHours,

    /// Minimal retained level in kilowatt-hours.
    #[clap(long = "floor", env = "STORAGE_FLOOR", default_value = "0.5")]
    pub floor: KilowattHours,
}

impl StorageBoundsArgs {
    pub fn bounds(self) -> Result<StorageBounds> {
        Ok(StorageBounds::try_new(self.floor, self.capacity)?)
    }
}

#[must_use]
#[derive(Copy, Clone, Parser)]
pub struct StorageArgs {
    #[clap(flatten)]
    pub bounds: StorageBoundsArgs,

    /// Initial level in kilowatt-hours.
    #[clap(long = "level", env = "STORAGE_LEVEL", default_value = "2.0")]
    pub level: KilowattHours,

    /// Purchase cost of the device, in the same currency as the prices.
    #[clap(long = "purchase-cost", env = "STORAGE_PURCHASE_COST", default_value = "1000")]
    pub purchase_cost: Cost,

    /// Number of full cycles the device is rated for.
    #[clap(long = "rated-cycles", env = "STORAGE_RATED_CYCLES", default_value = "6000")]
    pub rated_cycles: f64,
}

impl StorageArgs {
    pub fn device(self) -> Result<StorageDevice> {
        let device = StorageDevice::builder()
            .capacity(self.bounds.capacity)
            .floor(self.bounds.floor)
            .level(self.level)
            .purchase_cost(self.purchase_cost)
            .rated_cycles(self.rated_cycles)
            .build()
            .context("invalid storage settings")?;
        debug!(wear_rate = %device.wear_rate(), "built the storage device");
        Ok(device)
    }
}
