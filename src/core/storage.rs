use bon::bon;

use crate::{
    core::error::CoreError,
    quantity::{cost::Cost, energy::KilowattHours, rate::KilowattHourRate},
};

/// Floor and capacity of a storage device, without any mutable state.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StorageBounds {
    /// Minimum retained level.
    pub floor: KilowattHours,

    pub capacity: KilowattHours,
}

/// Outcome of a clamped transfer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Transfer {
    /// Level after the transfer.
    pub level: KilowattHours,

    /// Part of the requested delta that did not fit, with the sign of the request.
    pub remainder: KilowattHours,
}

impl StorageBounds {
    pub fn try_new(floor: KilowattHours, capacity: KilowattHours) -> Result<Self, CoreError> {
        if floor < KilowattHours::ZERO || floor > capacity {
            return Err(CoreError::InvalidBounds { floor, capacity });
        }
        Ok(Self { floor, capacity })
    }

    pub fn contains(self, level: KilowattHours) -> bool {
        (self.floor..=self.capacity).contains(&level)
    }

    /// Free room above the level.
    pub fn headroom(self, level: KilowattHours) -> KilowattHours {
        (self.capacity - level).max(KilowattHours::ZERO)
    }

    /// Energy that can still be released before hitting the floor.
    pub fn available(self, level: KilowattHours) -> KilowattHours {
        (level - self.floor).max(KilowattHours::ZERO)
    }

    /// Apply the clamped-addition rule: positive delta stores, negative delta releases.
    pub fn transfer(self, level: KilowattHours, delta: KilowattHours) -> Transfer {
        let moved = if delta >= KilowattHours::ZERO {
            delta.min(self.headroom(level))
        } else {
            -(-delta).min(self.available(level))
        };
        Transfer {
            level: (level + moved).round_to_hundredths(),
            remainder: (delta - moved).round_to_hundredths(),
        }
    }
}

/// The battery.
///
/// The level stays within the bounds for the whole device lifetime,
/// any attempt to assign a level outside of them is rejected.
#[derive(Clone, Debug)]
pub struct StorageDevice {
    bounds: StorageBounds,
    level: KilowattHours,

    /// Amortized cost of one full cycle.
    unit_wear_cost: Cost,
}

#[bon]
impl StorageDevice {
    #[builder]
    pub fn new(
        capacity: KilowattHours,
        #[builder(default)] floor: KilowattHours,
        level: KilowattHours,
        purchase_cost: Cost,
        rated_cycles: f64,
    ) -> Result<Self, CoreError> {
        if rated_cycles <= 0.0 || !rated_cycles.is_finite() {
            return Err(CoreError::InvalidRatedCycles(rated_cycles));
        }
        let mut this = Self {
            bounds: StorageBounds::try_new(floor, capacity)?,
            level: floor,
            unit_wear_cost: purchase_cost / rated_cycles,
        };
        this.set_level(level)?;
        Ok(this)
    }
}

impl StorageDevice {
    pub const fn bounds(&self) -> StorageBounds {
        self.bounds
    }

    pub const fn level(&self) -> KilowattHours {
        self.level
    }

    pub fn set_level(&mut self, level: KilowattHours) -> Result<(), CoreError> {
        let level = level.round_to_hundredths();
        if !self.bounds.contains(level) {
            return Err(CoreError::InvalidLevel {
                level,
                floor: self.bounds.floor,
                capacity: self.bounds.capacity,
            });
        }
        self.level = level;
        Ok(())
    }

    /// Store (positive delta) or release (negative delta) energy.
    ///
    /// Returns the remainder that could not be stored or released, with the sign of the request.
    pub fn manage_energy(&mut self, delta: KilowattHours) -> KilowattHours {
        let transfer = self.bounds.transfer(self.level, delta);
        self.level = transfer.level;
        transfer.remainder
    }

    /// Fill up to the capacity and return the charged amount.
    pub fn fill(&mut self) -> KilowattHours {
        let charged = self.bounds.headroom(self.level);
        self.level = self.bounds.capacity;
        charged
    }

    /// Wear cost of moving a single kilowatt-hour, which takes half a cycle.
    pub fn wear_rate(&self) -> KilowattHourRate {
        KilowattHourRate::from(self.unit_wear_cost.0 / 2.0)
    }

    /// Wear cost of moving the amount in either direction.
    pub fn operation_cost(&self, amount: KilowattHours) -> Cost {
        amount.abs() * self.wear_rate()
    }
}
