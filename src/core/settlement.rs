//! Reconciliation of a planned balance with the realized one.
//!
//! Every hour ends up as a grid flow plus the energy moved through the storage.
//! Its cost is the grid flow at the hour price plus the storage wear of the moved energy.

use crate::{
    core::{error::CoreError, storage::StorageDevice, window::WindowKind},
    quantity::{cost::Cost, energy::KilowattHours, rate::KilowattHourRate},
};

/// Energy flows of a single settled hour.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Flow {
    /// Total energy moved through the storage, in either direction.
    pub throughput: KilowattHours,

    /// Positive when bought from the grid, negative when sold to it.
    pub grid_import: KilowattHours,
}

impl Flow {
    /// Everything goes through the grid.
    pub fn grid_only(balance: KilowattHours) -> Self {
        Self { throughput: KilowattHours::ZERO, grid_import: -balance }
    }

    /// Route the amount through the storage and settle the rest of the realized balance with the grid.
    pub fn exchange(
        device: &mut StorageDevice,
        amount: KilowattHours,
        realized: KilowattHours,
    ) -> Self {
        let remainder = device.manage_energy(amount);
        let moved = (amount - remainder).round_to_hundredths();
        Self { throughput: moved.abs(), grid_import: (moved - realized).round_to_hundredths() }
    }

    /// Charge the storage from the grid on top of this flow.
    pub fn with_grid_charge(self, charged: KilowattHours) -> Self {
        Self {
            throughput: self.throughput + charged,
            grid_import: (self.grid_import + charged).round_to_hundredths(),
        }
    }

    pub fn cost(self, device: &StorageDevice, price: KilowattHourRate) -> Cost {
        (self.grid_import * price + device.operation_cost(self.throughput)).round_to_cents()
    }
}

/// Outcome of a single settled hour.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SettlementRecord {
    pub price: KilowattHourRate,
    pub planned: KilowattHours,
    pub realized: KilowattHours,
    pub flow: Flow,
    pub cost: Cost,

    /// Storage level after the hour.
    pub level: KilowattHours,
}

/// Settle the hour: decide how much of the realized balance goes through the storage.
///
/// With non-negative prices, the storage moves the smallest of the planned amount,
/// the realized amount and the available room. A planned drain with a realized surplus
/// still drains as planned. A planned charge with a realized deficit cannot be settled.
///
/// With negative prices, a day window stores the realized surplus, buys the realized deficit
/// and charges the planned amount on top of it. A night window fills up the storage from the
/// grid first.
pub fn settle(
    device: &mut StorageDevice,
    kind: WindowKind,
    price: KilowattHourRate,
    planned: KilowattHours,
    realized: KilowattHours,
) -> Result<SettlementRecord, CoreError> {
    let flow = if price.is_non_negative() {
        settle_by_plan(device, price, planned, realized)?
    } else {
        match kind {
            WindowKind::Day => {
                let flow = Flow::exchange(device, realized.max(KilowattHours::ZERO), realized);
                let charged = planned
                    .max(KilowattHours::ZERO)
                    .min(device.bounds().headroom(device.level()));
                device.manage_energy(charged);
                flow.with_grid_charge(charged)
            }
            WindowKind::Night => {
                let charged = device.fill();
                settle_by_plan(device, price, planned, realized)?.with_grid_charge(charged)
            }
        }
    };
    Ok(SettlementRecord {
        price,
        planned,
        realized,
        flow,
        cost: flow.cost(device, price),
        level: device.level(),
    })
}

fn settle_by_plan(
    device: &mut StorageDevice,
    price: KilowattHourRate,
    planned: KilowattHours,
    realized: KilowattHours,
) -> Result<Flow, CoreError> {
    let bounds = device.bounds();
    let zero = KilowattHours::ZERO;

    if planned >= zero && realized >= zero {
        let stored = planned.min(realized).min(bounds.headroom(device.level()));
        Ok(Flow::exchange(device, stored, realized))
    } else if planned <= zero && realized <= zero {
        let released = planned.abs().min(realized.abs()).min(bounds.available(device.level()));
        Ok(Flow::exchange(device, -released, realized))
    } else if planned < zero {
        Ok(Flow::exchange(device, planned, realized))
    } else {
        Err(CoreError::ImpossibleState { price, planned, realized })
    }
}
