//! What-if replay of balances against the storage bounds.
//!
//! Nothing here touches a real device.

use crate::{core::storage::StorageBounds, quantity::energy::KilowattHours};

impl StorageBounds {
    /// Final level after replaying the balances from the initial level.
    pub fn forecast(self, initial_level: KilowattHours, balances: &[KilowattHours]) -> KilowattHours {
        balances.iter().fold(initial_level, |level, balance| self.transfer(level, *balance).level)
    }

    /// Level after each of the balances.
    pub fn forecast_levels(
        self,
        initial_level: KilowattHours,
        balances: &[KilowattHours],
    ) -> Vec<KilowattHours> {
        balances
            .iter()
            .scan(initial_level, |level, balance| {
                *level = self.transfer(*level, *balance).level;
                Some(*level)
            })
            .collect()
    }
}
