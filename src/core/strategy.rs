pub mod day;
pub mod night;
pub mod runs;

use crate::{
    core::{
        error::CoreError,
        storage::StorageBounds,
        strategy::{day::DayStrategy, night::NightStrategy},
        window::WindowKind,
    },
    quantity::{energy::KilowattHours, rate::KilowattHourRate},
};

/// Turns forecast balances of a window into planned balances.
pub trait Planner {
    /// Plan the window starting at the level, hour by hour.
    ///
    /// The returned plan has the same length as the inputs.
    fn get_plan(
        &self,
        start_level: KilowattHours,
        prices: &[KilowattHourRate],
        balances: &[KilowattHours],
    ) -> Result<Vec<KilowattHours>, CoreError>;
}

#[derive(Copy, Clone, Debug)]
pub enum Strategy {
    Day(DayStrategy),
    Night(NightStrategy),
}

impl Strategy {
    pub const fn new(kind: WindowKind, bounds: StorageBounds) -> Self {
        match kind {
            WindowKind::Day => Self::Day(DayStrategy::new(bounds)),
            WindowKind::Night => Self::Night(NightStrategy::new(bounds)),
        }
    }

    pub const fn kind(&self) -> WindowKind {
        match self {
            Self::Day(_) => WindowKind::Day,
            Self::Night(_) => WindowKind::Night,
        }
    }
}

impl Planner for Strategy {
    fn get_plan(
        &self,
        start_level: KilowattHours,
        prices: &[KilowattHourRate],
        balances: &[KilowattHours],
    ) -> Result<Vec<KilowattHours>, CoreError> {
        match self {
            Self::Day(strategy) => strategy.get_plan(start_level, prices, balances),
            Self::Night(strategy) => strategy.get_plan(start_level, prices, balances),
        }
    }
}

pub fn round_all(balances: impl IntoIterator<Item = KilowattHours>) -> Vec<KilowattHours> {
    balances.into_iter().map(KilowattHours::round_to_hundredths).collect()
}

/// Sum of the positive balances.
pub fn total_surplus(balances: &[KilowattHours]) -> KilowattHours {
    balances.iter().copied().filter(|balance| balance.is_positive()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{core::storage::StorageDevice, quantity::cost::Cost};

    fn kwh(values: &[f64]) -> Vec<KilowattHours> {
        values.iter().copied().map(KilowattHours::from).collect()
    }

    #[test]
    fn test_dispatch_by_kind() {
        let bounds =
            StorageBounds::try_new(KilowattHours::from(0.5), KilowattHours::from(5.0)).unwrap();
        assert_eq!(Strategy::new(WindowKind::Day, bounds).kind(), WindowKind::Day);
        assert_eq!(Strategy::new(WindowKind::Night, bounds).kind(), WindowKind::Night);
    }

    /// Planning reads the device level but never changes it.
    #[test]
    fn test_planning_leaves_the_device_alone() {
        let device = StorageDevice::builder()
            .capacity(KilowattHours::from(5.0))
            .floor(KilowattHours::from(0.5))
            .level(KilowattHours::from(2.0))
            .purchase_cost(Cost::from(1000.0))
            .rated_cycles(1000.0)
            .build()
            .unwrap();
        let prices =
            [127.69, -129.71, 40.53, 50.14, -150.79, 14.88].map(KilowattHourRate::from);
        let balances = kwh(&[-0.08, -0.89, 0.45, 0.15, 0.18, 1.05]);

        for kind in [WindowKind::Day, WindowKind::Night] {
            let strategy = Strategy::new(kind, device.bounds());
            let first = strategy.get_plan(device.level(), &prices, &balances).unwrap();
            let second = strategy.get_plan(device.level(), &prices, &balances).unwrap();
            assert_eq!(first, second);
            assert_eq!(device.level(), KilowattHours::from(2.0));
        }
    }

    #[test]
    fn test_total_surplus() {
        assert_eq!(total_surplus(&kwh(&[-1.0, 0.5, 0.0, 1.25])), KilowattHours::from(1.75));
    }
}
