use std::collections::BTreeMap;

use chrono::NaiveDateTime;

use crate::{core::window::WindowKind, quantity::energy::KilowattHours};

/// Planned balance of every hour of a single window.
#[derive(Clone, Debug)]
pub struct DispatchPlan {
    kind: WindowKind,
    balances: BTreeMap<NaiveDateTime, KilowattHours>,
}

impl DispatchPlan {
    pub fn new(
        kind: WindowKind,
        balances: impl IntoIterator<Item = (NaiveDateTime, KilowattHours)>,
    ) -> Self {
        Self { kind, balances: balances.into_iter().collect() }
    }

    pub const fn kind(&self) -> WindowKind {
        self.kind
    }

    pub fn get(&self, time: NaiveDateTime) -> Option<KilowattHours> {
        self.balances.get(&time).copied()
    }

    pub fn contains(&self, time: NaiveDateTime) -> bool {
        self.balances.contains_key(&time)
    }

    pub fn n_hours(&self) -> usize {
        self.balances.len()
    }
}
