use itertools::Itertools;

use crate::{
    core::{
        error::{CoreError, PriceSign, ensure_price_sign, ensure_same_length},
        storage::StorageBounds,
        strategy::{Planner, round_all, runs::split_by_price_sign},
    },
    prelude::*,
    quantity::{energy::KilowattHours, rate::KilowattHourRate},
};

/// Nighttime planner: never let the storage run dry before the window ends.
#[derive(Copy, Clone, Debug)]
pub struct NightStrategy {
    bounds: StorageBounds,
}

impl Planner for NightStrategy {
    #[instrument(skip_all, fields(start_level = ?start_level, n_hours = balances.len()))]
    fn get_plan(
        &self,
        start_level: KilowattHours,
        prices: &[KilowattHourRate],
        balances: &[KilowattHours],
    ) -> Result<Vec<KilowattHours>, CoreError> {
        ensure_same_length(prices.len(), balances.len())?;
        if prices.iter().all(|price| price.is_non_negative()) {
            return self.plan_non_negative_run(start_level, prices, balances);
        }

        let mut plan = Vec::with_capacity(balances.len());
        let mut level = start_level;
        for run in split_by_price_sign(prices) {
            match run.sign {
                PriceSign::NonNegative => {
                    let run_plan = self.plan_non_negative_run(
                        level,
                        &prices[run.range.clone()],
                        &balances[run.range.clone()],
                    )?;
                    level = self.bounds.forecast(level, &run_plan);
                    plan.extend(run_plan);
                }
                PriceSign::Negative => {
                    // Filled up from the grid while it pays for that.
                    level = self.bounds.capacity;
                    plan.extend(run.range.map(|_| KilowattHours::ZERO));
                }
            }
        }
        Ok(plan)
    }
}

impl NightStrategy {
    pub const fn new(bounds: StorageBounds) -> Self {
        Self { bounds }
    }

    /// Single forward pass: whenever an hour would drop the storage below the floor,
    /// turn some of the already seen drains into grid purchases.
    pub fn plan_non_negative_run(
        &self,
        start_level: KilowattHours,
        prices: &[KilowattHourRate],
        balances: &[KilowattHours],
    ) -> Result<Vec<KilowattHours>, CoreError> {
        ensure_same_length(prices.len(), balances.len())?;
        ensure_price_sign("non-negative run planner", prices, PriceSign::NonNegative)?;

        let mut plan = balances.to_vec();
        let mut level = start_level;
        for index in 0..plan.len() {
            let unclamped = level + plan[index];
            if unclamped < self.bounds.floor {
                let shortfall = (unclamped - self.bounds.floor).round_to_hundredths();
                let corrected = correct_shortfall(&prices[..=index], &plan[..=index], shortfall);
                trace!(index, ?shortfall, "corrected the shortfall");
                plan[..=index].copy_from_slice(&corrected);
                self.cover_clipped_drains(start_level, &mut plan[..=index]);
                level = self.bounds.forecast(start_level, &plan[..=index]);
            } else {
                level = self.bounds.transfer(level, plan[index]).level;
            }
        }
        Ok(round_all(plan))
    }

    /// Buy whatever a drain still cannot release once the surpluses are clipped at the capacity.
    ///
    /// Zeroing earlier drains may leave no room for a later surplus, so the corrected plan
    /// can still reach the floor too early.
    fn cover_clipped_drains(&self, start_level: KilowattHours, plan: &mut [KilowattHours]) {
        let mut level = start_level;
        for balance in plan.iter_mut() {
            let transfer = self.bounds.transfer(level, *balance);
            if transfer.remainder.is_negative() {
                *balance = (*balance - transfer.remainder).round_to_hundredths();
            }
            level = transfer.level;
        }
    }
}

/// Absorb the (negative) shortfall by the seen hours, walking them from the cheapest price.
///
/// Drains fully covered by the shortfall are zeroed, the first larger drain takes the rest.
/// The last hour takes whatever remains once reached.
fn correct_shortfall(
    prices: &[KilowattHourRate],
    balances: &[KilowattHours],
    mut shortfall: KilowattHours,
) -> Vec<KilowattHours> {
    let mut balances = balances.to_vec();
    let last_index = balances.len() - 1;

    for index in (0..balances.len()).sorted_by_key(|index| prices[*index]) {
        if shortfall == KilowattHours::ZERO {
            break;
        }
        let balance = balances[index];
        if index == last_index || (balance <= shortfall && balance <= KilowattHours::ZERO) {
            balances[index] = (balance - shortfall).round_to_hundredths();
            break;
        }
        if balance <= KilowattHours::ZERO && balance > shortfall {
            shortfall = (shortfall - balance).round_to_hundredths();
            balances[index] = KilowattHours::ZERO;
        }
    }

    round_all(balances)
}
