use std::cmp::Reverse;

use itertools::Itertools;

use crate::{
    core::{
        error::{CoreError, PriceSign, ensure_price_sign, ensure_same_length},
        storage::StorageBounds,
        strategy::{Planner, round_all, runs::split_by_price_sign, total_surplus},
    },
    prelude::*,
    quantity::{energy::KilowattHours, rate::KilowattHourRate},
};

/// Daytime planner: fill the storage by the end of the window as cheaply as possible.
///
/// Deficits are bought from the grid instead of drained from the storage,
/// as long as the remaining surplus still lets the storage reach its capacity.
#[derive(Copy, Clone, Debug)]
pub struct DayStrategy {
    bounds: StorageBounds,
}

impl Planner for DayStrategy {
    #[instrument(skip_all, fields(start_level = ?start_level, n_hours = balances.len()))]
    fn get_plan(
        &self,
        start_level: KilowattHours,
        prices: &[KilowattHourRate],
        balances: &[KilowattHours],
    ) -> Result<Vec<KilowattHours>, CoreError> {
        ensure_same_length(prices.len(), balances.len())?;
        if prices.iter().all(|price| price.is_non_negative()) {
            self.plan_non_negative_run(start_level, prices, balances)
        } else {
            self.plan_mixed(start_level, prices, balances)
        }
    }
}

impl DayStrategy {
    pub const fn new(bounds: StorageBounds) -> Self {
        Self { bounds }
    }

    fn plan_mixed(
        &self,
        start_level: KilowattHours,
        prices: &[KilowattHourRate],
        balances: &[KilowattHours],
    ) -> Result<Vec<KilowattHours>, CoreError> {
        let runs = split_by_price_sign(prices);
        let mut plan = Vec::with_capacity(balances.len());
        let mut level = start_level;

        for (index, run) in runs.iter().enumerate() {
            let run_prices = &prices[run.range.clone()];
            let run_balances = &balances[run.range.clone()];
            let run_plan = match run.sign {
                PriceSign::NonNegative => {
                    // The next run, if any, has negative prices: leave room for its surplus.
                    let reserve = runs.get(index + 1).map_or(KilowattHours::ZERO, |next_run| {
                        total_surplus(&balances[next_run.range.clone()])
                            .min(self.bounds.capacity - self.bounds.floor)
                    });
                    let run_plan = self.plan_non_negative_run(level, run_prices, run_balances)?;
                    let run_plan = self.shift_overflow_backwards(level, run_prices, &run_plan);
                    let run_plan = self.reserve_headroom(level, run_prices, &run_plan, reserve);
                    level = self.bounds.forecast(level, &run_plan);
                    run_plan
                }
                PriceSign::Negative => {
                    let run_plan = self.plan_negative_run(level, run_prices, run_balances)?;
                    level = if run.n_hours() == 1 {
                        self.bounds.capacity
                    } else {
                        self.bounds.forecast(level, &run_plan)
                    };
                    run_plan
                }
            };
            debug!(?run.range, %run.sign, ?level, "planned the run");
            plan.extend(run_plan);
        }

        Ok(round_all(plan))
    }

    /// Plan a run where all the prices are non-negative.
    ///
    /// Deficits are replaced by grid purchases, cheapest hours first,
    /// until the storage is forecast to end up full.
    pub fn plan_non_negative_run(
        &self,
        start_level: KilowattHours,
        prices: &[KilowattHourRate],
        balances: &[KilowattHours],
    ) -> Result<Vec<KilowattHours>, CoreError> {
        ensure_same_length(prices.len(), balances.len())?;
        ensure_price_sign("non-negative run planner", prices, PriceSign::NonNegative)?;

        if start_level + total_surplus(balances) <= self.bounds.capacity {
            // Cannot fill up anyway, so never drain:
            return Ok(round_all(balances.iter().map(|balance| (*balance).max(KilowattHours::ZERO))));
        }

        let mut need =
            (self.bounds.capacity - self.bounds.forecast(start_level, balances)).round_to_hundredths();
        let mut plan = balances.to_vec();
        let deficit_indices = (0..balances.len())
            .filter(|index| balances[*index].is_negative())
            .sorted_by_key(|index| prices[*index])
            .collect_vec();

        for index in deficit_indices {
            if need <= KilowattHours::ZERO {
                break;
            }
            let level = self.bounds.forecast(start_level, &plan[..index]);
            let (tail, remaining_need) = self.cover_deficit(level, need, &plan[index..]);
            plan.truncate(index);
            plan.extend(tail);
            need = remaining_need;
        }

        Ok(round_all(plan))
    }

    /// Replace the first balance of the tail by a grid purchase, as much as the need requires.
    ///
    /// Returns the adjusted tail and the remaining need.
    fn cover_deficit(
        &self,
        level: KilowattHours,
        need: KilowattHours,
        tail: &[KilowattHours],
    ) -> (Vec<KilowattHours>, KilowattHours) {
        let mut tail = tail.to_vec();

        if level + total_surplus(&tail) <= self.bounds.capacity {
            let mut need = need;
            for balance in tail.iter_mut().filter(|balance| balance.is_negative()) {
                need -= balance.abs();
                *balance = KilowattHours::ZERO;
            }
            return (tail, need.round_to_hundredths());
        }

        let Some(first) = tail.first().copied() else {
            return (tail, need);
        };
        if self.bounds.forecast(level, &tail) == self.bounds.forecast(level, &tail[1..]) {
            // The hour does not change the final level.
            if level + first < self.bounds.floor {
                tail[0] = KilowattHours::ZERO;
            }
            return (tail, need);
        }

        let covered = first.abs().min(need);
        tail[0] = (first + covered).round_to_hundredths();
        (tail, (need - covered).round_to_hundredths())
    }

    /// Plan a run where all the prices are negative: absorb as much as possible, never drain.
    ///
    /// A single-hour run plans the grid charge on top of the hour's own surplus.
    pub fn plan_negative_run(
        &self,
        start_level: KilowattHours,
        prices: &[KilowattHourRate],
        balances: &[KilowattHours],
    ) -> Result<Vec<KilowattHours>, CoreError> {
        ensure_same_length(prices.len(), balances.len())?;
        ensure_price_sign("negative run planner", prices, PriceSign::Negative)?;

        if let [balance] = balances {
            let top_up = self.bounds.capacity - start_level - (*balance).max(KilowattHours::ZERO);
            return Ok(vec![top_up.max(KilowattHours::ZERO).round_to_hundredths()]);
        }

        let mut plan = balances.to_vec();
        for index in 0..plan.len() {
            let level = self.bounds.forecast(start_level, &plan[..index]);
            if level + plan[index] > self.bounds.capacity {
                let shifted =
                    self.shift_overflow_backwards(start_level, &prices[..index], &plan[..index]);
                plan[..index].copy_from_slice(&shifted);
            } else if plan[index].is_negative() {
                plan[index] = KilowattHours::ZERO;
            }
        }
        Ok(round_all(plan))
    }

    /// Move the overflow of a pricier hour onto the preceding cheaper hour.
    ///
    /// Left untouched when the most expensive hour is the last one.
    /// Overflow only lands on a planned surplus.
    pub fn shift_overflow_backwards(
        &self,
        start_level: KilowattHours,
        prices: &[KilowattHourRate],
        plan: &[KilowattHours],
    ) -> Vec<KilowattHours> {
        let mut plan = plan.to_vec();
        if plan.len() < 2 || prices.iter().position_max() == Some(plan.len() - 1) {
            return plan;
        }
        for index in (1..plan.len()).rev() {
            let level = self.bounds.forecast(start_level, &plan[..index]);
            let overflow = (level + plan[index] - self.bounds.capacity).round_to_hundredths();
            if overflow.is_positive()
                && prices[index] > prices[index - 1]
                && plan[index - 1].is_positive()
            {
                plan[index] = (plan[index] - overflow).round_to_hundredths();
                plan[index - 1] = (plan[index - 1] + overflow).round_to_hundredths();
            }
        }
        plan
    }

    /// Lower the forecast end level of the run to leave the reserve free.
    ///
    /// Storage is traded for export at the most expensive hours first.
    fn reserve_headroom(
        &self,
        start_level: KilowattHours,
        prices: &[KilowattHourRate],
        plan: &[KilowattHours],
        reserve: KilowattHours,
    ) -> Vec<KilowattHours> {
        let mut plan = plan.to_vec();
        if !reserve.is_positive() {
            return plan;
        }
        let target_level = self.bounds.capacity - reserve;

        for index in (0..plan.len()).sorted_by_key(|index| Reverse(prices[*index])) {
            let excess = (self.bounds.forecast(start_level, &plan) - target_level).round_to_hundredths();
            if !excess.is_positive() {
                break;
            }
            let level_before = self.bounds.forecast(start_level, &plan[..index]);
            let effective = self.bounds.transfer(level_before, plan[index]).level - level_before;
            plan[index] =
                (effective - excess).max(self.bounds.floor - level_before).round_to_hundredths();
        }
        plan
    }
}
