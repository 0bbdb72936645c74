use std::ops::Range;

use crate::{core::error::PriceSign, quantity::rate::KilowattHourRate};

/// Maximal run of consecutive hours sharing the same price sign.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PriceRun {
    pub range: Range<usize>,
    pub sign: PriceSign,
}

impl PriceRun {
    pub const fn n_hours(&self) -> usize {
        self.range.end - self.range.start
    }
}

pub fn split_by_price_sign(prices: &[KilowattHourRate]) -> Vec<PriceRun> {
    let mut runs: Vec<PriceRun> = Vec::new();
    for (index, price) in prices.iter().enumerate() {
        let sign = PriceSign::of(*price);
        match runs.last_mut() {
            Some(run) if run.sign == sign => run.range.end = index + 1,
            _ => runs.push(PriceRun { range: index..index + 1, sign }),
        }
    }
    runs
}
