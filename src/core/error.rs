use thiserror::Error;

use crate::quantity::{energy::KilowattHours, rate::KilowattHourRate};

/// Contract violations inside the planner, the storage model and the settlement.
///
/// None of these are transient: the caller is expected to bail out and re-run.
#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("storage level {level} is outside [{floor}, {capacity}]")]
    InvalidLevel { level: KilowattHours, floor: KilowattHours, capacity: KilowattHours },

    #[error("storage floor {floor} exceeds capacity {capacity}")]
    InvalidBounds { floor: KilowattHours, capacity: KilowattHours },

    #[error("rated cycle count must be positive, got {0}")]
    InvalidRatedCycles(f64),

    #[error("got {n_prices} prices but {n_balances} balances")]
    MismatchedLength { n_prices: usize, n_balances: usize },

    #[error("{handler} expects {expected} prices, got {price} at index {index}")]
    SignAssumptionViolated {
        handler: &'static str,
        expected: PriceSign,
        index: usize,
        price: KilowattHourRate,
    },

    #[error("impossible settlement: planned {planned}, realized {realized} at price {price}")]
    ImpossibleState { price: KilowattHourRate, planned: KilowattHours, realized: KilowattHours },
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, derive_more::Display)]
pub enum PriceSign {
    #[display("negative")]
    Negative,

    #[display("non-negative")]
    NonNegative,
}

impl PriceSign {
    pub fn of(price: KilowattHourRate) -> Self {
        if price.is_non_negative() { Self::NonNegative } else { Self::Negative }
    }
}

/// Fail unless the price and balance sequences line up.
pub const fn ensure_same_length(
    n_prices: usize,
    n_balances: usize,
) -> Result<(), CoreError> {
    if n_prices == n_balances {
        Ok(())
    } else {
        Err(CoreError::MismatchedLength { n_prices, n_balances })
    }
}

/// Fail on the first price whose sign differs from the expected one.
pub fn ensure_price_sign(
    handler: &'static str,
    prices: &[KilowattHourRate],
    expected: PriceSign,
) -> Result<(), CoreError> {
    match prices.iter().position(|price| PriceSign::of(*price) != expected) {
        None => Ok(()),
        Some(index) => Err(CoreError::SignAssumptionViolated {
            handler,
            expected,
            index,
            price: prices[index],
        }),
    }
}
