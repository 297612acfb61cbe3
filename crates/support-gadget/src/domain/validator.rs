//! Validator identity and deposit amounts

use crate::error::{GadgetError, GadgetResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Signed deposit amount.
///
/// Balances, support and max support are all signed: deltas may be negative
/// and no floor at zero is applied anywhere.
pub type Amount = i64;

/// `a + b`, failing with `AmountOverflow` instead of wrapping
pub(crate) fn add_amount(a: Amount, b: Amount, operation: &'static str) -> GadgetResult<Amount> {
    a.checked_add(b).ok_or(GadgetError::AmountOverflow { operation })
}

/// `amount * count`, failing with `AmountOverflow` instead of wrapping
pub(crate) fn scale_amount(
    amount: Amount,
    count: usize,
    operation: &'static str,
) -> GadgetResult<Amount> {
    Amount::try_from(count)
        .ok()
        .and_then(|count| amount.checked_mul(count))
        .ok_or(GadgetError::AmountOverflow { operation })
}

/// Validator identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ValidatorId(pub u64);

impl ValidatorId {
    pub fn new(index: u64) -> Self {
        Self(index)
    }

    pub fn index(&self) -> u64 {
        self.0
    }
}

impl From<u64> for ValidatorId {
    fn from(index: u64) -> Self {
        Self(index)
    }
}

impl fmt::Display for ValidatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}
