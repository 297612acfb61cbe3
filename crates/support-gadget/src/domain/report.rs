//! Read-only snapshot for reporting layers

use super::block::BlockId;
use super::validator::{Amount, ValidatorId};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorBalance {
    pub validator: ValidatorId,
    pub balance: Amount,
    pub last_target: BlockId,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSupport {
    pub block: BlockId,
    pub label: String,
    pub height: u64,
    pub current: Amount,
    pub max: Amount,
}

/// Deposits in genesis allocation order, support in acceptance order
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportReport {
    pub deposits: Vec<ValidatorBalance>,
    pub support: Vec<BlockSupport>,
}

impl SupportReport {
    pub fn balance_of(&self, validator: ValidatorId) -> Option<Amount> {
        self.deposits
            .iter()
            .find(|d| d.validator == validator)
            .map(|d| d.balance)
    }

    /// First block carrying `label`
    pub fn support_by_label(&self, label: &str) -> Option<&BlockSupport> {
        self.support.iter().find(|s| s.label == label)
    }
}
