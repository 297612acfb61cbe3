use crate::domain::{Amount, RewardSchedule};
use crate::error::{GadgetError, GadgetResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// How genesis support and max support are seeded
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GenesisSeed {
    /// Genesis starts at `0 / 0`
    #[default]
    Zero,
    /// Genesis starts at `total / total` of the genesis allocation
    TotalDeposits,
}

impl FromStr for GenesisSeed {
    type Err = GadgetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "zero" => Ok(Self::Zero),
            "total-deposits" => Ok(Self::TotalDeposits),
            other => Err(GadgetError::InvalidConfig {
                reason: format!("unknown genesis seed '{other}'"),
            }),
        }
    }
}

/// Support bookkeeping on a fork switch.
///
/// Both modes withdraw the validator's rewards along the abandoned segment
/// and re-grant them along the already-earned part of the new segment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictAccounting {
    /// Also move support: the abandoned segment loses the validator's
    /// pre-withdrawal balance, the already-earned new segment gains it.
    #[default]
    SupportWeighted,
    /// Rewards only; support on both segments is left as it was
    Reference,
}

impl FromStr for ConflictAccounting {
    type Err = GadgetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "support-weighted" => Ok(Self::SupportWeighted),
            "reference" => Ok(Self::Reference),
            other => Err(GadgetError::InvalidConfig {
                reason: format!("unknown conflict accounting '{other}'"),
            }),
        }
    }
}

/// Support Gadget configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GadgetConfig {
    /// Credited to a proposer for its own block
    pub block_reward: Amount,
    /// Credited per included attestation
    pub attestation_reward: Amount,
    pub genesis_seed: GenesisSeed,
    pub conflict_accounting: ConflictAccounting,
}

impl Default for GadgetConfig {
    fn default() -> Self {
        let rewards = RewardSchedule::default();
        Self {
            block_reward: rewards.block_reward,
            attestation_reward: rewards.attestation_reward,
            genesis_seed: GenesisSeed::default(),
            conflict_accounting: ConflictAccounting::default(),
        }
    }
}

impl GadgetConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `GADGET_BLOCK_REWARD` (default: 10)
    /// - `GADGET_ATTESTATION_REWARD` (default: 1)
    /// - `GADGET_GENESIS_SEED`: `zero` | `total-deposits` (default: zero)
    /// - `GADGET_CONFLICT_ACCOUNTING`: `support-weighted` | `reference`
    ///   (default: support-weighted)
    pub fn from_env() -> GadgetResult<Self> {
        let mut config = Self::default();

        if let Ok(value) = env::var("GADGET_BLOCK_REWARD") {
            config.block_reward = parse_amount("GADGET_BLOCK_REWARD", &value)?;
        }
        if let Ok(value) = env::var("GADGET_ATTESTATION_REWARD") {
            config.attestation_reward = parse_amount("GADGET_ATTESTATION_REWARD", &value)?;
        }
        if let Ok(value) = env::var("GADGET_GENESIS_SEED") {
            config.genesis_seed = value.parse()?;
        }
        if let Ok(value) = env::var("GADGET_CONFLICT_ACCOUNTING") {
            config.conflict_accounting = value.parse()?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Genesis seeded with total deposits, rewards-only conflict accounting.
    /// The scenario traces in `gadget-tests` are pinned to this.
    pub fn reference() -> Self {
        Self {
            genesis_seed: GenesisSeed::TotalDeposits,
            conflict_accounting: ConflictAccounting::Reference,
            ..Self::default()
        }
    }

    pub fn with_conflict_accounting(mut self, accounting: ConflictAccounting) -> Self {
        self.conflict_accounting = accounting;
        self
    }

    pub fn with_genesis_seed(mut self, seed: GenesisSeed) -> Self {
        self.genesis_seed = seed;
        self
    }

    /// Rewards must be non-negative
    pub fn validate(&self) -> GadgetResult<()> {
        if self.block_reward < 0 {
            return Err(GadgetError::InvalidConfig {
                reason: format!("block_reward must be >= 0, got {}", self.block_reward),
            });
        }
        if self.attestation_reward < 0 {
            return Err(GadgetError::InvalidConfig {
                reason: format!(
                    "attestation_reward must be >= 0, got {}",
                    self.attestation_reward
                ),
            });
        }
        Ok(())
    }

    pub fn rewards(&self) -> RewardSchedule {
        RewardSchedule {
            block_reward: self.block_reward,
            attestation_reward: self.attestation_reward,
        }
    }
}

fn parse_amount(key: &str, value: &str) -> GadgetResult<Amount> {
    value.trim().parse().map_err(|_| GadgetError::InvalidConfig {
        reason: format!("{key} must be an integer, got '{value}'"),
    })
}
