// Ledger configuration

use crate::error::LedgerError;
use crate::token::DEFAULT_BALANCE;
use crate::types::Amount;
use serde::{Deserialize, Serialize};

/// Tunables for the mock marketplace
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LedgerConfig {
    /// Balance handed to addresses the ledger has never seen
    pub default_balance: Amount,
    /// Share of the reward kept when a creator cancels a bounty
    pub cancel_penalty_percent: u8,
    /// Require and consume allowances in `transfer_from`
    pub strict_allowances: bool,
}

impl LedgerConfig {
    /// Create a new config with builder pattern
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_balance(mut self, amount: Amount) -> Self {
        self.default_balance = amount;
        self
    }

    pub fn with_cancel_penalty_percent(mut self, percent: u8) -> Self {
        self.cancel_penalty_percent = percent;
        self
    }

    pub fn with_strict_allowances(mut self, strict: bool) -> Self {
        self.strict_allowances = strict;
        self
    }

    /// Parse from JSON, filling gaps with defaults
    pub fn from_json(text: &str) -> Result<Self, LedgerError> {
        let config: LedgerConfig = serde_json::from_str(text)
            .map_err(|e| LedgerError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.cancel_penalty_percent > 100 {
            return Err(LedgerError::InvalidConfig(format!(
                "cancel_penalty_percent must be <= 100, got {}",
                self.cancel_penalty_percent
            )));
        }
        Ok(())
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            default_balance: DEFAULT_BALANCE,
            cancel_penalty_percent: 10,
            strict_allowances: false,
        }
    }
}
