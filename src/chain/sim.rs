// Chain simulation helpers
// Fake transaction hashes and confirmation latency; neither touches ledger state

use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Confirmation speed tiers
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxSpeed {
    Fast,
    #[default]
    Normal,
    Slow,
}

impl TxSpeed {
    /// Simulated confirmation time
    pub fn delay(&self) -> Duration {
        match self {
            TxSpeed::Fast => Duration::from_millis(500),
            TxSpeed::Normal => Duration::from_millis(1500),
            TxSpeed::Slow => Duration::from_millis(3000),
        }
    }
}

impl fmt::Display for TxSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TxSpeed::Fast => "fast",
            TxSpeed::Normal => "normal",
            TxSpeed::Slow => "slow",
        };
        f.write_str(name)
    }
}

impl FromStr for TxSpeed {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fast" => Ok(TxSpeed::Fast),
            "normal" => Ok(TxSpeed::Normal),
            "slow" => Ok(TxSpeed::Slow),
            other => Err(format!("unknown speed '{}' (fast, normal, slow)", other)),
        }
    }
}

/// `0x` followed by 64 random hex characters
pub fn generate_tx_hash() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    format!("0x{}", hex::encode(bytes))
}

/// Wait as long as a transaction at `speed` would take to confirm
pub async fn simulate_delay(speed: TxSpeed) {
    tokio::time::sleep(speed.delay()).await;
}
