// Bounty records and their submissions

use crate::types::{Address, Amount};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of a bounty; Completed and Cancelled are terminal
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum BountyStatus {
    Open = 0,
    Completed = 1,
    Cancelled = 2,
}

impl BountyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BountyStatus::Open => "open",
            BountyStatus::Completed => "completed",
            BountyStatus::Cancelled => "cancelled",
        }
    }
}

impl From<BountyStatus> for u8 {
    fn from(status: BountyStatus) -> Self {
        status as u8
    }
}

impl TryFrom<u8> for BountyStatus {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(BountyStatus::Open),
            1 => Ok(BountyStatus::Completed),
            2 => Ok(BountyStatus::Cancelled),
            other => Err(format!("unknown bounty status {}", other)),
        }
    }
}

impl fmt::Display for BountyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields a creator supplies when opening a bounty
#[derive(Clone, Debug)]
pub struct NewBounty {
    pub name: String,
    pub description: String,
    pub category: u8,
    pub deadline: u64,
    pub total_reward: Amount,
}

/// A reward posted for an open-ended task
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounty {
    pub(crate) id: u64,
    pub(crate) creator: Address,
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) category: u8,
    pub(crate) deadline: u64,
    pub(crate) total_reward: Amount,
    pub(crate) status: BountyStatus,
    pub(crate) submission_count: u32,
    pub(crate) created_at: u64,
}

impl Bounty {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn creator(&self) -> &Address {
        &self.creator
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn category(&self) -> u8 {
        self.category
    }

    /// Unix seconds
    pub fn deadline(&self) -> u64 {
        self.deadline
    }

    /// Escrowed at creation, never increases
    pub fn total_reward(&self) -> Amount {
        self.total_reward
    }

    pub fn status(&self) -> BountyStatus {
        self.status
    }

    pub fn submission_count(&self) -> u32 {
        self.submission_count
    }

    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    pub fn is_open(&self) -> bool {
        self.status == BountyStatus::Open
    }
}

/// Work submitted against a bounty
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub(crate) submitter: Address,
    pub(crate) main_uri: String,
    pub(crate) evidence_uris: Vec<String>,
    pub(crate) timestamp: u64,
}

impl Submission {
    pub fn submitter(&self) -> &Address {
        &self.submitter
    }

    pub fn main_uri(&self) -> &str {
        &self.main_uri
    }

    pub fn evidence_uris(&self) -> &[String] {
        &self.evidence_uris
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }
}
