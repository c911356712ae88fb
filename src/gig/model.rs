// Gig records and freelancer proposals

use crate::types::{Address, Amount};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const SECONDS_PER_DAY: u64 = 86_400;

/// Lifecycle of a gig: Open -> InProgress -> Completed, or Open -> Cancelled
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum GigStatus {
    Open = 0,
    InProgress = 1,
    Completed = 2,
    Cancelled = 3,
}

impl GigStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GigStatus::Open => "open",
            GigStatus::InProgress => "in progress",
            GigStatus::Completed => "completed",
            GigStatus::Cancelled => "cancelled",
        }
    }
}

impl From<GigStatus> for u8 {
    fn from(status: GigStatus) -> Self {
        status as u8
    }
}

impl TryFrom<u8> for GigStatus {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(GigStatus::Open),
            1 => Ok(GigStatus::InProgress),
            2 => Ok(GigStatus::Completed),
            3 => Ok(GigStatus::Cancelled),
            other => Err(format!("unknown gig status {}", other)),
        }
    }
}

impl fmt::Display for GigStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields a poster supplies when posting a gig
#[derive(Clone, Debug)]
pub struct NewGig {
    pub title: String,
    pub short_description: String,
    pub details_uri: String,
    pub usdt_amount: Amount,
    pub native_stake: Amount,
    /// Days of work once a proposal is selected
    pub duration: u32,
    /// Days the gig accepts proposals
    pub proposal_duration: u32,
}

/// A single-freelancer escrow job
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gig {
    pub(crate) id: u64,
    pub(crate) poster: Address,
    pub(crate) title: String,
    pub(crate) short_description: String,
    pub(crate) details_uri: String,
    pub(crate) usdt_amount: Amount,
    pub(crate) native_stake: Amount,
    pub(crate) duration: u32,
    pub(crate) proposal_duration: u32,
    pub(crate) status: GigStatus,
    pub(crate) proposal_count: u32,
    pub(crate) selected_proposal: u32,
    pub(crate) posted_at: u64,
    pub(crate) deadline: u64,
}

impl Gig {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn poster(&self) -> &Address {
        &self.poster
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn short_description(&self) -> &str {
        &self.short_description
    }

    pub fn details_uri(&self) -> &str {
        &self.details_uri
    }

    /// Escrowed at posting when nonzero
    pub fn usdt_amount(&self) -> Amount {
        self.usdt_amount
    }

    /// Recorded only; never escrowed
    pub fn native_stake(&self) -> Amount {
        self.native_stake
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn proposal_duration(&self) -> u32 {
        self.proposal_duration
    }

    pub fn status(&self) -> GigStatus {
        self.status
    }

    pub fn proposal_count(&self) -> u32 {
        self.proposal_count
    }

    /// 1-based index of the chosen proposal, 0 when none
    pub fn selected_proposal(&self) -> u32 {
        self.selected_proposal
    }

    pub fn posted_at(&self) -> u64 {
        self.posted_at
    }

    /// End of the proposal window
    pub fn deadline(&self) -> u64 {
        self.deadline
    }
}

/// A freelancer's bid on a gig
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    pub(crate) proposer: Address,
    pub(crate) proposal_uri: String,
    pub(crate) submitted_at: u64,
    pub(crate) withdrawn: bool,
}

impl Proposal {
    pub fn proposer(&self) -> &Address {
        &self.proposer
    }

    pub fn proposal_uri(&self) -> &str {
        &self.proposal_uri
    }

    pub fn submitted_at(&self) -> u64 {
        self.submitted_at
    }

    pub fn is_withdrawn(&self) -> bool {
        self.withdrawn
    }
}
