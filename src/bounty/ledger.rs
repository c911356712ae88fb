// BountyLedger - bounty lifecycle: create -> submit -> select winners / cancel

use crate::bounty::model::{Bounty, BountyStatus, NewBounty, Submission};
use crate::error::LedgerError;
use crate::token::TokenLedger;
use crate::types::{Address, Amount};
use std::collections::BTreeMap;

const ENTITY: &str = "bounty";

/// Bounty records and their submission lists
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BountyLedger {
    bounties: BTreeMap<u64, Bounty>,
    submissions: BTreeMap<u64, Vec<Submission>>,
    next_id: u64,
}

impl BountyLedger {
    pub fn new() -> Self {
        Self {
            bounties: BTreeMap::new(),
            submissions: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Rebuild from persisted parts
    pub fn from_parts(
        bounties: BTreeMap<u64, Bounty>,
        submissions: BTreeMap<u64, Vec<Submission>>,
        next_id: u64,
    ) -> Self {
        Self {
            bounties,
            submissions,
            next_id,
        }
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    pub fn get(&self, id: u64) -> Option<&Bounty> {
        self.bounties.get(&id)
    }

    /// All bounties in id order
    pub fn bounties(&self) -> impl Iterator<Item = &Bounty> {
        self.bounties.values()
    }

    pub fn bounties_by_creator<'a>(
        &'a self,
        creator: &'a Address,
    ) -> impl Iterator<Item = &'a Bounty> {
        self.bounties.values().filter(move |b| &b.creator == creator)
    }

    /// Submissions in arrival order
    pub fn submissions(&self, id: u64) -> &[Submission] {
        self.submissions.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_submitted(&self, id: u64, submitter: &Address) -> bool {
        self.submissions(id).iter().any(|s| &s.submitter == submitter)
    }

    /// Id the next bounty will receive
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    pub(crate) fn records(&self) -> &BTreeMap<u64, Bounty> {
        &self.bounties
    }

    pub(crate) fn submission_lists(&self) -> &BTreeMap<u64, Vec<Submission>> {
        &self.submissions
    }

    fn require(&self, id: u64) -> Result<&Bounty, LedgerError> {
        self.bounties
            .get(&id)
            .ok_or(LedgerError::NotFound { entity: ENTITY, id })
    }

    fn require_open(bounty: &Bounty, action: &'static str) -> Result<(), LedgerError> {
        if bounty.is_open() {
            Ok(())
        } else {
            Err(LedgerError::InvalidState {
                entity: ENTITY,
                id: bounty.id,
                status: bounty.status.as_str(),
                action,
            })
        }
    }

    // ========================================================================
    // LIFECYCLE
    // ========================================================================

    /// Open a bounty, escrowing its reward from the creator
    ///
    /// The transfer runs first so a failed escrow leaves no bounty behind.
    pub fn create(
        &mut self,
        tokens: &mut TokenLedger,
        creator: &Address,
        draft: NewBounty,
        now: u64,
    ) -> Result<u64, LedgerError> {
        tokens.transfer_from(creator, &TokenLedger::escrow_address(), draft.total_reward)?;

        let id = self.next_id;
        self.next_id += 1;

        self.bounties.insert(
            id,
            Bounty {
                id,
                creator: creator.clone(),
                name: draft.name,
                description: draft.description,
                category: draft.category,
                deadline: draft.deadline,
                total_reward: draft.total_reward,
                status: BountyStatus::Open,
                submission_count: 0,
                created_at: now,
            },
        );
        self.submissions.insert(id, Vec::new());
        Ok(id)
    }

    /// Record a submission; one per submitter
    pub fn submit(
        &mut self,
        id: u64,
        submitter: &Address,
        main_uri: String,
        evidence_uris: Vec<String>,
        now: u64,
    ) -> Result<(), LedgerError> {
        let bounty = self.require(id)?;
        Self::require_open(bounty, "accept submissions")?;
        if self.has_submitted(id, submitter) {
            return Err(LedgerError::DuplicateSubmission {
                entity: ENTITY,
                id,
                submitter: submitter.clone(),
            });
        }

        self.submissions.entry(id).or_default().push(Submission {
            submitter: submitter.clone(),
            main_uri,
            evidence_uris,
            timestamp: now,
        });
        if let Some(bounty) = self.bounties.get_mut(&id) {
            bounty.submission_count += 1;
        }
        Ok(())
    }

    /// Complete the bounty and split its reward by percentage
    ///
    /// Each winner receives `floor(total_reward * pct / 100)`. Whatever the
    /// split leaves over stays in escrow.
    pub fn select_winners(
        &mut self,
        tokens: &mut TokenLedger,
        id: u64,
        winners: &[Address],
        percentages: &[u8],
    ) -> Result<Vec<(Address, Amount)>, LedgerError> {
        let bounty = self.require(id)?;
        Self::require_open(bounty, "select winners")?;

        if winners.is_empty() {
            return Err(LedgerError::InvalidSplit("no winners given".to_string()));
        }
        if winners.len() != percentages.len() {
            return Err(LedgerError::InvalidSplit(format!(
                "{} winners but {} percentages",
                winners.len(),
                percentages.len()
            )));
        }
        let total: u32 = percentages.iter().map(|p| *p as u32).sum();
        if total > 100 {
            return Err(LedgerError::InvalidSplit(format!(
                "percentages sum to {}",
                total
            )));
        }

        let reward = bounty.total_reward;
        let payouts: Vec<(Address, Amount)> = winners
            .iter()
            .zip(percentages)
            .map(|(w, p)| (w.clone(), reward.percent(*p)))
            .collect();
        if !tokens.can_release(payouts.iter().map(|(_, a)| *a)) {
            return Err(LedgerError::InsufficientBalance {
                available: tokens.escrow_balance(),
                required: reward,
            });
        }

        // a credit can still overflow midway; commit only a complete payout
        let mut staged = tokens.clone();
        for (winner, amount) in &payouts {
            staged.release_escrow(winner, *amount)?;
        }
        *tokens = staged;
        if let Some(bounty) = self.bounties.get_mut(&id) {
            bounty.status = BountyStatus::Completed;
        }
        Ok(payouts)
    }

    /// Cancel an open bounty, refunding the creator minus the penalty
    ///
    /// Returns the refunded amount.
    pub fn cancel(
        &mut self,
        tokens: &mut TokenLedger,
        id: u64,
        caller: &Address,
        penalty_percent: u8,
    ) -> Result<Amount, LedgerError> {
        let bounty = self.require(id)?;
        if &bounty.creator != caller {
            return Err(LedgerError::Unauthorized {
                entity: ENTITY,
                id,
                caller: caller.clone(),
            });
        }
        Self::require_open(bounty, "cancel")?;

        let reward = bounty.total_reward;
        let refund = reward.saturating_sub(reward.percent(penalty_percent));
        let creator = bounty.creator.clone();

        tokens.release_escrow(&creator, refund)?;
        if let Some(bounty) = self.bounties.get_mut(&id) {
            bounty.status = BountyStatus::Cancelled;
        }
        Ok(refund)
    }
}

impl Default for BountyLedger {
    fn default() -> Self {
        Self::new()
    }
}
