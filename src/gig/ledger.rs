// GigLedger - gig lifecycle: post -> propose -> select -> complete / cancel

use crate::error::LedgerError;
use crate::gig::model::{Gig, GigStatus, NewGig, Proposal, SECONDS_PER_DAY};
use crate::token::TokenLedger;
use crate::types::{Address, Amount};
use std::collections::BTreeMap;

const ENTITY: &str = "gig";

/// Gig records and their proposal lists
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GigLedger {
    gigs: BTreeMap<u64, Gig>,
    proposals: BTreeMap<u64, Vec<Proposal>>,
    next_id: u64,
}

impl GigLedger {
    pub fn new() -> Self {
        Self {
            gigs: BTreeMap::new(),
            proposals: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Rebuild from persisted parts
    pub fn from_parts(
        gigs: BTreeMap<u64, Gig>,
        proposals: BTreeMap<u64, Vec<Proposal>>,
        next_id: u64,
    ) -> Self {
        Self {
            gigs,
            proposals,
            next_id,
        }
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    pub fn get(&self, id: u64) -> Option<&Gig> {
        self.gigs.get(&id)
    }

    pub fn gigs(&self) -> impl Iterator<Item = &Gig> {
        self.gigs.values()
    }

    pub fn gigs_by_poster<'a>(&'a self, poster: &'a Address) -> impl Iterator<Item = &'a Gig> {
        self.gigs.values().filter(move |g| &g.poster == poster)
    }

    /// Proposals in arrival order; index + 1 is the selection number
    pub fn proposals(&self, id: u64) -> &[Proposal] {
        self.proposals.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    pub(crate) fn records(&self) -> &BTreeMap<u64, Gig> {
        &self.gigs
    }

    pub(crate) fn proposal_lists(&self) -> &BTreeMap<u64, Vec<Proposal>> {
        &self.proposals
    }

    fn require(&self, id: u64) -> Result<&Gig, LedgerError> {
        self.gigs
            .get(&id)
            .ok_or(LedgerError::NotFound { entity: ENTITY, id })
    }

    fn require_poster(gig: &Gig, caller: &Address) -> Result<(), LedgerError> {
        if &gig.poster == caller {
            Ok(())
        } else {
            Err(LedgerError::Unauthorized {
                entity: ENTITY,
                id: gig.id,
                caller: caller.clone(),
            })
        }
    }

    fn require_status(
        gig: &Gig,
        expected: GigStatus,
        action: &'static str,
    ) -> Result<(), LedgerError> {
        if gig.status == expected {
            Ok(())
        } else {
            Err(LedgerError::InvalidState {
                entity: ENTITY,
                id: gig.id,
                status: gig.status.as_str(),
                action,
            })
        }
    }

    fn set_status(&mut self, id: u64, status: GigStatus) {
        if let Some(gig) = self.gigs.get_mut(&id) {
            gig.status = status;
        }
    }

    // ========================================================================
    // LIFECYCLE
    // ========================================================================

    /// Post a gig, escrowing its USDT budget when nonzero
    pub fn post(
        &mut self,
        tokens: &mut TokenLedger,
        poster: &Address,
        draft: NewGig,
        now: u64,
    ) -> Result<u64, LedgerError> {
        if !draft.usdt_amount.is_zero() {
            tokens.transfer_from(poster, &TokenLedger::escrow_address(), draft.usdt_amount)?;
        }

        let id = self.next_id;
        self.next_id += 1;

        let window = (draft.proposal_duration as u64).saturating_mul(SECONDS_PER_DAY);
        self.gigs.insert(
            id,
            Gig {
                id,
                poster: poster.clone(),
                title: draft.title,
                short_description: draft.short_description,
                details_uri: draft.details_uri,
                usdt_amount: draft.usdt_amount,
                native_stake: draft.native_stake,
                duration: draft.duration,
                proposal_duration: draft.proposal_duration,
                status: GigStatus::Open,
                proposal_count: 0,
                selected_proposal: 0,
                posted_at: now,
                deadline: now.saturating_add(window),
            },
        );
        self.proposals.insert(id, Vec::new());
        Ok(id)
    }

    /// Record a proposal; one per proposer, withdrawn ones included
    pub fn submit_proposal(
        &mut self,
        id: u64,
        proposer: &Address,
        proposal_uri: String,
        now: u64,
    ) -> Result<(), LedgerError> {
        let gig = self.require(id)?;
        Self::require_status(gig, GigStatus::Open, "accept proposals")?;
        if self.proposals(id).iter().any(|p| &p.proposer == proposer) {
            return Err(LedgerError::DuplicateSubmission {
                entity: ENTITY,
                id,
                submitter: proposer.clone(),
            });
        }

        self.proposals.entry(id).or_default().push(Proposal {
            proposer: proposer.clone(),
            proposal_uri,
            submitted_at: now,
            withdrawn: false,
        });
        if let Some(gig) = self.gigs.get_mut(&id) {
            gig.proposal_count += 1;
        }
        Ok(())
    }

    /// Pull a proposal back while the gig is still open
    pub fn withdraw_proposal(&mut self, id: u64, proposer: &Address) -> Result<(), LedgerError> {
        let gig = self.require(id)?;
        Self::require_status(gig, GigStatus::Open, "withdraw proposals")?;

        let proposal = self
            .proposals
            .get_mut(&id)
            .and_then(|list| list.iter_mut().find(|p| &p.proposer == proposer))
            .ok_or_else(|| {
                LedgerError::InvalidProposal(format!("{} has no proposal on gig {}", proposer, id))
            })?;
        if proposal.withdrawn {
            return Err(LedgerError::InvalidProposal(format!(
                "proposal by {} on gig {} already withdrawn",
                proposer, id
            )));
        }
        proposal.withdrawn = true;
        Ok(())
    }

    /// Hire the freelancer behind proposal `index` (1-based)
    pub fn select_proposal(
        &mut self,
        id: u64,
        index: u32,
        caller: &Address,
    ) -> Result<(), LedgerError> {
        let gig = self.require(id)?;
        Self::require_poster(gig, caller)?;
        Self::require_status(gig, GigStatus::Open, "select a proposal")?;

        let proposal = index
            .checked_sub(1)
            .and_then(|i| self.proposals(id).get(i as usize))
            .ok_or_else(|| {
                LedgerError::InvalidProposal(format!(
                    "gig {} has no proposal #{} ({} received)",
                    id, index, gig.proposal_count
                ))
            })?;
        if proposal.withdrawn {
            return Err(LedgerError::InvalidProposal(format!(
                "proposal #{} on gig {} was withdrawn",
                index, id
            )));
        }

        if let Some(gig) = self.gigs.get_mut(&id) {
            gig.status = GigStatus::InProgress;
            gig.selected_proposal = index;
        }
        Ok(())
    }

    /// Mark the work done and pay the selected freelancer in full
    ///
    /// Returns the payee and amount paid.
    pub fn complete(
        &mut self,
        tokens: &mut TokenLedger,
        id: u64,
        caller: &Address,
    ) -> Result<Option<(Address, Amount)>, LedgerError> {
        let gig = self.require(id)?;
        Self::require_poster(gig, caller)?;
        Self::require_status(gig, GigStatus::InProgress, "complete")?;

        let amount = gig.usdt_amount;
        let payee = match gig.selected_proposal {
            0 => None,
            n => self
                .proposals(id)
                .get(n as usize - 1)
                .map(|p| p.proposer.clone()),
        };

        let paid = match payee {
            Some(payee) => {
                if !amount.is_zero() {
                    tokens.release_escrow(&payee, amount)?;
                }
                Some((payee, amount))
            }
            None => None,
        };
        self.set_status(id, GigStatus::Completed);
        Ok(paid)
    }

    /// Cancel an open gig and refund the full budget to the poster
    pub fn cancel(
        &mut self,
        tokens: &mut TokenLedger,
        id: u64,
        caller: &Address,
    ) -> Result<Amount, LedgerError> {
        let gig = self.require(id)?;
        Self::require_poster(gig, caller)?;
        Self::require_status(gig, GigStatus::Open, "cancel")?;

        let amount = gig.usdt_amount;
        let poster = gig.poster.clone();
        if !amount.is_zero() {
            tokens.release_escrow(&poster, amount)?;
        }
        self.set_status(id, GigStatus::Cancelled);
        Ok(amount)
    }
}

impl Default for GigLedger {
    fn default() -> Self {
        Self::new()
    }
}
