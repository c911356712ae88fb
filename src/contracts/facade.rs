// MockContracts - the marketplace contracts, simulated client-side
//
// Every mutation runs validate -> mutate -> save before returning, so the
// store never lags the in-memory ledgers.

use crate::bounty::{Bounty, BountyLedger, NewBounty, Submission};
use crate::chain::{Clock, SystemClock};
use crate::contracts::persistence;
use crate::contracts::LedgerConfig;
use crate::error::LedgerError;
use crate::gig::{Gig, GigLedger, NewGig, Proposal};
use crate::storage::{KvStore, MemoryStore};
use crate::token::TokenLedger;
use crate::types::{Address, Amount};
use tracing::{debug, error, info, warn};

/// Token, bounty and gig contracts behind one handle
pub struct MockContracts {
    store: Box<dyn KvStore>,
    clock: Box<dyn Clock>,
    config: LedgerConfig,
    tokens: TokenLedger,
    bounties: BountyLedger,
    gigs: GigLedger,
}

impl MockContracts {
    /// Open on a store, restoring whatever snapshot it holds
    pub fn open<S: KvStore + 'static>(store: S, config: LedgerConfig) -> Result<Self, LedgerError> {
        Self::with_clock(store, SystemClock, config)
    }

    /// Open with an explicit time source
    pub fn with_clock<S, C>(store: S, clock: C, config: LedgerConfig) -> Result<Self, LedgerError>
    where
        S: KvStore + 'static,
        C: Clock + 'static,
    {
        config.validate()?;
        let mut contracts = Self {
            store: Box::new(store),
            clock: Box::new(clock),
            tokens: TokenLedger::new(config.default_balance, config.strict_allowances),
            bounties: BountyLedger::new(),
            gigs: GigLedger::new(),
            config,
        };
        contracts.reload();
        Ok(contracts)
    }

    /// Fresh ledger on a throwaway in-memory store
    pub fn in_memory() -> Self {
        Self {
            store: Box::new(MemoryStore::new()),
            clock: Box::new(SystemClock),
            tokens: TokenLedger::default(),
            bounties: BountyLedger::new(),
            gigs: GigLedger::new(),
            config: LedgerConfig::default(),
        }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    // ========================================================================
    // PERSISTENCE
    // ========================================================================

    /// Replace in-memory state with the stored snapshot
    ///
    /// A missing snapshot or one that fails to decode leaves empty state.
    pub fn reload(&mut self) {
        self.reset_memory();
        match persistence::load(self.store.as_ref(), &self.config) {
            Ok(Some(state)) => {
                self.tokens = state.tokens;
                self.bounties = state.bounties;
                self.gigs = state.gigs;
                debug!(
                    bounties = self.bounties.bounties().count(),
                    gigs = self.gigs.gigs().count(),
                    "Restored ledger snapshot"
                );
            }
            Ok(None) => debug!("No ledger snapshot, starting empty"),
            Err(e) => error!(error = %e, "Failed to load ledger snapshot, starting empty"),
        }
    }

    /// Write the current state; failures are logged, not raised
    fn save(&self) {
        let store = self.store.as_ref();
        if let Err(e) = persistence::save(store, &self.tokens, &self.bounties, &self.gigs) {
            warn!(error = %e, "Failed to persist ledger snapshot");
        }
    }

    /// Wipe every map and every persisted key
    pub fn clear_all_data(&mut self) -> Result<(), LedgerError> {
        self.reset_memory();
        persistence::clear(self.store.as_ref())?;
        info!("Cleared all ledger data");
        Ok(())
    }

    fn reset_memory(&mut self) {
        self.tokens = TokenLedger::new(self.config.default_balance, self.config.strict_allowances);
        self.bounties = BountyLedger::new();
        self.gigs = GigLedger::new();
    }

    // ========================================================================
    // TOKEN
    // ========================================================================

    pub fn tokens(&self) -> &TokenLedger {
        &self.tokens
    }

    pub fn get_balance(&self, addr: impl Into<Address>) -> Amount {
        self.tokens.balance(&addr.into())
    }

    pub fn get_allowance(&self, owner: impl Into<Address>, spender: impl Into<Address>) -> Amount {
        self.tokens.allowance(&owner.into(), &spender.into())
    }

    pub fn escrow_balance(&self) -> Amount {
        self.tokens.escrow_balance()
    }

    /// Overwrite an allowance; always succeeds
    pub fn approve(
        &mut self,
        owner: impl Into<Address>,
        spender: impl Into<Address>,
        amount: Amount,
    ) {
        let (owner, spender) = (owner.into(), spender.into());
        self.tokens.approve(&owner, &spender, amount);
        debug!(%owner, %spender, %amount, "approve");
        self.save();
    }

    pub fn transfer_from(
        &mut self,
        from: impl Into<Address>,
        to: impl Into<Address>,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        let (from, to) = (from.into(), to.into());
        self.tokens.transfer_from(&from, &to, amount)?;
        debug!(%from, %to, %amount, "transferFrom");
        self.save();
        Ok(())
    }

    pub fn transfer(
        &mut self,
        from: impl Into<Address>,
        to: impl Into<Address>,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        let (from, to) = (from.into(), to.into());
        self.tokens.transfer(&from, &to, amount)?;
        debug!(%from, %to, %amount, "transfer");
        self.save();
        Ok(())
    }

    /// Faucet top-up
    pub fn mint(&mut self, to: impl Into<Address>, amount: Amount) -> Result<(), LedgerError> {
        let to = to.into();
        self.tokens.mint(&to, amount)?;
        debug!(%to, %amount, "mint");
        self.save();
        Ok(())
    }

    // ========================================================================
    // BOUNTIES
    // ========================================================================

    pub fn bounty_ledger(&self) -> &BountyLedger {
        &self.bounties
    }

    pub fn get_bounty(&self, id: u64) -> Option<&Bounty> {
        self.bounties.get(id)
    }

    pub fn submissions(&self, id: u64) -> &[Submission] {
        self.bounties.submissions(id)
    }

    /// Open a bounty and escrow its reward; returns the new id
    pub fn create_bounty(
        &mut self,
        creator: impl Into<Address>,
        name: &str,
        description: &str,
        category: u8,
        deadline: u64,
        total_reward: Amount,
    ) -> Result<u64, LedgerError> {
        let creator = creator.into();
        let draft = NewBounty {
            name: name.to_string(),
            description: description.to_string(),
            category,
            deadline,
            total_reward,
        };
        let id = self
            .bounties
            .create(&mut self.tokens, &creator, draft, self.clock.now())?;
        info!(id, %creator, reward = %total_reward, "Bounty created");
        self.save();
        Ok(id)
    }

    pub fn submit_to_bounty(
        &mut self,
        bounty_id: u64,
        submitter: impl Into<Address>,
        main_uri: &str,
        evidence_uris: &[&str],
    ) -> Result<(), LedgerError> {
        let submitter = submitter.into();
        self.bounties.submit(
            bounty_id,
            &submitter,
            main_uri.to_string(),
            evidence_uris.iter().map(|u| u.to_string()).collect(),
            self.clock.now(),
        )?;
        debug!(bounty_id, %submitter, "Submission recorded");
        self.save();
        Ok(())
    }

    /// Complete a bounty and pay each winner their percentage of the reward
    pub fn select_winners<I, A>(
        &mut self,
        bounty_id: u64,
        winners: I,
        percentages: &[u8],
    ) -> Result<Vec<(Address, Amount)>, LedgerError>
    where
        I: IntoIterator<Item = A>,
        A: Into<Address>,
    {
        let winners: Vec<Address> = winners.into_iter().map(Into::into).collect();
        let payouts = self
            .bounties
            .select_winners(&mut self.tokens, bounty_id, &winners, percentages)?;
        info!(bounty_id, winners = payouts.len(), "Bounty completed");
        self.save();
        Ok(payouts)
    }

    /// Cancel a bounty; the creator gets the reward back minus the penalty
    pub fn cancel_bounty(
        &mut self,
        bounty_id: u64,
        caller: impl Into<Address>,
    ) -> Result<Amount, LedgerError> {
        let caller = caller.into();
        let refund = self.bounties.cancel(
            &mut self.tokens,
            bounty_id,
            &caller,
            self.config.cancel_penalty_percent,
        )?;
        info!(bounty_id, %refund, "Bounty cancelled");
        self.save();
        Ok(refund)
    }

    // ========================================================================
    // GIGS
    // ========================================================================

    pub fn gig_ledger(&self) -> &GigLedger {
        &self.gigs
    }

    pub fn get_gig(&self, id: u64) -> Option<&Gig> {
        self.gigs.get(id)
    }

    pub fn proposals(&self, id: u64) -> &[Proposal] {
        self.gigs.proposals(id)
    }

    /// Post a gig and escrow its USDT budget; returns the new id
    #[allow(clippy::too_many_arguments)]
    pub fn post_gig(
        &mut self,
        poster: impl Into<Address>,
        title: &str,
        short_description: &str,
        details_uri: &str,
        usdt_amount: Amount,
        native_stake: Amount,
        duration: u32,
        proposal_duration: u32,
    ) -> Result<u64, LedgerError> {
        let poster = poster.into();
        let draft = NewGig {
            title: title.to_string(),
            short_description: short_description.to_string(),
            details_uri: details_uri.to_string(),
            usdt_amount,
            native_stake,
            duration,
            proposal_duration,
        };
        let id = self
            .gigs
            .post(&mut self.tokens, &poster, draft, self.clock.now())?;
        info!(id, %poster, budget = %usdt_amount, "Gig posted");
        self.save();
        Ok(id)
    }

    pub fn submit_proposal(
        &mut self,
        gig_id: u64,
        proposer: impl Into<Address>,
        proposal_uri: &str,
    ) -> Result<(), LedgerError> {
        let proposer = proposer.into();
        self.gigs
            .submit_proposal(gig_id, &proposer, proposal_uri.to_string(), self.clock.now())?;
        debug!(gig_id, %proposer, "Proposal recorded");
        self.save();
        Ok(())
    }

    pub fn withdraw_proposal(
        &mut self,
        gig_id: u64,
        proposer: impl Into<Address>,
    ) -> Result<(), LedgerError> {
        let proposer = proposer.into();
        self.gigs.withdraw_proposal(gig_id, &proposer)?;
        debug!(gig_id, %proposer, "Proposal withdrawn");
        self.save();
        Ok(())
    }

    /// Hire proposal `proposal_index` (1-based)
    pub fn select_proposal(
        &mut self,
        gig_id: u64,
        proposal_index: u32,
        caller: impl Into<Address>,
    ) -> Result<(), LedgerError> {
        let caller = caller.into();
        self.gigs.select_proposal(gig_id, proposal_index, &caller)?;
        info!(gig_id, proposal_index, "Proposal selected");
        self.save();
        Ok(())
    }

    /// Release the budget to the hired freelancer
    pub fn complete_gig(
        &mut self,
        gig_id: u64,
        caller: impl Into<Address>,
    ) -> Result<Option<(Address, Amount)>, LedgerError> {
        let caller = caller.into();
        let paid = self.gigs.complete(&mut self.tokens, gig_id, &caller)?;
        info!(gig_id, "Gig completed");
        self.save();
        Ok(paid)
    }

    /// Cancel an open gig; the poster is refunded in full
    pub fn cancel_gig(
        &mut self,
        gig_id: u64,
        caller: impl Into<Address>,
    ) -> Result<Amount, LedgerError> {
        let caller = caller.into();
        let refund = self.gigs.cancel(&mut self.tokens, gig_id, &caller)?;
        info!(gig_id, %refund, "Gig cancelled");
        self.save();
        Ok(refund)
    }
}
