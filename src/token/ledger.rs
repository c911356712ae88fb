// TokenLedger - balances and allowances of the mock USDT token

use crate::error::LedgerError;
use crate::types::{Address, Amount};
use std::collections::BTreeMap;

/// Address of the marketplace contract's escrow pool
pub const ESCROW_ADDRESS: &str = "0x000000000000000000000000000000000000e5c0";

/// Faucet balance for addresses the ledger has never seen (1000 tokens)
pub const DEFAULT_BALANCE: Amount = Amount::new(1_000_000_000);

/// Balance and allowance bookkeeping for a single token
///
/// Funds sent to [`ESCROW_ADDRESS`] land in a dedicated pool instead of the
/// balance map, so escrow never shows up as a participant balance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenLedger {
    balances: BTreeMap<Address, Amount>,
    allowances: BTreeMap<Address, BTreeMap<Address, Amount>>,
    escrow: Amount,
    default_balance: Amount,
    strict_allowances: bool,
}

impl TokenLedger {
    /// Create an empty ledger
    pub fn new(default_balance: Amount, strict_allowances: bool) -> Self {
        Self {
            balances: BTreeMap::new(),
            allowances: BTreeMap::new(),
            escrow: Amount::ZERO,
            default_balance,
            strict_allowances,
        }
    }

    /// Rebuild from persisted parts
    pub fn from_parts(
        balances: BTreeMap<Address, Amount>,
        allowances: BTreeMap<Address, BTreeMap<Address, Amount>>,
        escrow: Amount,
        default_balance: Amount,
        strict_allowances: bool,
    ) -> Self {
        Self {
            balances,
            allowances,
            escrow,
            default_balance,
            strict_allowances,
        }
    }

    pub fn escrow_address() -> Address {
        Address::new(ESCROW_ADDRESS)
    }

    fn is_escrow(addr: &Address) -> bool {
        addr.as_str() == ESCROW_ADDRESS
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    /// Balance of an address, or the faucet default if never seen
    pub fn balance(&self, addr: &Address) -> Amount {
        if Self::is_escrow(addr) {
            return self.escrow;
        }
        self.balances
            .get(addr)
            .copied()
            .unwrap_or(self.default_balance)
    }

    /// Amount `spender` may move on behalf of `owner`
    pub fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        self.allowances
            .get(owner)
            .and_then(|m| m.get(spender))
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    /// Funds currently held by the contract
    pub fn escrow_balance(&self) -> Amount {
        self.escrow
    }

    pub fn balances(&self) -> &BTreeMap<Address, Amount> {
        &self.balances
    }

    pub fn allowances(&self) -> &BTreeMap<Address, BTreeMap<Address, Amount>> {
        &self.allowances
    }

    pub fn strict_allowances(&self) -> bool {
        self.strict_allowances
    }

    // ========================================================================
    // MUTATIONS
    // ========================================================================

    /// Overwrite the allowance `owner` grants `spender`
    pub fn approve(&mut self, owner: &Address, spender: &Address, amount: Amount) {
        self.allowances
            .entry(owner.clone())
            .or_default()
            .insert(spender.clone(), amount);
    }

    /// Move funds out of `from`, treating `to` as the spender
    ///
    /// Allowances are only checked and consumed in strict mode; the default
    /// mock lets anyone move anyone's funds.
    pub fn transfer_from(
        &mut self,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        let approved = self.allowance(from, to);
        if self.strict_allowances && approved < amount {
            return Err(LedgerError::InsufficientAllowance {
                approved,
                required: amount,
            });
        }

        self.transfer(from, to, amount)?;

        if self.strict_allowances {
            self.approve(from, to, approved.saturating_sub(amount));
        }
        Ok(())
    }

    /// Move funds directly between two addresses
    pub fn transfer(
        &mut self,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        let available = self.balance(from);
        let remaining = available
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientBalance {
                available,
                required: amount,
            })?;
        // verify the credit before touching anything
        let credited = if from == to {
            available
        } else {
            self.balance(to)
                .checked_add(amount)
                .ok_or(LedgerError::AmountOverflow)?
        };

        self.set_balance(from, remaining);
        self.set_balance(to, credited);
        Ok(())
    }

    /// Credit fresh tokens to an address
    pub fn mint(&mut self, to: &Address, amount: Amount) -> Result<(), LedgerError> {
        let updated = self
            .balance(to)
            .checked_add(amount)
            .ok_or(LedgerError::AmountOverflow)?;
        self.set_balance(to, updated);
        Ok(())
    }

    /// Pay out of the escrow pool
    pub fn release_escrow(&mut self, to: &Address, amount: Amount) -> Result<(), LedgerError> {
        let escrow = Self::escrow_address();
        self.transfer(&escrow, to, amount)
    }

    /// Check the pool could cover every payout in `amounts`
    pub fn can_release(&self, amounts: impl IntoIterator<Item = Amount>) -> bool {
        let mut total = Amount::ZERO;
        for amount in amounts {
            match total.checked_add(amount) {
                Some(t) => total = t,
                None => return false,
            }
        }
        total <= self.escrow
    }

    fn set_balance(&mut self, addr: &Address, amount: Amount) {
        if Self::is_escrow(addr) {
            self.escrow = amount;
        } else {
            self.balances.insert(addr.clone(), amount);
        }
    }
}

impl Default for TokenLedger {
    fn default() -> Self {
        Self::new(DEFAULT_BALANCE, false)
    }
}
