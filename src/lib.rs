// Career ledger - client-side stand-in for the marketplace contracts
//
// Token balances and allowances, bounties with split rewards, and
// single-freelancer gig escrow, persisted to a local store.

pub mod bounty;
pub mod chain;
pub mod contracts;
pub mod error;
pub mod gig;
pub mod storage;
pub mod token;
pub mod types;

pub use contracts::{LedgerConfig, MockContracts};
pub use error::LedgerError;
pub use types::{Address, Amount};
