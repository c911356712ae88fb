// Error taxonomy shared by all ledgers

use crate::storage::StoreError;
use crate::types::{Address, Amount, AmountError};
use thiserror::Error;

/// Errors returned by ledger operations
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: u64 },

    #[error("{entity} {id} is {status}, cannot {action}")]
    InvalidState {
        entity: &'static str,
        id: u64,
        status: &'static str,
        action: &'static str,
    },

    #[error("{submitter} already submitted to {entity} {id}")]
    DuplicateSubmission {
        entity: &'static str,
        id: u64,
        submitter: Address,
    },

    #[error("{caller} is not authorized for {entity} {id}")]
    Unauthorized {
        entity: &'static str,
        id: u64,
        caller: Address,
    },

    #[error("Insufficient balance: available {available}, required {required}")]
    InsufficientBalance { available: Amount, required: Amount },

    #[error("Insufficient allowance: approved {approved}, required {required}")]
    InsufficientAllowance { approved: Amount, required: Amount },

    #[error("Invalid winner split: {0}")]
    InvalidSplit(String),

    #[error("Invalid proposal: {0}")]
    InvalidProposal(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Amount overflow")]
    AmountOverflow,

    #[error(transparent)]
    InvalidAmount(#[from] AmountError),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}
