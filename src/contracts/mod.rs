// Contracts module - the marketplace facade the UI talks to
// Wires the token, bounty and gig ledgers to a persistent store

mod config;
mod facade;
mod persistence;

pub use config::LedgerConfig;
pub use facade::MockContracts;
pub use persistence::{clear, load, save, LoadedState, SnapshotError};
