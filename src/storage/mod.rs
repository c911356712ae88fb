// Storage module - PERSISTENCE
// Textual key-value stores and the snapshot codec

mod codec;
mod store;

pub use codec::{decode_decimal, decode_entries, encode_decimal, encode_entries, CodecError};
pub use store::{KvStore, MemoryStore, SledStore, StoreError};

/// Persisted key names
pub mod keys {
    pub const BOUNTIES: &str = "mock_bounties";
    pub const NEXT_BOUNTY_ID: &str = "mock_nextBountyId";
    pub const GIGS: &str = "mock_gigs";
    pub const NEXT_GIG_ID: &str = "mock_nextGigId";
    pub const BALANCES: &str = "mock_balances";
    pub const ALLOWANCES: &str = "mock_allowances";
    pub const SUBMISSIONS: &str = "mock_submissions";
    pub const PROPOSALS: &str = "mock_proposals";
    pub const ESCROW: &str = "mock_escrow";

    /// Every key a snapshot writes
    pub const ALL: [&str; 9] = [
        BOUNTIES,
        NEXT_BOUNTY_ID,
        GIGS,
        NEXT_GIG_ID,
        BALANCES,
        ALLOWANCES,
        SUBMISSIONS,
        PROPOSALS,
        ESCROW,
    ];
}
