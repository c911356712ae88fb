// Gig module - single-freelancer escrow jobs
// Records, proposals and the gig state machine

mod ledger;
mod model;

pub use ledger::GigLedger;
pub use model::{Gig, GigStatus, NewGig, Proposal, SECONDS_PER_DAY};
