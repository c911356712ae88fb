// Bounty module - open-ended tasks with a split reward
// Records, submissions and the bounty state machine

mod ledger;
mod model;

pub use ledger::BountyLedger;
pub use model::{Bounty, BountyStatus, NewBounty, Submission};
