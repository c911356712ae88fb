// Chain module - stand-ins for what a live chain would provide
// Timestamps, transaction hashes and confirmation delays

mod clock;
mod sim;

pub use clock::{Clock, FixedClock, SystemClock};
pub use sim::{generate_tx_hash, simulate_delay, TxSpeed};
