// Token module - the mock USDT contract
// Balances, allowances and the escrow pool

mod ledger;

pub use ledger::{TokenLedger, DEFAULT_BALANCE, ESCROW_ADDRESS};
