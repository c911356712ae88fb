// Types module - shared primitives
// Token amounts and participant addresses

mod address;
mod amount;

pub use address::Address;
pub use amount::{Amount, AmountError, TOKEN_DECIMALS};
