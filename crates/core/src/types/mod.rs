//! Cart domain types.

mod cart;
mod id;
mod intent;

pub use cart::{Cart, CartCost, CartLine, CartLineCost, CartMerchandise, Money};
pub use id::CartId;
pub use intent::{FailureKind, FetchOutcome, Intent, Outcome};
