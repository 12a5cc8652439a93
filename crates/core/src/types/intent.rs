//! Cart mutation intents and their outcomes.

use super::cart::Cart;

/// A user-originated request to mutate the cart, normalized to a fixed set
/// of kinds. Exactly one intent is in flight at a time; the engine drops
/// anything that arrives while busy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Create a new cart with one unit of the given merchandise.
    Create {
        /// Product variant ID.
        variant_id: String,
    },
    /// Append one unit of merchandise to the existing cart.
    Add {
        /// Product variant ID.
        variant_id: String,
    },
    /// Delete a line.
    Remove {
        /// Line ID within the cart.
        line_id: String,
    },
    /// Set a line's quantity to an explicit positive value (not a delta).
    Update {
        /// Line ID within the cart.
        line_id: String,
        /// New quantity (>= 1; a zero becomes `Remove` before it gets here).
        quantity: u32,
    },
}

impl Intent {
    /// The merchandise reference that started this intent, if any.
    ///
    /// Line-targeted intents (`Remove`/`Update`) return `None`: when the
    /// tracked cart turns out to be invalid there is nothing safe to recreate
    /// from them, so the recovery chain terminates instead.
    #[must_use]
    pub fn merchandise_ref(&self) -> Option<&str> {
        match self {
            Self::Create { variant_id } | Self::Add { variant_id } => Some(variant_id),
            Self::Remove { .. } | Self::Update { .. } => None,
        }
    }

    /// Short name for logging.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Create { .. } => "create",
            Self::Add { .. } => "add",
            Self::Remove { .. } => "remove",
            Self::Update { .. } => "update",
        }
    }
}

/// Normalized failure vocabulary the engine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The tracked identifier is no longer usable (cart completed, expired,
    /// or malformed). Handled transparently by the engine where possible.
    InvalidCart,
    /// Request was well-formed but rejected by backend business rules
    /// (e.g. out of stock). No automatic retry.
    Validation,
    /// Transport failure, malformed payload, or unclassified rejection.
    Unknown,
}

/// The normalized result of sending a mutation intent through the gateway.
///
/// Constructed by the gateway per request, consumed once by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The backend applied the mutation; this is the new authoritative cart.
    Success(Cart),
    /// The mutation was rejected or failed.
    Failure(FailureKind),
}

/// Result of the read-only startup fetch.
///
/// Absence is encoded as a missing cart rather than a failure: the read path
/// never reports "not found" as an error status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The identifier resolved to a live cart.
    Found(Cart),
    /// The backend does not recognize the identifier.
    Missing,
    /// The fetch itself failed.
    Failed(FailureKind),
}
