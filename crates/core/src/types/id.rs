//! Opaque cart identifier.

use serde::{Deserialize, Serialize};

/// Opaque token identifying a backend cart (e.g. `gid://shopify/Cart/...`).
///
/// The client owns exactly one of these at a time, persisted across page
/// loads. The value is never inspected locally - whether it is still usable
/// is decided only by the backend's response to the next request carrying it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartId(String);

impl CartId {
    /// Create a cart ID from a raw token.
    #[must_use]
    pub const fn new(id: String) -> Self {
        Self(id)
    }

    /// Get the underlying token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the ID and return the raw token.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for CartId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for CartId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for CartId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}
