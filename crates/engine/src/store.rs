//! Durable storage for the tracked cart identifier.
//!
//! One well-known key, one opaque value. No validation happens here:
//! whether a stored identifier is still usable is decided only by the
//! backend's response to the next request carrying it.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use tidewater_core::CartId;
use tracing::warn;

/// Single-key persistence for the cart identifier.
///
/// Implementations never block the sync flow: a failed read is reported as
/// "no identifier" and a failed write is logged, matching the fail-open
/// posture of the bootstrap path.
pub trait CartIdStore {
    /// The stored identifier, if any.
    fn get(&self) -> Option<CartId>;
    /// Persist an identifier, replacing any previous one.
    fn set(&mut self, id: &CartId);
    /// Forget the stored identifier.
    fn clear(&mut self);
}

/// File-backed store: a single file holding the raw identifier.
///
/// Stands in for the browser's durable key/value storage; survives process
/// restarts.
#[derive(Debug)]
pub struct FileCartIdStore {
    path: PathBuf,
}

impl FileCartIdStore {
    /// Create a store backed by the given file path.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl CartIdStore for FileCartIdStore {
    fn get(&self) -> Option<CartId> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                if token.is_empty() {
                    None
                } else {
                    Some(CartId::from(token))
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to read cart id");
                None
            }
        }
    }

    fn set(&mut self, id: &CartId) {
        if let Err(e) = fs::write(&self.path, id.as_str()) {
            warn!(path = %self.path.display(), error = %e, "failed to persist cart id");
        }
    }

    fn clear(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to clear cart id");
            }
        }
    }
}

/// In-memory store for tests and short-lived sessions.
#[derive(Debug, Default)]
pub struct MemoryCartIdStore {
    id: Option<CartId>,
}

impl MemoryCartIdStore {
    /// Create an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self { id: None }
    }

    /// Create a store that already tracks an identifier.
    #[must_use]
    pub const fn with_id(id: CartId) -> Self {
        Self { id: Some(id) }
    }
}

impl CartIdStore for MemoryCartIdStore {
    fn get(&self) -> Option<CartId> {
        self.id.clone()
    }

    fn set(&mut self, id: &CartId) {
        self.id = Some(id.clone());
    }

    fn clear(&mut self) {
        self.id = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("tidewater-store-{}-{name}", std::process::id()))
    }

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryCartIdStore::new();
        assert_eq!(store.get(), None);

        store.set(&CartId::from("gid://cart/A"));
        assert_eq!(store.get(), Some(CartId::from("gid://cart/A")));

        store.clear();
        assert_eq!(store.get(), None);
    }

    #[test]
    fn test_file_store_round_trip() {
        let path = temp_path("round-trip");
        let mut store = FileCartIdStore::new(path.clone());
        store.clear();

        assert_eq!(store.get(), None);

        store.set(&CartId::from("gid://cart/B"));
        assert_eq!(store.get(), Some(CartId::from("gid://cart/B")));

        // A fresh store over the same path sees the persisted value.
        let reopened = FileCartIdStore::new(path.clone());
        assert_eq!(reopened.get(), Some(CartId::from("gid://cart/B")));

        store.clear();
        assert_eq!(store.get(), None);
    }

    #[test]
    fn test_file_store_clear_is_idempotent() {
        let mut store = FileCartIdStore::new(temp_path("idempotent-clear"));
        store.clear();
        store.clear();
        assert_eq!(store.get(), None);
    }

    #[test]
    fn test_file_store_ignores_whitespace() {
        let path = temp_path("whitespace");
        fs::write(&path, "  gid://cart/C\n").expect("write");
        let store = FileCartIdStore::new(path.clone());
        assert_eq!(store.get(), Some(CartId::from("gid://cart/C")));
        let _ = fs::remove_file(path);
    }
}
