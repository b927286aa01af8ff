//! # Catvote Identity
//! This crate provides the pseudonymous identity used to scope vote reads
//! and writes to one browser-equivalent session. It includes the
//! [`IdentityStore`] trait over durable client-local storage, file and
//! in-memory store implementations, and the [`IdentityProvider`] that
//! lazily generates and persists a stable random identifier.

mod store;

pub use store::{FileIdentityStore, MemoryIdentityStore};

use uuid::Uuid;

/// Represents errors that can occur while reading or writing the
/// persisted identity.
///
/// Storage failures are fatal for the session and are not recovered at
/// this layer; they propagate to the caller.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("Identity storage error: {0}")]
    Storage(#[from] std::io::Error),
}

/// A trait that defines the interface for durable identity storage.
///
/// Implementors persist a single opaque string under a fixed key.
/// Production code uses [`FileIdentityStore`]; tests can use
/// [`MemoryIdentityStore`].
pub trait IdentityStore: Send + Sync {
    /// Loads the persisted identifier, if any.
    fn load(&self) -> Result<Option<String>, IdentityError>;

    /// Persists the given identifier, overwriting any previous value.
    fn store(&self, id: &str) -> Result<(), IdentityError>;

    /// Removes the persisted identifier.
    fn clear(&self) -> Result<(), IdentityError>;
}

/// Provides the stable pseudonymous identifier (`sub_id`) for the
/// current session.
///
/// The identifier is created lazily on first access, persisted, and never
/// mutated afterwards; it is regenerated only when absent. An empty
/// stored value is treated as absent.
pub struct IdentityProvider<S: IdentityStore> {
    store: S,
}

impl<S: IdentityStore> IdentityProvider<S> {
    /// Creates a new `IdentityProvider` backed by the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns the persisted identifier, generating and persisting a
    /// fresh UUID v4 if none exists.
    ///
    /// # Errors
    ///
    /// Returns an `IdentityError` if the underlying storage fails; this
    /// is a fatal condition for the session.
    pub fn get_id(&self) -> Result<String, IdentityError> {
        match self.store.load()? {
            // An empty stored value is not a valid identity.
            Some(id) if !id.is_empty() => Ok(id),
            _ => {
                let id = Uuid::new_v4().to_string();
                self.store.store(&id)?;
                tracing::debug!("Generated new sub_id");
                Ok(id)
            }
        }
    }

    /// Overwrites the persisted identifier unconditionally.
    ///
    /// # Errors
    ///
    /// Returns an `IdentityError` if the underlying storage fails.
    pub fn set_id(&self, id: &str) -> Result<(), IdentityError> {
        self.store.store(id)
    }

    /// Removes the persisted identifier.
    ///
    /// # Errors
    ///
    /// Returns an `IdentityError` if the underlying storage fails.
    pub fn clear_id(&self) -> Result<(), IdentityError> {
        self.store.clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_id_generates_and_persists() {
        let provider = IdentityProvider::new(MemoryIdentityStore::new());

        let id = provider.get_id().unwrap();
        assert!(!id.is_empty());
        assert_eq!(provider.get_id().unwrap(), id);
    }

    #[test]
    fn test_get_id_writes_exactly_once() {
        let store = MemoryIdentityStore::new();
        let provider = IdentityProvider::new(store);

        let first = provider.get_id().unwrap();
        for _ in 0..5 {
            assert_eq!(provider.get_id().unwrap(), first);
        }
        // Only the initial generation hits the store.
        assert_eq!(provider.store.write_count(), 1);
    }

    #[test]
    fn test_empty_stored_value_is_regenerated() {
        let store = MemoryIdentityStore::new();
        store.store("").unwrap();
        let provider = IdentityProvider::new(store);

        let id = provider.get_id().unwrap();
        assert!(!id.is_empty());
    }

    #[test]
    fn test_set_id_overwrites() {
        let provider = IdentityProvider::new(MemoryIdentityStore::new());
        let generated = provider.get_id().unwrap();

        provider.set_id("custom-id").unwrap();
        assert_ne!(provider.get_id().unwrap(), generated);
        assert_eq!(provider.get_id().unwrap(), "custom-id");
    }

    #[test]
    fn test_clear_id_forces_regeneration() {
        let provider = IdentityProvider::new(MemoryIdentityStore::new());
        let first = provider.get_id().unwrap();

        provider.clear_id().unwrap();
        let second = provider.get_id().unwrap();
        assert_ne!(first, second);
    }
}
