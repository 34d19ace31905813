//! Bridge between a [`CartStore`] and durable key-value storage.

use tracing::{debug, warn};

use super::CartStore;
use crate::storage::{KeyValueStore, StorageError};

/// Storage key the serialized cart lives under.
pub const CART_KEY: &str = "cart";

/// Loads and saves a cart's serialized form under a fixed key.
#[derive(Debug)]
pub struct CartPersistence<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> CartPersistence<S> {
    /// Persist under [`CART_KEY`].
    pub fn new(store: S) -> Self {
        Self::with_key(store, CART_KEY)
    }

    /// Persist under a custom key.
    pub fn with_key(store: S, key: &str) -> Self {
        Self {
            store,
            key: key.to_string(),
        }
    }

    /// Read the stored cart into `cart`, replacing its contents.
    ///
    /// Never fails: unreadable storage or a corrupt blob leaves `cart` empty
    /// and is logged.
    pub fn load_into(&self, cart: &mut CartStore) {
        let blob = match self.store.get(&self.key) {
            Ok(blob) => blob,
            Err(e) => {
                warn!(error = %e, key = %self.key, "Failed to read persisted cart");
                None
            }
        };
        cart.restore(blob.as_deref());
        debug!(key = %self.key, units = cart.len(), "Loaded cart");
    }

    /// Read the stored cart into a fresh [`CartStore`].
    #[must_use]
    pub fn load(&self) -> CartStore {
        let mut cart = CartStore::new();
        self.load_into(&mut cart);
        cart
    }

    /// Write the cart's serialized form.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    pub fn save(&mut self, cart: &CartStore) -> Result<(), StorageError> {
        self.store.set(&self.key, &cart.serialize())
    }

    /// Delete the stored cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    pub fn forget(&mut self) -> Result<(), StorageError> {
        self.store.remove(&self.key)
    }

    /// The backing store.
    pub const fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use mtp_food_core::{FoodId, Price};

    use super::*;
    use crate::cart::FoodSnapshot;
    use crate::storage::MemoryStore;

    fn banh_mi() -> FoodSnapshot {
        FoodSnapshot {
            food_id: FoodId::new(3),
            name: "Banh mi".to_string(),
            price: Price::from_dong(25_000),
            image: String::new(),
        }
    }

    #[test]
    fn test_save_then_load() {
        let mut persistence = CartPersistence::new(MemoryStore::new());
        let mut cart = CartStore::new();
        cart.add(banh_mi());
        cart.add(banh_mi());

        persistence.save(&cart).unwrap();
        let loaded = persistence.load();

        assert_eq!(loaded.grouped_view(), cart.grouped_view());
        assert!(persistence.store().get(CART_KEY).unwrap().is_some());
    }

    #[test]
    fn test_absent_key_loads_empty() {
        let persistence = CartPersistence::new(MemoryStore::new());
        assert!(persistence.load().is_empty());
    }

    #[test]
    fn test_corrupt_blob_loads_empty() {
        let mut store = MemoryStore::new();
        store.set(CART_KEY, "{not json").unwrap();
        let persistence = CartPersistence::new(store);
        assert!(persistence.load().is_empty());
    }

    #[test]
    fn test_invalid_key_loads_empty() {
        let persistence = CartPersistence::with_key(MemoryStore::new(), "bad key");
        assert!(persistence.load().is_empty());
    }

    #[test]
    fn test_forget_removes_blob() {
        let mut persistence = CartPersistence::new(MemoryStore::new());
        let mut cart = CartStore::new();
        cart.add(banh_mi());
        persistence.save(&cart).unwrap();

        persistence.forget().unwrap();
        assert!(persistence.load().is_empty());
    }
}
