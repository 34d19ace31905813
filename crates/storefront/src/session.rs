//! Page session owning the cart and its persistence.
//!
//! A [`CartSession`] is what a page holds for its lifetime: it restores the
//! cart on open, writes it back after every effective mutation, and writes it
//! once more when the session ends (explicit [`CartSession::unload`] or drop),
//! so the last state is captured even if an earlier write failed.
//!
//! Writes are fire-and-forget. A failed write is logged and never surfaces to
//! the caller; the in-memory cart stays authoritative.

use mtp_food_core::{CartId, FoodId};
use tracing::{info, warn};

use crate::cart::{
    CartChange, CartPersistence, CartStore, FoodSnapshot, QuantityDelta, SubscriptionId,
};
use crate::error::add_breadcrumb;
use crate::storage::KeyValueStore;

/// A cart bound to durable storage.
#[derive(Debug)]
pub struct CartSession<S: KeyValueStore> {
    cart: CartStore,
    persistence: CartPersistence<S>,
}

impl<S: KeyValueStore> CartSession<S> {
    /// Open a session, restoring whatever cart `store` holds.
    pub fn open(store: S) -> Self {
        Self::with_persistence(CartPersistence::new(store))
    }

    /// Open a session over an existing persistence bridge.
    pub fn with_persistence(persistence: CartPersistence<S>) -> Self {
        let cart = persistence.load();
        info!(
            units = cart.len(),
            groups = cart.group_count(),
            "Cart session opened"
        );
        Self { cart, persistence }
    }

    /// Read-only access to the cart.
    pub const fn cart(&self) -> &CartStore {
        &self.cart
    }

    /// Register a change listener on the underlying cart.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&CartChange) + Send + 'static,
    {
        self.cart.subscribe(listener)
    }

    /// Remove a change listener.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.cart.unsubscribe(id)
    }

    /// Add one unit of `food`.
    pub fn add(&mut self, food: FoodSnapshot) -> CartId {
        add_breadcrumb("cart", "Added item", Some(&[("food", food.name.as_str())]));
        let cart_id = self.cart.add(food);
        self.persist();
        cart_id
    }

    /// Add `quantity` units of `food` and persist once.
    pub fn add_units(&mut self, food: &FoodSnapshot, quantity: u32) -> Vec<CartId> {
        if quantity == 0 {
            return Vec::new();
        }
        add_breadcrumb("cart", "Added items", Some(&[("food", food.name.as_str())]));
        let ids = (0..quantity).map(|_| self.cart.add(food.clone())).collect();
        self.persist();
        ids
    }

    /// Remove the unit with `cart_id`; no-op if absent.
    pub fn remove_one(&mut self, cart_id: CartId) -> bool {
        let removed = self.cart.remove_one(cart_id);
        if removed {
            self.persist();
        }
        removed
    }

    /// Remove every unit of `food_id`; no-op if none.
    pub fn remove_all_of_food(&mut self, food_id: FoodId) -> usize {
        let removed = self.cart.remove_all_of_food(food_id);
        if removed > 0 {
            add_breadcrumb("cart", "Removed food", None);
            self.persist();
        }
        removed
    }

    /// Step the quantity of `cart_id`'s group by one unit.
    pub fn adjust_quantity(&mut self, cart_id: CartId, delta: QuantityDelta) -> bool {
        let changed = self.cart.adjust_quantity(cart_id, delta);
        if changed {
            self.persist();
        }
        changed
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        let was_empty = self.cart.is_empty();
        self.cart.clear();
        if !was_empty {
            add_breadcrumb("cart", "Cleared cart", None);
            self.persist();
        }
    }

    /// Write the current cart to storage now.
    pub fn flush(&mut self) {
        self.persist();
    }

    /// End the session. The final write happens on drop.
    pub fn unload(self) {}

    /// The persistence bridge.
    pub const fn persistence(&self) -> &CartPersistence<S> {
        &self.persistence
    }

    fn persist(&mut self) {
        if let Err(e) = self.persistence.save(&self.cart) {
            warn!(error = %e, units = self.cart.len(), "Failed to persist cart");
        }
    }
}

impl<S: KeyValueStore> Drop for CartSession<S> {
    fn drop(&mut self) {
        self.persist();
    }
}
