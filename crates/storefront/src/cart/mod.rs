//! Client-side cart state.
//!
//! The cart is a list of fungible units: adding the same food twice yields two
//! [`LineItem`]s, and quantities only exist in the derived [`GroupedEntry`]
//! view. Each unit carries a snapshot of the food's display fields taken when
//! it was added; later catalog edits never reach items already in the cart.
//!
//! Every operation is total. Unknown cart or food IDs are no-ops, and the only
//! failure mode, a corrupt persisted blob, falls back to an empty cart.
//!
//! # Example
//!
//! ```
//! use mtp_food_core::{FoodId, Price};
//! use mtp_food_storefront::cart::{CartStore, FoodSnapshot};
//!
//! let pho = FoodSnapshot {
//!     food_id: FoodId::new(1),
//!     name: "Pho".to_string(),
//!     price: Price::from_dong(50_000),
//!     image: String::new(),
//! };
//!
//! let mut cart = CartStore::new();
//! cart.add(pho.clone());
//! cart.add(pho);
//!
//! let groups = cart.grouped_view();
//! assert_eq!(groups.len(), 1);
//! assert_eq!(groups[0].quantity, 2);
//! assert_eq!(cart.total_amount(), Price::from_dong(100_000));
//! ```

mod persistence;

pub use persistence::{CART_KEY, CartPersistence};

use std::collections::{HashMap, HashSet};
use std::fmt;

use mtp_food_core::{CartId, FoodId, Price};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

/// Display fields of a food, as captured when it is put in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodSnapshot {
    pub food_id: FoodId,
    pub name: String,
    pub price: Price,
    pub image: String,
}

/// One unit of one food in the cart.
///
/// Persisted records written by older clients stored the food identifier as
/// `id` next to the full catalog record; those still deserialize, with the
/// extra catalog fields ignored. When a record has both, `foodId` wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "LineItemRecord")]
pub struct LineItem {
    pub cart_id: CartId,
    pub food_id: FoodId,
    pub name: String,
    pub price: Price,
    pub image: String,
}

/// Wire shape of a persisted line item, current or legacy.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LineItemRecord {
    cart_id: CartId,
    food_id: Option<FoodId>,
    id: Option<FoodId>,
    name: String,
    price: Price,
    #[serde(default)]
    image: String,
}

impl TryFrom<LineItemRecord> for LineItem {
    type Error = &'static str;

    fn try_from(record: LineItemRecord) -> Result<Self, Self::Error> {
        let food_id = record.food_id.or(record.id).ok_or("missing field `foodId`")?;
        Ok(Self {
            cart_id: record.cart_id,
            food_id,
            name: record.name,
            price: record.price,
            image: record.image,
        })
    }
}

impl LineItem {
    /// The food snapshot this unit was created from.
    #[must_use]
    pub fn snapshot(&self) -> FoodSnapshot {
        FoodSnapshot {
            food_id: self.food_id,
            name: self.name.clone(),
            price: self.price,
            image: self.image.clone(),
        }
    }
}

/// All units of one food, priced together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupedEntry {
    pub food_id: FoodId,
    pub name: String,
    pub price: Price,
    pub image: String,
    /// Number of units of this food in the cart.
    pub quantity: u32,
    /// Sum of the unit prices in this group.
    pub subtotal: Price,
    /// Cart ID of the group's first unit; quantity controls act through it.
    pub first_cart_id: CartId,
}

/// A unit step applied through [`CartStore::adjust_quantity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityDelta {
    Increment,
    Decrement,
}

impl TryFrom<i32> for QuantityDelta {
    type Error = i32;

    fn try_from(delta: i32) -> Result<Self, Self::Error> {
        match delta {
            1 => Ok(Self::Increment),
            -1 => Ok(Self::Decrement),
            other => Err(other),
        }
    }
}

/// Change notification delivered to subscribers after a state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartChange {
    /// A unit was appended.
    Added { cart_id: CartId, food_id: FoodId },
    /// `units` units of `food_id` were removed.
    Removed { food_id: FoodId, units: usize },
    /// The cart was emptied.
    Cleared,
    /// The contents were replaced from a persisted blob.
    Restored { units: usize },
}

/// Handle returned by [`CartStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&CartChange) + Send>;

/// Why a persisted blob was rejected.
#[derive(Debug, Error)]
pub enum RestoreError {
    /// The blob is not a JSON array of line item records.
    #[error("malformed cart data: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// The cart: an ordered list of line items plus change subscribers.
pub struct CartStore {
    items: Vec<LineItem>,
    next_id: i64,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("items", &self.items)
            .field("next_id", &self.next_id)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl CartStore {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            items: Vec::new(),
            next_id: 1,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Build a cart from a serialized blob, rejecting anything malformed.
    ///
    /// # Errors
    ///
    /// Returns [`RestoreError::Malformed`] if the blob is not a JSON array of
    /// line item records.
    pub fn from_serialized(blob: &str) -> Result<Self, RestoreError> {
        let mut items: Vec<LineItem> = serde_json::from_str(blob)?;
        let next_id = assign_cart_ids(&mut items);
        Ok(Self {
            items,
            next_id,
            ..Self::new()
        })
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Look up a unit by cart ID.
    #[must_use]
    pub fn get(&self, cart_id: CartId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.cart_id == cart_id)
    }

    /// Number of units in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart holds no units.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct foods in the cart.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.items
            .iter()
            .map(|item| item.food_id)
            .collect::<HashSet<_>>()
            .len()
    }

    /// One entry per distinct food, in order of each food's first appearance.
    ///
    /// Name, price and image come from the group's first unit.
    #[must_use]
    pub fn grouped_view(&self) -> Vec<GroupedEntry> {
        let mut groups: Vec<GroupedEntry> = Vec::new();
        let mut positions: HashMap<FoodId, usize> = HashMap::new();

        for item in &self.items {
            if let Some(group) = positions
                .get(&item.food_id)
                .and_then(|&pos| groups.get_mut(pos))
            {
                group.quantity += 1;
                group.subtotal += item.price;
                continue;
            }

            positions.insert(item.food_id, groups.len());
            groups.push(GroupedEntry {
                food_id: item.food_id,
                name: item.name.clone(),
                price: item.price,
                image: item.image.clone(),
                quantity: 1,
                subtotal: item.price,
                first_cart_id: item.cart_id,
            });
        }

        groups
    }

    /// Sum of all unit prices; zero for an empty cart.
    #[must_use]
    pub fn total_amount(&self) -> Price {
        self.items.iter().map(|item| item.price).sum()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Append one unit of `food` and return its new cart ID.
    pub fn add(&mut self, food: FoodSnapshot) -> CartId {
        let cart_id = self.fresh_id();
        let food_id = food.food_id;
        self.items.push(LineItem {
            cart_id,
            food_id,
            name: food.name,
            price: food.price,
            image: food.image,
        });
        self.notify(&CartChange::Added { cart_id, food_id });
        cart_id
    }

    /// Remove the unit with `cart_id`. Returns `false` if there was none.
    pub fn remove_one(&mut self, cart_id: CartId) -> bool {
        let Some(index) = self.position(cart_id) else {
            return false;
        };
        let removed = self.items.remove(index);
        self.notify(&CartChange::Removed {
            food_id: removed.food_id,
            units: 1,
        });
        true
    }

    /// Remove every unit of `food_id`. Returns the number removed.
    pub fn remove_all_of_food(&mut self, food_id: FoodId) -> usize {
        let before = self.items.len();
        self.items.retain(|item| item.food_id != food_id);
        let units = before - self.items.len();
        if units > 0 {
            self.notify(&CartChange::Removed { food_id, units });
        }
        units
    }

    /// Grow or shrink the group of the unit identified by `cart_id` by one.
    ///
    /// Incrementing clones the referenced unit under a new cart ID.
    /// Decrementing removes the group's first unit: units of the same food are
    /// interchangeable, so which one goes is not observable. Returns `false`
    /// if `cart_id` is not in the cart.
    pub fn adjust_quantity(&mut self, cart_id: CartId, delta: QuantityDelta) -> bool {
        let Some(item) = self.get(cart_id) else {
            return false;
        };

        match delta {
            QuantityDelta::Increment => {
                let snapshot = item.snapshot();
                self.add(snapshot);
            }
            QuantityDelta::Decrement => {
                let food_id = item.food_id;
                let first_of_group = self
                    .items
                    .iter()
                    .position(|unit| unit.food_id == food_id);
                if let Some(index) = first_of_group {
                    self.items.remove(index);
                    self.notify(&CartChange::Removed { food_id, units: 1 });
                }
            }
        }
        true
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.items.clear();
        self.notify(&CartChange::Cleared);
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Serialize all line items as a JSON array.
    #[must_use]
    pub fn serialize(&self) -> String {
        serde_json::to_string(&self.items).unwrap_or_else(|e| {
            error!(error = %e, "Failed to serialize cart");
            String::from("[]")
        })
    }

    /// Replace the contents with a persisted blob.
    ///
    /// Never fails: an absent, blank or malformed blob leaves the cart empty.
    /// Malformed input is logged. Subscribers are kept and notified.
    pub fn restore(&mut self, blob: Option<&str>) {
        let restored = match blob.map(str::trim) {
            None | Some("") => Self::new(),
            Some(blob) => Self::from_serialized(blob).unwrap_or_else(|e| {
                warn!(error = %e, "Discarding persisted cart");
                Self::new()
            }),
        };

        self.items = restored.items;
        self.next_id = restored.next_id;
        let units = self.items.len();
        self.notify(&CartChange::Restored { units });
    }

    // =========================================================================
    // Subscriptions
    // =========================================================================

    /// Register a listener called after every state change.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&CartChange) + Send + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    fn notify(&mut self, change: &CartChange) {
        for (_, listener) in &mut self.listeners {
            listener(change);
        }
    }

    fn position(&self, cart_id: CartId) -> Option<usize> {
        self.items.iter().position(|item| item.cart_id == cart_id)
    }

    fn fresh_id(&mut self) -> CartId {
        let Some(after) = self.next_id.checked_add(1) else {
            warn!(units = self.items.len(), "Cart IDs exhausted, renumbering");
            self.next_id = renumber_cart_ids(&mut self.items);
            return self.fresh_id();
        };
        let id = CartId::new(self.next_id);
        self.next_id = after;
        id
    }
}

/// Make restored cart IDs unique and return the next unused ID.
///
/// The first occurrence of each ID keeps it and later duplicates get IDs above
/// the largest one. If that would overflow, every unit is renumbered from 1.
fn assign_cart_ids(items: &mut [LineItem]) -> i64 {
    let distinct: HashSet<CartId> = items.iter().map(|item| item.cart_id).collect();
    let duplicates = items.len() - distinct.len();
    let max = items.iter().map(|item| item.cart_id.as_i64()).max().unwrap_or(0);

    // Room for the duplicates plus one spare ID for the next add.
    let headroom = i64::try_from(duplicates)
        .ok()
        .and_then(|dups| max.checked_add(dups)?.checked_add(1));
    if headroom.is_none() {
        warn!(max_cart_id = max, "Restored cart IDs leave no room, renumbering");
        return renumber_cart_ids(items);
    }

    let mut next = max + 1;

    let mut seen = HashSet::with_capacity(items.len());
    for item in items.iter_mut() {
        if !seen.insert(item.cart_id) {
            item.cart_id = CartId::new(next);
            seen.insert(item.cart_id);
            next += 1;
        }
    }
    next
}

/// Number every unit from 1 in cart order and return the next unused ID.
fn renumber_cart_ids(items: &mut [LineItem]) -> i64 {
    let mut next = 1;
    for item in items.iter_mut() {
        item.cart_id = CartId::new(next);
        next += 1;
    }
    next
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    fn food(id: i64, name: &str, price: u64) -> FoodSnapshot {
        FoodSnapshot {
            food_id: FoodId::new(id),
            name: name.to_string(),
            price: Price::from_dong(price),
            image: format!("/uploads/foods/{id}.jpg"),
        }
    }

    fn pho() -> FoodSnapshot {
        food(1, "Pho", 50_000)
    }

    fn goi_cuon() -> FoodSnapshot {
        food(2, "Goi cuon", 30_000)
    }

    fn recorded(cart: &mut CartStore) -> Arc<Mutex<Vec<CartChange>>> {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        cart.subscribe(move |change| sink.lock().unwrap().push(change.clone()));
        log
    }

    fn summary(cart: &CartStore) -> Vec<(i64, u32, Price)> {
        cart.grouped_view()
            .iter()
            .map(|g| (g.food_id.as_i64(), g.quantity, g.subtotal))
            .collect()
    }

    #[test]
    fn test_order_scenario() {
        let mut cart = CartStore::new();
        let first_pho = cart.add(pho());
        cart.add(pho());
        cart.add(goi_cuon());

        assert_eq!(
            summary(&cart),
            vec![
                (1, 2, Price::from_dong(100_000)),
                (2, 1, Price::from_dong(30_000)),
            ]
        );
        assert_eq!(cart.total_amount(), Price::from_dong(130_000));

        assert!(cart.adjust_quantity(first_pho, QuantityDelta::Decrement));
        assert_eq!(summary(&cart)[0], (1, 1, Price::from_dong(50_000)));
        assert_eq!(cart.total_amount(), Price::from_dong(80_000));

        assert_eq!(cart.remove_all_of_food(FoodId::new(1)), 1);
        assert_eq!(summary(&cart), vec![(2, 1, Price::from_dong(30_000))]);
        assert_eq!(cart.total_amount(), Price::from_dong(30_000));

        cart.clear();
        assert!(cart.grouped_view().is_empty());
        assert_eq!(cart.total_amount(), Price::ZERO);
    }

    #[test]
    fn test_grouping_follows_first_occurrence() {
        let mut cart = CartStore::new();
        cart.add(goi_cuon());
        cart.add(pho());
        cart.add(goi_cuon());
        cart.add(food(3, "Banh mi", 25_000));
        cart.add(pho());

        let groups = cart.grouped_view();
        let order: Vec<i64> = groups.iter().map(|g| g.food_id.as_i64()).collect();
        assert_eq!(order, vec![2, 1, 3]);
        assert_eq!(
            groups.iter().map(|g| g.quantity).collect::<Vec<_>>(),
            vec![2, 2, 1]
        );
        assert_eq!(cart.group_count(), 3);
        assert_eq!(cart.len(), 5);
        assert_eq!(groups[0].first_cart_id, cart.items()[0].cart_id);
    }

    #[test]
    fn test_total_matches_items_and_groups() {
        let mut cart = CartStore::new();
        for (i, price) in [12_000_u64, 45_500, 12_000, 99_000, 45_500].iter().enumerate() {
            cart.add(food(i64::try_from(i % 3).unwrap(), "Item", *price));
        }

        let by_items: Price = cart.items().iter().map(|i| i.price).sum();
        let by_groups: Price = cart.grouped_view().iter().map(|g| g.subtotal).sum();
        assert_eq!(cart.total_amount(), by_items);
        assert_eq!(cart.total_amount(), by_groups);
    }

    #[test]
    fn test_empty_cart_views() {
        let cart = CartStore::new();
        assert!(cart.is_empty());
        assert!(cart.grouped_view().is_empty());
        assert_eq!(cart.total_amount(), Price::ZERO);
        assert_eq!(cart.group_count(), 0);
    }

    #[test]
    fn test_cart_ids_are_unique() {
        let mut cart = CartStore::new();
        let ids: HashSet<CartId> = (0..20).map(|_| cart.add(pho())).collect();
        assert_eq!(ids.len(), 20);
    }

    #[test]
    fn test_remove_one_is_idempotent() {
        let mut cart = CartStore::new();
        let id = cart.add(pho());
        cart.add(goi_cuon());

        assert!(cart.remove_one(id));
        let after_first = summary(&cart);
        assert!(!cart.remove_one(id));
        assert_eq!(summary(&cart), after_first);
    }

    #[test]
    fn test_unknown_ids_are_noops() {
        let mut cart = CartStore::new();
        cart.add(pho());
        let log = recorded(&mut cart);

        assert!(!cart.remove_one(CartId::new(999)));
        assert_eq!(cart.remove_all_of_food(FoodId::new(999)), 0);
        assert!(!cart.adjust_quantity(CartId::new(999), QuantityDelta::Increment));
        assert!(!cart.adjust_quantity(CartId::new(999), QuantityDelta::Decrement));

        assert_eq!(cart.len(), 1);
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_increment_clones_snapshot_under_new_id() {
        let mut cart = CartStore::new();
        let id = cart.add(pho());
        cart.add(goi_cuon());

        assert!(cart.adjust_quantity(id, QuantityDelta::Increment));

        let clone = cart.items().last().unwrap();
        assert_ne!(clone.cart_id, id);
        assert_eq!(clone.snapshot(), cart.get(id).unwrap().snapshot());
        assert_eq!(summary(&cart)[1], (2, 1, Price::from_dong(30_000)));
    }

    #[test]
    fn test_decrement_removes_first_unit_of_group() {
        let mut cart = CartStore::new();
        let first = cart.add(pho());
        let second = cart.add(pho());
        let third = cart.add(pho());

        assert!(cart.adjust_quantity(third, QuantityDelta::Decrement));
        assert!(cart.get(first).is_none());
        assert!(cart.get(second).is_some());
        assert!(cart.get(third).is_some());
    }

    #[test]
    fn test_decrement_last_unit_drops_group() {
        let mut cart = CartStore::new();
        let id = cart.add(pho());
        cart.add(goi_cuon());

        assert!(cart.adjust_quantity(id, QuantityDelta::Decrement));
        assert_eq!(summary(&cart), vec![(2, 1, Price::from_dong(30_000))]);
    }

    #[test]
    fn test_quantity_symmetry() {
        let mut cart = CartStore::new();
        let ids: Vec<CartId> = (0..3).map(|_| cart.add(pho())).collect();
        let before = summary(&cart);

        assert!(cart.adjust_quantity(ids[1], QuantityDelta::Decrement));
        let remaining = cart.items()[0].cart_id;
        assert!(cart.adjust_quantity(remaining, QuantityDelta::Increment));

        assert_eq!(summary(&cart), before);
    }

    #[test]
    fn test_quantity_delta_from_i32() {
        assert_eq!(QuantityDelta::try_from(1), Ok(QuantityDelta::Increment));
        assert_eq!(QuantityDelta::try_from(-1), Ok(QuantityDelta::Decrement));
        assert_eq!(QuantityDelta::try_from(2), Err(2));
        assert_eq!(QuantityDelta::try_from(0), Err(0));
    }

    #[test]
    fn test_round_trip_preserves_view() {
        let mut cart = CartStore::new();
        let id = cart.add(pho());
        cart.add(goi_cuon());
        cart.add(pho());
        cart.adjust_quantity(id, QuantityDelta::Increment);
        cart.remove_one(id);

        let mut restored = CartStore::new();
        restored.restore(Some(&cart.serialize()));

        assert_eq!(restored.grouped_view(), cart.grouped_view());
        assert_eq!(restored.total_amount(), cart.total_amount());
        assert_eq!(restored.items(), cart.items());
    }

    #[test]
    fn test_restored_cart_keeps_issuing_unique_ids() {
        let mut cart = CartStore::new();
        cart.add(pho());
        cart.add(pho());

        let mut restored = CartStore::from_serialized(&cart.serialize()).unwrap();
        let new_id = restored.add(goi_cuon());

        let ids: HashSet<CartId> = restored.items().iter().map(|i| i.cart_id).collect();
        assert_eq!(ids.len(), 3);
        assert!(ids.contains(&new_id));
    }

    #[test]
    fn test_restore_is_fail_soft() {
        let mut cart = CartStore::new();
        cart.add(pho());
        cart.restore(Some("garbage-not-valid"));
        assert!(cart.is_empty());

        cart.add(pho());
        cart.restore(None);
        assert!(cart.is_empty());

        cart.add(pho());
        cart.restore(Some("   "));
        assert!(cart.is_empty());

        cart.restore(Some(r#"{"cartId": 1}"#));
        assert!(cart.is_empty());

        cart.restore(Some(r#"[{"cartId": 1, "foodId": 1, "name": "Pho", "price": -5}]"#));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_from_serialized_reports_malformed() {
        assert!(matches!(
            CartStore::from_serialized("not json"),
            Err(RestoreError::Malformed(_))
        ));
    }

    #[test]
    fn test_restores_legacy_records() {
        let legacy = r#"[
            {"id": 1, "name": "Pho", "price": 50000, "image": "/uploads/foods/pho.jpg",
             "description": "Pho bo", "isActive": true, "cartId": 1700000000000},
            {"id": 1, "name": "Pho", "price": 50000, "image": "/uploads/foods/pho.jpg",
             "description": "Pho bo", "isActive": true, "cartId": 1700000000001}
        ]"#;

        let mut cart = CartStore::new();
        cart.restore(Some(legacy));

        assert_eq!(summary(&cart), vec![(1, 2, Price::from_dong(100_000))]);
        let next = cart.add(goi_cuon());
        assert_eq!(next.as_i64(), 1_700_000_000_002);
    }

    #[test]
    fn test_restore_renumbers_duplicate_cart_ids() {
        let blob = r#"[
            {"cartId": 7, "foodId": 1, "name": "Pho", "price": 50000},
            {"cartId": 7, "foodId": 2, "name": "Goi cuon", "price": 30000},
            {"cartId": 3, "foodId": 1, "name": "Pho", "price": 50000}
        ]"#;

        let cart = CartStore::from_serialized(blob).unwrap();
        let ids: Vec<i64> = cart.items().iter().map(|i| i.cart_id.as_i64()).collect();
        assert_eq!(ids, vec![7, 8, 3]);
    }

    #[test]
    fn test_restore_with_max_cart_id_keeps_ids_unique() {
        let blob = format!(
            r#"[{{"cartId": {}, "foodId": 1, "name": "Pho", "price": 50000}}]"#,
            i64::MAX
        );
        let mut cart = CartStore::new();
        cart.restore(Some(&blob));
        assert_eq!(cart.len(), 1);

        let added = cart.add(goi_cuon());
        let incremented = cart.adjust_quantity(added, QuantityDelta::Increment);
        assert!(incremented);

        let ids: HashSet<CartId> = cart.items().iter().map(|i| i.cart_id).collect();
        assert_eq!(ids.len(), 3);
        assert_eq!(summary(&cart).len(), 2);
    }

    #[test]
    fn test_duplicates_at_max_cart_id_are_renumbered() {
        let blob = format!(
            r#"[
                {{"cartId": {max}, "foodId": 1, "name": "Pho", "price": 50000}},
                {{"cartId": {max}, "foodId": 2, "name": "Goi cuon", "price": 30000}}
            ]"#,
            max = i64::MAX
        );
        let cart = CartStore::from_serialized(&blob).unwrap();
        let ids: Vec<i64> = cart.items().iter().map(|i| i.cart_id.as_i64()).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_ids_near_max_are_handed_out_without_repeats() {
        let blob = format!(
            r#"[{{"cartId": {}, "foodId": 1, "name": "Pho", "price": 50000}}]"#,
            i64::MAX - 1
        );
        let mut cart = CartStore::from_serialized(&blob).unwrap();
        let first = cart.add(pho());
        let second = cart.add(pho());
        let third = cart.add(pho());

        assert!(cart.get(first).is_some());
        let ids: HashSet<CartId> = cart.items().iter().map(|i| i.cart_id).collect();
        assert_eq!(ids.len(), 4);
        assert!(cart.get(second).is_some());
        assert!(cart.get(third).is_some());
    }

    #[test]
    fn test_restore_rejects_out_of_range_prices() {
        let blob = r#"[
            {"cartId": 1, "foodId": 1, "name": "Pho", "price": "79228162514264337593543950335"},
            {"cartId": 2, "foodId": 1, "name": "Pho", "price": "79228162514264337593543950335"}
        ]"#;
        let mut cart = CartStore::new();
        cart.add(pho());
        cart.restore(Some(blob));

        assert!(cart.is_empty());
        assert_eq!(cart.total_amount(), Price::ZERO);
        assert!(cart.grouped_view().is_empty());
    }

    #[test]
    fn test_record_with_both_id_and_food_id_prefers_food_id() {
        let blob = r#"[
            {"id": 9, "foodId": 1, "cartId": 1, "name": "Pho", "price": 50000},
            {"id": 2, "cartId": 2, "name": "Goi cuon", "price": 30000}
        ]"#;
        let cart = CartStore::from_serialized(blob).unwrap();
        let foods: Vec<i64> = cart.items().iter().map(|i| i.food_id.as_i64()).collect();
        assert_eq!(foods, vec![1, 2]);

        let missing = r#"[{"cartId": 1, "name": "Pho", "price": 1}]"#;
        assert!(CartStore::from_serialized(missing).is_err());
    }

    #[test]
    fn test_serialized_form_uses_camel_case_records() {
        let mut cart = CartStore::new();
        cart.add(pho());
        let value: serde_json::Value = serde_json::from_str(&cart.serialize()).unwrap();
        assert_eq!(
            value,
            serde_json::json!([{
                "cartId": 1,
                "foodId": 1,
                "name": "Pho",
                "price": 50000,
                "image": "/uploads/foods/1.jpg"
            }])
        );
    }

    #[test]
    fn test_notifications() {
        let mut cart = CartStore::new();
        let log = recorded(&mut cart);

        let id = cart.add(pho());
        cart.adjust_quantity(id, QuantityDelta::Decrement);
        cart.add(goi_cuon());
        cart.clear();
        cart.clear();
        cart.restore(None);

        assert_eq!(
            *log.lock().unwrap(),
            vec![
                CartChange::Added {
                    cart_id: id,
                    food_id: FoodId::new(1)
                },
                CartChange::Removed {
                    food_id: FoodId::new(1),
                    units: 1
                },
                CartChange::Added {
                    cart_id: CartId::new(2),
                    food_id: FoodId::new(2)
                },
                CartChange::Cleared,
                CartChange::Restored { units: 0 },
            ]
        );
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let mut cart = CartStore::new();
        let count = Arc::new(Mutex::new(0_usize));
        let sink = Arc::clone(&count);
        let id = cart.subscribe(move |_| *sink.lock().unwrap() += 1);

        cart.add(pho());
        assert!(cart.unsubscribe(id));
        assert!(!cart.unsubscribe(id));
        cart.add(pho());

        assert_eq!(*count.lock().unwrap(), 1);
    }
}
