//! Food detail page: quantity picker and related suggestions.

use mtp_food_core::{CartId, FoodId};

use crate::error::StorefrontError;
use crate::menu::{Food, Menu};
use crate::session::CartSession;
use crate::storage::KeyValueStore;

/// Smallest quantity the picker allows.
pub const MIN_QUANTITY: u32 = 1;
/// Largest quantity the picker allows.
pub const MAX_QUANTITY: u32 = 10;
/// Number of related foods shown under the detail.
pub const RELATED_LIMIT: usize = 3;

/// Quantity stepper clamped to `MIN_QUANTITY..=MAX_QUANTITY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantityPicker(u32);

impl Default for QuantityPicker {
    fn default() -> Self {
        Self(MIN_QUANTITY)
    }
}

impl QuantityPicker {
    /// Start at `quantity`, clamped into range.
    #[must_use]
    pub fn new(quantity: u32) -> Self {
        Self(quantity.clamp(MIN_QUANTITY, MAX_QUANTITY))
    }

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Step by `delta`, staying in range.
    pub fn step(&mut self, delta: i32) {
        let next = i64::from(self.0) + i64::from(delta);
        let clamped = next.clamp(i64::from(MIN_QUANTITY), i64::from(MAX_QUANTITY));
        // In range of u32 after the clamp.
        self.0 = u32::try_from(clamped).unwrap_or(MIN_QUANTITY);
    }

    pub fn increment(&mut self) {
        self.step(1);
    }

    pub fn decrement(&mut self) {
        self.step(-1);
    }
}

/// A food with the picker state and suggestions its page shows.
#[derive(Debug, Clone)]
pub struct FoodDetail {
    pub food: Food,
    pub related: Vec<Food>,
    pub quantity: QuantityPicker,
}

impl FoodDetail {
    /// Build the detail for `id` from the menu.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::NotFound`] if the menu has no such food.
    pub fn load(menu: &Menu, id: FoodId) -> Result<Self, StorefrontError> {
        let food = menu
            .find(id)
            .ok_or_else(|| StorefrontError::NotFound(format!("food {id}")))?;
        Ok(Self::new(food.clone(), menu))
    }

    /// Build the detail for a food fetched on its own.
    #[must_use]
    pub fn new(food: Food, menu: &Menu) -> Self {
        let related = menu
            .related(food.id, RELATED_LIMIT)
            .into_iter()
            .cloned()
            .collect();
        Self {
            food,
            related,
            quantity: QuantityPicker::default(),
        }
    }

    /// Add the picked quantity to the cart as that many units.
    pub fn add_to_cart<S: KeyValueStore>(&self, session: &mut CartSession<S>) -> Vec<CartId> {
        session.add_units(&self.food.snapshot(), self.quantity.get())
    }
}
