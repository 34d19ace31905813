//! Cache types for catalog responses.

use mtp_food_core::FoodId;

use crate::menu::Food;

/// Cache key for catalog reads.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Foods,
    Food(FoodId),
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Foods(Vec<Food>),
    Food(Box<Food>),
}
