//! Catalog records and the public menu.
//!
//! The backend only lists active foods, but a [`Menu`] drops inactive
//! records again so a stale or admin-scoped response never offers them.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use mtp_food_core::{CartId, FoodId, Price};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::cart::FoodSnapshot;
use crate::error::StorefrontError;
use crate::session::CartSession;
use crate::storage::KeyValueStore;
use crate::wire::{null_as_default, optional_datetime};

/// Description keywords that mark a dish as vegetarian-friendly.
pub const VEGAN_KEYWORDS: [&str; 7] = [
    "salad", "rau", "vegan", "healthy", "chay", "organic", "sushi",
];

/// Lower bound (inclusive) of the premium filter, in đồng.
pub const PREMIUM_MIN_DONG: u64 = 300_000;

/// Upper bound (inclusive) of the budget filter, in đồng.
pub const UNDER_200_MAX_DONG: u64 = 200_000;

/// A catalog food as served by `GET /foods`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Food {
    pub id: FoodId,
    pub name: String,
    pub price: Price,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default, with = "optional_datetime")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, with = "optional_datetime")]
    pub updated_at: Option<NaiveDateTime>,
}

const fn default_active() -> bool {
    true
}

impl Food {
    /// The subset of fields a cart line keeps.
    #[must_use]
    pub fn snapshot(&self) -> FoodSnapshot {
        FoodSnapshot {
            food_id: self.id,
            name: self.name.clone(),
            price: self.price,
            image: self.image.clone(),
        }
    }

    /// Absolute image URL, resolving backend-relative paths against `base`.
    #[must_use]
    pub fn image_url(&self, base: &Url) -> String {
        resolve_image_url(&self.image, base)
    }

    /// Case-insensitive substring match over name and description.
    ///
    /// A blank query matches everything.
    #[must_use]
    pub fn matches_search(&self, query: &str) -> bool {
        let keyword = query.trim().to_lowercase();
        keyword.is_empty()
            || self.name.to_lowercase().contains(&keyword)
            || self.description.to_lowercase().contains(&keyword)
    }
}

/// Resolve an image path the backend returned.
///
/// Absolute `http(s)` URLs are returned unchanged; anything else is served by
/// the backend and gets `base` prepended.
#[must_use]
pub fn resolve_image_url(image: &str, base: &Url) -> String {
    if image.is_empty() || image.starts_with("http") {
        return image.to_string();
    }
    let base = base.as_str().trim_end_matches('/');
    if image.starts_with('/') {
        format!("{base}{image}")
    } else {
        format!("{base}/{image}")
    }
}

// =============================================================================
// Filtering
// =============================================================================

/// Menu category filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MenuFilter {
    #[default]
    All,
    /// Price of at least 300 000đ.
    Premium,
    /// Price of at most 200 000đ.
    Under200,
    /// Description mentions one of [`VEGAN_KEYWORDS`].
    Vegan,
}

/// Error for an unrecognised filter name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown menu filter: {0} (expected all, premium, under200 or vegan)")]
pub struct UnknownFilter(pub String);

impl MenuFilter {
    /// Whether `food` passes this filter.
    #[must_use]
    pub fn matches(self, food: &Food) -> bool {
        match self {
            Self::All => true,
            Self::Premium => food.price >= Price::from_dong(PREMIUM_MIN_DONG),
            Self::Under200 => food.price <= Price::from_dong(UNDER_200_MAX_DONG),
            Self::Vegan => {
                let description = food.description.to_lowercase();
                VEGAN_KEYWORDS.iter().any(|k| description.contains(k))
            }
        }
    }

    /// Stable name used on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Premium => "premium",
            Self::Under200 => "under200",
            Self::Vegan => "vegan",
        }
    }
}

impl fmt::Display for MenuFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MenuFilter {
    type Err = UnknownFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "all" => Ok(Self::All),
            "premium" => Ok(Self::Premium),
            "under200" => Ok(Self::Under200),
            "vegan" => Ok(Self::Vegan),
            other => Err(UnknownFilter(other.to_string())),
        }
    }
}

/// Search text plus category filter; both must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuQuery {
    pub search: String,
    pub filter: MenuFilter,
}

impl MenuQuery {
    /// Whether `food` satisfies the query.
    #[must_use]
    pub fn matches(&self, food: &Food) -> bool {
        food.matches_search(&self.search) && self.filter.matches(food)
    }
}

// =============================================================================
// Menu
// =============================================================================

/// The orderable catalog, in backend order.
#[derive(Debug, Clone, Default)]
pub struct Menu {
    foods: Vec<Food>,
}

impl Menu {
    /// Build a menu from catalog records, keeping active foods only.
    #[must_use]
    pub fn new(foods: Vec<Food>) -> Self {
        Self {
            foods: foods.into_iter().filter(|f| f.is_active).collect(),
        }
    }

    /// All orderable foods.
    #[must_use]
    pub fn foods(&self) -> &[Food] {
        &self.foods
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.foods.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.foods.is_empty()
    }

    /// Look up a food by ID.
    #[must_use]
    pub fn find(&self, id: FoodId) -> Option<&Food> {
        self.foods.iter().find(|f| f.id == id)
    }

    /// Foods matching `query`, in catalog order.
    #[must_use]
    pub fn filter(&self, query: &MenuQuery) -> Vec<&Food> {
        self.foods.iter().filter(|f| query.matches(f)).collect()
    }

    /// Up to `limit` other foods, in catalog order.
    #[must_use]
    pub fn related(&self, id: FoodId, limit: usize) -> Vec<&Food> {
        self.foods
            .iter()
            .filter(|f| f.id != id)
            .take(limit)
            .collect()
    }

    /// Add one unit of the food with `id` to the session's cart.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::NotFound`] if the menu has no such food.
    pub fn add_to_cart<S: KeyValueStore>(
        &self,
        id: FoodId,
        session: &mut CartSession<S>,
    ) -> Result<CartId, StorefrontError> {
        let food = self
            .find(id)
            .ok_or_else(|| StorefrontError::NotFound(format!("food {id}")))?;
        Ok(session.add(food.snapshot()))
    }
}
