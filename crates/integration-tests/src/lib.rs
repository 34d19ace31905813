//! Integration tests for MTP Food.
//!
//! # Running Tests
//!
//! ```bash
//! # Offline scenarios (file-backed cart sessions)
//! cargo test -p mtp-food-integration-tests
//!
//! # Live backend tests (needs the API at MTP_API_URL, seeded with foods)
//! cargo test -p mtp-food-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `cart_session` - Cart persistence across sessions on the file store
//! - `backend_api` - Live calls against a running backend

use std::time::Duration;

use mtp_food_core::{FoodId, Price};
use mtp_food_storefront::cart::FoodSnapshot;
use mtp_food_storefront::config::ApiConfig;
use url::Url;

/// API root for live tests (configurable via environment).
///
/// # Panics
///
/// Panics if `MTP_API_URL` is set to something that is not a URL.
#[must_use]
pub fn api_config() -> ApiConfig {
    let api_url = std::env::var("MTP_API_URL")
        .unwrap_or_else(|_| "http://localhost:5000/api".to_string());
    let base_url = std::env::var("MTP_BASE_URL")
        .unwrap_or_else(|_| "http://localhost:5000".to_string());

    ApiConfig {
        api_url: Url::parse(&api_url).expect("Invalid MTP_API_URL"),
        base_url: Url::parse(&base_url).expect("Invalid MTP_BASE_URL"),
        catalog_cache_ttl: Duration::from_secs(5),
    }
}

/// A cart snapshot for a food with a whole-đồng price.
#[must_use]
pub fn snapshot(food_id: i64, name: &str, price: u64) -> FoodSnapshot {
    FoodSnapshot {
        food_id: FoodId::new(food_id),
        name: name.to_string(),
        price: Price::from_dong(price),
        image: format!("/uploads/foods/{food_id}.jpg"),
    }
}
