//! Client for the MTP Food REST backend.
//!
//! # Architecture
//!
//! - The backend is the source of truth for the catalog and bookings
//! - `reqwest` for HTTP, JSON bodies decoded with `serde_json`
//! - Catalog reads are cached in memory via `moka` (TTL from configuration)
//! - Bookings and stats are never cached
//!
//! # Example
//!
//! ```rust,ignore
//! use mtp_food_storefront::api::ApiClient;
//!
//! let client = ApiClient::new(&config.api);
//! let foods = client.get_foods().await?;
//! let booking = client.get_booking(&BookingCode::new("BK1A2B3C4D")).await?;
//! ```

mod cache;

use std::sync::Arc;

use mtp_food_core::{BookingCode, FoodId};
use moka::future::Cache;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use crate::booking::{Booking, BookingRequest, DashboardStats};
use crate::config::ApiConfig;
use crate::menu::Food;

use cache::{CacheKey, CacheValue};

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The backend refused the request.
    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),
}

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the backend REST API.
///
/// Cheap to clone; clones share the connection pool and the catalog cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    api_url: Url,
    base_url: Url,
    cache: Cache<CacheKey, CacheValue>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("api_url", &self.inner.api_url.as_str())
            .field("cached_entries", &self.inner.cache.entry_count())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a new API client.
    #[must_use]
    pub fn new(config: &ApiConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(config.catalog_cache_ttl)
            .build();

        // Url::join replaces the last path segment unless the base ends in '/'.
        let mut api_url = config.api_url.clone();
        if !api_url.path().ends_with('/') {
            let path = format!("{}/", api_url.path());
            api_url.set_path(&path);
        }

        Self {
            inner: Arc::new(ApiClientInner {
                client: reqwest::Client::new(),
                api_url,
                base_url: config.base_url.clone(),
                cache,
            }),
        }
    }

    /// Origin that relative image paths resolve against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.inner.api_url.join(path)?)
    }

    /// Send a request and decode a JSON body.
    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = request.send().await?;
        let status = response.status();

        // Check for rate limiting
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ApiError::RateLimited(retry_after));
        }

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            let message = error_message(&response_text).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            });
            if status == StatusCode::NOT_FOUND {
                return Err(ApiError::NotFound(message));
            }
            tracing::warn!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "Backend returned non-success status"
            );
            return Err(ApiError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %response_text.chars().take(500).collect::<String>(),
                "Failed to parse backend response"
            );
            ApiError::Parse(e)
        })
    }

    // =========================================================================
    // Catalog (cached)
    // =========================================================================

    /// List active foods.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    #[instrument(skip(self))]
    pub async fn get_foods(&self) -> Result<Vec<Food>, ApiError> {
        if let Some(CacheValue::Foods(foods)) = self.inner.cache.get(&CacheKey::Foods).await {
            debug!("Cache hit for foods");
            return Ok(foods);
        }

        let url = self.endpoint("foods")?;
        let foods: Vec<Food> = self.send(self.inner.client.get(url)).await?;
        debug!(count = foods.len(), "Fetched foods");

        self.inner
            .cache
            .insert(CacheKey::Foods, CacheValue::Foods(foods.clone()))
            .await;

        Ok(foods)
    }

    /// Fetch a single food.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the backend has no such food, or
    /// another error if the request fails.
    #[instrument(skip(self), fields(food_id = %id))]
    pub async fn get_food(&self, id: FoodId) -> Result<Food, ApiError> {
        let cache_key = CacheKey::Food(id);

        // Check cache
        if let Some(CacheValue::Food(food)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for food");
            return Ok(*food);
        }

        let url = self.endpoint(&format!("foods/{id}"))?;
        let food: Food = self.send(self.inner.client.get(url)).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Food(Box::new(food.clone())))
            .await;

        Ok(food)
    }

    /// Drop every cached catalog response.
    pub fn invalidate_catalog(&self) {
        self.inner.cache.invalidate_all();
    }

    // =========================================================================
    // Bookings (not cached)
    // =========================================================================

    /// Create a booking.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Rejected`] with the backend's message if the
    /// booking is refused, or another error if the request fails.
    #[instrument(skip(self, request), fields(orders = request.orders.len()))]
    pub async fn create_booking(&self, request: &BookingRequest) -> Result<Booking, ApiError> {
        let url = self.endpoint("bookings")?;
        let booking: Booking = self.send(self.inner.client.post(url).json(request)).await?;
        debug!(booking = %booking.id, "Created booking");
        Ok(booking)
    }

    /// Look up a booking by its code.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for an unknown code, or another error if
    /// the request fails.
    #[instrument(skip(self), fields(code = %code))]
    pub async fn get_booking(&self, code: &BookingCode) -> Result<Booking, ApiError> {
        let mut url = self.endpoint("bookings/")?;
        url.path_segments_mut()
            .map_err(|()| ApiError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .push(code.as_str());
        self.send(self.inner.client.get(url)).await
    }

    /// Fetch dashboard statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    #[instrument(skip(self))]
    pub async fn get_stats(&self) -> Result<DashboardStats, ApiError> {
        let url = self.endpoint("stats")?;
        self.send(self.inner.client.get(url)).await
    }
}

/// Extract a readable message from a `{"error": ...}` body.
///
/// The backend sends either a string or a nested object of field messages;
/// nested messages are flattened and joined.
fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let mut messages = Vec::new();
    collect_messages(value.get("error")?, &mut messages);
    if messages.is_empty() {
        None
    } else {
        Some(messages.join("; "))
    }
}

fn collect_messages(value: &serde_json::Value, out: &mut Vec<String>) {
    match value {
        serde_json::Value::String(s) => out.push(s.clone()),
        serde_json::Value::Array(items) => {
            for item in items {
                collect_messages(item, out);
            }
        }
        serde_json::Value::Object(fields) => {
            for field in fields.values() {
                collect_messages(field, out);
            }
        }
        serde_json::Value::Null => {}
        other => out.push(other.to_string()),
    }
}
