//! Unified error handling with Sentry integration.
//!
//! Each concern has its own error enum; [`StorefrontError`] gathers them for
//! callers that drive a whole flow (the CLI). [`StorefrontError::report`]
//! captures infrastructure failures to Sentry before they are shown.

use thiserror::Error;

use crate::api::ApiError;
use crate::booking::BookingError;
use crate::config::ConfigError;
use crate::storage::StorageError;

/// Storefront-level error type.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Key-value storage failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Backend API call failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Booking could not be submitted.
    #[error("Booking error: {0}")]
    Booking(#[from] BookingError),

    /// Configuration is invalid.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl StorefrontError {
    /// Capture infrastructure errors to Sentry and log them.
    ///
    /// User-input errors (validation, empty cart, unknown ids) are not
    /// reported.
    pub fn report(&self) {
        if self.is_infrastructure() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Storefront error"
            );
        }
    }

    /// Short message suitable for showing to a customer.
    ///
    /// Internal details are never exposed.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(ApiError::Http(_)) => "Không thể kết nối server".to_string(),
            Self::Api(ApiError::Rejected { message, .. }) => message.clone(),
            Self::Api(ApiError::NotFound(_)) | Self::NotFound(_) => {
                "Không tìm thấy dữ liệu".to_string()
            }
            Self::Booking(err) => err.user_message(),
            _ => "Có lỗi xảy ra, vui lòng thử lại".to_string(),
        }
    }

    const fn is_infrastructure(&self) -> bool {
        match self {
            Self::Storage(_) | Self::Config(_) => true,
            Self::Api(err) | Self::Booking(BookingError::Api(err)) => {
                !matches!(err, ApiError::NotFound(_) | ApiError::Rejected { .. })
            }
            Self::Booking(_) | Self::NotFound(_) => false,
        }
    }
}

/// Result type alias for `StorefrontError`.
pub type Result<T> = std::result::Result<T, StorefrontError>;

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added item", Some(&[("food", "Phở bò")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
