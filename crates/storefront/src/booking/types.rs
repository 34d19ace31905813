//! Booking request and response records.

use chrono::NaiveDateTime;
use mtp_food_core::{BookingCode, BookingStatus, Email, FoodId, PhoneNumber, Price};
use serde::{Deserialize, Serialize};

use super::BookingError;
use crate::cart::GroupedEntry;
use crate::wire::{datetime, null_as_default, optional_datetime};

/// Who is booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub name: String,
    pub phone: PhoneNumber,
    pub email: Email,
}

/// Table reservation details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingInfo {
    pub guests: u32,
    #[serde(with = "datetime")]
    pub date_time: NaiveDateTime,
    #[serde(default, deserialize_with = "null_as_default")]
    pub note: String,
}

/// Validated form contents, ready to pair with a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingDetails {
    pub customer_info: CustomerInfo,
    pub booking: BookingInfo,
}

/// One pre-ordered dish in a booking request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub food_id: FoodId,
    pub quantity: u32,
}

/// Body of `POST /bookings`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub customer_info: CustomerInfo,
    pub booking: BookingInfo,
    pub orders: Vec<OrderLine>,
}

impl BookingRequest {
    /// Pair validated details with the cart's grouped view.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::EmptyCart`] if `groups` is empty.
    pub fn new(details: BookingDetails, groups: &[GroupedEntry]) -> Result<Self, BookingError> {
        if groups.is_empty() {
            return Err(BookingError::EmptyCart);
        }
        let orders = groups
            .iter()
            .map(|g| OrderLine {
                food_id: g.food_id,
                quantity: g.quantity,
            })
            .collect();
        Ok(Self {
            customer_info: details.customer_info,
            booking: details.booking,
            orders,
        })
    }
}

/// A booking as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    /// Public booking code.
    pub id: BookingCode,
    pub status: BookingStatus,
    #[serde(default)]
    pub status_label: String,
    pub customer_info: CustomerInfo,
    pub booking: BookingInfo,
    #[serde(default)]
    pub orders: Vec<BookedItem>,
    pub total_amount: Price,
    #[serde(default, with = "optional_datetime")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, with = "optional_datetime")]
    pub updated_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub status_timeline: Vec<StatusChange>,
}

impl Booking {
    /// Status label, preferring the backend's wording.
    #[must_use]
    pub fn label(&self) -> &str {
        if self.status_label.is_empty() {
            self.status.label()
        } else {
            &self.status_label
        }
    }

    /// Total number of dishes pre-ordered.
    #[must_use]
    pub fn dish_count(&self) -> u32 {
        self.orders.iter().map(|o| o.quantity).sum()
    }
}

/// A dish line of a stored booking, priced by the backend at booking time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookedItem {
    /// `None` once the food has been deleted from the catalog.
    #[serde(default)]
    pub food_id: Option<FoodId>,
    pub name: String,
    pub price: Price,
    pub quantity: u32,
}

impl BookedItem {
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.price * self.quantity
    }
}

/// One entry of a booking's status history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    pub status: BookingStatus,
    #[serde(default)]
    pub label: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub note: String,
    #[serde(default, with = "optional_datetime")]
    pub time: Option<NaiveDateTime>,
}

/// Body of `GET /stats`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_foods: u64,
    pub total_bookings: u64,
    pub pending_bookings: u64,
    #[serde(default)]
    pub confirmed_bookings: u64,
    pub total_revenue: Price,
    #[serde(default)]
    pub upcoming: Vec<UpcomingBooking>,
}

/// A pending or confirmed booking that has not happened yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingBooking {
    #[serde(default)]
    pub id: Option<BookingCode>,
    pub guest_name: String,
    pub guests: u32,
    #[serde(with = "datetime")]
    pub date_time: NaiveDateTime,
    pub status: BookingStatus,
}
