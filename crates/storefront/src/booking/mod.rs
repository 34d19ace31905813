//! Table booking flow.
//!
//! A booking pairs the customer's form with the cart's grouped view:
//!
//! 1. [`BookingForm::validate`] checks every field and collects all errors.
//! 2. The cart must hold at least one dish.
//! 3. The request is posted through a [`BookingBackend`].
//! 4. On success the cart is cleared; on failure it is left untouched.

mod types;

pub use types::*;

use std::fmt;
use std::future::Future;
use std::sync::LazyLock;

use chrono::NaiveDateTime;
use mtp_food_core::{Email, EmailError, PhoneError, PhoneNumber};
use regex::Regex;
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::api::{ApiClient, ApiError};
use crate::error::add_breadcrumb;
use crate::session::CartSession;
use crate::storage::KeyValueStore;
use crate::wire::parse_datetime;

/// Letters (including Vietnamese) and whitespace, 2 to 50 characters.
static NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-ZÀ-ỹ\s]{2,50}$").expect("Invalid regex"));

/// Smallest party size accepted online.
pub const MIN_GUESTS: u32 = 1;
/// Largest party size accepted online.
pub const MAX_GUESTS: u32 = 20;

// =============================================================================
// Validation
// =============================================================================

/// Form field a validation error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookingField {
    Name,
    Phone,
    Email,
    Guests,
    DateTime,
}

impl BookingField {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Phone => "phone",
            Self::Email => "email",
            Self::Guests => "guests",
            Self::DateTime => "dateTime",
        }
    }
}

impl fmt::Display for BookingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single rejected form field. Messages are customer-facing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("Họ tên phải từ 2-50 ký tự, chỉ chứa chữ cái")]
    Name,

    #[error("Số điện thoại phải có 10 số, bắt đầu bằng 0")]
    Phone(#[source] PhoneError),

    #[error("Email không hợp lệ (vd: example@gmail.com)")]
    Email(#[source] EmailError),

    #[error("Số người phải từ 1-20")]
    Guests,

    #[error("Vui lòng chọn ngày giờ")]
    MissingDateTime,

    #[error("Ngày giờ không hợp lệ")]
    InvalidDateTime,

    #[error("Không thể đặt bàn trong quá khứ")]
    PastDateTime,
}

impl FieldError {
    /// The field this error belongs to.
    #[must_use]
    pub const fn field(&self) -> BookingField {
        match self {
            Self::Name => BookingField::Name,
            Self::Phone(_) => BookingField::Phone,
            Self::Email(_) => BookingField::Email,
            Self::Guests => BookingField::Guests,
            Self::MissingDateTime | Self::InvalidDateTime | Self::PastDateTime => {
                BookingField::DateTime
            }
        }
    }
}

/// Every field error found in one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The error reported for `field`, if any.
    #[must_use]
    pub fn get(&self, field: BookingField) -> Option<&FieldError> {
        self.0.iter().find(|e| e.field() == field)
    }

    fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {error}", error.field())?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Raw booking form input, as typed by the customer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingForm {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub guests: String,
    pub date_time: String,
    pub note: String,
}

impl BookingForm {
    /// Validate every field against `now` (the customer's local time).
    ///
    /// # Errors
    ///
    /// Returns all field errors at once, in form order.
    pub fn validate(&self, now: NaiveDateTime) -> Result<BookingDetails, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let name = self.name.trim();
        if !NAME_REGEX.is_match(name) {
            errors.push(FieldError::Name);
        }

        let phone = PhoneNumber::parse(self.phone.trim())
            .map_err(|e| errors.push(FieldError::Phone(e)))
            .ok();

        let email = Email::parse(self.email.trim())
            .map_err(|e| errors.push(FieldError::Email(e)))
            .ok();

        let guests = self
            .guests
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|g| (MIN_GUESTS..=MAX_GUESTS).contains(g));
        if guests.is_none() {
            errors.push(FieldError::Guests);
        }

        let date_time = if self.date_time.trim().is_empty() {
            errors.push(FieldError::MissingDateTime);
            None
        } else {
            match parse_datetime(&self.date_time) {
                None => {
                    errors.push(FieldError::InvalidDateTime);
                    None
                }
                Some(dt) if dt < now => {
                    errors.push(FieldError::PastDateTime);
                    None
                }
                Some(dt) => Some(dt),
            }
        };

        match (phone, email, guests, date_time) {
            (Some(phone), Some(email), Some(guests), Some(date_time)) if errors.is_empty() => {
                Ok(BookingDetails {
                    customer_info: CustomerInfo {
                        name: name.to_string(),
                        phone,
                        email,
                    },
                    booking: BookingInfo {
                        guests,
                        date_time,
                        note: self.note.trim().to_string(),
                    },
                })
            }
            _ => Err(errors),
        }
    }
}

// =============================================================================
// Submission
// =============================================================================

/// Errors from submitting a booking.
#[derive(Debug, Error)]
pub enum BookingError {
    /// One or more form fields are invalid.
    #[error("Invalid booking form: {0}")]
    Validation(#[from] ValidationErrors),

    /// Nothing to pre-order.
    #[error("Cart is empty")]
    EmptyCart,

    /// The backend call failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl BookingError {
    /// Short customer-facing message.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(_) => "Vui lòng kiểm tra lại thông tin".to_string(),
            Self::EmptyCart => "Vui lòng chọn ít nhất một món".to_string(),
            Self::Api(ApiError::Http(_)) => "Không thể kết nối server".to_string(),
            Self::Api(_) => "Có lỗi xảy ra, vui lòng thử lại".to_string(),
        }
    }
}

/// Anything that can store a booking.
pub trait BookingBackend {
    /// Post a booking request and return the stored booking.
    fn submit_booking(
        &self,
        request: &BookingRequest,
    ) -> impl Future<Output = Result<Booking, ApiError>> + Send;
}

impl BookingBackend for ApiClient {
    fn submit_booking(
        &self,
        request: &BookingRequest,
    ) -> impl Future<Output = Result<Booking, ApiError>> + Send {
        self.create_booking(request)
    }
}

/// Validate the form, post the cart as a booking, and clear the cart on success.
///
/// # Errors
///
/// Returns [`BookingError::Validation`] with every invalid field,
/// [`BookingError::EmptyCart`] if the cart holds nothing, or
/// [`BookingError::Api`] if the backend rejects or cannot be reached. The
/// cart is left untouched in every error case.
#[instrument(skip_all, fields(units = session.cart().len()))]
pub async fn submit<B, S>(
    backend: &B,
    form: &BookingForm,
    session: &mut CartSession<S>,
    now: NaiveDateTime,
) -> Result<Booking, BookingError>
where
    B: BookingBackend + Sync,
    S: KeyValueStore,
{
    let details = form.validate(now).inspect_err(|errors| {
        warn!(errors = %errors, "Booking form rejected");
    })?;
    let request = BookingRequest::new(details, &session.cart().grouped_view())?;

    let booking = backend.submit_booking(&request).await?;

    info!(
        booking = %booking.id,
        total = %booking.total_amount,
        dishes = booking.dish_count(),
        "Booking created"
    );
    add_breadcrumb(
        "booking",
        "Booking created",
        Some(&[("booking", booking.id.as_str())]),
    );
    session.clear();
    Ok(booking)
}
