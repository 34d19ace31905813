//! Booking commands.
//!
//! # Usage
//!
//! ```bash
//! mtp book -n "Nguyễn Văn An" -p 0901234567 -e an@example.com -g 4 -d 2030-06-01T19:00
//! mtp booking BK1A2B3C4D
//! mtp stats
//! ```

use mtp_food_core::BookingCode;
use mtp_food_storefront::Result;
use mtp_food_storefront::api::ApiClient;
use mtp_food_storefront::booking::{self, Booking, BookingForm};
use mtp_food_storefront::filters::datetime_vi;
use mtp_food_storefront::session::CartSession;
use mtp_food_storefront::storage::FileStore;
use tracing::info;

/// Submit a booking for the current cart. The cart is cleared on success.
///
/// # Errors
///
/// Returns an error if the form is invalid, the cart is empty, or the
/// backend rejects the booking.
pub async fn book(
    client: &ApiClient,
    form: &BookingForm,
    session: &mut CartSession<FileStore>,
) -> Result<()> {
    let now = chrono::Local::now().naive_local();
    let booking = booking::submit(client, form, session, now).await?;
    info!("Đặt bàn thành công!");
    print_booking(&booking);
    Ok(())
}

/// Look up a booking by code.
///
/// # Errors
///
/// Returns an error if the code is unknown or the backend fails.
pub async fn lookup(client: &ApiClient, code: &BookingCode) -> Result<()> {
    let booking = client.get_booking(code).await?;
    print_booking(&booking);
    for change in &booking.status_timeline {
        info!(
            time = %change.time.as_ref().map(datetime_vi).unwrap_or_default(),
            note = %change.note,
            "{}",
            if change.label.is_empty() {
                change.status.label()
            } else {
                change.label.as_str()
            }
        );
    }
    Ok(())
}

/// Show dashboard statistics.
///
/// # Errors
///
/// Returns an error if the backend fails.
pub async fn stats(client: &ApiClient) -> Result<()> {
    let stats = client.get_stats().await?;
    info!(
        foods = stats.total_foods,
        bookings = stats.total_bookings,
        pending = stats.pending_bookings,
        confirmed = stats.confirmed_bookings,
        revenue = %stats.total_revenue,
        "Thống kê"
    );
    for upcoming in &stats.upcoming {
        info!(
            guests = upcoming.guests,
            status = %upcoming.status.label(),
            "{} - {}",
            upcoming.guest_name,
            datetime_vi(&upcoming.date_time)
        );
    }
    Ok(())
}

fn print_booking(booking: &Booking) {
    info!(
        code = %booking.id,
        status = %booking.label(),
        guests = booking.booking.guests,
        date_time = %datetime_vi(&booking.booking.date_time),
        "{}",
        booking.customer_info.name
    );
    for item in &booking.orders {
        info!(
            quantity = item.quantity,
            subtotal = %item.subtotal(),
            "{}",
            item.name
        );
    }
    info!(total = %booking.total_amount, dishes = booking.dish_count(), "Tổng cộng");
}
