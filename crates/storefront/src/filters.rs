//! Display helpers shared by the storefront front ends.

use chrono::NaiveDateTime;
use mtp_food_core::Price;

use crate::cart::CartStore;

/// Format a date-time the way vi-VN locales show it: `19:00 01/06/2030`.
#[must_use]
pub fn datetime_vi(value: &NaiveDateTime) -> String {
    value.format("%H:%M %d/%m/%Y").to_string()
}

/// Cart badge text: the unit count, or `None` when the badge is hidden.
#[must_use]
pub fn cart_badge(cart: &CartStore) -> Option<String> {
    if cart.is_empty() {
        None
    } else {
        Some(cart.len().to_string())
    }
}

/// Running total line shown under the booking form.
#[must_use]
pub fn subtotal_note(total: Price) -> String {
    format!("Tổng tạm tính: {} (chưa bao gồm VAT)", total.display())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use mtp_food_core::FoodId;

    use super::*;
    use crate::cart::FoodSnapshot;

    #[test]
    fn test_datetime_vi() {
        let dt = crate::wire::parse_datetime("2030-06-01T19:05").unwrap();
        assert_eq!(datetime_vi(&dt), "19:05 01/06/2030");
    }

    #[test]
    fn test_cart_badge() {
        let mut cart = CartStore::new();
        assert_eq!(cart_badge(&cart), None);

        let snapshot = FoodSnapshot {
            food_id: FoodId::new(1),
            name: "Chè".to_string(),
            price: Price::from_dong(15_000),
            image: String::new(),
        };
        cart.add(snapshot.clone());
        cart.add(snapshot);
        assert_eq!(cart_badge(&cart).as_deref(), Some("2"));
    }

    #[test]
    fn test_subtotal_note() {
        assert_eq!(
            subtotal_note(Price::from_dong(1_250_000)),
            "Tổng tạm tính: 1.250.000đ (chưa bao gồm VAT)"
        );
    }
}
