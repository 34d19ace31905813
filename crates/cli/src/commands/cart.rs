//! Cart commands.
//!
//! The cart lives in the file store under `MTP_STORAGE_DIR` and is restored
//! on every invocation. Group lines show the ID of their first cart item,
//! which `inc`, `dec` and `remove` accept.

use mtp_food_core::{CartId, FoodId};
use mtp_food_storefront::api::ApiClient;
use mtp_food_storefront::cart::QuantityDelta;
use mtp_food_storefront::detail::{FoodDetail, QuantityPicker};
use mtp_food_storefront::filters::{cart_badge, subtotal_note};
use mtp_food_storefront::menu::resolve_image_url;
use mtp_food_storefront::session::CartSession;
use mtp_food_storefront::storage::FileStore;
use mtp_food_storefront::{Result, StorefrontError};
use tracing::info;
use url::Url;

use super::menu;

type Session = CartSession<FileStore>;

/// Print the grouped cart and its total.
pub fn show(session: &Session, base_url: &Url) {
    let cart = session.cart();
    let Some(badge) = cart_badge(cart) else {
        info!("Giỏ hàng trống");
        return;
    };

    info!(units = %badge, groups = cart.group_count(), "Giỏ hàng");
    for group in cart.grouped_view() {
        info!(
            cart_id = %group.first_cart_id,
            food_id = %group.food_id,
            quantity = group.quantity,
            price = %group.price,
            subtotal = %group.subtotal,
            image = %resolve_image_url(&group.image, base_url),
            "{}",
            group.name
        );
    }
    info!("{}", subtotal_note(cart.total_amount()));
}

/// Add `quantity` units of a food, clamped to what the detail page allows.
///
/// # Errors
///
/// Returns an error if the food is not on the menu or the backend fails.
pub async fn add(
    client: &ApiClient,
    session: &mut Session,
    food_id: FoodId,
    quantity: u32,
) -> Result<()> {
    let menu = menu::load(client).await?;
    let mut detail = FoodDetail::load(&menu, food_id)?;
    detail.quantity = QuantityPicker::new(quantity);

    let added = detail.add_to_cart(session);
    info!(
        food = %detail.food.name,
        units = added.len(),
        total = %session.cart().total_amount(),
        "Đã thêm vào giỏ"
    );
    Ok(())
}

/// Add one more unit like `cart_id`.
///
/// # Errors
///
/// Returns [`StorefrontError::NotFound`] if no cart item has that ID.
pub fn increment(session: &mut Session, cart_id: CartId) -> Result<()> {
    adjust(session, cart_id, QuantityDelta::Increment)
}

/// Remove one unit of `cart_id`'s food.
///
/// # Errors
///
/// Returns [`StorefrontError::NotFound`] if no cart item has that ID.
pub fn decrement(session: &mut Session, cart_id: CartId) -> Result<()> {
    adjust(session, cart_id, QuantityDelta::Decrement)
}

fn adjust(session: &mut Session, cart_id: CartId, delta: QuantityDelta) -> Result<()> {
    if !session.adjust_quantity(cart_id, delta) {
        return Err(cart_item_not_found(cart_id));
    }
    info!(
        units = session.cart().len(),
        total = %session.cart().total_amount(),
        "Đã cập nhật giỏ"
    );
    Ok(())
}

/// Remove a single cart item.
///
/// # Errors
///
/// Returns [`StorefrontError::NotFound`] if no cart item has that ID.
pub fn remove(session: &mut Session, cart_id: CartId) -> Result<()> {
    if !session.remove_one(cart_id) {
        return Err(cart_item_not_found(cart_id));
    }
    info!(units = session.cart().len(), "Đã xóa món khỏi giỏ");
    Ok(())
}

/// Remove every unit of a food.
///
/// # Errors
///
/// Returns [`StorefrontError::NotFound`] if the cart holds no such food.
pub fn remove_food(session: &mut Session, food_id: FoodId) -> Result<()> {
    let removed = session.remove_all_of_food(food_id);
    if removed == 0 {
        return Err(StorefrontError::NotFound(format!("food {food_id} in cart")));
    }
    info!(removed, units = session.cart().len(), "Đã xóa món khỏi giỏ");
    Ok(())
}

/// Empty the cart.
pub fn clear(session: &mut Session) {
    session.clear();
    info!("Đã xóa giỏ hàng");
}

fn cart_item_not_found(cart_id: CartId) -> StorefrontError {
    StorefrontError::NotFound(format!("cart item {cart_id}"))
}
