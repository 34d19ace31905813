//! Menu browsing commands.
//!
//! # Usage
//!
//! ```bash
//! mtp menu
//! mtp menu --search "bò" --filter premium
//! mtp food 3
//! ```

use mtp_food_core::FoodId;
use mtp_food_storefront::Result;
use mtp_food_storefront::api::ApiClient;
use mtp_food_storefront::detail::FoodDetail;
use mtp_food_storefront::menu::{Menu, MenuFilter, MenuQuery};
use tracing::info;

/// Fetch the catalog as a [`Menu`].
///
/// # Errors
///
/// Returns an error if the backend cannot be reached or answers unexpectedly.
pub async fn load(client: &ApiClient) -> Result<Menu> {
    Ok(Menu::new(client.get_foods().await?))
}

/// List foods matching `search` and `filter`.
///
/// # Errors
///
/// Returns an error if the catalog cannot be fetched.
pub async fn list(client: &ApiClient, search: &str, filter: MenuFilter) -> Result<()> {
    let menu = load(client).await?;
    let query = MenuQuery {
        search: search.to_string(),
        filter,
    };
    let foods = menu.filter(&query);

    if foods.is_empty() {
        info!(%filter, search, "Không tìm thấy món phù hợp");
        return Ok(());
    }

    info!(count = foods.len(), %filter, "Menu");
    for food in foods {
        info!(
            id = %food.id,
            price = %food.price,
            "{}",
            food.name
        );
    }
    Ok(())
}

/// Show one food and its related suggestions.
///
/// # Errors
///
/// Returns an error if the food does not exist or the backend fails.
pub async fn show(client: &ApiClient, id: FoodId) -> Result<()> {
    let food = client.get_food(id).await?;
    let menu = load(client).await?;
    let detail = FoodDetail::new(food, &menu);

    info!(
        id = %detail.food.id,
        price = %detail.food.price,
        image = %detail.food.image_url(client.base_url()),
        "{}",
        detail.food.name
    );
    if !detail.food.description.is_empty() {
        info!("{}", detail.food.description);
    }
    for related in &detail.related {
        info!(id = %related.id, price = %related.price, "Món liên quan: {}", related.name);
    }
    Ok(())
}
