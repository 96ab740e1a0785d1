use axum::{
    Router,
    routing::{delete, get, post, put},
};
use tower_http::trace::TraceLayer;

use crate::handlers::health::{healthz, readyz};
use crate::handlers::ingredient::{get_ingredient, list_ingredients};
use crate::handlers::recipe::{
    add_favorite, add_to_shopping_cart, create_recipe, delete_recipe, download_shopping_cart,
    get_recipe, list_favorite_recipes, list_recipes, remove_favorite, remove_from_shopping_cart,
    update_recipe,
};
use crate::handlers::tag::{create_tag, delete_tag, get_tag, list_tags, update_tag};
use crate::handlers::user::{list_subscriptions, subscribe, unsubscribe};
use crate::state::AppState;
use crate::telemetry::request_id_layer;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Recipes
        .route("/recipes", get(list_recipes))
        .route("/recipes", post(create_recipe))
        .route("/recipes/favorite", get(list_favorite_recipes))
        .route("/recipes/download_shopping_cart", get(download_shopping_cart))
        .route("/recipes/{id}", get(get_recipe))
        .route("/recipes/{id}", put(update_recipe))
        .route("/recipes/{id}", delete(delete_recipe))
        .route("/recipes/{id}/favorite", post(add_favorite))
        .route("/recipes/{id}/favorite", delete(remove_favorite))
        .route("/recipes/{id}/shopping_cart", post(add_to_shopping_cart))
        .route(
            "/recipes/{id}/shopping_cart",
            delete(remove_from_shopping_cart),
        )
        // Subscriptions
        .route("/users/subscriptions", get(list_subscriptions))
        .route("/users/{id}/subscribe", post(subscribe))
        .route("/users/{id}/subscribe", delete(unsubscribe))
        // Ingredients
        .route("/ingredients", get(list_ingredients))
        .route("/ingredients/{id}", get(get_ingredient))
        // Tags
        .route("/tags", get(list_tags))
        .route("/tags", post(create_tag))
        .route("/tags/{id}", get(get_tag))
        .route("/tags/{id}", put(update_tag))
        .route("/tags/{id}", delete(delete_tag))
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
