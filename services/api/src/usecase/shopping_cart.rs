use uuid::Uuid;

use crate::domain::repository::{RecipeRepository, ShoppingCartRepository};
use crate::domain::types::{RecipeView, ShoppingListEntry};
use crate::error::ApiError;

// ── AddToShoppingCart ────────────────────────────────────────────────────────

pub struct AddToShoppingCartUseCase<C: ShoppingCartRepository, R: RecipeRepository> {
    pub carts: C,
    pub recipes: R,
}

impl<C: ShoppingCartRepository, R: RecipeRepository> AddToShoppingCartUseCase<C, R> {
    pub async fn execute(&self, user_id: Uuid, recipe_id: i32) -> Result<RecipeView, ApiError> {
        if self.recipes.find(recipe_id).await?.is_none() {
            return Err(ApiError::RecipeNotFound);
        }
        if self.carts.exists(user_id, recipe_id).await? {
            return Err(ApiError::validation("recipe is already in the shopping cart"));
        }
        self.carts.add(user_id, recipe_id).await?;
        self.recipes
            .find_view(recipe_id, Some(user_id))
            .await?
            .ok_or(ApiError::RecipeNotFound)
    }
}

// ── RemoveFromShoppingCart ───────────────────────────────────────────────────

pub struct RemoveFromShoppingCartUseCase<C: ShoppingCartRepository, R: RecipeRepository> {
    pub carts: C,
    pub recipes: R,
}

impl<C: ShoppingCartRepository, R: RecipeRepository> RemoveFromShoppingCartUseCase<C, R> {
    pub async fn execute(&self, user_id: Uuid, recipe_id: i32) -> Result<(), ApiError> {
        if self.recipes.find(recipe_id).await?.is_none() {
            return Err(ApiError::RecipeNotFound);
        }
        let removed = self.carts.remove(user_id, recipe_id).await?;
        if !removed {
            return Err(ApiError::ShoppingCartEntryNotFound);
        }
        Ok(())
    }
}

// ── DownloadShoppingList ─────────────────────────────────────────────────────

pub struct DownloadShoppingListUseCase<C: ShoppingCartRepository> {
    pub carts: C,
}

impl<C: ShoppingCartRepository> DownloadShoppingListUseCase<C> {
    pub async fn execute(&self, user_id: Uuid) -> Result<String, ApiError> {
        let entries = self.carts.aggregate(user_id).await?;
        Ok(render_shopping_list(&entries))
    }
}

/// Render aggregated cart groups as the numbered plain-text report:
/// `"{index}. {name}  - {total}{unit}."`, one line per group, 1-indexed.
/// An empty cart renders an empty document.
pub fn render_shopping_list(entries: &[ShoppingListEntry]) -> String {
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            format!(
                "{}. {}  - {}{}.",
                i + 1,
                entry.name,
                entry.total,
                entry.measurement_unit
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
