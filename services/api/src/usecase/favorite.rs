use uuid::Uuid;

use crate::domain::repository::{FavoriteRepository, RecipeRepository};
use crate::domain::types::RecipeView;
use crate::error::ApiError;

// ── AddFavorite ──────────────────────────────────────────────────────────────

pub struct AddFavoriteUseCase<F: FavoriteRepository, R: RecipeRepository> {
    pub favorites: F,
    pub recipes: R,
}

impl<F: FavoriteRepository, R: RecipeRepository> AddFavoriteUseCase<F, R> {
    pub async fn execute(&self, user_id: Uuid, recipe_id: i32) -> Result<RecipeView, ApiError> {
        if self.recipes.find(recipe_id).await?.is_none() {
            return Err(ApiError::RecipeNotFound);
        }
        if self.favorites.exists(user_id, recipe_id).await? {
            return Err(ApiError::validation("recipe is already in favorites"));
        }
        self.favorites.add(user_id, recipe_id).await?;
        self.recipes
            .find_view(recipe_id, Some(user_id))
            .await?
            .ok_or(ApiError::RecipeNotFound)
    }
}

// ── RemoveFavorite ───────────────────────────────────────────────────────────

pub struct RemoveFavoriteUseCase<F: FavoriteRepository, R: RecipeRepository> {
    pub favorites: F,
    pub recipes: R,
}

impl<F: FavoriteRepository, R: RecipeRepository> RemoveFavoriteUseCase<F, R> {
    pub async fn execute(&self, user_id: Uuid, recipe_id: i32) -> Result<(), ApiError> {
        if self.recipes.find(recipe_id).await?.is_none() {
            return Err(ApiError::RecipeNotFound);
        }
        let removed = self.favorites.remove(user_id, recipe_id).await?;
        if !removed {
            return Err(ApiError::FavoriteNotFound);
        }
        Ok(())
    }
}
