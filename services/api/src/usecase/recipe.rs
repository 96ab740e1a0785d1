use uuid::Uuid;

use crate::domain::pagination::PageRequest;
use crate::domain::repository::{
    IngredientRepository, RecipeFilter, RecipeRepository, TagRepository,
};
use crate::domain::types::{RecipeDraft, RecipeView, has_duplicate_ingredients};
use crate::error::ApiError;

/// Rules shared by create and replace: cooking time, amounts, duplicate
/// ingredient ids. Referential checks are done against the repositories
/// by the use cases below.
fn validate_draft(draft: &RecipeDraft) -> Result<(), ApiError> {
    if draft.cooking_time < 1 {
        return Err(ApiError::validation(
            "cooking time must be at least one minute",
        ));
    }
    if draft.ingredients.iter().any(|item| item.amount < 1) {
        return Err(ApiError::validation(
            "ingredient amount must be at least one",
        ));
    }
    if has_duplicate_ingredients(&draft.ingredients) {
        return Err(ApiError::validation("ingredients must be unique"));
    }
    Ok(())
}

async fn check_references<T: TagRepository, I: IngredientRepository>(
    tags: &T,
    ingredients: &I,
    draft: &RecipeDraft,
) -> Result<(), ApiError> {
    for tag_id in &draft.tags {
        if tags.find(*tag_id).await?.is_none() {
            return Err(ApiError::validation(format!("tag {tag_id} does not exist")));
        }
    }
    let ids: Vec<i32> = draft.ingredients.iter().map(|item| item.id).collect();
    let found = ingredients.find_many(&ids).await?;
    if found.len() != ids.len() {
        return Err(ApiError::validation("ingredient does not exist"));
    }
    Ok(())
}

// ── ListRecipes ──────────────────────────────────────────────────────────────

pub struct ListRecipesUseCase<R: RecipeRepository> {
    pub recipes: R,
}

impl<R: RecipeRepository> ListRecipesUseCase<R> {
    pub async fn execute(
        &self,
        filter: &RecipeFilter,
        page: PageRequest,
        viewer: Option<Uuid>,
    ) -> Result<Vec<RecipeView>, ApiError> {
        self.recipes.list_views(filter, page, viewer).await
    }
}

// ── ListFavoriteRecipes ──────────────────────────────────────────────────────

pub struct ListFavoriteRecipesUseCase<R: RecipeRepository> {
    pub recipes: R,
}

impl<R: RecipeRepository> ListFavoriteRecipesUseCase<R> {
    pub async fn execute(
        &self,
        viewer: Uuid,
        mut filter: RecipeFilter,
        page: PageRequest,
    ) -> Result<Vec<RecipeView>, ApiError> {
        filter.favorited_by = Some(viewer);
        self.recipes.list_views(&filter, page, Some(viewer)).await
    }
}

// ── GetRecipe ────────────────────────────────────────────────────────────────

pub struct GetRecipeUseCase<R: RecipeRepository> {
    pub recipes: R,
}

impl<R: RecipeRepository> GetRecipeUseCase<R> {
    pub async fn execute(&self, id: i32, viewer: Option<Uuid>) -> Result<RecipeView, ApiError> {
        self.recipes
            .find_view(id, viewer)
            .await?
            .ok_or(ApiError::RecipeNotFound)
    }
}

// ── CreateRecipe ─────────────────────────────────────────────────────────────

pub struct CreateRecipeUseCase<R: RecipeRepository, T: TagRepository, I: IngredientRepository> {
    pub recipes: R,
    pub tags: T,
    pub ingredients: I,
}

impl<R: RecipeRepository, T: TagRepository, I: IngredientRepository> CreateRecipeUseCase<R, T, I> {
    pub async fn execute(&self, author_id: Uuid, draft: RecipeDraft) -> Result<RecipeView, ApiError> {
        validate_draft(&draft)?;
        check_references(&self.tags, &self.ingredients, &draft).await?;
        // (name, author) uniqueness is a create-only rule.
        if self
            .recipes
            .exists_by_name_and_author(&draft.name, author_id)
            .await?
        {
            return Err(ApiError::validation("you already added this recipe"));
        }
        let id = self.recipes.create(author_id, &draft).await?;
        self.recipes
            .find_view(id, Some(author_id))
            .await?
            .ok_or(ApiError::RecipeNotFound)
    }
}

// ── UpdateRecipe ─────────────────────────────────────────────────────────────

pub struct UpdateRecipeUseCase<R: RecipeRepository, T: TagRepository, I: IngredientRepository> {
    pub recipes: R,
    pub tags: T,
    pub ingredients: I,
}

impl<R: RecipeRepository, T: TagRepository, I: IngredientRepository> UpdateRecipeUseCase<R, T, I> {
    pub async fn execute(
        &self,
        actor: Uuid,
        id: i32,
        draft: RecipeDraft,
    ) -> Result<RecipeView, ApiError> {
        let record = self.recipes.find(id).await?.ok_or(ApiError::RecipeNotFound)?;
        if record.author_id != actor {
            return Err(ApiError::Forbidden);
        }
        validate_draft(&draft)?;
        check_references(&self.tags, &self.ingredients, &draft).await?;
        self.recipes.replace(id, &draft).await?;
        self.recipes
            .find_view(id, Some(actor))
            .await?
            .ok_or(ApiError::RecipeNotFound)
    }
}

// ── DeleteRecipe ─────────────────────────────────────────────────────────────

pub struct DeleteRecipeUseCase<R: RecipeRepository> {
    pub recipes: R,
}

impl<R: RecipeRepository> DeleteRecipeUseCase<R> {
    pub async fn execute(&self, actor: Uuid, id: i32) -> Result<(), ApiError> {
        let record = self.recipes.find(id).await?.ok_or(ApiError::RecipeNotFound)?;
        if record.author_id != actor {
            return Err(ApiError::Forbidden);
        }
        let deleted = self.recipes.delete(id).await?;
        if !deleted {
            return Err(ApiError::RecipeNotFound);
        }
        Ok(())
    }
}
