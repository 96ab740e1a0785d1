#![allow(async_fn_in_trait)]

use uuid::Uuid;

use crate::domain::pagination::PageRequest;
use crate::domain::types::{
    Ingredient, RecipeDraft, RecipeRecord, RecipeSummary, RecipeView, ShoppingListEntry, Tag,
    TagDraft, User,
};
use crate::error::ApiError;

/// Filters for the recipe list endpoints.
#[derive(Debug, Clone, Default)]
pub struct RecipeFilter {
    /// Tag slugs; a recipe matches when it carries any of them.
    pub tags: Vec<String>,
    pub author: Option<Uuid>,
    /// Restrict to recipes this user has favorited.
    pub favorited_by: Option<Uuid>,
}

/// Repository for recipes and their tag/ingredient associations.
///
/// Read views are composed here so use cases stay storage-agnostic;
/// `viewer` drives the `is_favorited` / `is_in_shopping_cart` /
/// `is_subscribed` flags and `None` renders all of them false.
pub trait RecipeRepository: Send + Sync {
    async fn list_views(
        &self,
        filter: &RecipeFilter,
        page: PageRequest,
        viewer: Option<Uuid>,
    ) -> Result<Vec<RecipeView>, ApiError>;

    async fn find_view(&self, id: i32, viewer: Option<Uuid>)
    -> Result<Option<RecipeView>, ApiError>;

    async fn find(&self, id: i32) -> Result<Option<RecipeRecord>, ApiError>;

    async fn exists_by_name_and_author(
        &self,
        name: &str,
        author_id: Uuid,
    ) -> Result<bool, ApiError>;

    /// Insert the recipe row and both association sets in one transaction.
    /// Returns the new recipe id.
    async fn create(&self, author_id: Uuid, draft: &RecipeDraft) -> Result<i32, ApiError>;

    /// Full replace: update the row, drop every tag/ingredient association
    /// and re-insert the submitted sets, all in one transaction.
    async fn replace(&self, id: i32, draft: &RecipeDraft) -> Result<(), ApiError>;

    /// Delete a recipe. Returns `true` if a row was deleted.
    async fn delete(&self, id: i32) -> Result<bool, ApiError>;

    /// The author's newest recipes, capped at `limit`.
    async fn summaries_by_author(
        &self,
        author_id: Uuid,
        limit: u64,
    ) -> Result<Vec<RecipeSummary>, ApiError>;

    async fn count_by_author(&self, author_id: Uuid) -> Result<u64, ApiError>;
}

/// Repository for tags.
pub trait TagRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Tag>, ApiError>;
    async fn find(&self, id: i32) -> Result<Option<Tag>, ApiError>;
    /// True if another tag already uses the draft's name, color or slug.
    async fn has_conflict(&self, draft: &TagDraft, exclude: Option<i32>)
    -> Result<bool, ApiError>;
    async fn create(&self, draft: &TagDraft) -> Result<Tag, ApiError>;
    async fn update(&self, id: i32, draft: &TagDraft) -> Result<(), ApiError>;
    /// Delete a tag. Returns `true` if a row was deleted.
    async fn delete(&self, id: i32) -> Result<bool, ApiError>;
}

/// Repository for ingredient reference data (read-only surface).
pub trait IngredientRepository: Send + Sync {
    /// Name-prefix search; an empty prefix lists everything.
    async fn search(&self, name_prefix: &str) -> Result<Vec<Ingredient>, ApiError>;
    async fn find(&self, id: i32) -> Result<Option<Ingredient>, ApiError>;
    /// Resolve a batch of ids; missing ids are simply absent from the result.
    async fn find_many(&self, ids: &[i32]) -> Result<Vec<Ingredient>, ApiError>;
}

/// Repository for account profiles.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError>;
}

/// Repository for favorite bookmarks.
pub trait FavoriteRepository: Send + Sync {
    async fn exists(&self, user_id: Uuid, recipe_id: i32) -> Result<bool, ApiError>;
    async fn add(&self, user_id: Uuid, recipe_id: i32) -> Result<(), ApiError>;
    /// Remove a favorite. Returns `true` if a row was deleted.
    async fn remove(&self, user_id: Uuid, recipe_id: i32) -> Result<bool, ApiError>;
}

/// Repository for shopping-cart entries and the aggregation query.
pub trait ShoppingCartRepository: Send + Sync {
    async fn exists(&self, user_id: Uuid, recipe_id: i32) -> Result<bool, ApiError>;
    async fn add(&self, user_id: Uuid, recipe_id: i32) -> Result<(), ApiError>;
    /// Remove a cart entry. Returns `true` if a row was deleted.
    async fn remove(&self, user_id: Uuid, recipe_id: i32) -> Result<bool, ApiError>;
    /// Sum amounts across the cart, grouped by ingredient name and unit,
    /// ordered by name ascending.
    async fn aggregate(&self, user_id: Uuid) -> Result<Vec<ShoppingListEntry>, ApiError>;
}

/// Repository for follow records.
pub trait FollowRepository: Send + Sync {
    async fn exists(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, ApiError>;
    async fn add(&self, user_id: Uuid, author_id: Uuid) -> Result<(), ApiError>;
    /// Remove a follow. Returns `true` if a row was deleted.
    async fn remove(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, ApiError>;
    /// Accounts the user follows, newest follow first.
    async fn authors(&self, user_id: Uuid, page: PageRequest) -> Result<Vec<User>, ApiError>;
}
