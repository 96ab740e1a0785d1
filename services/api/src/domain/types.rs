use std::collections::HashSet;

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Public account profile. Credentials never reach this service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
}

/// Recipe tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub id: i32,
    pub name: String,
    pub color: String,
    pub slug: String,
}

/// Ingredient reference data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ingredient {
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
}

/// Flat recipe row, before associations are loaded.
#[derive(Debug, Clone)]
pub struct RecipeRecord {
    pub id: i32,
    pub author_id: Uuid,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i32,
    pub pub_date: DateTime<Utc>,
}

/// Ingredient with the amount a specific recipe uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientAmount {
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

/// Author profile as embedded in read views, with the viewer-relative flag.
#[derive(Debug, Clone)]
pub struct AuthorProfile {
    pub user: User,
    pub is_subscribed: bool,
}

/// Fully composed recipe read view. All three viewer-relative booleans
/// (`is_subscribed`, `is_favorited`, `is_in_shopping_cart`) are false for
/// anonymous viewers.
#[derive(Debug, Clone)]
pub struct RecipeView {
    pub id: i32,
    pub author: AuthorProfile,
    pub tags: Vec<Tag>,
    pub ingredients: Vec<IngredientAmount>,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i32,
    pub pub_date: DateTime<Utc>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

/// Compact recipe shape used inside subscription entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeSummary {
    pub id: i32,
    pub name: String,
    pub image: String,
    pub cooking_time: i32,
}

/// One followed account with its recipe previews.
#[derive(Debug, Clone)]
pub struct Subscription {
    pub author: User,
    pub recipes: Vec<RecipeSummary>,
    pub recipe_count: u64,
}

/// One aggregated shopping-list group: total amount of an ingredient
/// summed across every recipe in the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingListEntry {
    pub name: String,
    pub measurement_unit: String,
    pub total: i64,
}

/// Submitted ingredient reference: ingredient id plus amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngredientAmountInput {
    pub id: i32,
    pub amount: i32,
}

/// Write shape for recipe create and full replace. The author always
/// comes from the caller identity, never from the draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDraft {
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i32,
    pub tags: Vec<i32>,
    pub ingredients: Vec<IngredientAmountInput>,
}

/// Write shape for tag create and replace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagDraft {
    pub name: String,
    pub color: String,
    pub slug: String,
}

/// True if any ingredient id appears more than once in the submission.
pub fn has_duplicate_ingredients(ingredients: &[IngredientAmountInput]) -> bool {
    let mut seen = HashSet::with_capacity(ingredients.len());
    ingredients.iter().any(|item| !seen.insert(item.id))
}
