use axum::{
    Json,
    extract::{Path, RawQuery, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ladle_auth_types::identity::{IdentityHeaders, OptionalIdentity};

use crate::domain::pagination::PageRequest;
use crate::domain::repository::RecipeFilter;
use crate::domain::types::{
    AuthorProfile, IngredientAmount, IngredientAmountInput, RecipeDraft, RecipeView,
};
use crate::error::ApiError;
use crate::handlers::tag::TagResponse;
use crate::state::AppState;
use crate::usecase::favorite::{AddFavoriteUseCase, RemoveFavoriteUseCase};
use crate::usecase::recipe::{
    CreateRecipeUseCase, DeleteRecipeUseCase, GetRecipeUseCase, ListFavoriteRecipesUseCase,
    ListRecipesUseCase, UpdateRecipeUseCase,
};
use crate::usecase::shopping_cart::{
    AddToShoppingCartUseCase, DownloadShoppingListUseCase, RemoveFromShoppingCartUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct AuthorResponse {
    pub id: String,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
}

impl From<AuthorProfile> for AuthorResponse {
    fn from(author: AuthorProfile) -> Self {
        Self {
            id: author.user.id.to_string(),
            email: author.user.email,
            username: author.user.username,
            first_name: author.user.first_name,
            last_name: author.user.last_name,
            is_subscribed: author.is_subscribed,
        }
    }
}

#[derive(Serialize)]
pub struct RecipeIngredientResponse {
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

impl From<IngredientAmount> for RecipeIngredientResponse {
    fn from(item: IngredientAmount) -> Self {
        Self {
            id: item.id,
            name: item.name,
            measurement_unit: item.measurement_unit,
            amount: item.amount,
        }
    }
}

#[derive(Serialize)]
pub struct RecipeResponse {
    pub id: i32,
    pub tags: Vec<TagResponse>,
    pub author: AuthorResponse,
    pub ingredients: Vec<RecipeIngredientResponse>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i32,
    #[serde(serialize_with = "crate::serde_ext::to_rfc3339_ms")]
    pub pub_date: chrono::DateTime<chrono::Utc>,
}

impl From<RecipeView> for RecipeResponse {
    fn from(view: RecipeView) -> Self {
        Self {
            id: view.id,
            tags: view.tags.into_iter().map(TagResponse::from).collect(),
            author: view.author.into(),
            ingredients: view
                .ingredients
                .into_iter()
                .map(RecipeIngredientResponse::from)
                .collect(),
            is_favorited: view.is_favorited,
            is_in_shopping_cart: view.is_in_shopping_cart,
            name: view.name,
            image: view.image,
            text: view.text,
            cooking_time: view.cooking_time,
            pub_date: view.pub_date,
        }
    }
}

// ── Request types ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RecipeIngredientRequest {
    pub id: i32,
    pub amount: i32,
}

#[derive(Deserialize)]
pub struct RecipeUpsertRequest {
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i32,
    pub tags: Vec<i32>,
    pub ingredients: Vec<RecipeIngredientRequest>,
}

impl From<RecipeUpsertRequest> for RecipeDraft {
    fn from(body: RecipeUpsertRequest) -> Self {
        Self {
            name: body.name,
            image: body.image,
            text: body.text,
            cooking_time: body.cooking_time,
            tags: body.tags,
            ingredients: body
                .ingredients
                .into_iter()
                .map(|item| IngredientAmountInput {
                    id: item.id,
                    amount: item.amount,
                })
                .collect(),
        }
    }
}

// ── Query params ─────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct RecipeListQuery {
    #[serde(default)]
    pub tags: Vec<String>,
    pub author: Option<Uuid>,
    pub limit: Option<u32>,
    pub page: Option<u32>,
}

fn parse_list_query(raw: Option<&str>) -> Result<(RecipeFilter, PageRequest), ApiError> {
    let query: RecipeListQuery = raw
        .map(serde_qs::from_str)
        .transpose()
        .map_err(|_| ApiError::validation("invalid query parameters"))?
        .unwrap_or_default();
    let filter = RecipeFilter {
        tags: query.tags,
        author: query.author,
        favorited_by: None,
    };
    let page = PageRequest {
        limit: query.limit.unwrap_or(6),
        page: query.page.unwrap_or(1),
    };
    Ok((filter, page))
}

// ── GET /recipes ─────────────────────────────────────────────────────────────

pub async fn list_recipes(
    OptionalIdentity(viewer): OptionalIdentity,
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<Vec<RecipeResponse>>, ApiError> {
    let (filter, page) = parse_list_query(raw_query.as_deref())?;
    let usecase = ListRecipesUseCase {
        recipes: state.recipe_repo(),
    };
    let views = usecase.execute(&filter, page, viewer).await?;
    Ok(Json(views.into_iter().map(RecipeResponse::from).collect()))
}

// ── GET /recipes/favorite ────────────────────────────────────────────────────

pub async fn list_favorite_recipes(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<Vec<RecipeResponse>>, ApiError> {
    let (filter, page) = parse_list_query(raw_query.as_deref())?;
    let usecase = ListFavoriteRecipesUseCase {
        recipes: state.recipe_repo(),
    };
    let views = usecase.execute(identity.user_id, filter, page).await?;
    Ok(Json(views.into_iter().map(RecipeResponse::from).collect()))
}

// ── GET /recipes/{id} ────────────────────────────────────────────────────────

pub async fn get_recipe(
    OptionalIdentity(viewer): OptionalIdentity,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<RecipeResponse>, ApiError> {
    let usecase = GetRecipeUseCase {
        recipes: state.recipe_repo(),
    };
    let view = usecase.execute(id, viewer).await?;
    Ok(Json(view.into()))
}

// ── POST /recipes ────────────────────────────────────────────────────────────

pub async fn create_recipe(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Json(body): Json<RecipeUpsertRequest>,
) -> Result<(StatusCode, Json<RecipeResponse>), ApiError> {
    let usecase = CreateRecipeUseCase {
        recipes: state.recipe_repo(),
        tags: state.tag_repo(),
        ingredients: state.ingredient_repo(),
    };
    let view = usecase.execute(identity.user_id, body.into()).await?;
    Ok((StatusCode::CREATED, Json(view.into())))
}

// ── PUT /recipes/{id} ────────────────────────────────────────────────────────

pub async fn update_recipe(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<RecipeUpsertRequest>,
) -> Result<Json<RecipeResponse>, ApiError> {
    let usecase = UpdateRecipeUseCase {
        recipes: state.recipe_repo(),
        tags: state.tag_repo(),
        ingredients: state.ingredient_repo(),
    };
    let view = usecase.execute(identity.user_id, id, body.into()).await?;
    Ok(Json(view.into()))
}

// ── DELETE /recipes/{id} ─────────────────────────────────────────────────────

pub async fn delete_recipe(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let usecase = DeleteRecipeUseCase {
        recipes: state.recipe_repo(),
    };
    usecase.execute(identity.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST /recipes/{id}/favorite ──────────────────────────────────────────────

pub async fn add_favorite(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<(StatusCode, Json<RecipeResponse>), ApiError> {
    let usecase = AddFavoriteUseCase {
        favorites: state.favorite_repo(),
        recipes: state.recipe_repo(),
    };
    let view = usecase.execute(identity.user_id, id).await?;
    Ok((StatusCode::CREATED, Json(view.into())))
}

// ── DELETE /recipes/{id}/favorite ────────────────────────────────────────────

pub async fn remove_favorite(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let usecase = RemoveFavoriteUseCase {
        favorites: state.favorite_repo(),
        recipes: state.recipe_repo(),
    };
    usecase.execute(identity.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST /recipes/{id}/shopping_cart ─────────────────────────────────────────

pub async fn add_to_shopping_cart(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<(StatusCode, Json<RecipeResponse>), ApiError> {
    let usecase = AddToShoppingCartUseCase {
        carts: state.shopping_cart_repo(),
        recipes: state.recipe_repo(),
    };
    let view = usecase.execute(identity.user_id, id).await?;
    Ok((StatusCode::CREATED, Json(view.into())))
}

// ── DELETE /recipes/{id}/shopping_cart ───────────────────────────────────────

pub async fn remove_from_shopping_cart(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let usecase = RemoveFromShoppingCartUseCase {
        carts: state.shopping_cart_repo(),
        recipes: state.recipe_repo(),
    };
    usecase.execute(identity.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── GET /recipes/download_shopping_cart ──────────────────────────────────────

pub async fn download_shopping_cart(
    identity: IdentityHeaders,
    State(state): State<AppState>,
) -> Result<Response, ApiError> {
    let usecase = DownloadShoppingListUseCase {
        carts: state.shopping_cart_repo(),
    };
    let document = usecase.execute(identity.user_id).await?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        document,
    )
        .into_response())
}
