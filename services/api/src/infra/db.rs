use std::collections::HashMap;

use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, SqlErr, TransactionTrait,
    sea_query::{Expr, Query},
};
use uuid::Uuid;

use ladle_api_schema::{
    favorites, follows, ingredients, recipe_ingredients, recipe_tags, recipes, shopping_carts,
    tags, users,
};

use crate::domain::pagination::PageRequest;
use crate::domain::repository::{
    FavoriteRepository, FollowRepository, IngredientRepository, RecipeFilter, RecipeRepository,
    ShoppingCartRepository, TagRepository, UserRepository,
};
use crate::domain::types::{
    AuthorProfile, Ingredient, IngredientAmount, RecipeDraft, RecipeRecord, RecipeSummary,
    RecipeView, ShoppingListEntry, Tag, TagDraft, User,
};
use crate::error::ApiError;

/// Map an insert failure: a lost race on a uniqueness constraint is a
/// validation error like the pre-checked path, anything else is internal.
fn map_insert_err(e: DbErr, message: &str, op: &'static str) -> ApiError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => ApiError::validation(message),
        _ => ApiError::Internal(anyhow::Error::new(e).context(op)),
    }
}

fn user_from_model(model: users::Model) -> User {
    User {
        id: model.id,
        email: model.email,
        username: model.username,
        first_name: model.first_name,
        last_name: model.last_name,
        created_at: model.created_at,
    }
}

fn tag_from_model(model: tags::Model) -> Tag {
    Tag {
        id: model.id,
        name: model.name,
        color: model.color,
        slug: model.slug,
    }
}

fn ingredient_from_model(model: ingredients::Model) -> Ingredient {
    Ingredient {
        id: model.id,
        name: model.name,
        measurement_unit: model.measurement_unit,
    }
}

fn record_from_model(model: recipes::Model) -> RecipeRecord {
    RecipeRecord {
        id: model.id,
        author_id: model.author_id,
        name: model.name,
        image: model.image,
        text: model.text,
        cooking_time: model.cooking_time,
        pub_date: model.pub_date,
    }
}

// ── Recipe repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbRecipeRepository {
    pub db: DatabaseConnection,
}

impl DbRecipeRepository {
    /// Load author, tags, ingredient amounts and the viewer-relative flags
    /// for one recipe row.
    async fn compose_view(
        &self,
        model: recipes::Model,
        viewer: Option<Uuid>,
    ) -> Result<RecipeView, ApiError> {
        let author = users::Entity::find_by_id(model.author_id)
            .one(&self.db)
            .await
            .context("find recipe author")?
            .map(user_from_model)
            .ok_or_else(|| {
                ApiError::Internal(anyhow::anyhow!(
                    "author {} missing for recipe {}",
                    model.author_id,
                    model.id
                ))
            })?;

        let tag_links = recipe_tags::Entity::find()
            .filter(recipe_tags::Column::RecipeId.eq(model.id))
            .all(&self.db)
            .await
            .context("list recipe tag links")?;
        let tags = if tag_links.is_empty() {
            vec![]
        } else {
            let ids: Vec<i32> = tag_links.iter().map(|link| link.tag_id).collect();
            tags::Entity::find()
                .filter(tags::Column::Id.is_in(ids))
                .order_by_asc(tags::Column::Name)
                .all(&self.db)
                .await
                .context("list recipe tags")?
                .into_iter()
                .map(tag_from_model)
                .collect()
        };

        let ingredient_links = recipe_ingredients::Entity::find()
            .filter(recipe_ingredients::Column::RecipeId.eq(model.id))
            .all(&self.db)
            .await
            .context("list recipe ingredient links")?;
        let ingredients = if ingredient_links.is_empty() {
            vec![]
        } else {
            let amounts: HashMap<i32, i32> = ingredient_links
                .iter()
                .map(|link| (link.ingredient_id, link.amount))
                .collect();
            let ids: Vec<i32> = amounts.keys().copied().collect();
            ingredients::Entity::find()
                .filter(ingredients::Column::Id.is_in(ids))
                .order_by_asc(ingredients::Column::Name)
                .all(&self.db)
                .await
                .context("list recipe ingredients")?
                .into_iter()
                .map(|ingredient| IngredientAmount {
                    amount: amounts.get(&ingredient.id).copied().unwrap_or_default(),
                    id: ingredient.id,
                    name: ingredient.name,
                    measurement_unit: ingredient.measurement_unit,
                })
                .collect()
        };

        let (is_subscribed, is_favorited, is_in_shopping_cart) = match viewer {
            None => (false, false, false),
            Some(viewer) => {
                let subscribed = follows::Entity::find_by_id((viewer, model.author_id))
                    .one(&self.db)
                    .await
                    .context("check subscription flag")?
                    .is_some();
                let favorited = favorites::Entity::find_by_id((viewer, model.id))
                    .one(&self.db)
                    .await
                    .context("check favorite flag")?
                    .is_some();
                let in_cart = shopping_carts::Entity::find_by_id((viewer, model.id))
                    .one(&self.db)
                    .await
                    .context("check shopping cart flag")?
                    .is_some();
                (subscribed, favorited, in_cart)
            }
        };

        Ok(RecipeView {
            id: model.id,
            author: AuthorProfile {
                user: author,
                is_subscribed,
            },
            tags,
            ingredients,
            name: model.name,
            image: model.image,
            text: model.text,
            cooking_time: model.cooking_time,
            pub_date: model.pub_date,
            is_favorited,
            is_in_shopping_cart,
        })
    }
}

impl RecipeRepository for DbRecipeRepository {
    async fn list_views(
        &self,
        filter: &RecipeFilter,
        page: PageRequest,
        viewer: Option<Uuid>,
    ) -> Result<Vec<RecipeView>, ApiError> {
        let PageRequest { limit, page } = page.clamped();
        let mut query = recipes::Entity::find();

        if !filter.tags.is_empty() {
            let tag_ids: Vec<i32> = tags::Entity::find()
                .filter(tags::Column::Slug.is_in(filter.tags.iter().cloned()))
                .all(&self.db)
                .await
                .context("resolve tag slugs")?
                .into_iter()
                .map(|tag| tag.id)
                .collect();
            if tag_ids.is_empty() {
                return Ok(vec![]);
            }
            query = query.filter(
                recipes::Column::Id.in_subquery(
                    Query::select()
                        .column(recipe_tags::Column::RecipeId)
                        .from(recipe_tags::Entity)
                        .and_where(Expr::col(recipe_tags::Column::TagId).is_in(tag_ids))
                        .to_owned(),
                ),
            );
        }
        if let Some(author) = filter.author {
            query = query.filter(recipes::Column::AuthorId.eq(author));
        }
        if let Some(user) = filter.favorited_by {
            query = query.filter(
                recipes::Column::Id.in_subquery(
                    Query::select()
                        .column(favorites::Column::RecipeId)
                        .from(favorites::Entity)
                        .and_where(Expr::col(favorites::Column::UserId).eq(user))
                        .to_owned(),
                ),
            );
        }

        let models = query
            .order_by_desc(recipes::Column::PubDate)
            .offset(((page - 1) * limit) as u64)
            .limit(limit as u64)
            .all(&self.db)
            .await
            .context("list recipes")?;

        let mut views = Vec::with_capacity(models.len());
        for model in models {
            views.push(self.compose_view(model, viewer).await?);
        }
        Ok(views)
    }

    async fn find_view(
        &self,
        id: i32,
        viewer: Option<Uuid>,
    ) -> Result<Option<RecipeView>, ApiError> {
        let model = recipes::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find recipe")?;
        match model {
            Some(model) => Ok(Some(self.compose_view(model, viewer).await?)),
            None => Ok(None),
        }
    }

    async fn find(&self, id: i32) -> Result<Option<RecipeRecord>, ApiError> {
        let model = recipes::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find recipe record")?;
        Ok(model.map(record_from_model))
    }

    async fn exists_by_name_and_author(
        &self,
        name: &str,
        author_id: Uuid,
    ) -> Result<bool, ApiError> {
        let existing = recipes::Entity::find()
            .filter(recipes::Column::Name.eq(name))
            .filter(recipes::Column::AuthorId.eq(author_id))
            .one(&self.db)
            .await
            .context("check recipe name per author")?;
        Ok(existing.is_some())
    }

    async fn create(&self, author_id: Uuid, draft: &RecipeDraft) -> Result<i32, ApiError> {
        let draft = draft.clone();
        let id = self
            .db
            .transaction::<_, i32, DbErr>(|txn| {
                Box::pin(async move {
                    let recipe = recipes::ActiveModel {
                        author_id: Set(author_id),
                        name: Set(draft.name.clone()),
                        image: Set(draft.image.clone()),
                        text: Set(draft.text.clone()),
                        cooking_time: Set(draft.cooking_time),
                        pub_date: Set(Utc::now()),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await?;

                    insert_associations(txn, recipe.id, &draft).await?;
                    Ok(recipe.id)
                })
            })
            .await
            .context("create recipe")?;
        Ok(id)
    }

    async fn replace(&self, id: i32, draft: &RecipeDraft) -> Result<(), ApiError> {
        let draft = draft.clone();
        self.db
            .transaction::<_, (), DbErr>(|txn| {
                Box::pin(async move {
                    recipes::ActiveModel {
                        id: Set(id),
                        name: Set(draft.name.clone()),
                        image: Set(draft.image.clone()),
                        text: Set(draft.text.clone()),
                        cooking_time: Set(draft.cooking_time),
                        ..Default::default()
                    }
                    .update(txn)
                    .await?;

                    // Wholesale replace: drop both association sets, re-insert
                    // the submitted ones. Runs inside the same transaction so
                    // no reader observes a recipe without ingredients.
                    recipe_tags::Entity::delete_many()
                        .filter(recipe_tags::Column::RecipeId.eq(id))
                        .exec(txn)
                        .await?;
                    recipe_ingredients::Entity::delete_many()
                        .filter(recipe_ingredients::Column::RecipeId.eq(id))
                        .exec(txn)
                        .await?;

                    insert_associations(txn, id, &draft).await?;
                    Ok(())
                })
            })
            .await
            .context("replace recipe")?;
        Ok(())
    }

    async fn delete(&self, id: i32) -> Result<bool, ApiError> {
        let result = recipes::Entity::delete_many()
            .filter(recipes::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("delete recipe")?;
        Ok(result.rows_affected > 0)
    }

    async fn summaries_by_author(
        &self,
        author_id: Uuid,
        limit: u64,
    ) -> Result<Vec<RecipeSummary>, ApiError> {
        let models = recipes::Entity::find()
            .filter(recipes::Column::AuthorId.eq(author_id))
            .order_by_desc(recipes::Column::PubDate)
            .limit(limit)
            .all(&self.db)
            .await
            .context("list recipe summaries by author")?;
        Ok(models
            .into_iter()
            .map(|model| RecipeSummary {
                id: model.id,
                name: model.name,
                image: model.image,
                cooking_time: model.cooking_time,
            })
            .collect())
    }

    async fn count_by_author(&self, author_id: Uuid) -> Result<u64, ApiError> {
        let count = recipes::Entity::find()
            .filter(recipes::Column::AuthorId.eq(author_id))
            .count(&self.db)
            .await
            .context("count recipes by author")?;
        Ok(count)
    }
}

/// Insert the tag links and the ingredient rows for a recipe. The tag ids
/// were resolved upstream, so linking cannot miss.
async fn insert_associations(
    txn: &sea_orm::DatabaseTransaction,
    recipe_id: i32,
    draft: &RecipeDraft,
) -> Result<(), DbErr> {
    for tag_id in &draft.tags {
        recipe_tags::ActiveModel {
            recipe_id: Set(recipe_id),
            tag_id: Set(*tag_id),
        }
        .insert(txn)
        .await?;
    }
    if !draft.ingredients.is_empty() {
        let rows = draft.ingredients.iter().map(|item| {
            recipe_ingredients::ActiveModel {
                recipe_id: Set(recipe_id),
                ingredient_id: Set(item.id),
                amount: Set(item.amount),
            }
        });
        recipe_ingredients::Entity::insert_many(rows)
            .exec_without_returning(txn)
            .await?;
    }
    Ok(())
}

// ── Tag repository ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbTagRepository {
    pub db: DatabaseConnection,
}

impl TagRepository for DbTagRepository {
    async fn list(&self) -> Result<Vec<Tag>, ApiError> {
        let models = tags::Entity::find()
            .order_by_asc(tags::Column::Name)
            .all(&self.db)
            .await
            .context("list tags")?;
        Ok(models.into_iter().map(tag_from_model).collect())
    }

    async fn find(&self, id: i32) -> Result<Option<Tag>, ApiError> {
        let model = tags::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find tag")?;
        Ok(model.map(tag_from_model))
    }

    async fn has_conflict(
        &self,
        draft: &TagDraft,
        exclude: Option<i32>,
    ) -> Result<bool, ApiError> {
        let mut query = tags::Entity::find().filter(
            Condition::any()
                .add(tags::Column::Name.eq(&draft.name))
                .add(tags::Column::Color.eq(&draft.color))
                .add(tags::Column::Slug.eq(&draft.slug)),
        );
        if let Some(id) = exclude {
            query = query.filter(tags::Column::Id.ne(id));
        }
        let existing = query.one(&self.db).await.context("check tag conflict")?;
        Ok(existing.is_some())
    }

    async fn create(&self, draft: &TagDraft) -> Result<Tag, ApiError> {
        let model = tags::ActiveModel {
            name: Set(draft.name.clone()),
            color: Set(draft.color.clone()),
            slug: Set(draft.slug.clone()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| {
            map_insert_err(e, "tag name, color and slug must be unique", "create tag")
        })?;
        Ok(tag_from_model(model))
    }

    async fn update(&self, id: i32, draft: &TagDraft) -> Result<(), ApiError> {
        tags::ActiveModel {
            id: Set(id),
            name: Set(draft.name.clone()),
            color: Set(draft.color.clone()),
            slug: Set(draft.slug.clone()),
        }
        .update(&self.db)
        .await
        .context("update tag")?;
        Ok(())
    }

    async fn delete(&self, id: i32) -> Result<bool, ApiError> {
        let result = tags::Entity::delete_many()
            .filter(tags::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("delete tag")?;
        Ok(result.rows_affected > 0)
    }
}

// ── Ingredient repository ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbIngredientRepository {
    pub db: DatabaseConnection,
}

impl IngredientRepository for DbIngredientRepository {
    async fn search(&self, name_prefix: &str) -> Result<Vec<Ingredient>, ApiError> {
        let mut query = ingredients::Entity::find();
        if !name_prefix.is_empty() {
            query = query.filter(ingredients::Column::Name.starts_with(name_prefix));
        }
        let models = query
            .order_by_asc(ingredients::Column::Name)
            .all(&self.db)
            .await
            .context("search ingredients")?;
        Ok(models.into_iter().map(ingredient_from_model).collect())
    }

    async fn find(&self, id: i32) -> Result<Option<Ingredient>, ApiError> {
        let model = ingredients::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find ingredient")?;
        Ok(model.map(ingredient_from_model))
    }

    async fn find_many(&self, ids: &[i32]) -> Result<Vec<Ingredient>, ApiError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let models = ingredients::Entity::find()
            .filter(ingredients::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .context("find ingredients by ids")?;
        Ok(models.into_iter().map(ingredient_from_model).collect())
    }
}

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model))
    }
}

// ── Favorite repository ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbFavoriteRepository {
    pub db: DatabaseConnection,
}

impl FavoriteRepository for DbFavoriteRepository {
    async fn exists(&self, user_id: Uuid, recipe_id: i32) -> Result<bool, ApiError> {
        let model = favorites::Entity::find_by_id((user_id, recipe_id))
            .one(&self.db)
            .await
            .context("find favorite")?;
        Ok(model.is_some())
    }

    async fn add(&self, user_id: Uuid, recipe_id: i32) -> Result<(), ApiError> {
        favorites::ActiveModel {
            user_id: Set(user_id),
            recipe_id: Set(recipe_id),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await
        .map_err(|e| map_insert_err(e, "recipe is already in favorites", "insert favorite"))?;
        Ok(())
    }

    async fn remove(&self, user_id: Uuid, recipe_id: i32) -> Result<bool, ApiError> {
        let result = favorites::Entity::delete_many()
            .filter(favorites::Column::UserId.eq(user_id))
            .filter(favorites::Column::RecipeId.eq(recipe_id))
            .exec(&self.db)
            .await
            .context("delete favorite")?;
        Ok(result.rows_affected > 0)
    }
}

// ── Shopping cart repository ─────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbShoppingCartRepository {
    pub db: DatabaseConnection,
}

impl ShoppingCartRepository for DbShoppingCartRepository {
    async fn exists(&self, user_id: Uuid, recipe_id: i32) -> Result<bool, ApiError> {
        let model = shopping_carts::Entity::find_by_id((user_id, recipe_id))
            .one(&self.db)
            .await
            .context("find shopping cart entry")?;
        Ok(model.is_some())
    }

    async fn add(&self, user_id: Uuid, recipe_id: i32) -> Result<(), ApiError> {
        shopping_carts::ActiveModel {
            user_id: Set(user_id),
            recipe_id: Set(recipe_id),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await
        .map_err(|e| {
            map_insert_err(
                e,
                "recipe is already in the shopping cart",
                "insert shopping cart entry",
            )
        })?;
        Ok(())
    }

    async fn remove(&self, user_id: Uuid, recipe_id: i32) -> Result<bool, ApiError> {
        let result = shopping_carts::Entity::delete_many()
            .filter(shopping_carts::Column::UserId.eq(user_id))
            .filter(shopping_carts::Column::RecipeId.eq(recipe_id))
            .exec(&self.db)
            .await
            .context("delete shopping cart entry")?;
        Ok(result.rows_affected > 0)
    }

    async fn aggregate(&self, user_id: Uuid) -> Result<Vec<ShoppingListEntry>, ApiError> {
        use sea_orm::{ConnectionTrait, FromQueryResult, Statement};

        #[derive(Debug, FromQueryResult)]
        struct ShoppingListRow {
            name: String,
            measurement_unit: String,
            total: i64,
        }

        let sql = r#"
            SELECT i.name AS name,
                   i.measurement_unit AS measurement_unit,
                   CAST(SUM(ri.amount) AS BIGINT) AS total
            FROM shopping_carts sc
            JOIN recipe_ingredients ri ON ri.recipe_id = sc.recipe_id
            JOIN ingredients i ON i.id = ri.ingredient_id
            WHERE sc.user_id = $1
            GROUP BY i.name, i.measurement_unit
            ORDER BY i.name ASC
        "#;

        let rows = ShoppingListRow::find_by_statement(Statement::from_sql_and_values(
            self.db.get_database_backend(),
            sql,
            [user_id.into()],
        ))
        .all(&self.db)
        .await
        .context("aggregate shopping cart")?;

        Ok(rows
            .into_iter()
            .map(|row| ShoppingListEntry {
                name: row.name,
                measurement_unit: row.measurement_unit,
                total: row.total,
            })
            .collect())
    }
}

// ── Follow repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbFollowRepository {
    pub db: DatabaseConnection,
}

impl FollowRepository for DbFollowRepository {
    async fn exists(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, ApiError> {
        let model = follows::Entity::find_by_id((user_id, author_id))
            .one(&self.db)
            .await
            .context("find follow")?;
        Ok(model.is_some())
    }

    async fn add(&self, user_id: Uuid, author_id: Uuid) -> Result<(), ApiError> {
        follows::ActiveModel {
            user_id: Set(user_id),
            author_id: Set(author_id),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await
        .map_err(|e| {
            map_insert_err(
                e,
                "you are already subscribed to this author",
                "insert follow",
            )
        })?;
        Ok(())
    }

    async fn remove(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, ApiError> {
        let result = follows::Entity::delete_many()
            .filter(follows::Column::UserId.eq(user_id))
            .filter(follows::Column::AuthorId.eq(author_id))
            .exec(&self.db)
            .await
            .context("delete follow")?;
        Ok(result.rows_affected > 0)
    }

    async fn authors(&self, user_id: Uuid, page: PageRequest) -> Result<Vec<User>, ApiError> {
        let PageRequest { limit, page } = page.clamped();
        let links = follows::Entity::find()
            .filter(follows::Column::UserId.eq(user_id))
            .order_by_desc(follows::Column::CreatedAt)
            .offset(((page - 1) * limit) as u64)
            .limit(limit as u64)
            .all(&self.db)
            .await
            .context("list follows")?;
        if links.is_empty() {
            return Ok(vec![]);
        }

        let author_ids: Vec<Uuid> = links.iter().map(|link| link.author_id).collect();
        let mut by_id: HashMap<Uuid, users::Model> = users::Entity::find()
            .filter(users::Column::Id.is_in(author_ids.iter().copied()))
            .all(&self.db)
            .await
            .context("list followed authors")?
            .into_iter()
            .map(|model| (model.id, model))
            .collect();

        // Preserve follow order (newest first).
        Ok(author_ids
            .iter()
            .filter_map(|id| by_id.remove(id))
            .map(user_from_model)
            .collect())
    }
}
