use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use uuid::Uuid;

use ladle_api::domain::pagination::PageRequest;
use ladle_api::domain::repository::{
    FavoriteRepository, FollowRepository, RecipeFilter, RecipeRepository, ShoppingCartRepository,
    UserRepository,
};
use ladle_api::domain::types::{
    AuthorProfile, RecipeDraft, RecipeRecord, RecipeSummary, RecipeView, ShoppingListEntry, User,
};
use ladle_api::error::ApiError;

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub fn test_user(n: u128) -> User {
    User {
        id: Uuid::from_u128(n),
        email: format!("user{n}@example.com"),
        username: format!("user{n}"),
        first_name: "Ada".into(),
        last_name: "Baker".into(),
        created_at: Utc::now(),
    }
}

pub fn test_record(id: i32, author_id: Uuid) -> RecipeRecord {
    RecipeRecord {
        id,
        author_id,
        name: format!("recipe-{id}"),
        image: format!("recipes/image/{id}.png"),
        text: "Cook it.".into(),
        cooking_time: 15,
        pub_date: Utc::now(),
    }
}

// ── InMemoryRecipeCatalog ────────────────────────────────────────────────────

/// Fixed recipe set; enough surface for favorite/cart/subscription flows.
#[derive(Clone)]
pub struct InMemoryRecipeCatalog {
    pub records: Arc<Vec<RecipeRecord>>,
    pub authors: Arc<Vec<User>>,
}

impl InMemoryRecipeCatalog {
    pub fn new(records: Vec<RecipeRecord>, authors: Vec<User>) -> Self {
        Self {
            records: Arc::new(records),
            authors: Arc::new(authors),
        }
    }

    fn author(&self, id: Uuid) -> User {
        self.authors
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .unwrap_or_else(|| test_user(0))
    }
}

impl RecipeRepository for InMemoryRecipeCatalog {
    async fn list_views(
        &self,
        _filter: &RecipeFilter,
        _page: PageRequest,
        _viewer: Option<Uuid>,
    ) -> Result<Vec<RecipeView>, ApiError> {
        Ok(vec![])
    }

    async fn find_view(
        &self,
        id: i32,
        _viewer: Option<Uuid>,
    ) -> Result<Option<RecipeView>, ApiError> {
        Ok(self.records.iter().find(|r| r.id == id).map(|record| {
            RecipeView {
                id: record.id,
                author: AuthorProfile {
                    user: self.author(record.author_id),
                    is_subscribed: false,
                },
                tags: vec![],
                ingredients: vec![],
                name: record.name.clone(),
                image: record.image.clone(),
                text: record.text.clone(),
                cooking_time: record.cooking_time,
                pub_date: record.pub_date,
                is_favorited: false,
                is_in_shopping_cart: false,
            }
        }))
    }

    async fn find(&self, id: i32) -> Result<Option<RecipeRecord>, ApiError> {
        Ok(self.records.iter().find(|r| r.id == id).cloned())
    }

    async fn exists_by_name_and_author(
        &self,
        name: &str,
        author_id: Uuid,
    ) -> Result<bool, ApiError> {
        Ok(self
            .records
            .iter()
            .any(|r| r.name == name && r.author_id == author_id))
    }

    async fn create(&self, _author_id: Uuid, _draft: &RecipeDraft) -> Result<i32, ApiError> {
        unimplemented!("catalog is read-only in these flows")
    }

    async fn replace(&self, _id: i32, _draft: &RecipeDraft) -> Result<(), ApiError> {
        unimplemented!("catalog is read-only in these flows")
    }

    async fn delete(&self, _id: i32) -> Result<bool, ApiError> {
        Ok(false)
    }

    async fn summaries_by_author(
        &self,
        author_id: Uuid,
        limit: u64,
    ) -> Result<Vec<RecipeSummary>, ApiError> {
        let mut own: Vec<&RecipeRecord> = self
            .records
            .iter()
            .filter(|r| r.author_id == author_id)
            .collect();
        own.sort_by(|a, b| b.pub_date.cmp(&a.pub_date).then(b.id.cmp(&a.id)));
        Ok(own
            .into_iter()
            .take(limit as usize)
            .map(|r| RecipeSummary {
                id: r.id,
                name: r.name.clone(),
                image: r.image.clone(),
                cooking_time: r.cooking_time,
            })
            .collect())
    }

    async fn count_by_author(&self, author_id: Uuid) -> Result<u64, ApiError> {
        Ok(self
            .records
            .iter()
            .filter(|r| r.author_id == author_id)
            .count() as u64)
    }
}

// ── InMemoryFavoriteRepo ─────────────────────────────────────────────────────

#[derive(Clone)]
pub struct InMemoryFavoriteRepo {
    pub pairs: Arc<Mutex<HashSet<(Uuid, i32)>>>,
}

impl InMemoryFavoriteRepo {
    pub fn empty() -> Self {
        Self {
            pairs: Arc::new(Mutex::new(HashSet::new())),
        }
    }
}

impl FavoriteRepository for InMemoryFavoriteRepo {
    async fn exists(&self, user_id: Uuid, recipe_id: i32) -> Result<bool, ApiError> {
        Ok(self.pairs.lock().unwrap().contains(&(user_id, recipe_id)))
    }
    async fn add(&self, user_id: Uuid, recipe_id: i32) -> Result<(), ApiError> {
        self.pairs.lock().unwrap().insert((user_id, recipe_id));
        Ok(())
    }
    async fn remove(&self, user_id: Uuid, recipe_id: i32) -> Result<bool, ApiError> {
        Ok(self.pairs.lock().unwrap().remove(&(user_id, recipe_id)))
    }
}

// ── InMemoryShoppingCartRepo ─────────────────────────────────────────────────

/// Cart entries plus a per-recipe ingredient table so `aggregate` can sum
/// the way the SQL query does: grouped by (name, unit), ordered by name.
#[derive(Clone)]
pub struct InMemoryShoppingCartRepo {
    pub entries: Arc<Mutex<HashSet<(Uuid, i32)>>>,
    pub recipe_ingredients: Arc<HashMap<i32, Vec<(String, String, i32)>>>,
}

impl InMemoryShoppingCartRepo {
    pub fn new(recipe_ingredients: HashMap<i32, Vec<(String, String, i32)>>) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashSet::new())),
            recipe_ingredients: Arc::new(recipe_ingredients),
        }
    }
}

impl ShoppingCartRepository for InMemoryShoppingCartRepo {
    async fn exists(&self, user_id: Uuid, recipe_id: i32) -> Result<bool, ApiError> {
        Ok(self.entries.lock().unwrap().contains(&(user_id, recipe_id)))
    }
    async fn add(&self, user_id: Uuid, recipe_id: i32) -> Result<(), ApiError> {
        self.entries.lock().unwrap().insert((user_id, recipe_id));
        Ok(())
    }
    async fn remove(&self, user_id: Uuid, recipe_id: i32) -> Result<bool, ApiError> {
        Ok(self.entries.lock().unwrap().remove(&(user_id, recipe_id)))
    }
    async fn aggregate(&self, user_id: Uuid) -> Result<Vec<ShoppingListEntry>, ApiError> {
        let mut totals: HashMap<(String, String), i64> = HashMap::new();
        for (user, recipe_id) in self.entries.lock().unwrap().iter() {
            if *user != user_id {
                continue;
            }
            for (name, unit, amount) in
                self.recipe_ingredients.get(recipe_id).into_iter().flatten()
            {
                *totals.entry((name.clone(), unit.clone())).or_default() += *amount as i64;
            }
        }
        let mut entries: Vec<ShoppingListEntry> = totals
            .into_iter()
            .map(|((name, measurement_unit), total)| ShoppingListEntry {
                name,
                measurement_unit,
                total,
            })
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }
}

// ── InMemoryFollowRepo ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct InMemoryFollowRepo {
    /// Insertion-ordered so `authors` can return newest-first.
    pub links: Arc<Mutex<Vec<(Uuid, Uuid)>>>,
    pub users: Arc<Vec<User>>,
}

impl InMemoryFollowRepo {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            links: Arc::new(Mutex::new(Vec::new())),
            users: Arc::new(users),
        }
    }
}

impl FollowRepository for InMemoryFollowRepo {
    async fn exists(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, ApiError> {
        Ok(self
            .links
            .lock()
            .unwrap()
            .contains(&(user_id, author_id)))
    }
    async fn add(&self, user_id: Uuid, author_id: Uuid) -> Result<(), ApiError> {
        self.links.lock().unwrap().push((user_id, author_id));
        Ok(())
    }
    async fn remove(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, ApiError> {
        let mut links = self.links.lock().unwrap();
        let before = links.len();
        links.retain(|link| *link != (user_id, author_id));
        Ok(links.len() < before)
    }
    async fn authors(&self, user_id: Uuid, page: PageRequest) -> Result<Vec<User>, ApiError> {
        let page = page.clamped();
        let links = self.links.lock().unwrap();
        Ok(links
            .iter()
            .rev()
            .filter(|(user, _)| *user == user_id)
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .filter_map(|(_, author)| self.users.iter().find(|u| u.id == *author).cloned())
            .collect())
    }
}

// ── InMemoryUserRepo ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct InMemoryUserRepo {
    pub users: Arc<Vec<User>>,
}

impl InMemoryUserRepo {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users: Arc::new(users),
        }
    }
}

impl UserRepository for InMemoryUserRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError> {
        Ok(self.users.iter().find(|u| u.id == id).cloned())
    }
}
