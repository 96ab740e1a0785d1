use uuid::Uuid;

use crate::domain::pagination::PageRequest;
use crate::domain::repository::{FollowRepository, RecipeRepository, UserRepository};
use crate::domain::types::{Subscription, User};
use crate::error::ApiError;

/// Recipe previews embedded per followed account.
pub const RECIPE_PREVIEW_LIMIT: u64 = 3;

async fn build_subscription<R: RecipeRepository>(
    recipes: &R,
    author: User,
) -> Result<Subscription, ApiError> {
    let previews = recipes
        .summaries_by_author(author.id, RECIPE_PREVIEW_LIMIT)
        .await?;
    let recipe_count = recipes.count_by_author(author.id).await?;
    Ok(Subscription {
        author,
        recipes: previews,
        recipe_count,
    })
}

// ── ListSubscriptions ────────────────────────────────────────────────────────

pub struct ListSubscriptionsUseCase<F: FollowRepository, R: RecipeRepository> {
    pub follows: F,
    pub recipes: R,
}

impl<F: FollowRepository, R: RecipeRepository> ListSubscriptionsUseCase<F, R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<Subscription>, ApiError> {
        let authors = self.follows.authors(user_id, page).await?;
        let mut subscriptions = Vec::with_capacity(authors.len());
        for author in authors {
            subscriptions.push(build_subscription(&self.recipes, author).await?);
        }
        Ok(subscriptions)
    }
}

// ── Subscribe ────────────────────────────────────────────────────────────────

pub struct SubscribeUseCase<F: FollowRepository, U: UserRepository, R: RecipeRepository> {
    pub follows: F,
    pub users: U,
    pub recipes: R,
}

impl<F: FollowRepository, U: UserRepository, R: RecipeRepository> SubscribeUseCase<F, U, R> {
    pub async fn execute(&self, user_id: Uuid, author_id: Uuid) -> Result<Subscription, ApiError> {
        let author = self
            .users
            .find_by_id(author_id)
            .await?
            .ok_or(ApiError::UserNotFound)?;
        if user_id == author_id {
            return Err(ApiError::validation("you cannot subscribe to yourself"));
        }
        if self.follows.exists(user_id, author_id).await? {
            return Err(ApiError::validation("you are already subscribed to this author"));
        }
        self.follows.add(user_id, author_id).await?;
        build_subscription(&self.recipes, author).await
    }
}

// ── Unsubscribe ──────────────────────────────────────────────────────────────

pub struct UnsubscribeUseCase<F: FollowRepository, U: UserRepository> {
    pub follows: F,
    pub users: U,
}

impl<F: FollowRepository, U: UserRepository> UnsubscribeUseCase<F, U> {
    pub async fn execute(&self, user_id: Uuid, author_id: Uuid) -> Result<(), ApiError> {
        if self.users.find_by_id(author_id).await?.is_none() {
            return Err(ApiError::UserNotFound);
        }
        let removed = self.follows.remove(user_id, author_id).await?;
        if !removed {
            return Err(ApiError::SubscriptionNotFound);
        }
        Ok(())
    }
}
