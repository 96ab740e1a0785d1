use ladle_api::domain::pagination::PageRequest;
use ladle_api::error::ApiError;
use ladle_api::usecase::subscription::{
    ListSubscriptionsUseCase, SubscribeUseCase, UnsubscribeUseCase,
};

use crate::helpers::{
    InMemoryFollowRepo, InMemoryRecipeCatalog, InMemoryUserRepo, test_record, test_user,
};

fn setup() -> (InMemoryFollowRepo, InMemoryUserRepo, InMemoryRecipeCatalog) {
    let users = vec![test_user(1), test_user(2), test_user(3)];
    let author = test_user(2);
    // Author 2 has five recipes; previews must cap at three.
    let records = (1..=5).map(|id| test_record(id, author.id)).collect();
    (
        InMemoryFollowRepo::new(users.clone()),
        InMemoryUserRepo::new(users),
        InMemoryRecipeCatalog::new(records, vec![author]),
    )
}

#[tokio::test]
async fn should_subscribe_and_list_with_three_recipe_previews() {
    let (follows, users, recipes) = setup();
    let me = test_user(1);

    let subscription = SubscribeUseCase {
        follows: follows.clone(),
        users: users.clone(),
        recipes: recipes.clone(),
    }
    .execute(me.id, test_user(2).id)
    .await
    .unwrap();
    assert_eq!(subscription.author.id, test_user(2).id);
    assert_eq!(subscription.recipes.len(), 3);
    assert_eq!(subscription.recipe_count, 5);

    let listed = ListSubscriptionsUseCase { follows, recipes }
        .execute(me.id, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].author.id, test_user(2).id);
    assert_eq!(listed[0].recipes.len(), 3);
    assert_eq!(listed[0].recipe_count, 5);
}

#[tokio::test]
async fn should_list_newest_follow_first() {
    let (follows, users, recipes) = setup();
    let me = test_user(1);
    let subscribe = SubscribeUseCase {
        follows: follows.clone(),
        users,
        recipes: recipes.clone(),
    };
    subscribe.execute(me.id, test_user(2).id).await.unwrap();
    subscribe.execute(me.id, test_user(3).id).await.unwrap();

    let listed = ListSubscriptionsUseCase { follows, recipes }
        .execute(me.id, PageRequest::default())
        .await
        .unwrap();
    let ids: Vec<_> = listed.iter().map(|s| s.author.id).collect();
    assert_eq!(ids, vec![test_user(3).id, test_user(2).id]);
}

#[tokio::test]
async fn should_reject_self_subscription() {
    let (follows, users, recipes) = setup();
    let me = test_user(1);
    let result = SubscribeUseCase {
        follows,
        users,
        recipes,
    }
    .execute(me.id, me.id)
    .await;
    assert!(matches!(result, Err(ApiError::Validation(_))));
}

#[tokio::test]
async fn should_reject_duplicate_subscription() {
    let (follows, users, recipes) = setup();
    let me = test_user(1);
    let subscribe = SubscribeUseCase {
        follows: follows.clone(),
        users,
        recipes,
    };
    subscribe.execute(me.id, test_user(2).id).await.unwrap();

    let result = subscribe.execute(me.id, test_user(2).id).await;
    assert!(matches!(result, Err(ApiError::Validation(_))));
    assert_eq!(follows.links.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_unsubscribe_then_fail_on_second_attempt() {
    let (follows, users, recipes) = setup();
    let me = test_user(1);
    SubscribeUseCase {
        follows: follows.clone(),
        users: users.clone(),
        recipes,
    }
    .execute(me.id, test_user(2).id)
    .await
    .unwrap();

    let unsubscribe = UnsubscribeUseCase {
        follows: follows.clone(),
        users,
    };
    unsubscribe.execute(me.id, test_user(2).id).await.unwrap();
    assert!(follows.links.lock().unwrap().is_empty());

    let result = unsubscribe.execute(me.id, test_user(2).id).await;
    assert!(matches!(result, Err(ApiError::SubscriptionNotFound)));
}

#[tokio::test]
async fn should_return_user_not_found_for_unknown_author() {
    let (follows, users, recipes) = setup();
    let result = SubscribeUseCase {
        follows,
        users,
        recipes,
    }
    .execute(test_user(1).id, test_user(99).id)
    .await;
    assert!(matches!(result, Err(ApiError::UserNotFound)));
}
