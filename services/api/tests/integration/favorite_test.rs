use ladle_api::error::ApiError;
use ladle_api::usecase::favorite::{AddFavoriteUseCase, RemoveFavoriteUseCase};

use crate::helpers::{InMemoryFavoriteRepo, InMemoryRecipeCatalog, test_record, test_user};

fn catalog() -> InMemoryRecipeCatalog {
    let author = test_user(1);
    InMemoryRecipeCatalog::new(vec![test_record(1, author.id)], vec![author])
}

#[tokio::test]
async fn should_add_then_reject_duplicate_favorite_leaving_state_unchanged() {
    let favorites = InMemoryFavoriteRepo::empty();
    let usecase = AddFavoriteUseCase {
        favorites: favorites.clone(),
        recipes: catalog(),
    };
    let viewer = test_user(2);

    let view = usecase.execute(viewer.id, 1).await.unwrap();
    assert_eq!(view.id, 1);
    assert_eq!(favorites.pairs.lock().unwrap().len(), 1);

    let result = usecase.execute(viewer.id, 1).await;
    assert!(matches!(result, Err(ApiError::Validation(_))));
    // The duplicate attempt must not have touched the store.
    assert_eq!(favorites.pairs.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_keep_pairs_independent_per_user() {
    let favorites = InMemoryFavoriteRepo::empty();
    let usecase = AddFavoriteUseCase {
        favorites: favorites.clone(),
        recipes: catalog(),
    };

    usecase.execute(test_user(2).id, 1).await.unwrap();
    usecase.execute(test_user(3).id, 1).await.unwrap();
    assert_eq!(favorites.pairs.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn should_remove_favorite_then_fail_on_second_remove() {
    let favorites = InMemoryFavoriteRepo::empty();
    let viewer = test_user(2);

    AddFavoriteUseCase {
        favorites: favorites.clone(),
        recipes: catalog(),
    }
    .execute(viewer.id, 1)
    .await
    .unwrap();

    let remove = RemoveFavoriteUseCase {
        favorites: favorites.clone(),
        recipes: catalog(),
    };
    remove.execute(viewer.id, 1).await.unwrap();
    assert!(favorites.pairs.lock().unwrap().is_empty());

    let result = remove.execute(viewer.id, 1).await;
    assert!(matches!(result, Err(ApiError::FavoriteNotFound)));
}

#[tokio::test]
async fn should_reject_favorite_of_unknown_recipe() {
    let usecase = AddFavoriteUseCase {
        favorites: InMemoryFavoriteRepo::empty(),
        recipes: catalog(),
    };
    let result = usecase.execute(test_user(2).id, 404).await;
    assert!(matches!(result, Err(ApiError::RecipeNotFound)));
}
