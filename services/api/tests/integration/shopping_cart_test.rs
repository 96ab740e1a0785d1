use std::collections::HashMap;

use ladle_api::error::ApiError;
use ladle_api::usecase::shopping_cart::{
    AddToShoppingCartUseCase, DownloadShoppingListUseCase, RemoveFromShoppingCartUseCase,
};

use crate::helpers::{InMemoryRecipeCatalog, InMemoryShoppingCartRepo, test_record, test_user};

fn catalog() -> InMemoryRecipeCatalog {
    let author = test_user(1);
    InMemoryRecipeCatalog::new(
        vec![test_record(1, author.id), test_record(2, author.id)],
        vec![author],
    )
}

fn cart_with_flour_recipes() -> InMemoryShoppingCartRepo {
    // Recipe 1 uses 100 g of flour, recipe 2 uses 50 g of flour and 4 eggs.
    let mut table = HashMap::new();
    table.insert(1, vec![("Flour".to_string(), "g".to_string(), 100)]);
    table.insert(
        2,
        vec![
            ("Flour".to_string(), "g".to_string(), 50),
            ("Eggs".to_string(), "pcs".to_string(), 4),
        ],
    );
    InMemoryShoppingCartRepo::new(table)
}

#[tokio::test]
async fn should_sum_ingredient_amounts_across_cart_recipes() {
    let carts = cart_with_flour_recipes();
    let viewer = test_user(2);

    let add = AddToShoppingCartUseCase {
        carts: carts.clone(),
        recipes: catalog(),
    };
    add.execute(viewer.id, 1).await.unwrap();
    add.execute(viewer.id, 2).await.unwrap();

    let document = DownloadShoppingListUseCase { carts }
        .execute(viewer.id)
        .await
        .unwrap();
    assert_eq!(document, "1. Eggs  - 4pcs.\n2. Flour  - 150g.");
    assert!(document.contains("Flour  - 150g."));
}

#[tokio::test]
async fn should_produce_empty_document_for_empty_cart() {
    let document = DownloadShoppingListUseCase {
        carts: cart_with_flour_recipes(),
    }
    .execute(test_user(2).id)
    .await
    .unwrap();
    assert_eq!(document, "");
}

#[tokio::test]
async fn should_not_mix_carts_between_users() {
    let carts = cart_with_flour_recipes();
    let add = AddToShoppingCartUseCase {
        carts: carts.clone(),
        recipes: catalog(),
    };
    add.execute(test_user(2).id, 1).await.unwrap();

    let document = DownloadShoppingListUseCase { carts }
        .execute(test_user(3).id)
        .await
        .unwrap();
    assert_eq!(document, "");
}

#[tokio::test]
async fn should_reject_duplicate_cart_entry() {
    let carts = cart_with_flour_recipes();
    let viewer = test_user(2);
    let add = AddToShoppingCartUseCase {
        carts: carts.clone(),
        recipes: catalog(),
    };
    add.execute(viewer.id, 1).await.unwrap();

    let result = add.execute(viewer.id, 1).await;
    assert!(matches!(result, Err(ApiError::Validation(_))));
    assert_eq!(carts.entries.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_remove_entry_then_fail_on_second_remove() {
    let carts = cart_with_flour_recipes();
    let viewer = test_user(2);
    AddToShoppingCartUseCase {
        carts: carts.clone(),
        recipes: catalog(),
    }
    .execute(viewer.id, 1)
    .await
    .unwrap();

    let remove = RemoveFromShoppingCartUseCase {
        carts: carts.clone(),
        recipes: catalog(),
    };
    remove.execute(viewer.id, 1).await.unwrap();

    let result = remove.execute(viewer.id, 1).await;
    assert!(matches!(result, Err(ApiError::ShoppingCartEntryNotFound)));
}
