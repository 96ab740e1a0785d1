use crate::domain::repository::IngredientRepository;
use crate::domain::types::Ingredient;
use crate::error::ApiError;

// ── SearchIngredients ────────────────────────────────────────────────────────

pub struct SearchIngredientsUseCase<I: IngredientRepository> {
    pub ingredients: I,
}

impl<I: IngredientRepository> SearchIngredientsUseCase<I> {
    /// Name-prefix search; no prefix lists everything.
    pub async fn execute(&self, name_prefix: Option<&str>) -> Result<Vec<Ingredient>, ApiError> {
        self.ingredients.search(name_prefix.unwrap_or("")).await
    }
}

// ── GetIngredient ────────────────────────────────────────────────────────────

pub struct GetIngredientUseCase<I: IngredientRepository> {
    pub ingredients: I,
}

impl<I: IngredientRepository> GetIngredientUseCase<I> {
    pub async fn execute(&self, id: i32) -> Result<Ingredient, ApiError> {
        self.ingredients
            .find(id)
            .await?
            .ok_or(ApiError::IngredientNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockIngredientRepo {
        items: Vec<Ingredient>,
    }

    fn flour() -> Ingredient {
        Ingredient {
            id: 1,
            name: "flour".into(),
            measurement_unit: "g".into(),
        }
    }

    impl IngredientRepository for MockIngredientRepo {
        async fn search(&self, name_prefix: &str) -> Result<Vec<Ingredient>, ApiError> {
            Ok(self
                .items
                .iter()
                .filter(|i| i.name.starts_with(name_prefix))
                .cloned()
                .collect())
        }
        async fn find(&self, id: i32) -> Result<Option<Ingredient>, ApiError> {
            Ok(self.items.iter().find(|i| i.id == id).cloned())
        }
        async fn find_many(&self, ids: &[i32]) -> Result<Vec<Ingredient>, ApiError> {
            Ok(self
                .items
                .iter()
                .filter(|i| ids.contains(&i.id))
                .cloned()
                .collect())
        }
    }

    #[tokio::test]
    async fn should_filter_by_name_prefix() {
        let usecase = SearchIngredientsUseCase {
            ingredients: MockIngredientRepo {
                items: vec![
                    flour(),
                    Ingredient {
                        id: 2,
                        name: "sugar".into(),
                        measurement_unit: "g".into(),
                    },
                ],
            },
        };
        let found = usecase.execute(Some("fl")).await.unwrap();
        assert_eq!(found, vec![flour()]);
    }

    #[tokio::test]
    async fn should_list_all_without_prefix() {
        let usecase = SearchIngredientsUseCase {
            ingredients: MockIngredientRepo {
                items: vec![flour()],
            },
        };
        assert_eq!(usecase.execute(None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn should_return_ingredient_not_found() {
        let usecase = GetIngredientUseCase {
            ingredients: MockIngredientRepo { items: vec![] },
        };
        let result = usecase.execute(404).await;
        assert!(matches!(result, Err(ApiError::IngredientNotFound)));
    }
}
