//! Shared test utilities: an in-memory [`RecipeApi`] and sample data.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let api = FakeApi::new()
//!     .with_recipe(sample_api_recipe("r1", 4))
//!     .with_results("pizza", 23);
//! let mut state = AppState::new(api.clone(), MemoryStore::new(), 10);
//! state.load_search_results("pizza").unwrap();
//! assert_eq!(api.calls().searches, 1);
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::api::{ApiError, RecipeApi};
use crate::types::{ApiRecipe, ApiSearchResult, Ingredient, Recipe};
use crate::upload::FormPayload;

/// Call counters, shared by every clone of a [`FakeApi`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Calls {
    pub fetches: usize,
    pub searches: usize,
    pub creates: usize,
}

#[derive(Default)]
struct Inner {
    recipes: HashMap<String, ApiRecipe>,
    results: HashMap<String, Vec<ApiSearchResult>>,
    calls: Calls,
}

/// In-memory API. Unknown ids and queries answer like the real service
/// does for bad input: a 400 with a message.
#[derive(Clone, Default)]
pub struct FakeApi {
    inner: Rc<RefCell<Inner>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_recipe(self, recipe: ApiRecipe) -> Self {
        let id = recipe.id.clone().unwrap_or_default();
        self.inner.borrow_mut().recipes.insert(id, recipe);
        self
    }

    /// Register `count` results for `query`, with ids `<query>-<n>`.
    pub fn with_results(self, query: &str, count: usize) -> Self {
        let results = (0..count)
            .map(|n| ApiSearchResult {
                id: format!("{query}-{n}"),
                title: format!("{query} recipe {n}"),
                publisher: "Test Kitchen".to_string(),
                image_url: format!("https://img.example.com/{query}-{n}.jpg"),
                key: None,
            })
            .collect();
        self.inner
            .borrow_mut()
            .results
            .insert(query.to_string(), results);
        self
    }

    pub fn calls(&self) -> Calls {
        self.inner.borrow().calls
    }
}

fn bad_request(message: String) -> ApiError {
    ApiError::Status {
        message,
        status: 400,
    }
}

impl RecipeApi for FakeApi {
    fn fetch_recipe(&self, id: &str) -> Result<ApiRecipe, ApiError> {
        let mut inner = self.inner.borrow_mut();
        inner.calls.fetches += 1;
        inner
            .recipes
            .get(id)
            .cloned()
            .ok_or_else(|| bad_request(format!("Invalid _id: {id}")))
    }

    fn search(&self, query: &str) -> Result<Vec<ApiSearchResult>, ApiError> {
        let mut inner = self.inner.borrow_mut();
        inner.calls.searches += 1;
        inner
            .results
            .get(query)
            .cloned()
            .ok_or_else(|| bad_request(format!("No results for {query}")))
    }

    fn create_recipe(&self, recipe: &ApiRecipe) -> Result<ApiRecipe, ApiError> {
        let mut inner = self.inner.borrow_mut();
        inner.calls.creates += 1;
        let id = format!("created-{}", inner.calls.creates);
        let created = ApiRecipe {
            id: Some(id.clone()),
            key: Some("owner-key".to_string()),
            ..recipe.clone()
        };
        inner.recipes.insert(id, created.clone());
        Ok(created)
    }
}

// =========================================================================
// Sample data
// =========================================================================

pub fn sample_ingredients() -> Vec<Ingredient> {
    vec![
        Ingredient {
            quantity: Some(1.5),
            unit: "cups".to_string(),
            description: "flour".to_string(),
        },
        Ingredient {
            quantity: Some(0.5),
            unit: "tsp".to_string(),
            description: "salt".to_string(),
        },
        Ingredient {
            quantity: None,
            unit: String::new(),
            description: "olive oil".to_string(),
        },
    ]
}

pub fn sample_api_recipe(id: &str, servings: u32) -> ApiRecipe {
    ApiRecipe {
        id: Some(id.to_string()),
        title: format!("Recipe {id}"),
        publisher: "Test Kitchen".to_string(),
        source_url: format!("https://example.com/{id}"),
        image_url: format!("https://img.example.com/{id}.jpg"),
        servings,
        cooking_time: 45,
        ingredients: sample_ingredients(),
        key: None,
    }
}

pub fn sample_recipe(id: &str, servings: u32) -> Recipe {
    Recipe::from(sample_api_recipe(id, servings))
}

/// A well-formed upload form with two ingredients.
pub fn sample_form() -> FormPayload {
    FormPayload::new()
        .with("title", "Avocado Rice")
        .with("publisher", "Home")
        .with("sourceUrl", "https://example.com/avocado-rice")
        .with("image", "https://img.example.com/avocado-rice.jpg")
        .with("servings", "2")
        .with("cookingTime", "20")
        .with("ingredient-1", "0.5,kg,Rice")
        .with("ingredient-2", "1,,Avocado")
}
