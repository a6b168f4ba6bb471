//! Shared domain types and the API wire shapes they are mapped from.
//!
//! The remote API speaks snake_case JSON (`source_url`, `cooking_time`, ...);
//! the domain types are what the state store and views work with. Bookmarks
//! are persisted as serialized [`Recipe`] snapshots, so `Recipe` carries its
//! own serde derive while the derived `bookmarked` flag stays out of it.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// A single ingredient line. `quantity` is `None` for "to taste" entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub quantity: Option<f64>,
    #[serde(default)]
    pub unit: String,
    pub description: String,
}

/// The full detail entity for a single dish.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,
    pub title: String,
    pub publisher: String,
    pub source_url: String,
    pub image_url: String,
    pub servings: u32,
    /// Minutes.
    pub cooking_time: u32,
    pub ingredients: Vec<Ingredient>,
    /// Ownership key; present only on user-submitted recipes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Derived from bookmark membership, never persisted.
    #[serde(default, skip_serializing)]
    pub bookmarked: bool,
}

impl From<ApiRecipe> for Recipe {
    fn from(api: ApiRecipe) -> Self {
        Self {
            id: api.id.unwrap_or_default(),
            title: api.title,
            publisher: api.publisher,
            source_url: api.source_url,
            image_url: api.image_url,
            servings: api.servings,
            cooking_time: api.cooking_time,
            ingredients: api.ingredients,
            key: api.key,
            bookmarked: false,
        }
    }
}

/// Lightweight projection of a [`Recipe`] returned by search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: String,
    pub title: String,
    pub publisher: String,
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl From<ApiSearchResult> for SearchResult {
    fn from(api: ApiSearchResult) -> Self {
        Self {
            id: api.id,
            title: api.title,
            publisher: api.publisher,
            image_url: api.image_url,
            key: api.key,
        }
    }
}

/// The current search query, its results and the pagination position.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchSession {
    pub query: String,
    pub results: Vec<SearchResult>,
    /// 1-based.
    pub page: usize,
    pub results_per_page: usize,
}

impl SearchSession {
    pub fn new(results_per_page: usize) -> Self {
        Self {
            query: String::new(),
            results: Vec::new(),
            page: 1,
            results_per_page,
        }
    }

    /// Number of pages for the current result list.
    ///
    /// Always derived from `results.len()`; there is no cached count to go
    /// stale when the results change.
    pub fn page_count(&self) -> usize {
        self.results.len().div_ceil(self.results_per_page.max(1))
    }

    /// Index range of `page` within `results`. Page 0 reads as page 1;
    /// pages past the end, however large, give an empty range.
    pub fn page_range(&self, page: usize) -> Range<usize> {
        let len = self.results.len();
        let per_page = self.results_per_page;
        let start = (page.max(1) - 1)
            .checked_mul(per_page)
            .map_or(len, |start| start.min(len));
        let end = start.saturating_add(per_page).min(len);
        start..end
    }
}

/// List-item projection rendered by the results and bookmarks lists.
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    pub id: String,
    pub title: String,
    pub publisher: String,
    pub image_url: String,
    pub user_generated: bool,
}

impl From<&SearchResult> for Preview {
    fn from(result: &SearchResult) -> Self {
        Self {
            id: result.id.clone(),
            title: result.title.clone(),
            publisher: result.publisher.clone(),
            image_url: result.image_url.clone(),
            user_generated: result.key.is_some(),
        }
    }
}

impl From<&Recipe> for Preview {
    fn from(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id.clone(),
            title: recipe.title.clone(),
            publisher: recipe.publisher.clone(),
            image_url: recipe.image_url.clone(),
            user_generated: recipe.key.is_some(),
        }
    }
}

// ============================================================================
// Wire shapes
// ============================================================================

/// Response envelope: `{ "status": "success", "data": { ... } }`.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub status: Option<String>,
    pub data: T,
}

#[derive(Debug, Deserialize)]
pub struct RecipeData {
    pub recipe: ApiRecipe,
}

#[derive(Debug, Deserialize)]
pub struct SearchData {
    pub recipes: Vec<ApiSearchResult>,
}

/// Body of a non-success response.
#[derive(Debug, Deserialize)]
pub struct Failure {
    #[serde(default)]
    pub message: Option<String>,
}

/// Recipe as the API sends and accepts it. `id` and `key` are absent on
/// upload and filled in by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiRecipe {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    pub publisher: String,
    pub source_url: String,
    pub image_url: String,
    pub servings: u32,
    pub cooking_time: u32,
    pub ingredients: Vec<Ingredient>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiSearchResult {
    pub id: String,
    pub title: String,
    pub publisher: String,
    pub image_url: String,
    #[serde(default)]
    pub key: Option<String>,
}
