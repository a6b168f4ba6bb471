//! Application state: current recipe, search session and bookmarks.
//!
//! [`AppState`] is owned by the controller and handed to nothing else; every
//! mutation goes through one of its methods. It owns the API client and the
//! key-value store, so loading and persisting happen in the same place the
//! in-memory copy changes.
//!
//! ## Invariants
//!
//! - Scaling servings rewrites every ingredient quantity in the same call,
//!   preserving `quantity / servings`.
//! - The current recipe's `bookmarked` flag is recomputed whenever the
//!   recipe is loaded and kept in step whenever the bookmark list changes.
//! - Bookmarks are unique by id and persisted after every change.
//! - Reading a results page never changes the current page; moving between
//!   pages is an explicit [`AppState::set_page`].

use crate::api::{ApiError, RecipeApi};
use crate::storage::KeyValueStore;
use crate::types::{Recipe, SearchResult, SearchSession};
use crate::upload::{self, FormPayload, UploadError};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum StateError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Upload(#[from] UploadError),
    #[error("Could not persist bookmarks: {0}")]
    Storage(#[from] std::io::Error),
    #[error("No recipe is loaded")]
    NoRecipe,
    #[error("Servings must be at least 1, got {0}")]
    InvalidServings(u32),
    #[error("Recipe {0} has no servings to scale from")]
    NoServings(String),
}

/// Default storage key for the bookmark array.
pub const BOOKMARKS_KEY: &str = "bookmarks";

pub struct AppState<A, S> {
    api: A,
    store: S,
    bookmarks_key: String,
    recipe: Option<Recipe>,
    search: SearchSession,
    bookmarks: Vec<Recipe>,
}

impl<A: RecipeApi, S: KeyValueStore> AppState<A, S> {
    /// Create the state and restore persisted bookmarks.
    pub fn new(api: A, store: S, results_per_page: usize) -> Self {
        Self::with_bookmarks_key(api, store, results_per_page, BOOKMARKS_KEY)
    }

    pub fn with_bookmarks_key(
        api: A,
        store: S,
        results_per_page: usize,
        bookmarks_key: &str,
    ) -> Self {
        let bookmarks = restore_bookmarks(&store, bookmarks_key);
        debug!("Restored {} bookmarks", bookmarks.len());
        Self {
            api,
            store,
            bookmarks_key: bookmarks_key.to_string(),
            recipe: None,
            search: SearchSession::new(results_per_page),
            bookmarks,
        }
    }

    pub fn recipe(&self) -> Option<&Recipe> {
        self.recipe.as_ref()
    }

    pub fn search(&self) -> &SearchSession {
        &self.search
    }

    pub fn bookmarks(&self) -> &[Recipe] {
        &self.bookmarks
    }

    pub fn is_bookmarked(&self, id: &str) -> bool {
        self.bookmarks.iter().any(|b| b.id == id)
    }

    /// Give back the store, e.g. to build a fresh state over it.
    pub fn into_store(self) -> S {
        self.store
    }

    // ------------------------------------------------------------------
    // Recipe
    // ------------------------------------------------------------------

    /// Fetch a recipe and make it current.
    ///
    /// On failure the previously loaded recipe is left untouched.
    pub fn load_recipe(&mut self, id: &str) -> Result<&Recipe, StateError> {
        let mut recipe = Recipe::from(self.api.fetch_recipe(id)?);
        if recipe.id.is_empty() {
            recipe.id = id.to_string();
        }
        if recipe.servings == 0 {
            return Err(StateError::NoServings(recipe.id));
        }
        recipe.bookmarked = self.is_bookmarked(&recipe.id);
        debug!(id = %recipe.id, bookmarked = recipe.bookmarked, "Loaded recipe");
        Ok(&*self.recipe.insert(recipe))
    }

    /// Scale the current recipe to `new_servings`.
    pub fn update_servings(&mut self, new_servings: u32) -> Result<&Recipe, StateError> {
        if new_servings == 0 {
            return Err(StateError::InvalidServings(new_servings));
        }
        let recipe = self.recipe.as_mut().ok_or(StateError::NoRecipe)?;
        if recipe.servings == 0 {
            return Err(StateError::NoServings(recipe.id.clone()));
        }
        let old = f64::from(recipe.servings);
        let new = f64::from(new_servings);
        for ingredient in &mut recipe.ingredients {
            if let Some(quantity) = ingredient.quantity.as_mut() {
                *quantity = *quantity * new / old;
            }
        }
        recipe.servings = new_servings;
        debug!(servings = new_servings, "Updated servings");
        Ok(&*recipe)
    }

    // ------------------------------------------------------------------
    // Search
    // ------------------------------------------------------------------

    /// Run a search, replacing the result list and resetting to page 1.
    ///
    /// A failed search leaves the previous session as it was.
    pub fn load_search_results(&mut self, query: &str) -> Result<&SearchSession, StateError> {
        let results = self.api.search(query)?;
        self.search.query = query.to_string();
        self.search.results = results.into_iter().map(SearchResult::from).collect();
        self.search.page = 1;
        info!(
            "Search {:?} returned {} results",
            query,
            self.search.results.len()
        );
        Ok(&self.search)
    }

    /// The slice of results on `page`, or on the current page when `None`.
    ///
    /// Pure: the current page is not changed. Pages are 1-based; page 0 is
    /// read as page 1. Pages past the end are empty.
    pub fn results_page(&self, page: Option<usize>) -> &[SearchResult] {
        let page = page.unwrap_or(self.search.page);
        &self.search.results[self.search.page_range(page)]
    }

    /// Record `page` as the current page.
    pub fn set_page(&mut self, page: usize) {
        self.search.page = page.max(1);
    }

    /// Move to `page` and return its results.
    pub fn go_to_page(&mut self, page: usize) -> &[SearchResult] {
        self.set_page(page);
        self.results_page(None)
    }

    pub fn page_count(&self) -> usize {
        self.search.page_count()
    }

    // ------------------------------------------------------------------
    // Bookmarks
    // ------------------------------------------------------------------

    /// Bookmark `recipe`. Already-bookmarked ids are left as they are.
    pub fn add_bookmark(&mut self, recipe: Recipe) -> Result<(), StateError> {
        if self.is_bookmarked(&recipe.id) {
            debug!(id = %recipe.id, "Already bookmarked");
        } else {
            debug!(id = %recipe.id, "Adding bookmark");
            self.bookmarks.push(Recipe {
                bookmarked: true,
                ..recipe
            });
        }
        self.sync_current_flag();
        self.persist_bookmarks()
    }

    /// Remove the bookmark with `id`, if any.
    pub fn delete_bookmark(&mut self, id: &str) -> Result<(), StateError> {
        match self.bookmarks.iter().position(|b| b.id == id) {
            Some(index) => {
                debug!(id, "Deleting bookmark");
                self.bookmarks.remove(index);
            }
            None => warn!(id, "Tried to delete a bookmark that does not exist"),
        }
        self.sync_current_flag();
        self.persist_bookmarks()
    }

    /// Bookmark the current recipe, or remove its bookmark. Returns the new
    /// bookmarked state.
    pub fn toggle_bookmark(&mut self) -> Result<bool, StateError> {
        let recipe = self.recipe.as_ref().ok_or(StateError::NoRecipe)?;
        if recipe.bookmarked {
            let id = recipe.id.clone();
            self.delete_bookmark(&id)?;
            Ok(false)
        } else {
            let snapshot = recipe.clone();
            self.add_bookmark(snapshot)?;
            Ok(true)
        }
    }

    /// Drop every bookmark and the persisted key.
    pub fn clear_bookmarks(&mut self) -> Result<(), StateError> {
        self.bookmarks.clear();
        self.sync_current_flag();
        self.store.remove(&self.bookmarks_key)?;
        info!("Cleared bookmarks");
        Ok(())
    }

    fn sync_current_flag(&mut self) {
        if let Some(current) = self.recipe.as_mut() {
            current.bookmarked = self.bookmarks.iter().any(|b| b.id == current.id);
        }
    }

    fn persist_bookmarks(&mut self) -> Result<(), StateError> {
        let json = serde_json::to_string(&self.bookmarks)
            .map_err(|e| StateError::Storage(e.into()))?;
        self.store.set(&self.bookmarks_key, &json)?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Upload
    // ------------------------------------------------------------------

    /// Validate and submit a new recipe, make it current and bookmark it.
    ///
    /// A malformed form fails before the API is called.
    pub fn upload_recipe(&mut self, form: &FormPayload) -> Result<&Recipe, StateError> {
        let payload = upload::to_api_recipe(form)?;
        let created = Recipe::from(self.api.create_recipe(&payload)?);
        if created.servings == 0 {
            return Err(StateError::NoServings(created.id));
        }
        info!(id = %created.id, "Uploaded recipe");
        self.recipe = Some(created.clone());
        self.add_bookmark(created)?;
        self.recipe.as_ref().ok_or(StateError::NoRecipe)
    }
}

fn restore_bookmarks<S: KeyValueStore>(store: &S, key: &str) -> Vec<Recipe> {
    let Some(raw) = store.get(key) else {
        return Vec::new();
    };
    match serde_json::from_str::<Vec<Recipe>>(&raw) {
        Ok(mut bookmarks) => {
            bookmarks.retain(|b| {
                if b.servings == 0 {
                    warn!(id = %b.id, "Dropping bookmark with no servings");
                }
                b.servings > 0
            });
            for bookmark in &mut bookmarks {
                bookmark.bookmarked = true;
            }
            bookmarks
        }
        Err(e) => {
            warn!("Ignoring unreadable bookmarks: {}", e);
            Vec::new()
        }
    }
}
