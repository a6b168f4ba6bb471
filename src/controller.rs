//! Wiring between user actions, application state and views.
//!
//! [`App`] owns the [`AppState`] and one instance of every view. Each
//! `control_*` handler is a failure boundary: it runs its steps in order,
//! and on the first error logs it and renders the error panel of the view
//! that handler is responsible for. Nothing is retried.
//!
//! | Handler | Trigger | Error shows on |
//! |---|---|---|
//! | [`App::control_recipe`] | location change, start-up | recipe |
//! | [`App::control_search_results`] | search submit | results |
//! | [`App::control_pagination`] | prev/next click | results |
//! | [`App::control_servings`] | servings buttons | recipe |
//! | [`App::control_add_bookmark`] | bookmark button | recipe |
//! | [`App::control_bookmarks`] | start-up | bookmarks |
//! | [`App::control_add_recipe`] | upload submit | upload (failure text) |
//!
//! Input arrives as [`Event`]s through [`App::dispatch`]. Views interpret
//! their own buttons: a pagination click asks [`PaginationView::goto`] for
//! the target page, a servings click asks [`RecipeView::servings_target`].

use crate::api::RecipeApi;
use crate::config::UiConfig;
use crate::dom::MarkupError;
use crate::state::{AppState, StateError};
use crate::storage::KeyValueStore;
use crate::upload::FormPayload;
use crate::views::page::{self, PageParts};
use crate::views::{
    AddRecipeView, BookmarksView, Direction, PaginationView, PreviewList, RecipeView,
    ResultsView, SearchView, ServingsButton, View,
};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, error, info};

pub const PAGE_TITLE: &str = "recipe-lookup";

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    State(#[from] StateError),
    #[error(transparent)]
    Markup(#[from] MarkupError),
}

/// The URL fragment naming the current recipe.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    hash: String,
}

impl Location {
    pub fn new(hash: &str) -> Self {
        Self {
            hash: normalize(hash),
        }
    }

    /// Recipe id from the fragment, if any.
    pub fn id(&self) -> Option<&str> {
        Some(self.hash.as_str()).filter(|h| !h.is_empty())
    }

    /// Navigate. Returns whether the fragment changed, which is what
    /// triggers a recipe load.
    pub fn set_hash(&mut self, hash: &str) -> bool {
        let hash = normalize(hash);
        if hash == self.hash {
            return false;
        }
        self.hash = hash;
        true
    }

    /// Rewrite the fragment without navigating.
    pub fn push_state(&mut self, hash: &str) {
        self.hash = normalize(hash);
    }
}

fn normalize(hash: &str) -> String {
    hash.trim().trim_start_matches('#').to_string()
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The location fragment changed to this value.
    HashChange(String),
    /// A query was typed and the search form submitted.
    Search(String),
    Paginate(Direction),
    Servings(ServingsButton),
    ToggleBookmark,
    OpenUpload,
    CloseUpload,
    Upload(FormPayload),
}

pub struct App<A, S> {
    state: AppState<A, S>,
    location: Location,
    icons: String,
    recipe_view: RecipeView,
    search_view: SearchView,
    results_view: ResultsView,
    pagination_view: PaginationView,
    bookmarks_view: BookmarksView,
    add_recipe_view: AddRecipeView,
    modal_close: Duration,
    pending_close: Option<Instant>,
}

impl<A: RecipeApi, S: KeyValueStore> App<A, S> {
    pub fn new(state: AppState<A, S>, ui: &UiConfig, initial_hash: &str) -> Self {
        let icons = ui.icons.as_str();
        Self {
            state,
            location: Location::new(initial_hash),
            icons: icons.to_string(),
            recipe_view: RecipeView::new(icons),
            search_view: SearchView::new(icons),
            results_view: ResultsView::new(icons),
            pagination_view: PaginationView::new(icons),
            bookmarks_view: BookmarksView::new(icons),
            add_recipe_view: AddRecipeView::new(icons),
            modal_close: Duration::from_millis(ui.modal_close_ms),
            pending_close: None,
        }
    }

    pub fn state(&self) -> &AppState<A, S> {
        &self.state
    }

    pub fn into_state(self) -> AppState<A, S> {
        self.state
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn recipe_view(&self) -> &RecipeView {
        &self.recipe_view
    }

    pub fn results_view(&self) -> &ResultsView {
        &self.results_view
    }

    pub fn pagination_view(&self) -> &PaginationView {
        &self.pagination_view
    }

    pub fn bookmarks_view(&self) -> &BookmarksView {
        &self.bookmarks_view
    }

    pub fn search_view(&self) -> &SearchView {
        &self.search_view
    }

    pub fn add_recipe_view(&self) -> &AddRecipeView {
        &self.add_recipe_view
    }

    /// When the upload window is due to close, if scheduled.
    pub fn pending_close(&self) -> Option<Instant> {
        self.pending_close
    }

    // =========================================================================
    // Entry points
    // =========================================================================

    /// The load event: draw the static parts, restore bookmarks and open
    /// the recipe named by the initial fragment.
    pub fn start(&mut self) {
        if let Err(e) = self.render_chrome() {
            error!("Could not render page chrome: {e}");
        }
        self.control_bookmarks();
        self.control_recipe();
    }

    fn render_chrome(&mut self) -> Result<(), MarkupError> {
        self.search_view.render(&())?;
        self.add_recipe_view.render(&FormPayload::new())
    }

    pub fn dispatch(&mut self, event: Event) {
        debug!(?event, "Dispatch");
        match event {
            Event::HashChange(hash) => {
                if self.location.set_hash(&hash) {
                    self.control_recipe();
                }
            }
            Event::Search(query) => {
                self.search_view.set_query(&query);
                self.control_search_results();
            }
            Event::Paginate(direction) => match self.pagination_view.goto(direction) {
                Some(page) => self.control_pagination(page),
                None => debug!(?direction, "No pagination button"),
            },
            Event::Servings(button) => match self.recipe_view.servings_target(button) {
                Some(servings) => self.control_servings(servings),
                None => debug!(?button, "Servings button has no valid target"),
            },
            Event::ToggleBookmark => self.control_add_bookmark(),
            Event::OpenUpload => self.add_recipe_view.show_window(),
            Event::CloseUpload => self.add_recipe_view.hide_window(),
            Event::Upload(form) => self.control_add_recipe(&form, Instant::now()),
        }
    }

    /// Run timers that are due at `now`.
    pub fn tick(&mut self, now: Instant) {
        let Some(deadline) = self.pending_close else {
            return;
        };
        if now < deadline {
            return;
        }
        self.pending_close = None;
        self.add_recipe_view.hide_window();
        if let Err(e) = self.add_recipe_view.render(&FormPayload::new()) {
            error!("Could not reset upload form: {e}");
        }
    }

    /// The whole document with every region in place.
    pub fn render_page(&self) -> String {
        page::document(&PageParts {
            title: PAGE_TITLE,
            icons: &self.icons,
            search: self.search_view.region(),
            results: self.results_view.region(),
            pagination: self.pagination_view.region(),
            bookmarks: self.bookmarks_view.region(),
            recipe: self.recipe_view.region(),
            upload: self.add_recipe_view.region(),
            modal_visible: self.add_recipe_view.is_visible(),
        })
        .into_string()
    }

    // =========================================================================
    // Handlers
    // =========================================================================

    pub fn control_recipe(&mut self) {
        let Some(id) = self.location.id().map(str::to_string) else {
            return;
        };
        if let Err(e) = self.show_recipe(&id) {
            report(&mut self.recipe_view, "Loading recipe", &e, None);
        }
    }

    fn show_recipe(&mut self, id: &str) -> Result<(), AppError> {
        self.recipe_view.render_spinner()?;

        let page = PreviewList::from_results(self.state.results_page(None), Some(id));
        self.results_view.update(&page)?;
        let bookmarks = PreviewList::from_recipes(self.state.bookmarks(), Some(id));
        self.bookmarks_view.update(&bookmarks)?;

        let recipe = self.state.load_recipe(id)?;
        self.recipe_view.render(recipe)?;
        Ok(())
    }

    pub fn control_search_results(&mut self) {
        let query = self.search_view.query().trim().to_string();
        if query.is_empty() {
            return;
        }
        if let Err(e) = self.search(&query) {
            report(&mut self.results_view, "Search", &e, None);
        }
    }

    fn search(&mut self, query: &str) -> Result<(), AppError> {
        self.search_view.clear_input()?;
        self.results_view.render_spinner()?;
        self.state.load_search_results(query)?;
        self.render_results()
    }

    pub fn control_pagination(&mut self, page: usize) {
        if let Err(e) = self.paginate(page) {
            report(&mut self.results_view, "Pagination", &e, None);
        }
    }

    fn paginate(&mut self, page: usize) -> Result<(), AppError> {
        let results = self.state.go_to_page(page);
        self.results_view
            .render(&PreviewList::from_results(results, self.location.id()))?;
        self.pagination_view.render(self.state.search())?;
        Ok(())
    }

    fn render_results(&mut self) -> Result<(), AppError> {
        let page = self.state.results_page(None);
        self.results_view
            .render(&PreviewList::from_results(page, self.location.id()))?;
        self.pagination_view.render(self.state.search())?;
        Ok(())
    }

    pub fn control_servings(&mut self, servings: u32) {
        if let Err(e) = self.update_servings(servings) {
            report(&mut self.recipe_view, "Updating servings", &e, None);
        }
    }

    fn update_servings(&mut self, servings: u32) -> Result<(), AppError> {
        let recipe = self.state.update_servings(servings)?;
        self.recipe_view.update(recipe)?;
        Ok(())
    }

    pub fn control_add_bookmark(&mut self) {
        if let Err(e) = self.toggle_bookmark() {
            report(&mut self.recipe_view, "Bookmarking", &e, None);
        }
    }

    fn toggle_bookmark(&mut self) -> Result<(), AppError> {
        let bookmarked = self.state.toggle_bookmark()?;
        info!(bookmarked, "Toggled bookmark");
        if let Some(recipe) = self.state.recipe() {
            self.recipe_view.update(recipe)?;
        }
        self.render_bookmarks()?;
        Ok(())
    }

    pub fn control_bookmarks(&mut self) {
        if let Err(e) = self.render_bookmarks() {
            let e = AppError::from(e);
            report(&mut self.bookmarks_view, "Rendering bookmarks", &e, None);
        }
    }

    fn render_bookmarks(&mut self) -> Result<(), MarkupError> {
        let list = PreviewList::from_recipes(self.state.bookmarks(), self.location.id());
        self.bookmarks_view.render(&list)
    }

    /// Upload `form`. On success the window closes `ui.modal_close_ms` after
    /// `now`; see [`App::tick`].
    pub fn control_add_recipe(&mut self, form: &FormPayload, now: Instant) {
        match self.upload(form) {
            Ok(()) => self.pending_close = Some(now + self.modal_close),
            Err(e) => {
                let message = e.to_string();
                report(&mut self.add_recipe_view, "Upload", &e, Some(&message));
            }
        }
    }

    fn upload(&mut self, form: &FormPayload) -> Result<(), AppError> {
        self.add_recipe_view.render_spinner()?;
        let recipe = self.state.upload_recipe(form)?;
        let id = recipe.id.clone();
        self.recipe_view.render(recipe)?;
        self.add_recipe_view.render_message(None)?;
        self.location.push_state(&id);
        self.render_bookmarks()?;
        Ok(())
    }
}

/// Log a handler failure and show it on `view`.
fn report<V: View>(view: &mut V, action: &str, err: &AppError, message: Option<&str>) {
    error!("{action} failed: {err}");
    if let Err(e) = view.render_error(message) {
        error!(
            "Could not render error panel in {}: {e}",
            view.region().name()
        );
    }
}
