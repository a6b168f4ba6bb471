//! # recipe-lookup
//!
//! Search a public recipe API, open a recipe, scale it to any number of
//! servings, bookmark favourites and upload your own recipes.
//!
//! # Architecture
//!
//! The application is a small model-view-controller loop:
//!
//! ```text
//! event ─→ App::dispatch ─→ control_* handler ─→ AppState ─→ RecipeApi / KeyValueStore
//!                                   │
//!                                   └─→ View::render / View::update ─→ Region
//! ```
//!
//! - [`state::AppState`] owns everything that is not presentation: the
//!   current recipe, the search session and the bookmark list. It talks to
//!   the remote API through the [`api::RecipeApi`] trait and persists
//!   bookmarks through [`storage::KeyValueStore`], so tests drive it with
//!   in-memory fakes.
//! - Views generate markup with maud and keep it in a [`dom::Region`]. A
//!   re-render either replaces the region or patches it in place with the
//!   keyed diff in [`diff`], which is what keeps list items stable when the
//!   active entry or the bookmark set changes.
//! - [`controller::App`] wires the two together. Each handler is a failure
//!   boundary: an error is logged and shown on the view it concerns, and the
//!   rest of the page is left as it was.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`api`] | HTTP client for the recipe API: fetch, search, create, with a timeout |
//! | [`storage`] | Durable key-value store: one JSON file per key, or in memory |
//! | [`types`] | Recipes, ingredients, search sessions and the API wire shapes |
//! | [`upload`] | Flat form submissions → API recipe, including the ingredient line format |
//! | [`state`] | Application state and every operation that changes it |
//! | [`dom`] | Node tree, markup parsing and serialization, regions |
//! | [`diff`] | Keyed in-place patching of a region |
//! | [`views`] | The `View` trait and one view per page region, plus the page shell |
//! | [`controller`] | Event dispatch and handlers |
//! | [`config`] | `config.toml` loading, merging over stock defaults, validation |
//! | [`output`] | CLI output formatting |
//!
//! # Configuration
//!
//! Settings come from `config.toml` in the config directory, merged over the
//! stock defaults; unknown keys are rejected. Run `recipe-lookup gen-config`
//! for a documented stock file. Logging is controlled with `RUST_LOG`.

pub mod api;
pub mod config;
pub mod controller;
pub mod diff;
pub mod dom;
pub mod output;
pub mod state;
pub mod storage;
pub mod types;
pub mod upload;
pub mod views;

#[cfg(test)]
pub(crate) mod test_helpers;
