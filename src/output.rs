//! CLI output formatting for every command.
//!
//! # Display contract
//!
//! Every listed entity gets a header line (positional index + title) and
//! indented context lines below it, so search results and bookmarks read the
//! same way. The id is always shown: it is what `show <id>` takes.
//!
//! ## Search
//!
//! ```text
//! pizza: 23 results, page 1 of 3
//! 001 Pizza Margherita
//!     Publisher: Closet Cooking
//!     Id: 5ed6604591c37cdc054bc886
//! 002 Spinach Pizza *
//!     Publisher: Me
//!     Id: 664c8f193e7aa067e94e8706
//! ```
//!
//! `*` marks user-generated recipes.
//!
//! ## Recipe
//!
//! ```text
//! Pizza Margherita [bookmarked]
//!     Publisher: Closet Cooking
//!     Cooking time: 45 minutes
//!     Servings: 4
//!     Directions: http://www.closetcooking.com/...
//! Ingredients
//!     1 1/2 cups flour
//!     olive oil
//! ```
//!
//! ## Bookmarks
//!
//! ```text
//! Bookmarks
//! 001 Pizza Margherita
//!     Publisher: Closet Cooking
//!     Id: 5ed6604591c37cdc054bc886
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::types::{Ingredient, Recipe, SearchSession};
use crate::views::format_quantity;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Header plus publisher and id lines for one list entry.
fn entry_lines(index: usize, title: &str, publisher: &str, id: &str, user: bool) -> [String; 3] {
    let marker = if user { " *" } else { "" };
    [
        format!("{} {}{}", format_index(index), title, marker),
        format!("{}Publisher: {}", indent(1), publisher),
        format!("{}Id: {}", indent(1), id),
    ]
}

/// `1 1/2 cups flour`; a missing quantity or unit is left out.
fn ingredient_line(ing: &Ingredient) -> String {
    let parts = [
        ing.quantity.map(format_quantity).unwrap_or_default(),
        ing.unit.clone(),
        ing.description.clone(),
    ];
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}

// ============================================================================
// Search
// ============================================================================

/// Format the current page of a search session.
pub fn format_search_output(session: &SearchSession) -> Vec<String> {
    let total = session.results.len();
    if total == 0 {
        return vec![format!("{}: no results", session.query)];
    }

    let mut lines = vec![format!(
        "{}: {} results, page {} of {}",
        session.query,
        total,
        session.page,
        session.page_count()
    )];
    let range = session.page_range(session.page);
    let offset = range.start;
    for (i, result) in session.results[range].iter().enumerate() {
        lines.extend(entry_lines(
            offset + i + 1,
            &result.title,
            &result.publisher,
            &result.id,
            result.key.is_some(),
        ));
    }
    lines
}

pub fn print_search_output(session: &SearchSession) {
    for line in format_search_output(session) {
        println!("{}", line);
    }
}

// ============================================================================
// Recipe
// ============================================================================

pub fn format_recipe(recipe: &Recipe) -> Vec<String> {
    let mut header = recipe.title.clone();
    if recipe.bookmarked {
        header.push_str(" [bookmarked]");
    }
    if recipe.key.is_some() {
        header.push_str(" [yours]");
    }

    let mut lines = vec![
        header,
        format!("{}Publisher: {}", indent(1), recipe.publisher),
        format!("{}Cooking time: {} minutes", indent(1), recipe.cooking_time),
        format!("{}Servings: {}", indent(1), recipe.servings),
        format!("{}Directions: {}", indent(1), recipe.source_url),
        "Ingredients".to_string(),
    ];
    lines.extend(
        recipe
            .ingredients
            .iter()
            .map(|ing| format!("{}{}", indent(1), ingredient_line(ing))),
    );
    lines
}

pub fn print_recipe(recipe: &Recipe) {
    for line in format_recipe(recipe) {
        println!("{}", line);
    }
}

// ============================================================================
// Bookmarks
// ============================================================================

pub fn format_bookmarks(bookmarks: &[Recipe]) -> Vec<String> {
    if bookmarks.is_empty() {
        return vec!["No bookmarks yet. Find a nice recipe and bookmark it.".to_string()];
    }
    let mut lines = vec!["Bookmarks".to_string()];
    for (i, recipe) in bookmarks.iter().enumerate() {
        lines.extend(entry_lines(
            i + 1,
            &recipe.title,
            &recipe.publisher,
            &recipe.id,
            recipe.key.is_some(),
        ));
    }
    lines
}

pub fn print_bookmarks(bookmarks: &[Recipe]) {
    for line in format_bookmarks(bookmarks) {
        println!("{}", line);
    }
}
