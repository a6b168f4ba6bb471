//! Views: markup generation and region rendering.
//!
//! Every view owns a [`Region`] and implements [`View`]: the one required
//! piece is [`View::generate_markup`], which turns the view's data into maud
//! markup. Rendering, in-place updates and the spinner/error/message panels
//! come from the trait's default methods.
//!
//! ## Views
//!
//! | View | Region | Data |
//! |---|---|---|
//! | [`RecipeView`] | `recipe` | [`Recipe`](crate::types::Recipe) |
//! | [`ResultsView`] | `results` | [`PreviewList`] |
//! | [`BookmarksView`] | `bookmarks` | [`PreviewList`] |
//! | [`PaginationView`] | `pagination` | [`SearchSession`](crate::types::SearchSession) |
//! | [`SearchView`] | `search` | `()` (owns the query field) |
//! | [`AddRecipeView`] | `upload` | [`FormPayload`](crate::upload::FormPayload) |
//!
//! [`PreviewView`] renders single list items for the results and bookmarks
//! lists and is never rendered into a region of its own. [`page`] wraps all
//! regions in the full HTML document.
//!
//! ## Icons
//!
//! Icons are `<svg><use href="{icons}#icon-{name}">` references into the
//! sprite configured as `ui.icons`. maud has no syntax for the `use` element,
//! so [`icon`] builds that fragment by hand with escaped attribute values.

mod add_recipe;
mod bookmarks;
pub mod page;
mod pagination;
mod preview;
mod recipe;
mod results;
mod search;

pub use add_recipe::AddRecipeView;
pub use bookmarks::BookmarksView;
pub use pagination::{Direction, PaginationView};
pub use preview::{PreviewItem, PreviewList, PreviewView};
pub use recipe::{RecipeView, ServingsButton, format_quantity};
pub use results::ResultsView;
pub use search::SearchView;

use crate::diff::{PatchStats, patch_children};
use crate::dom::{MarkupError, Region, parse_fragment};
use maud::{Escaper, Markup, PreEscaped, html};
use std::fmt::Write as _;
use tracing::trace;

/// Error text for views that do not define their own.
pub const GENERIC_ERROR: &str = "Something went wrong. Please try again!";

pub trait View {
    type Data: ?Sized;

    fn region(&self) -> &Region;
    fn region_mut(&mut self) -> &mut Region;

    /// Path of the icon sprite.
    fn icons(&self) -> &str;

    fn generate_markup(&self, data: &Self::Data) -> Markup;

    /// Empty data renders the error panel instead of markup.
    fn is_empty(&self, _data: &Self::Data) -> bool {
        false
    }

    fn error_message(&self) -> &str {
        GENERIC_ERROR
    }

    fn success_message(&self) -> &str {
        ""
    }

    /// Clear the region and fill it with freshly generated markup.
    fn render(&mut self, data: &Self::Data) -> Result<(), MarkupError> {
        if self.is_empty(data) {
            return self.render_error(None);
        }
        let markup = self.generate_markup(data);
        self.region_mut().replace(markup)
    }

    /// Generated markup without touching the region.
    fn markup(&self, data: &Self::Data) -> Option<String> {
        if self.is_empty(data) {
            return None;
        }
        Some(self.generate_markup(data).into_string())
    }

    /// Patch the region in place so only changed nodes are touched.
    ///
    /// Empty data leaves the region as it is.
    fn update(&mut self, data: &Self::Data) -> Result<PatchStats, MarkupError> {
        let mut stats = PatchStats::default();
        if self.is_empty(data) {
            return Ok(stats);
        }
        let next = parse_fragment(&self.generate_markup(data).into_string())?;
        patch_children(self.region_mut().nodes_mut(), next, &mut stats);
        trace!("Patched region {}: {:?}", self.region().name(), stats);
        Ok(stats)
    }

    fn render_spinner(&mut self) -> Result<(), MarkupError> {
        let markup = spinner(self.icons());
        self.region_mut().replace(markup)
    }

    fn render_error(&mut self, message: Option<&str>) -> Result<(), MarkupError> {
        let markup = panel(
            "error",
            self.icons(),
            "alert-triangle",
            message.unwrap_or(self.error_message()),
        );
        self.region_mut().replace(markup)
    }

    fn render_message(&mut self, message: Option<&str>) -> Result<(), MarkupError> {
        let markup = panel(
            "message",
            self.icons(),
            "smile",
            message.unwrap_or(self.success_message()),
        );
        self.region_mut().replace(markup)
    }

    /// Text of the error panel, if the region is showing one.
    fn failure(&self) -> Option<String> {
        let region = self.region();
        region.find_by_class("error").map(|_| region.text_content())
    }
}

/// `<svg><use href="…#icon-name"></use></svg>`, optionally classed.
pub fn icon(icons: &str, name: &str, class: Option<&str>) -> Markup {
    let mut out = String::from("<svg");
    if let Some(class) = class {
        out.push_str(" class=\"");
        let _ = Escaper::new(&mut out).write_str(class);
        out.push('"');
    }
    out.push_str("><use href=\"");
    let _ = write!(Escaper::new(&mut out), "{icons}#icon-{name}");
    out.push_str("\"></use></svg>");
    PreEscaped(out)
}

fn spinner(icons: &str) -> Markup {
    html! {
        div.spinner {
            (icon(icons, "loader", None))
        }
    }
}

fn panel(class: &str, icons: &str, icon_name: &str, message: &str) -> Markup {
    html! {
        div class=(class) {
            div { (icon(icons, icon_name, None)) }
            p { (message) }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal view over a list of strings.
    struct ListView {
        region: Region,
    }

    impl View for ListView {
        type Data = [String];

        fn region(&self) -> &Region {
            &self.region
        }
        fn region_mut(&mut self) -> &mut Region {
            &mut self.region
        }
        fn icons(&self) -> &str {
            "img/icons.svg"
        }
        fn generate_markup(&self, data: &[String]) -> Markup {
            html! { @for item in data { li data-key=(item) { (item) } } }
        }
        fn is_empty(&self, data: &[String]) -> bool {
            data.is_empty()
        }
        fn error_message(&self) -> &str {
            "Nothing here"
        }
        fn success_message(&self) -> &str {
            "All good"
        }
    }

    fn view() -> ListView {
        ListView {
            region: Region::new("list"),
        }
    }

    fn items(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn render_replaces_region() {
        let mut v = view();
        v.render(&items(&["a", "b"])).unwrap();
        assert_eq!(
            v.region().to_html(),
            r#"<li data-key="a">a</li><li data-key="b">b</li>"#
        );
        v.render(&items(&["c"])).unwrap();
        assert_eq!(v.region().to_html(), r#"<li data-key="c">c</li>"#);
    }

    #[test]
    fn render_empty_shows_default_error() {
        let mut v = view();
        v.render(&[]).unwrap();
        let error = v.region().find_by_class("error").unwrap();
        assert_eq!(error.tag, "div");
        assert!(v.region().text_content().contains("Nothing here"));
    }

    #[test]
    fn failure_reports_error_panel_only() {
        let mut v = view();
        assert_eq!(v.failure(), None);
        v.render(&items(&["a"])).unwrap();
        assert_eq!(v.failure(), None);
        v.render_error(Some("Broke")).unwrap();
        assert_eq!(v.failure().as_deref(), Some("Broke"));
    }

    #[test]
    fn markup_does_not_touch_region() {
        let v = view();
        assert_eq!(v.markup(&items(&["a"])).unwrap(), r#"<li data-key="a">a</li>"#);
        assert!(v.region().is_empty());
        assert_eq!(v.markup(&[]), None);
    }

    #[test]
    fn update_patches_instead_of_rebuilding() {
        let mut v = view();
        v.render(&items(&["a", "b", "c"])).unwrap();
        let stats = v.update(&items(&["c", "a", "b"])).unwrap();
        assert_eq!(stats.inserted, 0);
        assert_eq!(stats.removed, 0);
        assert!(stats.moved > 0);
    }

    #[test]
    fn update_with_empty_data_keeps_region() {
        let mut v = view();
        v.render(&items(&["a"])).unwrap();
        let stats = v.update(&[]).unwrap();
        assert!(stats.is_noop());
        assert_eq!(v.region().text_content(), "a");
    }

    #[test]
    fn spinner_and_panels() {
        let mut v = view();
        v.render_spinner().unwrap();
        assert!(v.region().find_by_class("spinner").is_some());
        assert!(v.region().to_html().contains("img/icons.svg#icon-loader"));

        v.render_error(Some("Boom (500)")).unwrap();
        assert_eq!(v.region().text_content(), "Boom (500)");

        v.render_message(None).unwrap();
        assert!(v.region().find_by_class("message").is_some());
        assert_eq!(v.region().text_content(), "All good");
    }

    #[test]
    fn icon_escapes_href() {
        let markup = icon("a\"b.svg", "user", Some("preview__icon")).into_string();
        assert_eq!(
            markup,
            r#"<svg class="preview__icon"><use href="a&quot;b.svg#icon-user"></use></svg>"#
        );
    }
}
