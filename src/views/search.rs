use super::{View, icon};
use crate::dom::{MarkupError, Region};
use maud::{Markup, html};

/// The search form. Holds the query field's value between renders.
#[derive(Debug, Clone)]
pub struct SearchView {
    region: Region,
    icons: String,
    query: String,
}

impl SearchView {
    pub fn new(icons: &str) -> Self {
        Self {
            region: Region::new("search"),
            icons: icons.to_string(),
            query: String::new(),
        }
    }

    /// Type into the query field.
    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn clear_input(&mut self) -> Result<(), MarkupError> {
        self.query.clear();
        self.update(&()).map(|_| ())
    }
}

impl View for SearchView {
    type Data = ();

    fn region(&self) -> &Region {
        &self.region
    }

    fn region_mut(&mut self) -> &mut Region {
        &mut self.region
    }

    fn icons(&self) -> &str {
        &self.icons
    }

    fn generate_markup(&self, _: &()) -> Markup {
        html! {
            form.search {
                input.search__field type="text" name="query"
                    placeholder="Search over 1,000,000 recipes..." value=(self.query);
                button class="btn search__btn" {
                    (icon(&self.icons, "search", Some("search__icon")))
                    span { "Search" }
                }
            }
        }
    }
}
