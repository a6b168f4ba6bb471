use super::{View, icon};
use crate::dom::Region;
use crate::types::{Preview, Recipe, SearchResult};
use maud::{Markup, html};

/// Items for a results or bookmarks list plus the id to highlight.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreviewList {
    pub items: Vec<Preview>,
    /// Usually the current location fragment.
    pub active_id: Option<String>,
}

impl PreviewList {
    pub fn from_results(results: &[SearchResult], active_id: Option<&str>) -> Self {
        Self {
            items: results.iter().map(Preview::from).collect(),
            active_id: active_id.map(str::to_string),
        }
    }

    pub fn from_recipes(recipes: &[Recipe], active_id: Option<&str>) -> Self {
        Self {
            items: recipes.iter().map(Preview::from).collect(),
            active_id: active_id.map(str::to_string),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = PreviewItem> + '_ {
        self.items.iter().map(|preview| PreviewItem {
            preview: preview.clone(),
            active: self.active_id.as_deref() == Some(preview.id.as_str()),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreviewItem {
    pub preview: Preview,
    pub active: bool,
}

/// Renders one `li.preview`. Only ever used through [`View::markup`].
#[derive(Debug, Clone)]
pub struct PreviewView {
    region: Region,
    icons: String,
}

impl PreviewView {
    pub fn new(icons: &str) -> Self {
        Self {
            region: Region::new("preview"),
            icons: icons.to_string(),
        }
    }
}

impl View for PreviewView {
    type Data = PreviewItem;

    fn region(&self) -> &Region {
        &self.region
    }

    fn region_mut(&mut self) -> &mut Region {
        &mut self.region
    }

    fn icons(&self) -> &str {
        &self.icons
    }

    fn generate_markup(&self, item: &PreviewItem) -> Markup {
        let p = &item.preview;
        let link_class = if item.active {
            "preview__link preview__link--active"
        } else {
            "preview__link"
        };
        let generated_class = if p.user_generated {
            "preview__user-generated"
        } else {
            "preview__user-generated hidden"
        };
        html! {
            li.preview data-key=(p.id) {
                a class=(link_class) href={ "#" (p.id) } {
                    figure.preview__fig {
                        img src=(p.image_url) alt=(p.title);
                    }
                    div.preview__data {
                        h4.preview__title { (p.title) }
                        p.preview__publisher { (p.publisher) }
                        div class=(generated_class) {
                            (icon(&self.icons, "user", None))
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::sample_recipe;

    fn item(active: bool) -> PreviewItem {
        PreviewItem {
            preview: Preview::from(&sample_recipe("abc", 4)),
            active,
        }
    }

    #[test]
    fn item_links_to_fragment_and_carries_key() {
        let html = PreviewView::new("icons.svg").markup(&item(false)).unwrap();
        assert!(html.starts_with(r#"<li class="preview" data-key="abc">"#));
        assert!(html.contains(r##"href="#abc""##));
        assert!(html.contains("Recipe abc"));
        assert!(!html.contains("preview__link--active"));
    }

    #[test]
    fn active_item_is_marked() {
        let html = PreviewView::new("icons.svg").markup(&item(true)).unwrap();
        assert!(html.contains("preview__link preview__link--active"));
    }

    #[test]
    fn user_generated_marker_hidden_unless_keyed() {
        let mut it = item(false);
        let view = PreviewView::new("icons.svg");
        assert!(view.markup(&it).unwrap().contains("preview__user-generated hidden"));
        it.preview.user_generated = true;
        assert!(!view.markup(&it).unwrap().contains("hidden"));
    }

    #[test]
    fn entries_flag_only_the_active_id() {
        let recipes = vec![sample_recipe("a", 1), sample_recipe("b", 1)];
        let list = PreviewList::from_recipes(&recipes, Some("b"));
        let flags: Vec<bool> = list.entries().map(|e| e.active).collect();
        assert_eq!(flags, [false, true]);
    }
}
