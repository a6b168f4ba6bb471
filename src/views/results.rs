use super::{PreviewList, PreviewView, View};
use crate::dom::Region;
use maud::{Markup, PreEscaped, html};

pub const RESULTS_ERROR: &str = "No recipes found for your query! Please try again!";

/// One page of search results.
#[derive(Debug, Clone)]
pub struct ResultsView {
    region: Region,
    preview: PreviewView,
}

impl ResultsView {
    pub fn new(icons: &str) -> Self {
        Self {
            region: Region::new("results"),
            preview: PreviewView::new(icons),
        }
    }
}

impl View for ResultsView {
    type Data = PreviewList;

    fn region(&self) -> &Region {
        &self.region
    }

    fn region_mut(&mut self) -> &mut Region {
        &mut self.region
    }

    fn icons(&self) -> &str {
        self.preview.icons()
    }

    fn generate_markup(&self, list: &PreviewList) -> Markup {
        html! {
            @for entry in list.entries() {
                @if let Some(item) = self.preview.markup(&entry) {
                    (PreEscaped(item))
                }
            }
        }
    }

    fn is_empty(&self, list: &PreviewList) -> bool {
        list.is_empty()
    }

    fn error_message(&self) -> &str {
        RESULTS_ERROR
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SearchResult;

    fn results(n: usize) -> Vec<SearchResult> {
        (0..n)
            .map(|i| SearchResult {
                id: format!("r{i}"),
                title: format!("Pizza {i}"),
                publisher: "Test Kitchen".to_string(),
                image_url: format!("https://img.example.com/{i}.jpg"),
                key: None,
            })
            .collect()
    }

    #[test]
    fn renders_one_item_per_result() {
        let mut view = ResultsView::new("icons.svg");
        view.render(&PreviewList::from_results(&results(3), None))
            .unwrap();
        let keys: Vec<_> = view.region().nodes().iter().filter_map(|n| n.key()).collect();
        assert_eq!(keys, ["r0", "r1", "r2"]);
    }

    #[test]
    fn empty_results_render_error() {
        let mut view = ResultsView::new("icons.svg");
        view.render(&PreviewList::default()).unwrap();
        assert_eq!(view.region().text_content(), RESULTS_ERROR);
    }

    #[test]
    fn update_moves_active_marker_with_attribute_patches_only() {
        let list = results(3);
        let mut view = ResultsView::new("icons.svg");
        view.render(&PreviewList::from_results(&list, Some("r0")))
            .unwrap();
        let stats = view
            .update(&PreviewList::from_results(&list, Some("r2")))
            .unwrap();
        assert_eq!(stats.attr_updates, 2);
        assert_eq!(stats.inserted, 0);
        assert_eq!(stats.text_updates, 0);
        let active = view.region().find_by_class("preview__link--active").unwrap();
        assert_eq!(active.attr("href"), Some("#r2"));
    }
}
