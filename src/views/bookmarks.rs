use super::{PreviewList, PreviewView, View};
use crate::dom::Region;
use maud::{Markup, PreEscaped, html};

pub const BOOKMARKS_ERROR: &str = "No bookmarks yet. Find a nice recipe and bookmark it.";

#[derive(Debug, Clone)]
pub struct BookmarksView {
    region: Region,
    preview: PreviewView,
}

impl BookmarksView {
    pub fn new(icons: &str) -> Self {
        Self {
            region: Region::new("bookmarks"),
            preview: PreviewView::new(icons),
        }
    }
}

impl View for BookmarksView {
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
        BOOKMARKS_ERROR
    }
}
