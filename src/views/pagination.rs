use super::{View, icon};
use crate::dom::Region;
use crate::types::SearchSession;
use maud::{Markup, html};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Prev,
    Next,
}

impl Direction {
    fn button_class(self) -> &'static str {
        match self {
            Direction::Prev => "pagination__btn--prev",
            Direction::Next => "pagination__btn--next",
        }
    }
}

/// Prev/next buttons under the results list.
///
/// - page 1 of several: next only
/// - last page of several: prev only
/// - anything in between: both
/// - a single page: nothing
#[derive(Debug, Clone)]
pub struct PaginationView {
    region: Region,
    icons: String,
}

impl PaginationView {
    pub fn new(icons: &str) -> Self {
        Self {
            region: Region::new("pagination"),
            icons: icons.to_string(),
        }
    }

    /// Target page of the rendered button in `direction`, if it exists.
    pub fn goto(&self, direction: Direction) -> Option<usize> {
        self.region
            .find_by_class(direction.button_class())?
            .attr("data-goto")?
            .parse()
            .ok()
    }

    fn button(&self, direction: Direction, target: usize) -> Markup {
        let class = format!("btn--inline {}", direction.button_class());
        html! {
            button data-goto=(target) class=(class) {
                @match direction {
                    Direction::Prev => {
                        (icon(&self.icons, "arrow-left", Some("search__icon")))
                        span { "Page " (target) }
                    }
                    Direction::Next => {
                        span { "Page " (target) }
                        (icon(&self.icons, "arrow-right", Some("search__icon")))
                    }
                }
            }
        }
    }
}

impl View for PaginationView {
    type Data = SearchSession;

    fn region(&self) -> &Region {
        &self.region
    }

    fn region_mut(&mut self) -> &mut Region {
        &mut self.region
    }

    fn icons(&self) -> &str {
        &self.icons
    }

    fn generate_markup(&self, session: &SearchSession) -> Markup {
        let pages = session.page_count();
        let page = session.page;
        let prev = page > 1 && page <= pages;
        let next = page < pages;
        html! {
            @if prev {
                (self.button(Direction::Prev, page - 1))
            }
            @if next {
                (self.button(Direction::Next, page + 1))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SearchResult;

    fn session(len: usize, page: usize) -> SearchSession {
        let mut s = SearchSession::new(10);
        s.results = (0..len)
            .map(|i| SearchResult {
                id: i.to_string(),
                title: String::new(),
                publisher: String::new(),
                image_url: String::new(),
                key: None,
            })
            .collect();
        s.page = page;
        s
    }

    fn rendered(len: usize, page: usize) -> PaginationView {
        let mut view = PaginationView::new("icons.svg");
        view.render(&session(len, page)).unwrap();
        view
    }

    #[test]
    fn first_of_three_pages_has_next_only() {
        let view = rendered(23, 1);
        assert_eq!(view.goto(Direction::Prev), None);
        assert_eq!(view.goto(Direction::Next), Some(2));
        assert!(view.region().text_content().contains("Page 2"));
    }

    #[test]
    fn middle_page_has_both() {
        let view = rendered(23, 2);
        assert_eq!(view.goto(Direction::Prev), Some(1));
        assert_eq!(view.goto(Direction::Next), Some(3));
    }

    #[test]
    fn last_page_has_prev_only() {
        let view = rendered(23, 3);
        assert_eq!(view.goto(Direction::Prev), Some(2));
        assert_eq!(view.goto(Direction::Next), None);
    }

    #[test]
    fn single_page_renders_nothing() {
        assert!(rendered(10, 1).region().is_empty());
        assert!(rendered(0, 1).region().is_empty());
    }
}
