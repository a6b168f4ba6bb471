//! The full HTML document wrapping every region.

use super::icon;
use crate::dom::Region;
use maud::{DOCTYPE, Markup, PreEscaped, html};

const CSS: &str = include_str!("../../static/style.css");

/// Region contents and chrome state for one page render.
pub struct PageParts<'a> {
    pub title: &'a str,
    pub icons: &'a str,
    pub search: &'a Region,
    pub results: &'a Region,
    pub pagination: &'a Region,
    pub bookmarks: &'a Region,
    pub recipe: &'a Region,
    pub upload: &'a Region,
    pub modal_visible: bool,
}

fn region(r: &Region) -> Markup {
    PreEscaped(r.to_html())
}

fn hidden_unless(visible: bool, class: &'static str, hidden: &'static str) -> &'static str {
    if visible { class } else { hidden }
}

pub fn document(parts: &PageParts<'_>) -> Markup {
    let icons = parts.icons;
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (parts.title) }
                style { (PreEscaped(CSS)) }
            }
            body {
                div.container {
                    header.header {
                        div.search-box { (region(parts.search)) }
                        nav.nav {
                            ul.nav__list {
                                li.nav__item {
                                    button class="nav__btn nav__btn--add-recipe" {
                                        (icon(icons, "edit", Some("nav__icon")))
                                        span { "Add recipe" }
                                    }
                                }
                                li.nav__item {
                                    button class="nav__btn nav__btn--bookmarks" {
                                        (icon(icons, "bookmark", Some("nav__icon")))
                                        span { "Bookmarks" }
                                    }
                                    div.bookmarks {
                                        ul.bookmarks__list { (region(parts.bookmarks)) }
                                    }
                                }
                            }
                        }
                    }
                    div.search-results {
                        ul.results { (region(parts.results)) }
                        div.pagination { (region(parts.pagination)) }
                    }
                    div.recipe { (region(parts.recipe)) }
                }
                div class=(hidden_unless(parts.modal_visible, "overlay", "overlay hidden")) {}
                div class=(hidden_unless(
                    parts.modal_visible,
                    "add-recipe-window",
                    "add-recipe-window hidden",
                )) {
                    button.btn--close-modal { "×" }
                    (region(parts.upload))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts<'a>(empty: &'a Region, recipe: &'a Region, visible: bool) -> PageParts<'a> {
        PageParts {
            title: "recipe-lookup",
            icons: "img/icons.svg",
            search: empty,
            results: empty,
            pagination: empty,
            bookmarks: empty,
            recipe,
            upload: empty,
            modal_visible: visible,
        }
    }

    #[test]
    fn document_includes_doctype_and_regions() {
        let empty = Region::new("x");
        let mut recipe = Region::new("recipe");
        recipe.replace(html! { h1.recipe__title { "Soup" } }).unwrap();
        let doc = document(&parts(&empty, &recipe, false)).into_string();
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains(r#"<div class="recipe"><h1 class="recipe__title">Soup</h1></div>"#));
        assert!(doc.contains("add-recipe-window hidden"));
    }

    #[test]
    fn visible_modal_drops_hidden_class() {
        let empty = Region::new("x");
        let doc = document(&parts(&empty, &empty, true)).into_string();
        assert!(doc.contains(r#"class="overlay""#));
        assert!(!doc.contains("add-recipe-window hidden"));
    }
}
