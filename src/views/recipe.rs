use super::{View, icon};
use crate::dom::Region;
use crate::types::{Ingredient, Recipe};
use maud::{Markup, html};

pub const RECIPE_ERROR: &str = "We could not find that recipe. Please try another one";

/// Denominators tried, in order, when rendering a quantity as a fraction.
const DENOMINATORS: [u32; 4] = [2, 3, 4, 8];
const FRACTION_TOLERANCE: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServingsButton {
    Decrease,
    Increase,
}

impl ServingsButton {
    fn class(self) -> &'static str {
        match self {
            ServingsButton::Decrease => "btn--decrease-servings",
            ServingsButton::Increase => "btn--increase-servings",
        }
    }
}

/// The detail panel for the current recipe.
#[derive(Debug, Clone)]
pub struct RecipeView {
    region: Region,
    icons: String,
}

impl RecipeView {
    pub fn new(icons: &str) -> Self {
        Self {
            region: Region::new("recipe"),
            icons: icons.to_string(),
        }
    }

    /// Servings the rendered `button` asks for. Targets below 1 are ignored.
    pub fn servings_target(&self, button: ServingsButton) -> Option<u32> {
        let target: i64 = self
            .region
            .find_by_class(button.class())?
            .attr("data-new-servings")?
            .parse()
            .ok()?;
        u32::try_from(target).ok().filter(|n| *n > 0)
    }

    fn ingredient(&self, ing: &Ingredient) -> Markup {
        html! {
            li.recipe__ingredient {
                (icon(&self.icons, "check", Some("recipe__icon")))
                div.recipe__quantity {
                    @if let Some(q) = ing.quantity {
                        (format_quantity(q))
                    }
                }
                div.recipe__description {
                    span.recipe__unit { (ing.unit) }
                    " " (ing.description)
                }
            }
        }
    }
}

impl View for RecipeView {
    type Data = Recipe;

    fn region(&self) -> &Region {
        &self.region
    }

    fn region_mut(&mut self) -> &mut Region {
        &mut self.region
    }

    fn icons(&self) -> &str {
        &self.icons
    }

    fn error_message(&self) -> &str {
        RECIPE_ERROR
    }

    fn generate_markup(&self, recipe: &Recipe) -> Markup {
        let icons = self.icons.as_str();
        let bookmark_icon = if recipe.bookmarked {
            "bookmark-fill"
        } else {
            "bookmark"
        };
        let generated_class = if recipe.key.is_some() {
            "recipe__user-generated"
        } else {
            "recipe__user-generated hidden"
        };
        html! {
            figure.recipe__fig {
                img.recipe__img src=(recipe.image_url) alt=(recipe.title);
                h1.recipe__title {
                    span { (recipe.title) }
                }
            }
            div.recipe__details {
                div.recipe__info {
                    (icon(icons, "clock", Some("recipe__info-icon")))
                    span class="recipe__info-data recipe__info-data--minutes" { (recipe.cooking_time) }
                    span.recipe__info-text { "minutes" }
                }
                div.recipe__info {
                    (icon(icons, "users", Some("recipe__info-icon")))
                    span class="recipe__info-data recipe__info-data--people" { (recipe.servings) }
                    span.recipe__info-text { "servings" }
                    div.recipe__info-buttons {
                        button class="btn--tiny btn--decrease-servings"
                            data-new-servings=(i64::from(recipe.servings) - 1) {
                            (icon(icons, "minus-circle", None))
                        }
                        button class="btn--tiny btn--increase-servings"
                            data-new-servings=(i64::from(recipe.servings) + 1) {
                            (icon(icons, "plus-circle", None))
                        }
                    }
                }
                div class=(generated_class) {
                    (icon(icons, "user", None))
                }
                button class="btn--round btn--bookmark" {
                    (icon(icons, bookmark_icon, None))
                }
            }
            div.recipe__ingredients {
                h2.heading--2 { "Recipe ingredients" }
                ul.recipe__ingredient-list {
                    @for ing in &recipe.ingredients {
                        (self.ingredient(ing))
                    }
                }
            }
            div.recipe__directions {
                h2.heading--2 { "How to cook it" }
                p.recipe__directions-text {
                    "This recipe was carefully designed and tested by "
                    span.recipe__publisher { (recipe.publisher) }
                    ". Please check out directions at their website."
                }
                a class="btn--small recipe__btn" href=(recipe.source_url) target="_blank" {
                    span { "Directions" }
                    (icon(icons, "arrow-right", Some("search__icon")))
                }
            }
        }
    }
}

/// Human-friendly quantity: `0.5` → `1/2`, `1.5` → `1 1/2`, `2` → `2`.
///
/// Values within a hundredth of a half, third, quarter or eighth render as a
/// (mixed) fraction; anything else as a decimal with up to two places.
pub fn format_quantity(q: f64) -> String {
    if !q.is_finite() || q < 0.0 {
        return trim_decimal(q);
    }
    let whole = q.trunc();
    let frac = q - whole;

    for den in DENOMINATORS {
        let num = (frac * f64::from(den)).round();
        if (frac - num / f64::from(den)).abs() >= FRACTION_TOLERANCE {
            continue;
        }
        // Rounded to a whole number either way.
        if num == 0.0 || num == f64::from(den) {
            return format!("{}", whole + num / f64::from(den));
        }
        let (num, den) = reduce(num as u32, den);
        return if whole == 0.0 {
            format!("{num}/{den}")
        } else {
            format!("{whole} {num}/{den}")
        };
    }
    trim_decimal(q)
}

fn reduce(num: u32, den: u32) -> (u32, u32) {
    let (mut a, mut b) = (num, den);
    while b != 0 {
        (a, b) = (b, a % b);
    }
    (num / a, den / a)
}

fn trim_decimal(q: f64) -> String {
    let s = format!("{q:.2}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}
