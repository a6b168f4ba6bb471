use super::{View, icon};
use crate::dom::Region;
use crate::upload::FormPayload;
use maud::{Markup, html};

pub const UPLOAD_SUCCESS: &str = "Recipe was successfully uploaded.";

/// Ingredient inputs offered by the form.
pub const INGREDIENT_SLOTS: usize = 6;

const RECIPE_FIELDS: [(&str, &str, &str); 6] = [
    ("Title", "title", "text"),
    ("URL", "sourceUrl", "text"),
    ("Image URL", "image", "text"),
    ("Publisher", "publisher", "text"),
    ("Prep time", "cookingTime", "number"),
    ("Servings", "servings", "number"),
];

/// The upload form inside the add-recipe modal.
#[derive(Debug, Clone)]
pub struct AddRecipeView {
    region: Region,
    icons: String,
    visible: bool,
}

impl AddRecipeView {
    pub fn new(icons: &str) -> Self {
        Self {
            region: Region::new("upload"),
            icons: icons.to_string(),
            visible: false,
        }
    }

    pub fn show_window(&mut self) {
        self.visible = true;
    }

    pub fn hide_window(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

impl View for AddRecipeView {
    type Data = FormPayload;

    fn region(&self) -> &Region {
        &self.region
    }

    fn region_mut(&mut self) -> &mut Region {
        &mut self.region
    }

    fn icons(&self) -> &str {
        &self.icons
    }

    fn success_message(&self) -> &str {
        UPLOAD_SUCCESS
    }

    fn generate_markup(&self, form: &FormPayload) -> Markup {
        html! {
            form.upload {
                div.upload__column {
                    h3.upload__heading { "Recipe data" }
                    @for (label, name, kind) in RECIPE_FIELDS {
                        label { (label) }
                        input type=(kind) name=(name) value=(form.get(name).unwrap_or("")) required;
                    }
                }
                div.upload__column {
                    h3.upload__heading { "Ingredients" }
                    @for slot in 1..=INGREDIENT_SLOTS {
                        @let name = format!("ingredient-{slot}");
                        label { "Ingredient " (slot) }
                        input type="text" name=(name) value=(form.get(&name).unwrap_or(""))
                            placeholder="Format: 'Quantity,Unit,Description'";
                    }
                }
                button class="btn upload__btn" {
                    (icon(&self.icons, "upload-cloud", None))
                    span { "Upload" }
                }
            }
        }
    }
}
