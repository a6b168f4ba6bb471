//! User-submitted recipe forms.
//!
//! A submission arrives as a flat map of field name → string value, the same
//! shape a browser form produces. Ingredients are spread over
//! `ingredient-1` … `ingredient-N` fields, each a single
//! `quantity,unit,description` line:
//!
//! ```text
//! ingredient-1 = "0.5,kg,Rice"
//! ingredient-2 = "1,,Avocado"
//! ingredient-3 = ",,salt"
//! ```
//!
//! Parsing happens entirely client-side and fails before anything is sent if
//! a line does not split into exactly three fields.

use crate::types::{ApiRecipe, Ingredient};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Wrong ingredient format! Please use the correct format.")]
    IngredientFormat { field: String },
    #[error("Invalid quantity {value:?} in {field}")]
    InvalidQuantity { field: String, value: String },
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("{field} must be a positive whole number, got {value:?}")]
    InvalidNumber { field: &'static str, value: String },
    #[error("Could not read form: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not parse form: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Flat form submission.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct FormPayload {
    fields: BTreeMap<String, String>,
}

impl FormPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: &str) {
        self.fields.insert(name.to_string(), value.to_string());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Read a flat TOML table of string values.
    pub fn from_toml_file(path: &Path) -> Result<Self, UploadError> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Non-empty ingredient fields, ordered by their numeric suffix.
    fn ingredient_fields(&self) -> Vec<(&str, &str)> {
        let mut fields: Vec<(&str, &str)> = self
            .fields
            .iter()
            .filter(|(name, value)| name.starts_with("ingredient") && !value.trim().is_empty())
            .map(|(name, value)| (name.as_str(), value.as_str()))
            .collect();
        fields.sort_by_key(|(name, _)| ingredient_index(name));
        fields
    }

    fn required(&self, name: &'static str) -> Result<&str, UploadError> {
        self.get(name)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or(UploadError::MissingField(name))
    }

    fn positive(&self, name: &'static str) -> Result<u32, UploadError> {
        let raw = self.required(name)?;
        match raw.parse::<u32>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(UploadError::InvalidNumber {
                field: name,
                value: raw.to_string(),
            }),
        }
    }
}

/// `ingredient-12` → 12. Fields without a number sort last, by name.
fn ingredient_index(name: &str) -> (usize, String) {
    let digits: String = name.chars().filter(|c| c.is_ascii_digit()).collect();
    let index = digits.parse().unwrap_or(usize::MAX);
    (index, name.to_string())
}

/// Parse one `quantity,unit,description` line.
pub fn parse_ingredient(field: &str, line: &str) -> Result<Ingredient, UploadError> {
    let parts: Vec<&str> = line.split(',').map(str::trim).collect();
    let [quantity, unit, description] = parts.as_slice() else {
        return Err(UploadError::IngredientFormat {
            field: field.to_string(),
        });
    };

    let quantity = if quantity.is_empty() {
        None
    } else {
        let value = quantity
            .parse::<f64>()
            .ok()
            .filter(|q| q.is_finite())
            .ok_or_else(|| UploadError::InvalidQuantity {
                field: field.to_string(),
                value: quantity.to_string(),
            })?;
        Some(value)
    };

    Ok(Ingredient {
        quantity,
        unit: unit.to_string(),
        description: description.to_string(),
    })
}

/// Convert a form submission into the API upload shape.
pub fn to_api_recipe(form: &FormPayload) -> Result<ApiRecipe, UploadError> {
    let ingredients = form
        .ingredient_fields()
        .into_iter()
        .map(|(field, line)| parse_ingredient(field, line))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ApiRecipe {
        id: None,
        title: form.required("title")?.to_string(),
        publisher: form.required("publisher")?.to_string(),
        source_url: form.required("sourceUrl")?.to_string(),
        image_url: form.required("image")?.to_string(),
        servings: form.positive("servings")?,
        cooking_time: form.positive("cookingTime")?,
        ingredients,
        key: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_form() -> FormPayload {
        FormPayload::new()
            .with("title", "Avocado Rice")
            .with("publisher", "Me")
            .with("sourceUrl", "https://example.com/rice")
            .with("image", "https://example.com/rice.jpg")
            .with("servings", "4")
            .with("cookingTime", "25")
    }

    #[test]
    fn parses_three_part_ingredient() {
        let ing = parse_ingredient("ingredient-1", " 0.5 , kg , Rice ").unwrap();
        assert_eq!(ing.quantity, Some(0.5));
        assert_eq!(ing.unit, "kg");
        assert_eq!(ing.description, "Rice");
    }

    #[test]
    fn empty_quantity_is_null() {
        let ing = parse_ingredient("ingredient-3", ",,salt").unwrap();
        assert_eq!(ing.quantity, None);
        assert_eq!(ing.unit, "");
    }

    #[test]
    fn two_parts_is_format_error() {
        let err = parse_ingredient("ingredient-1", "1,Avocado").unwrap_err();
        assert!(matches!(err, UploadError::IngredientFormat { .. }));
        assert_eq!(
            err.to_string(),
            "Wrong ingredient format! Please use the correct format."
        );
    }

    #[test]
    fn four_parts_is_format_error() {
        assert!(matches!(
            parse_ingredient("ingredient-1", "1,cup,rice,extra"),
            Err(UploadError::IngredientFormat { .. })
        ));
    }

    #[test]
    fn non_numeric_quantity_is_rejected() {
        assert!(matches!(
            parse_ingredient("ingredient-1", "lots,cup,rice"),
            Err(UploadError::InvalidQuantity { .. })
        ));
    }

    #[test]
    fn ingredients_follow_numeric_order_and_skip_blanks() {
        let form = base_form()
            .with("ingredient-10", "3,,tenth")
            .with("ingredient-2", "2,,second")
            .with("ingredient-1", "1,,first")
            .with("ingredient-3", "");
        let recipe = to_api_recipe(&form).unwrap();
        let names: Vec<&str> = recipe
            .ingredients
            .iter()
            .map(|i| i.description.as_str())
            .collect();
        assert_eq!(names, ["first", "second", "tenth"]);
    }

    #[test]
    fn maps_form_fields_to_api_shape() {
        let recipe = to_api_recipe(&base_form().with("ingredient-1", "1,,Avocado")).unwrap();
        assert_eq!(recipe.source_url, "https://example.com/rice");
        assert_eq!(recipe.image_url, "https://example.com/rice.jpg");
        assert_eq!(recipe.servings, 4);
        assert_eq!(recipe.cooking_time, 25);
        assert!(recipe.id.is_none());
    }

    #[test]
    fn zero_servings_rejected() {
        let form = base_form().with("servings", "0");
        assert!(matches!(
            to_api_recipe(&form),
            Err(UploadError::InvalidNumber { field: "servings", .. })
        ));
    }

    #[test]
    fn missing_title_rejected() {
        let mut form = base_form();
        form.insert("title", "  ");
        assert!(matches!(
            to_api_recipe(&form),
            Err(UploadError::MissingField("title"))
        ));
    }

    #[test]
    fn form_reads_flat_toml() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("form.toml");
        fs::write(&path, "title = \"Soup\"\n\"ingredient-1\" = \"1,l,water\"\n").unwrap();
        let form = FormPayload::from_toml_file(&path).unwrap();
        assert_eq!(form.get("title"), Some("Soup"));
        assert_eq!(form.get("ingredient-1"), Some("1,l,water"));
    }
}
