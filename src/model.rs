use serde::{Deserialize, Serialize};
use std::fmt;

/// Value stored in the image column when a recipe has no picture.
pub const NO_IMAGE: &str = "N/A";

/// A shared dish, one row of the recipe file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(rename = "Name", default)]
    pub name: String,
    /// Comma-separated, free text
    #[serde(rename = "Ingredients", default)]
    pub ingredients: String,
    #[serde(rename = "Steps", default)]
    pub steps: String,
    #[serde(rename = "Background", default)]
    pub background: String,
    /// Region tag, e.g. "Punjab"
    #[serde(rename = "State", default)]
    pub state: String,
    #[serde(rename = "Image", default)]
    pub image: String,
}

impl Recipe {
    /// The picture URL, if the recipe has one.
    ///
    /// Empty values and the `N/A` placeholder both mean "no image".
    pub fn image_url(&self) -> Option<&str> {
        let image = self.image.trim();
        if image.is_empty() || image == NO_IMAGE {
            None
        } else {
            Some(image)
        }
    }
}

/// Raw fields of the "Add Your Recipe" form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RecipeForm {
    pub name: String,
    pub ingredients: String,
    pub steps: String,
    pub background: String,
    pub state: String,
    pub image: String,
}

/// Rejection of an incomplete submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Form fields that were left blank
    pub missing: Vec<&'static str>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Please fill out all fields!")
    }
}

impl std::error::Error for ValidationError {}

impl RecipeForm {
    /// Checks that every required field has content and builds the record to store.
    ///
    /// The image URL is optional and falls back to [`NO_IMAGE`].
    pub fn validate(&self) -> Result<Recipe, ValidationError> {
        let required = [
            ("name", &self.name),
            ("ingredients", &self.ingredients),
            ("steps", &self.steps),
            ("background", &self.background),
            ("state", &self.state),
        ];
        let missing: Vec<&'static str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(field, _)| *field)
            .collect();

        if !missing.is_empty() {
            return Err(ValidationError { missing });
        }

        let image = self.image.trim();
        Ok(Recipe {
            name: self.name.clone(),
            ingredients: self.ingredients.clone(),
            steps: self.steps.clone(),
            background: self.background.clone(),
            state: self.state.clone(),
            image: if image.is_empty() {
                NO_IMAGE.to_string()
            } else {
                image.to_string()
            },
        })
    }
}
