//! Shopping list generation.
//!
//! Ingredients are compared exactly as typed after trimming, so "Tomato" and
//! "tomato" are listed separately.

use indexmap::IndexMap;

use crate::model::Recipe;

/// Tips shown under every generated shopping list.
pub const SUSTAINABLE_TIPS: &[(&str, &str)] = &[
    ("Reduce Waste", "Store unused ingredients for later."),
    ("Buy Locally", "Support farmers by choosing fresh, local produce."),
    (
        "Smart Substitutes",
        "Use alternatives like jaggery for sugar or coconut oil instead of butter.",
    ),
];

/// Ingredient occurrence counts in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngredientCounts {
    counts: IndexMap<String, usize>,
}

impl IngredientCounts {
    pub fn get(&self, ingredient: &str) -> Option<usize> {
        self.counts.get(ingredient).copied()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(name, count)| (name.as_str(), *count))
    }

    /// Plain-text shopping list, one `ingredient: count` line per entry.
    pub fn to_text(&self) -> String {
        self.iter()
            .map(|(ingredient, count)| format!("{}: {}", ingredient, count))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn add(&mut self, ingredient: &str) {
        *self.counts.entry(ingredient.to_string()).or_insert(0) += 1;
    }
}

/// Splits a comma-separated ingredient field into trimmed, non-empty tokens.
pub fn ingredient_tokens(ingredients: &str) -> impl Iterator<Item = &str> {
    ingredients
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Counts every ingredient mention across the given recipes.
pub fn consolidate<'a, I>(recipes: I) -> IngredientCounts
where
    I: IntoIterator<Item = &'a Recipe>,
{
    let mut counts = IngredientCounts::default();
    for recipe in recipes {
        for token in ingredient_tokens(&recipe.ingredients) {
            counts.add(token);
        }
    }
    counts
}
