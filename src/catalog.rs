use rand::seq::IndexedRandom;
use rand::Rng;
use std::collections::BTreeSet;

use crate::model::Recipe;

/// Recipes whose name contains `query`, ignoring case.
pub fn search_by_name<'a>(recipes: &'a [Recipe], query: &str) -> Vec<&'a Recipe> {
    let needle = query.trim().to_lowercase();
    recipes
        .iter()
        .filter(|recipe| recipe.name.to_lowercase().contains(&needle))
        .collect()
}

/// Distinct non-empty region tags, sorted.
pub fn states(recipes: &[Recipe]) -> Vec<String> {
    recipes
        .iter()
        .map(|recipe| recipe.state.trim())
        .filter(|state| !state.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

pub fn in_states<'a>(recipes: &'a [Recipe], states: &[String]) -> Vec<&'a Recipe> {
    recipes
        .iter()
        .filter(|recipe| states.iter().any(|state| state == recipe.state.trim()))
        .collect()
}

/// Recipes picked by name; every recipe sharing a selected name is included.
pub fn select_by_names<'a>(recipes: &'a [Recipe], names: &[String]) -> Vec<&'a Recipe> {
    recipes
        .iter()
        .filter(|recipe| names.contains(&recipe.name))
        .collect()
}

/// Picks the home page "Today's Special".
pub fn todays_special<'a, R: Rng + ?Sized>(recipes: &'a [Recipe], rng: &mut R) -> Option<&'a Recipe> {
    recipes.choose(rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn recipe(name: &str, state: &str) -> Recipe {
        Recipe {
            name: name.to_string(),
            state: state.to_string(),
            ..Default::default()
        }
    }

    fn sample() -> Vec<Recipe> {
        vec![
            recipe("Masala Dosa", "Karnataka"),
            recipe("Bisi Bele Bath", "Karnataka"),
            recipe("Dal Baati", "Rajasthan"),
            recipe("Untagged", ""),
        ]
    }

    #[test]
    fn test_search_ignores_case() {
        let recipes = sample();
        let found = search_by_name(&recipes, "DOSA");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Masala Dosa");
        assert!(search_by_name(&recipes, "biryani").is_empty());
    }

    #[test]
    fn test_empty_query_matches_everything() {
        let recipes = sample();
        assert_eq!(search_by_name(&recipes, "").len(), recipes.len());
    }

    #[test]
    fn test_states_are_distinct_and_non_empty() {
        assert_eq!(states(&sample()), vec!["Karnataka", "Rajasthan"]);
    }

    #[test]
    fn test_in_states() {
        let recipes = sample();
        let picked = in_states(&recipes, &["Karnataka".to_string()]);
        let names: Vec<_> = picked.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Masala Dosa", "Bisi Bele Bath"]);
        assert!(in_states(&recipes, &[]).is_empty());
    }

    #[test]
    fn test_select_by_names_keeps_duplicates() {
        let mut recipes = sample();
        recipes.push(recipe("Dal Baati", "Madhya Pradesh"));
        let picked = select_by_names(&recipes, &["Dal Baati".to_string()]);
        assert_eq!(picked.len(), 2);
    }

    #[test]
    fn test_todays_special() {
        let mut rng = StdRng::seed_from_u64(7);
        let recipes = sample();
        let special = todays_special(&recipes, &mut rng).unwrap();
        assert!(recipes.contains(special));
        assert!(todays_special(&[], &mut rng).is_none());
    }
}
