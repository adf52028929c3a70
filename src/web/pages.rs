//! HTML for every screen of the site.
//!
//! Each route hands a [`Page`] to [`render`]; nothing here keeps state
//! between requests.

use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};
use std::fmt::Write as _;

use crate::model::{Recipe, RecipeForm};
use crate::shopping::{IngredientCounts, SUSTAINABLE_TIPS};
use crate::steps::step_lines;

pub const NANI_TIPS: &[(&str, &str)] = &[
    ("Spices", "Roast spices to enhance flavor and aroma."),
    ("Preservation", "Store herbs in damp towels to keep them fresh."),
    ("Rotis", "Add yogurt to your dough for softer, fluffier rotis."),
    ("Soups", "Use vegetable scraps to make delicious broths."),
];

const STYLE: &str = r#"
.block-container { padding: 2rem 3rem; max-width: 60rem; margin: auto; font-family: sans-serif; }
.button { display: inline-block; background-color: #4CAF50; color: white; border: none; padding: 10px 20px; font-size: 16px; border-radius: 5px; text-decoration: none; cursor: pointer; }
.button:hover { background-color: #45a049; }
.categories { display: flex; gap: 1rem; }
.special-section { padding: 20px; border-radius: 10px; box-shadow: 0 2px 4px rgba(0, 0, 0, 0.1); margin-bottom: 20px; }
.success { color: #2e7d32; } .warning { color: #b26a00; } .error { color: #c62828; } .info { color: #1565c0; }
.recipe img { max-width: 20rem; }
"#;

/// Tone of a banner message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Info,
    Warning,
    Error,
}

impl Level {
    fn class(self) -> &'static str {
        match self {
            Level::Success => "success",
            Level::Info => "info",
            Level::Warning => "warning",
            Level::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: Level,
    pub message: String,
}

impl Notice {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

/// Everything the home page shows.
#[derive(Debug, Clone, Default)]
pub struct HomeView {
    /// Set once the visitor has searched
    pub search: Option<SearchResults>,
    pub special: Option<Recipe>,
    /// Region tags offered for the flipbook
    pub states: Vec<String>,
    pub notice: Option<Notice>,
}

#[derive(Debug, Clone, Default)]
pub struct SearchResults {
    pub query: String,
    pub matches: Vec<Recipe>,
}

#[derive(Debug, Clone)]
pub enum ShoppingOutcome {
    NotRequested,
    NothingSelected,
    List(IngredientCounts),
}

#[derive(Debug, Clone)]
pub struct ShoppingView {
    /// All stored recipes, offered for selection
    pub recipes: Vec<Recipe>,
    pub selected: Vec<String>,
    pub outcome: ShoppingOutcome,
}

/// A screen of the site together with the data it displays.
#[derive(Debug, Clone)]
pub enum Page {
    Home(HomeView),
    AddRecipe {
        form: RecipeForm,
        error: Option<String>,
    },
    AllRecipes(Vec<Recipe>),
    NaniSecrets,
    ShoppingList(ShoppingView),
}

impl Page {
    pub fn title(&self) -> &'static str {
        match self {
            Page::Home(_) => "Namaste, Foodie",
            Page::AddRecipe { .. } => "Add Your Recipe",
            Page::AllRecipes(_) => "View all Recipes",
            Page::NaniSecrets => "Nani's Secrets",
            Page::ShoppingList(_) => "Shopping List Generator",
        }
    }
}

/// Full HTML document for `page`.
pub fn render(page: &Page) -> String {
    let body = match page {
        Page::Home(view) => home(view),
        Page::AddRecipe { form, error } => add_recipe(form, error.as_deref()),
        Page::AllRecipes(recipes) => all_recipes(recipes),
        Page::NaniSecrets => nani_secrets(),
        Page::ShoppingList(view) => shopping_list(view),
    };
    layout(page.title(), &body)
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n<div class=\"block-container\">\n<h1>{title}</h1>\n{body}</div>\n</body>\n</html>\n",
        title = text(title),
    )
}

fn notice(out: &mut String, notice: &Notice) {
    let _ = writeln!(
        out,
        "<p class=\"{}\">{}</p>",
        notice.level.class(),
        text(&notice.message)
    );
}

fn back_home(out: &mut String) {
    out.push_str("<p><a class=\"button\" href=\"/\">Back to Home</a></p>\n");
}

fn steps_html(raw: &str) -> String {
    step_lines(raw)
        .iter()
        .map(|line| text(line).into_owned())
        .collect::<Vec<_>>()
        .join("<br>\n")
}

fn recipe_image(out: &mut String, recipe: &Recipe) {
    if let Some(url) = recipe.image_url() {
        let _ = writeln!(
            out,
            "<figure><img src=\"{}\" alt=\"{}\"><figcaption>{}</figcaption></figure>",
            attr(url),
            attr(&recipe.name),
            text(&recipe.name)
        );
    }
}

fn recipe_card(out: &mut String, recipe: &Recipe) {
    out.push_str("<section class=\"recipe\">\n");
    let _ = writeln!(out, "<h3>{}</h3>", text(&recipe.name));
    let _ = writeln!(
        out,
        "<p><em>Ingredients:</em> {}</p>",
        text(&recipe.ingredients)
    );
    let _ = writeln!(out, "<p><em>Steps:</em><br>\n{}</p>", steps_html(&recipe.steps));
    let _ = writeln!(
        out,
        "<p><em>Background:</em> {}</p>",
        text(&recipe.background)
    );
    let _ = writeln!(out, "<p><em>State:</em> {}</p>", text(&recipe.state));
    recipe_image(out, recipe);
    out.push_str("</section>\n<hr>\n");
}

fn home(view: &HomeView) -> String {
    let mut out = String::new();
    out.push_str("<h2>Reviving Traditions, One Recipe at a Time!</h2>\n");
    if let Some(n) = &view.notice {
        notice(&mut out, n);
    }

    let query = view.search.as_ref().map(|s| s.query.as_str()).unwrap_or("");
    let _ = writeln!(
        out,
        "<form method=\"get\" action=\"/\">\n<label>Search for Recipes <input type=\"text\" name=\"q\" value=\"{}\" placeholder=\"Enter a recipe name...\"></label>\n<button class=\"button\" type=\"submit\">Search</button>\n</form>",
        attr(query)
    );
    if let Some(search) = &view.search {
        if search.matches.is_empty() {
            notice(&mut out, &Notice::new(Level::Info, "No matching recipes found."));
        }
        for recipe in &search.matches {
            recipe_card(&mut out, recipe);
        }
    }
    out.push_str("<p><a class=\"button\" href=\"/recipes/new\">ADD RECIPE</a></p>\n");

    out.push_str("<h2>Today's Specials</h2>\n");
    match &view.special {
        Some(recipe) => {
            out.push_str("<div class=\"special-section\">\n");
            let _ = writeln!(out, "<p><strong>{}</strong></p>\n<ul>", text(&recipe.name));
            let _ = writeln!(
                out,
                "<li><em>Ingredients:</em> {}</li>",
                text(&recipe.ingredients)
            );
            let _ = writeln!(out, "<li><em>Steps:</em><br>\n{}</li>", steps_html(&recipe.steps));
            let _ = writeln!(
                out,
                "<li><em>Background:</em> {}</li>\n</ul>\n</div>",
                text(&recipe.background)
            );
        }
        None => out.push_str("<p>No recipes available yet!</p>\n"),
    }

    out.push_str("<h2>Generate Recipe Flipbook</h2>\n<form method=\"post\" action=\"/flipbook\">\n<fieldset><legend>Select States</legend>\n");
    for state in &view.states {
        let _ = writeln!(
            out,
            "<label><input type=\"checkbox\" name=\"state\" value=\"{}\"> {}</label>",
            attr(state),
            text(state)
        );
    }
    out.push_str("</fieldset>\n<button class=\"button\" type=\"submit\">Create Flipbook</button>\n</form>\n");

    out.push_str("<h2>Categories</h2>\n<nav class=\"categories\">\n");
    out.push_str("<a class=\"button\" href=\"/nani-secrets\">Nani's Secrets</a>\n");
    out.push_str("<a class=\"button\" href=\"/shopping-list\">Shopping List Generator</a>\n");
    out.push_str("<a class=\"button\" href=\"/recipes\">View All Recipes</a>\n");
    out.push_str("</nav>\n");
    out
}

fn add_recipe(form: &RecipeForm, error: Option<&str>) -> String {
    let mut out = String::new();
    if let Some(message) = error {
        notice(&mut out, &Notice::new(Level::Error, message));
    }
    out.push_str("<form method=\"post\" action=\"/recipes\">\n");
    let _ = writeln!(
        out,
        "<p><label>Recipe Name<br><input type=\"text\" name=\"name\" value=\"{}\"></label></p>",
        attr(&form.name)
    );
    let _ = writeln!(
        out,
        "<p><label>Ingredients (comma-separated)<br><textarea name=\"ingredients\">{}</textarea></label></p>",
        text(&form.ingredients)
    );
    let _ = writeln!(
        out,
        "<p><label>Steps<br><textarea name=\"steps\">{}</textarea></label></p>",
        text(&form.steps)
    );
    let _ = writeln!(
        out,
        "<p><label>Background/Story<br><textarea name=\"background\">{}</textarea></label></p>",
        text(&form.background)
    );
    let _ = writeln!(
        out,
        "<p><label>State of Origin<br><input type=\"text\" name=\"state\" value=\"{}\"></label></p>",
        attr(&form.state)
    );
    let _ = writeln!(
        out,
        "<p><label>Image URL (optional)<br><input type=\"text\" name=\"image\" value=\"{}\"></label></p>",
        attr(&form.image)
    );
    out.push_str("<button class=\"button\" type=\"submit\">Submit Recipe</button>\n</form>\n");
    back_home(&mut out);
    out
}

fn all_recipes(recipes: &[Recipe]) -> String {
    let mut out = String::new();
    if recipes.is_empty() {
        out.push_str("<p>No recipes available yet!</p>\n");
    }
    for recipe in recipes {
        recipe_card(&mut out, recipe);
    }
    back_home(&mut out);
    out
}

fn nani_secrets() -> String {
    let mut out = String::from("<h3>Timeless Tips from Nani's Kitchen:</h3>\n<ul>\n");
    for (topic, tip) in NANI_TIPS {
        let _ = writeln!(out, "<li><strong>{}:</strong> {}</li>", topic, tip);
    }
    out.push_str("</ul>\n");
    back_home(&mut out);
    out
}

fn shopping_list(view: &ShoppingView) -> String {
    let mut out = String::new();
    if view.recipes.is_empty() {
        notice(
            &mut out,
            &Notice::new(Level::Warning, "No recipes available! Please add some first."),
        );
        back_home(&mut out);
        return out;
    }

    out.push_str("<form method=\"post\" action=\"/shopping-list\">\n<fieldset><legend>Select Recipes to Generate a Shopping List:</legend>\n");
    let mut offered: Vec<&str> = Vec::new();
    for recipe in &view.recipes {
        // Same-named recipes are selected together, so offer each name once
        if offered.contains(&recipe.name.as_str()) {
            continue;
        }
        offered.push(&recipe.name);
        let checked = if view.selected.contains(&recipe.name) {
            " checked"
        } else {
            ""
        };
        let _ = writeln!(
            out,
            "<label><input type=\"checkbox\" name=\"recipe\" value=\"{}\"{}> {}</label><br>",
            attr(&recipe.name),
            checked,
            text(&recipe.name)
        );
    }
    out.push_str("</fieldset>\n<button class=\"button\" type=\"submit\">Generate Shopping List</button>\n</form>\n");

    match &view.outcome {
        ShoppingOutcome::NotRequested => {}
        ShoppingOutcome::NothingSelected => notice(
            &mut out,
            &Notice::new(Level::Error, "Please select at least one recipe!"),
        ),
        ShoppingOutcome::List(counts) => {
            out.push_str("<h3>Consolidated Shopping List:</h3>\n<ul>\n");
            for (ingredient, count) in counts.iter() {
                let _ = writeln!(out, "<li>{}: {} Portions</li>", text(ingredient), count);
            }
            out.push_str("</ul>\n<form method=\"post\" action=\"/shopping-list/download\">\n");
            for name in &view.selected {
                let _ = writeln!(
                    out,
                    "<input type=\"hidden\" name=\"recipe\" value=\"{}\">",
                    attr(name)
                );
            }
            out.push_str("<button class=\"button\" type=\"submit\">Download Shopping List</button>\n</form>\n");
        }
    }

    out.push_str("<h3>Sustainable Tips:</h3>\n<ul>\n");
    for (topic, tip) in SUSTAINABLE_TIPS {
        let _ = writeln!(out, "<li><strong>{}:</strong> {}</li>", topic, tip);
    }
    out.push_str("</ul>\n");
    back_home(&mut out);
    out
}
