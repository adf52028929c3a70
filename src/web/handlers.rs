use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use log::{debug, info, warn};
use serde::Deserialize;

use super::pages::{
    render, HomeView, Level, Notice, Page, SearchResults, ShoppingOutcome, ShoppingView,
};
use super::AppState;
use crate::catalog;
use crate::error::AppError;
use crate::flipbook::{self, Flipbook, FlipbookEntry};
use crate::model::{Recipe, RecipeForm};
use crate::shopping::consolidate;

/// Repeated form fields such as `recipe=a&recipe=b`
type FormPairs = Vec<(String, String)>;

fn values_of(pairs: &FormPairs, key: &str) -> Vec<String> {
    pairs
        .iter()
        .filter(|(k, _)| k == key)
        .map(|(_, v)| v.clone())
        .collect()
}

/// `Content-Disposition` value; header values must stay printable ASCII.
fn attachment(file_name: &str) -> String {
    let safe: String = file_name
        .chars()
        .filter(|c| (c.is_ascii_graphic() && *c != '"' && *c != '\\') || *c == ' ')
        .collect();
    format!("attachment; filename=\"{}\"", safe)
}

/// Reads the recipe file on the blocking pool.
async fn load_recipes(state: &AppState) -> Result<Vec<Recipe>, AppError> {
    let store = state.store.clone();
    tokio::task::spawn_blocking(move || store.load()).await?
}

async fn append_recipe(state: &AppState, recipe: Recipe) -> Result<(), AppError> {
    let store = state.store.clone();
    tokio::task::spawn_blocking(move || store.append(&recipe)).await?
}

fn page(page: Page) -> Html<String> {
    Html(render(&page))
}

#[derive(Debug, Default, Deserialize)]
pub struct HomeQuery {
    /// Present once the search form is submitted, possibly empty
    q: Option<String>,
    #[serde(default)]
    added: bool,
}

fn home_view(recipes: &[Recipe], query: Option<String>) -> HomeView {
    let search = query.map(|query| {
        let matches = catalog::search_by_name(recipes, &query)
            .into_iter()
            .cloned()
            .collect();
        SearchResults { query, matches }
    });
    let special = catalog::todays_special(recipes, &mut rand::rng()).cloned();

    HomeView {
        search,
        special,
        states: catalog::states(recipes),
        notice: None,
    }
}

pub async fn home(
    State(state): State<AppState>,
    Query(params): Query<HomeQuery>,
) -> Result<Html<String>, AppError> {
    let recipes = load_recipes(&state).await?;
    if let Some(q) = &params.q {
        debug!("Searching {} recipes for '{}'", recipes.len(), q);
    }

    let mut view = home_view(&recipes, params.q);
    if params.added {
        view.notice = Some(Notice::new(Level::Success, "Recipe added successfully!"));
    }
    Ok(page(Page::Home(view)))
}

pub async fn all_recipes(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let recipes = load_recipes(&state).await?;
    Ok(page(Page::AllRecipes(recipes)))
}

pub async fn new_recipe() -> Html<String> {
    page(Page::AddRecipe {
        form: RecipeForm::default(),
        error: None,
    })
}

pub async fn create_recipe(
    State(state): State<AppState>,
    Form(form): Form<RecipeForm>,
) -> Result<Response, AppError> {
    match form.validate() {
        Ok(recipe) => {
            append_recipe(&state, recipe).await?;
            Ok(Redirect::to("/?added=true").into_response())
        }
        Err(e) => {
            info!("Rejected recipe submission, missing {:?}", e.missing);
            let body = page(Page::AddRecipe {
                form,
                error: Some(e.to_string()),
            });
            Ok((StatusCode::UNPROCESSABLE_ENTITY, body).into_response())
        }
    }
}

pub async fn nani_secrets() -> Html<String> {
    page(Page::NaniSecrets)
}

pub async fn shopping_list(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let recipes = load_recipes(&state).await?;
    Ok(page(Page::ShoppingList(ShoppingView {
        recipes,
        selected: Vec::new(),
        outcome: ShoppingOutcome::NotRequested,
    })))
}

pub async fn generate_shopping_list(
    State(state): State<AppState>,
    Form(pairs): Form<FormPairs>,
) -> Result<Html<String>, AppError> {
    let recipes = load_recipes(&state).await?;
    let selected = values_of(&pairs, "recipe");
    let picked = catalog::select_by_names(&recipes, &selected);

    let outcome = if picked.is_empty() {
        ShoppingOutcome::NothingSelected
    } else {
        ShoppingOutcome::List(consolidate(picked))
    };
    Ok(page(Page::ShoppingList(ShoppingView {
        recipes,
        selected,
        outcome,
    })))
}

pub async fn download_shopping_list(
    State(state): State<AppState>,
    Form(pairs): Form<FormPairs>,
) -> Result<Response, AppError> {
    let recipes = load_recipes(&state).await?;
    let selected = values_of(&pairs, "recipe");
    let picked = catalog::select_by_names(&recipes, &selected);

    if picked.is_empty() {
        let body = page(Page::ShoppingList(ShoppingView {
            recipes,
            selected,
            outcome: ShoppingOutcome::NothingSelected,
        }));
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, body).into_response());
    }

    let list = consolidate(picked).to_text();
    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, attachment("shopping_list.txt")),
        ],
        list,
    )
        .into_response())
}

pub async fn create_flipbook(
    State(state): State<AppState>,
    Form(pairs): Form<FormPairs>,
) -> Result<Response, AppError> {
    let recipes = load_recipes(&state).await?;
    let selected = values_of(&pairs, "state");
    let picked = catalog::in_states(&recipes, &selected);

    if picked.is_empty() {
        warn!("No recipes for flipbook states {:?}", selected);
        let mut view = home_view(&recipes, None);
        view.notice = Some(Notice::new(
            Level::Warning,
            "No recipes available for the selected states.",
        ));
        return Ok(page(Page::Home(view)).into_response());
    }

    let picked: Vec<Recipe> = picked.into_iter().cloned().collect();
    let images: Vec<Option<Vec<u8>>> = {
        let refs: Vec<&Recipe> = picked.iter().collect();
        Flipbook::fetch_images(state.images.as_ref(), &refs)
            .await
            .into_iter()
            .map(|entry| entry.image)
            .collect()
    };
    let disposition = attachment(&flipbook::file_name(&selected));

    // Image decoding and PDF layout are CPU bound
    let book = state.flipbook.clone();
    let pdf = tokio::task::spawn_blocking(move || {
        let entries: Vec<FlipbookEntry<'_>> = picked
            .iter()
            .zip(images)
            .map(|(recipe, image)| FlipbookEntry { recipe, image })
            .collect();
        book.render(&selected, &entries)
    })
    .await??;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        pdf,
    )
        .into_response())
}
