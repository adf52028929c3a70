mod handlers;
pub mod pages;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use log::{error, info};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::{AppError, Result};
use crate::flipbook::Flipbook;
use crate::images::{HttpImageFetcher, ImageSource};
use crate::store::{CsvRecipeStore, RecipeStore};

pub use pages::{render, Page};

/// Collaborators shared by every request
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecipeStore>,
    pub images: Arc<dyn ImageSource>,
    pub flipbook: Arc<Flipbook>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn RecipeStore>,
        images: Arc<dyn ImageSource>,
        flipbook: Flipbook,
    ) -> Self {
        Self {
            store,
            images,
            flipbook: Arc::new(flipbook),
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let store = CsvRecipeStore::new(&config.storage.path);
        let images = HttpImageFetcher::from_config(&config.images)?;
        Ok(Self::new(
            Arc::new(store),
            Arc::new(images),
            Flipbook::from_config(&config.flipbook),
        ))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(e) => {
                (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()).into_response()
            }
            other => {
                error!("Request failed: {}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Something went wrong: {}", other),
                )
                    .into_response()
            }
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/recipes", get(handlers::all_recipes).post(handlers::create_recipe))
        .route("/recipes/new", get(handlers::new_recipe))
        .route("/nani-secrets", get(handlers::nani_secrets))
        .route(
            "/shopping-list",
            get(handlers::shopping_list).post(handlers::generate_shopping_list),
        )
        .route(
            "/shopping-list/download",
            post(handlers::download_shopping_list),
        )
        .route("/flipbook", post(handlers::create_flipbook))
        .with_state(state)
}

/// Binds the configured address and serves until the process is stopped.
pub async fn serve(config: &AppConfig) -> Result<()> {
    let state = AppState::from_config(config)?;
    let listener = tokio::net::TcpListener::bind(config.server.bind.as_str()).await?;
    info!(
        "Serving recipes from {} on http://{}",
        config.storage.path.display(),
        listener.local_addr()?
    );
    axum::serve(listener, router(state)).await?;
    Ok(())
}
