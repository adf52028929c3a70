pub mod catalog;
pub mod config;
pub mod error;
pub mod flipbook;
pub mod images;
pub mod model;
pub mod shopping;
pub mod steps;
pub mod store;
pub mod web;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{AppError, Result};
pub use flipbook::{Flipbook, FlipbookEntry};
pub use images::{HttpImageFetcher, ImageSource};
pub use model::{Recipe, RecipeForm, ValidationError, NO_IMAGE};
pub use shopping::{consolidate, IngredientCounts};
pub use steps::{format_steps, step_lines};
pub use store::{CsvRecipeStore, RecipeStore};
pub use web::{router, AppState};
