use log::{debug, info, warn};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::Result;
use crate::model::Recipe;

/// Column order of the recipe file.
pub const HEADER: [&str; 6] = ["Name", "Ingredients", "Steps", "Background", "State", "Image"];

/// Append-only recipe persistence
pub trait RecipeStore: Send + Sync {
    /// Every stored recipe, in insertion order.
    fn load(&self) -> Result<Vec<Recipe>>;

    fn append(&self, recipe: &Recipe) -> Result<()>;
}

/// Recipes kept in a single CSV file with a header row.
pub struct CsvRecipeStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl CsvRecipeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecipeStore for CsvRecipeStore {
    fn load(&self) -> Result<Vec<Recipe>> {
        if !self.path.exists() {
            debug!("No recipe file at {}", self.path.display());
            return Ok(Vec::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(&self.path)?;
        let columns = Columns::from_header(reader.byte_headers()?);

        let mut recipes = Vec::new();
        for (row, record) in reader.byte_records().enumerate() {
            match record {
                Ok(record) => recipes.push(columns.recipe(&record)),
                Err(e) if e.is_io_error() => return Err(e.into()),
                Err(e) => warn!("Skipping malformed recipe row {}: {}", row + 1, e),
            }
        }

        debug!("Loaded {} recipes from {}", recipes.len(), self.path.display());
        Ok(recipes)
    }

    fn append(&self, recipe: &Recipe) -> Result<()> {
        // Poisoning only means another append panicked; the file is still usable.
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let needs_header = file.metadata()?.len() == 0;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        if needs_header {
            writer.write_record(HEADER)?;
        }
        writer.serialize(recipe)?;
        writer.flush()?;

        info!("Saved recipe '{}' ({})", recipe.name, recipe.state);
        Ok(())
    }
}

/// Position of each recipe field in the file.
///
/// Unknown or missing header names fall back to the standard column order.
struct Columns([usize; 6]);

impl Columns {
    fn from_header(header: &csv::ByteRecord) -> Self {
        let names: Vec<String> = header
            .iter()
            .map(|name| String::from_utf8_lossy(name).trim().to_string())
            .collect();
        let mut positions = [0; 6];
        for (i, field) in HEADER.iter().enumerate() {
            positions[i] = names.iter().position(|name| name == field).unwrap_or(i);
        }
        Self(positions)
    }

    /// Builds a recipe from a row; missing cells are empty and invalid UTF-8 is replaced.
    fn recipe(&self, record: &csv::ByteRecord) -> Recipe {
        let cell = |i: usize| {
            record
                .get(self.0[i])
                .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
                .unwrap_or_default()
        };
        Recipe {
            name: cell(0),
            ingredients: cell(1),
            steps: cell(2),
            background: cell(3),
            state: cell(4),
            image: cell(5),
        }
    }
}
