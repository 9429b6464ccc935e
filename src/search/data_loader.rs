use csv::{ReaderBuilder, StringRecord};
use flate2::read::GzDecoder;
use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};
use tracing::{debug, info};

use crate::cuisine::{Cuisine, CUISINE_COL};
use crate::errors::{RecommenderError, Result};
use crate::recipe::{NutritionVector, Recipe, NUTRITION_COLUMNS, NUTRITION_DIMENSION};

// Define expected column headers
const NAME_COL: &str = "Name";
const INGREDIENTS_COL: &str = "RecipeIngredientParts";
const INSTRUCTIONS_COL: &str = "RecipeInstructions";
const COOK_TIME_COL: &str = "CookTime";
const PREP_TIME_COL: &str = "PrepTime";
const TOTAL_TIME_COL: &str = "TotalTime";

/// Locations tried, in order, when no explicit dataset path is configured.
pub const DEFAULT_DATASET_CANDIDATES: &[&str] = &[
    "data/dataset_enhanced.csv",
    "data/dataset.csv",
    "Data/dataset_enhanced.csv",
    "Data/dataset.csv",
];

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

static QUOTED: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r#""([^"]*)""#).ok());

/// Read-only recipe corpus shared by every request.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    recipes: Arc<Vec<Arc<Recipe>>>,
}

impl Corpus {
    pub fn new(recipes: Vec<Recipe>) -> Self {
        Self {
            recipes: Arc::new(recipes.into_iter().map(Arc::new).collect()),
        }
    }

    pub fn recipes(&self) -> &[Arc<Recipe>] {
        &self.recipes
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}

/// Every `"..."` substring of a token-list cell, in order.
pub fn extract_quoted_strings(text: &str) -> Vec<String> {
    let Some(re) = QUOTED.as_ref() else {
        return Vec::new();
    };
    re.captures_iter(text)
        .map(|caps| caps[1].to_string())
        .collect()
}

// NaN and inf count as unparsable
fn parse_f64_or_zero(s: &str) -> f64 {
    s.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

fn parse_minutes(s: &str) -> u32 {
    s.trim()
        .parse::<f64>()
        .ok()
        .filter(|m| m.is_finite() && *m >= 0.0)
        .map_or(0, |m| m.round() as u32)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetEncoding {
    Plain,
    Gzip,
}

/// Opens a dataset file, decompressing it when it starts with the gzip magic
/// bytes. The published corpus ships gzipped under a `.csv` name.
pub fn open_dataset(path: &Path) -> Result<(DatasetEncoding, Box<dyn Read>)> {
    let mut reader = BufReader::new(File::open(path)?);
    if reader.fill_buf()?.starts_with(&GZIP_MAGIC) {
        debug!(path = ?path, "dataset is gzip-compressed");
        Ok((DatasetEncoding::Gzip, Box::new(GzDecoder::new(reader))))
    } else {
        Ok((DatasetEncoding::Plain, Box::new(reader)))
    }
}

/// Picks the first candidate path that exists on disk.
pub fn resolve_corpus_path<P: AsRef<Path>>(candidates: &[P]) -> Result<PathBuf> {
    candidates
        .iter()
        .map(|p| p.as_ref())
        .find(|p| p.exists())
        .map(Path::to_path_buf)
        .ok_or_else(|| RecommenderError::CorpusNotFound {
            searched: candidates.iter().map(|p| p.as_ref().to_path_buf()).collect(),
        })
}

fn column(headers: &StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| RecommenderError::MissingColumn(name.to_string()))
}

pub fn load_recipe_corpus(csv_path: &Path) -> Result<Corpus> {
    if !csv_path.exists() {
        return Err(RecommenderError::CorpusNotFound {
            searched: vec![csv_path.to_path_buf()],
        });
    }

    let (_, source) = open_dataset(csv_path)?;
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(source);
    let headers = rdr.headers()?.clone();

    // Get column indices
    let name_idx = column(&headers, NAME_COL)?;
    let mut nutrition_idx = [0usize; NUTRITION_DIMENSION];
    for (slot, col) in nutrition_idx.iter_mut().zip(NUTRITION_COLUMNS) {
        *slot = column(&headers, col)?;
    }
    let ingredients_idx = column(&headers, INGREDIENTS_COL)?;
    let instructions_idx = column(&headers, INSTRUCTIONS_COL)?;
    let cook_idx = column(&headers, COOK_TIME_COL)?;
    let prep_idx = column(&headers, PREP_TIME_COL)?;
    let total_idx = column(&headers, TOTAL_TIME_COL)?;
    let cuisine_idx = headers.iter().position(|h| h == CUISINE_COL);
    if cuisine_idx.is_none() {
        debug!("no Cuisine column, every recipe defaults to Other");
    }

    let mut recipes = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let field = |idx: usize| record.get(idx).unwrap_or_default();

        let name = field(name_idx).trim().to_string();
        if name.is_empty() {
            continue;
        }

        let mut nutrition = [0.0; NUTRITION_DIMENSION];
        for (value, idx) in nutrition.iter_mut().zip(nutrition_idx) {
            *value = parse_f64_or_zero(field(idx));
        }

        recipes.push(Recipe {
            name,
            nutrition: NutritionVector::new(nutrition),
            ingredient_parts: extract_quoted_strings(field(ingredients_idx)),
            instructions: extract_quoted_strings(field(instructions_idx)),
            cook_time: parse_minutes(field(cook_idx)),
            prep_time: parse_minutes(field(prep_idx)),
            total_time: parse_minutes(field(total_idx)),
            cuisine: cuisine_idx.map_or(Cuisine::Other, |idx| Cuisine::from_label(field(idx))),
        });
    }

    if recipes.is_empty() {
        return Err(RecommenderError::EmptyCorpus(csv_path.to_path_buf()));
    }

    info!(recipes = recipes.len(), path = ?csv_path, "recipe corpus loaded");
    Ok(Corpus::new(recipes))
}
