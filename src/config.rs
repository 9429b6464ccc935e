//! Runtime configuration read from the environment (after `.env` is loaded).

use std::env;
use std::path::PathBuf;

use crate::filters::DEFAULT_BUDGET_FALLBACK;
use crate::planner::targets::JitterRange;
use crate::search::data_loader::DEFAULT_DATASET_CANDIDATES;

pub const DATASET_PATH_ENV_VAR: &str = "RECIPE_DATASET_PATH";
pub const API_KEY_ENV_VAR: &str = "OPENROUTER_API_KEY";
pub const CHAT_MODEL_ENV_VAR: &str = "CHAT_MODEL";
pub const IMAGE_SEARCH_URL_ENV_VAR: &str = "IMAGE_SEARCH_URL";
pub const DEFAULT_CHAT_MODEL: &str = "qwen/qwen3-32b";

/// Numeric policy knobs for the recommendation entry points.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerSettings {
    /// Neighbors per planner slot with no constraints.
    pub default_neighbors: usize,
    /// Neighbors per planner slot when only a budget applies.
    pub budget_neighbors: usize,
    /// Neighbors per planner slot with cuisine or inclusion constraints.
    pub constrained_neighbors: usize,
    /// Neighbors for the wider retry once every candidate was used.
    pub retry_neighbors: usize,
    /// Size of the cheapest-N fallback when nothing fits the planner budget.
    pub budget_fallback: usize,
    pub diet_neighbors: usize,
    /// Recipes kept per slot by the diet recommendation.
    pub diet_top: usize,
    pub standard_jitter: JitterRange,
    pub wide_jitter: JitterRange,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            default_neighbors: 20,
            budget_neighbors: 50,
            constrained_neighbors: 300,
            retry_neighbors: 100,
            budget_fallback: DEFAULT_BUDGET_FALLBACK,
            diet_neighbors: 25,
            diet_top: 5,
            standard_jitter: JitterRange::standard(),
            wide_jitter: JitterRange::wide(),
        }
    }
}

impl PlannerSettings {
    pub fn neighbors_for(&self, constrained: bool, has_budget: bool) -> usize {
        if constrained {
            self.constrained_neighbors
        } else if has_budget {
            self.budget_neighbors
        } else {
            self.default_neighbors
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Explicit corpus location, tried before the built-in candidates.
    pub dataset_path: Option<PathBuf>,
    /// Name of the env var holding the chat API key (read lazily per call).
    pub api_key_env_var: String,
    pub chat_model: String,
    pub image_search_url: Option<String>,
    pub planner: PlannerSettings,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            dataset_path: None,
            api_key_env_var: API_KEY_ENV_VAR.to_string(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            image_search_url: None,
            planner: PlannerSettings::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        Self {
            dataset_path: non_empty_var(DATASET_PATH_ENV_VAR).map(PathBuf::from),
            api_key_env_var: API_KEY_ENV_VAR.to_string(),
            chat_model: non_empty_var(CHAT_MODEL_ENV_VAR)
                .unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string()),
            image_search_url: non_empty_var(IMAGE_SEARCH_URL_ENV_VAR),
            planner: PlannerSettings::default(),
        }
    }

    /// Corpus paths in lookup order.
    pub fn dataset_candidates(&self) -> Vec<PathBuf> {
        self.dataset_path
            .iter()
            .cloned()
            .chain(DEFAULT_DATASET_CANDIDATES.iter().map(PathBuf::from))
            .collect()
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
