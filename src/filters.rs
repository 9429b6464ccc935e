//! Ordered candidate filters with a per-stage policy for an emptied set.

use std::fmt;

use tracing::{debug, warn};

use crate::cuisine::Cuisine;
use crate::errors::{RecommenderError, Result};
use crate::recipe::ScoredRecipe;

/// Default size of the cheapest-N budget fallback.
pub const DEFAULT_BUDGET_FALLBACK: usize = 10;

/// What a stage does when it filters every candidate out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnEmpty {
    /// Abort with `RecommenderError::FilterExhausted`.
    Fail,
    /// Stop the chain and tell the caller to skip this slot.
    Skip,
    /// Keep the stage's input as if the stage had not run.
    Ignore,
    /// Keep the N cheapest inputs and attach a warning.
    FallbackCheapest(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterStep {
    /// Recipe cuisine tag must be one of these.
    Cuisine(Vec<Cuisine>),
    /// Name + ingredient text must contain at least one token.
    IncludeAny(Vec<String>),
    /// Name + ingredient text must contain none of the tokens.
    ExcludeAny(Vec<String>),
    /// Estimated cost must not exceed the per-meal budget.
    Budget(f64),
}

impl FilterStep {
    pub fn name(&self) -> &'static str {
        match self {
            FilterStep::Cuisine(_) => "cuisine",
            FilterStep::IncludeAny(_) => "include",
            FilterStep::ExcludeAny(_) => "exclude",
            FilterStep::Budget(_) => "budget",
        }
    }

    fn keeps(&self, candidate: &ScoredRecipe) -> bool {
        match self {
            FilterStep::Cuisine(cuisines) => cuisines.contains(&candidate.recipe.cuisine),
            FilterStep::IncludeAny(tokens) => {
                let text = candidate.recipe.searchable_text();
                tokens.iter().any(|t| text.contains(&t.to_lowercase()))
            }
            FilterStep::ExcludeAny(tokens) => {
                let text = candidate.recipe.searchable_text();
                !tokens.iter().any(|t| text.contains(&t.to_lowercase()))
            }
            FilterStep::Budget(limit) => candidate.estimated_cost <= *limit,
        }
    }

    /// User-facing explanation for an emptied stage.
    fn empty_message(&self) -> String {
        match self {
            FilterStep::Cuisine(cuisines) => {
                let names: Vec<&str> = cuisines.iter().map(Cuisine::label).collect();
                format!("No {} recipes found", names.join("/"))
            }
            FilterStep::IncludeAny(tokens) => {
                let names: Vec<String> = tokens.iter().take(3).map(|t| capitalize(t)).collect();
                format!("No {} recipes found", names.join("/"))
            }
            FilterStep::ExcludeAny(_) => {
                "Every candidate contains an excluded ingredient".to_string()
            }
            FilterStep::Budget(limit) => {
                format!("Limited options within ${limit:.2}/meal budget. Showing cheapest alternatives.")
            }
        }
    }
}

impl fmt::Display for FilterStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterStage {
    pub step: FilterStep,
    pub on_empty: OnEmpty,
}

/// Result of running the chain on a candidate set.
#[derive(Debug, Clone)]
pub enum ChainOutcome {
    /// Surviving candidates, in input order unless a cheapest fallback reordered
    /// them, plus warnings from stages that degraded.
    Candidates {
        recipes: Vec<ScoredRecipe>,
        warnings: Vec<String>,
    },
    /// A strict stage emptied the set; the slot must not be filled.
    Skip { step: String, message: String },
}

impl ChainOutcome {
    pub fn is_skip(&self) -> bool {
        matches!(self, ChainOutcome::Skip { .. })
    }
}

/// Filter stages applied in insertion order. The policy table is data: each
/// stage carries its own `OnEmpty`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterChain {
    stages: Vec<FilterStage>,
}

impl FilterChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(mut self, step: FilterStep, on_empty: OnEmpty) -> Self {
        self.stages.push(FilterStage { step, on_empty });
        self
    }

    /// Planner chain: cuisine and inclusion are strict, exclusion is
    /// advisory, budget falls back to the cheapest `budget_fallback` recipes.
    /// Stages with nothing to check are left out.
    pub fn standard(
        cuisines: &[Cuisine],
        include: &[String],
        exclude: &[String],
        budget_per_meal: Option<f64>,
        budget_fallback: usize,
    ) -> Self {
        let mut chain = Self::new();
        if !cuisines.is_empty() {
            chain = chain.stage(FilterStep::Cuisine(cuisines.to_vec()), OnEmpty::Skip);
        }
        if !include.is_empty() {
            chain = chain.stage(FilterStep::IncludeAny(include.to_vec()), OnEmpty::Skip);
        }
        if !exclude.is_empty() {
            chain = chain.stage(FilterStep::ExcludeAny(exclude.to_vec()), OnEmpty::Ignore);
        }
        if let Some(limit) = budget_per_meal {
            chain = chain.stage(
                FilterStep::Budget(limit),
                OnEmpty::FallbackCheapest(budget_fallback),
            );
        }
        chain
    }

    pub fn stages(&self) -> &[FilterStage] {
        &self.stages
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn apply(&self, candidates: Vec<ScoredRecipe>) -> Result<ChainOutcome> {
        let mut current = candidates;
        let mut warnings = Vec::new();

        for FilterStage { step, on_empty } in &self.stages {
            let kept: Vec<ScoredRecipe> = current.iter().filter(|c| step.keeps(c)).cloned().collect();
            debug!(step = step.name(), before = current.len(), after = kept.len(), "filter stage");

            if !kept.is_empty() || current.is_empty() {
                current = kept;
                continue;
            }

            match on_empty {
                OnEmpty::Fail => {
                    return Err(RecommenderError::FilterExhausted {
                        step: step.name().to_string(),
                        message: step.empty_message(),
                    });
                }
                OnEmpty::Skip => {
                    return Ok(ChainOutcome::Skip {
                        step: step.name().to_string(),
                        message: step.empty_message(),
                    });
                }
                OnEmpty::Ignore => {
                    debug!(step = step.name(), "stage emptied candidates, ignoring it");
                }
                OnEmpty::FallbackCheapest(n) => {
                    current = cheapest(current, *n);
                    let message = step.empty_message();
                    warn!(step = step.name(), "{message}");
                    warnings.push(message);
                }
            }
        }

        Ok(ChainOutcome::Candidates {
            recipes: current,
            warnings,
        })
    }
}

/// The `n` lowest-cost candidates, ties kept in input order.
pub fn cheapest(mut candidates: Vec<ScoredRecipe>, n: usize) -> Vec<ScoredRecipe> {
    candidates.sort_by(|a, b| a.estimated_cost.total_cmp(&b.estimated_cost));
    candidates.truncate(n);
    candidates
}
