//! Multi-day plan generation with jittered targets and repeat avoidance.

use std::collections::HashSet;
use std::fmt;

use rand::Rng;
use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::{debug, info, warn};

use crate::config::PlannerSettings;
use crate::cuisine::Cuisine;
use crate::errors::{RecommenderError, Result};
use crate::filters::{ChainOutcome, FilterChain};
use crate::images::{ImageLookup, NoImages};
use crate::planner::targets::{restriction_tokens, slot_calories, BudgetTier, DietaryRestriction, MealSlot};
use crate::pricing::estimate_shopping_cost;
use crate::recipe::ScoredRecipe;
use crate::search::data_loader::Corpus;
use crate::search::pipeline::{recommend, RecommendationRequest};
use crate::shopping_list::{generate_shopping_list, ShoppingList};

#[derive(Debug, Clone, PartialEq)]
pub struct PlanRequest {
    pub daily_calories: f64,
    /// 3, 4 or 5.
    pub meals_per_day: usize,
    pub days: usize,
    pub restrictions: Vec<DietaryRestriction>,
    /// Empty means any cuisine.
    pub cuisines: Vec<Cuisine>,
    pub budget: BudgetTier,
}

impl PlanRequest {
    pub fn new(daily_calories: f64, meals_per_day: usize, days: usize) -> Self {
        Self {
            daily_calories,
            meals_per_day,
            days,
            restrictions: Vec::new(),
            cuisines: Vec::new(),
            budget: BudgetTier::NoLimit,
        }
    }

    fn validate(&self) -> Result<()> {
        if !(self.daily_calories.is_finite() && self.daily_calories > 0.0) {
            return Err(RecommenderError::InvalidInput(format!(
                "daily calories must be positive, got {}",
                self.daily_calories
            )));
        }
        if self.days == 0 {
            return Err(RecommenderError::InvalidInput("plan needs at least one day".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct DayPlan {
    pub label: String,
    pub meals: Vec<(MealSlot, ScoredRecipe)>,
}

impl DayPlan {
    pub fn get(&self, slot: MealSlot) -> Option<&ScoredRecipe> {
        self.meals.iter().find(|(s, _)| *s == slot).map(|(_, r)| r)
    }
}

/// Day label -> meal slot -> recipe, in generation order.
#[derive(Debug, Clone, Default)]
pub struct MealPlan {
    days: Vec<DayPlan>,
}

impl MealPlan {
    pub fn days(&self) -> &[DayPlan] {
        &self.days
    }

    pub fn day(&self, label: &str) -> Option<&DayPlan> {
        self.days.iter().find(|d| d.label == label)
    }

    pub fn recipes(&self) -> impl Iterator<Item = &ScoredRecipe> {
        self.days.iter().flat_map(|d| d.meals.iter().map(|(_, r)| r))
    }

    /// Number of filled slots.
    pub fn len(&self) -> usize {
        self.days.iter().map(|d| d.meals.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn shopping_list(&self) -> ShoppingList {
        generate_shopping_list(self.recipes().map(|r| r.recipe.as_ref()))
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Serialize for MealPlan {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut days = serializer.serialize_map(Some(self.days.len()))?;
        for day in &self.days {
            days.serialize_entry(&day.label, &DaySlots(&day.meals))?;
        }
        days.end()
    }
}

struct DaySlots<'a>(&'a [(MealSlot, ScoredRecipe)]);

impl Serialize for DaySlots<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut slots = serializer.serialize_map(Some(self.0.len()))?;
        for (slot, recipe) in self.0 {
            slots.serialize_entry(slot.key(), recipe)?;
        }
        slots.end()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NoticeKind {
    /// A strict filter emptied the candidates; the slot stays empty.
    Skipped { step: String, message: String },
    /// Nothing fit the budget; the cheapest candidates were used instead.
    BudgetShortfall(String),
    /// Every candidate was already used; the least similar name was repeated.
    RepeatConcession { recipe: String },
    /// The corpus could not supply enough neighbors.
    NoCandidates,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SlotNotice {
    pub day: String,
    pub slot: MealSlot,
    pub kind: NoticeKind,
}

impl fmt::Display for SlotNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let meal = self.slot.key();
        match &self.kind {
            NoticeKind::Skipped { message, .. } => {
                write!(f, "{} for {meal} on {}. Skipping this meal.", message, self.day)
            }
            NoticeKind::BudgetShortfall(message) => write!(f, "{meal} on {}: {message}", self.day),
            NoticeKind::RepeatConcession { recipe } => {
                write!(f, "Using similar recipe for variety: {recipe}")
            }
            NoticeKind::NoCandidates => {
                write!(f, "Could not find suitable recipe for {meal} on {}", self.day)
            }
        }
    }
}

/// A generated plan plus everything that degraded while building it.
#[derive(Debug, Clone)]
pub struct PlanReport {
    pub plan: MealPlan,
    pub used_recipe_names: HashSet<String>,
    pub notices: Vec<SlotNotice>,
}

impl PlanReport {
    pub fn skipped_slots(&self) -> usize {
        self.notices
            .iter()
            .filter(|n| matches!(n.kind, NoticeKind::Skipped { .. } | NoticeKind::NoCandidates))
            .count()
    }

    pub fn repeats(&self) -> usize {
        self.notices
            .iter()
            .filter(|n| matches!(n.kind, NoticeKind::RepeatConcession { .. }))
            .count()
    }
}

/// Cost view of a finished plan.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanBudgetSummary {
    pub estimated_shopping_cost: f64,
    pub total_recipe_cost: f64,
    /// Daily tier budget times the number of days.
    pub total_budget: Option<f64>,
}

impl PlanBudgetSummary {
    pub fn new(plan: &MealPlan, budget: BudgetTier, days: usize) -> Self {
        Self {
            estimated_shopping_cost: estimate_shopping_cost(&plan.shopping_list()),
            total_recipe_cost: plan.recipes().map(|r| r.estimated_cost).sum(),
            total_budget: budget.daily_budget().map(|daily| daily * days as f64),
        }
    }

    /// Remaining budget; negative when over.
    pub fn remaining(&self) -> Option<f64> {
        self.total_budget.map(|total| total - self.total_recipe_cost)
    }
}

impl fmt::Display for PlanBudgetSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Estimated Shopping Cost: ${:.2}", self.estimated_shopping_cost)?;
        write!(f, "Total Recipe Cost: ${:.2}", self.total_recipe_cost)?;
        if let (Some(total), Some(remaining)) = (self.total_budget, self.remaining()) {
            if remaining >= 0.0 {
                write!(f, "\nWithin Budget: ${remaining:.2} remaining of ${total:.2} total")?;
            } else {
                write!(f, "\nOver Budget: ${:.2} over ${total:.2} total", remaining.abs())?;
            }
        }
        Ok(())
    }
}

static NO_IMAGES: NoImages = NoImages;

/// Drives the recommendation pipeline across every (day, slot) pair.
pub struct MealPlanner<'a> {
    corpus: &'a Corpus,
    settings: PlannerSettings,
    images: &'a dyn ImageLookup,
}

impl<'a> MealPlanner<'a> {
    pub fn new(corpus: &'a Corpus) -> Self {
        Self {
            corpus,
            settings: PlannerSettings::default(),
            images: &NO_IMAGES,
        }
    }

    pub fn with_settings(mut self, settings: PlannerSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_images(mut self, images: &'a dyn ImageLookup) -> Self {
        self.images = images;
        self
    }

    pub fn plan<R: Rng + ?Sized>(&self, request: &PlanRequest, rng: &mut R) -> Result<PlanReport> {
        request.validate()?;
        let slots = slot_calories(request.daily_calories, request.meals_per_day)?;
        let budget_per_meal = request.budget.per_meal(request.meals_per_day);
        let (excluded, included) = restriction_tokens(&request.restrictions);
        let chain = FilterChain::standard(
            &request.cuisines,
            &included,
            &excluded,
            budget_per_meal,
            self.settings.budget_fallback,
        );
        let constrained = !request.cuisines.is_empty() || !included.is_empty();
        let neighbors = self.settings.neighbors_for(constrained, budget_per_meal.is_some());

        let mut plan = MealPlan::default();
        let mut used = HashSet::new();
        let mut notices = Vec::new();

        for day in 1..=request.days {
            let label = format!("Day {day}");
            let mut meals = Vec::with_capacity(slots.len());

            for &(slot, calories) in &slots {
                let mut notice = |kind: NoticeKind| {
                    let notice = SlotNotice {
                        day: label.clone(),
                        slot,
                        kind,
                    };
                    warn!("{notice}");
                    notices.push(notice);
                };

                let target = self.settings.standard_jitter.sample(calories, rng);
                let Some(candidates) = recommend(self.corpus, &RecommendationRequest::new(target, neighbors))? else {
                    notice(NoticeKind::NoCandidates);
                    continue;
                };

                let recipes = match chain.apply(candidates)? {
                    ChainOutcome::Skip { step, message } => {
                        notice(NoticeKind::Skipped { step, message });
                        continue;
                    }
                    ChainOutcome::Candidates { recipes, warnings } => {
                        for warning in warnings {
                            notice(NoticeKind::BudgetShortfall(warning));
                        }
                        recipes
                    }
                };
                if recipes.is_empty() {
                    notice(NoticeKind::NoCandidates);
                    continue;
                }

                let mut selected = match first_unused(&recipes, &used) {
                    Some(fresh) => fresh,
                    None => match self.retry_wider(&chain, calories, &used, rng)? {
                        Some(fresh) => fresh,
                        None => {
                            let repeat = least_overlapping(&recipes, &used).clone();
                            notice(NoticeKind::RepeatConcession {
                                recipe: repeat.name().to_string(),
                            });
                            repeat
                        }
                    },
                };

                used.insert(selected.name().to_string());
                selected.image_link = self.images.image_link(selected.name());
                debug!(day, slot = slot.key(), recipe = selected.name(), "slot filled");
                meals.push((slot, selected));
            }

            plan.days.push(DayPlan { label, meals });
        }

        info!(
            days = request.days,
            filled = plan.len(),
            notices = notices.len(),
            "meal plan generated"
        );
        Ok(PlanReport {
            plan,
            used_recipe_names: used,
            notices,
        })
    }

    /// Second tier: a wider target and more neighbors, still through the
    /// filter chain so cuisine and inclusion stay strict.
    fn retry_wider<R: Rng + ?Sized>(
        &self,
        chain: &FilterChain,
        calories: f64,
        used: &HashSet<String>,
        rng: &mut R,
    ) -> Result<Option<ScoredRecipe>> {
        let target = self.settings.wide_jitter.sample(calories, rng);
        let request = RecommendationRequest::new(target, self.settings.retry_neighbors);
        let Some(candidates) = recommend(self.corpus, &request)? else {
            return Ok(None);
        };
        match chain.apply(candidates)? {
            ChainOutcome::Candidates { recipes, .. } => Ok(first_unused(&recipes, used)),
            ChainOutcome::Skip { .. } => Ok(None),
        }
    }
}

fn first_unused(recipes: &[ScoredRecipe], used: &HashSet<String>) -> Option<ScoredRecipe> {
    recipes.iter().find(|r| !used.contains(r.name())).cloned()
}

fn name_words(name: &str) -> HashSet<String> {
    name.to_lowercase().split_whitespace().map(str::to_string).collect()
}

/// Smallest word overlap between `name` and any used name; `usize::MAX` when
/// nothing has been used yet.
pub fn min_name_overlap(name: &str, used: &HashSet<String>) -> usize {
    let words = name_words(name);
    used.iter()
        .map(|u| name_words(u).intersection(&words).count())
        .min()
        .unwrap_or(usize::MAX)
}

/// First candidate with the lowest `min_name_overlap`. `recipes` must be non-empty.
fn least_overlapping<'r>(recipes: &'r [ScoredRecipe], used: &HashSet<String>) -> &'r ScoredRecipe {
    let mut best = &recipes[0];
    let mut best_overlap = min_name_overlap(best.name(), used);
    for recipe in &recipes[1..] {
        let overlap = min_name_overlap(recipe.name(), used);
        if overlap < best_overlap {
            best = recipe;
            best_overlap = overlap;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::{NutritionVector, Recipe};
    use std::sync::Arc;

    fn scored(name: &str) -> ScoredRecipe {
        ScoredRecipe::new(
            Arc::new(Recipe {
                name: name.to_string(),
                nutrition: NutritionVector::default(),
                ingredient_parts: vec!["water".to_string()],
                instructions: vec![],
                cook_time: 0,
                prep_time: 0,
                total_time: 0,
                cuisine: Cuisine::Other,
            }),
            None,
        )
    }

    fn used(names: &[&str]) -> HashSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_min_name_overlap() {
        let used = used(&["Chicken Soup", "Beef Stew"]);
        assert_eq!(min_name_overlap("Chicken Salad", &used), 0);
        assert_eq!(min_name_overlap("chicken soup", &self::used(&["Chicken Soup"])), 2);
        assert_eq!(min_name_overlap("Anything", &HashSet::new()), usize::MAX);
    }

    #[test]
    fn test_least_overlapping_prefers_first_minimum() {
        let used = used(&["Chicken Soup"]);
        let recipes = vec![scored("Chicken Soup"), scored("Chicken Pie"), scored("Pea Pie"), scored("Rice Bowl")];
        assert_eq!(least_overlapping(&recipes, &used).name(), "Pea Pie");
    }

    #[test]
    fn test_first_unused_skips_used_names() {
        let used = used(&["A"]);
        let recipes = vec![scored("A"), scored("B"), scored("C")];
        assert_eq!(first_unused(&recipes, &used).map(|r| r.name().to_string()), Some("B".to_string()));
        assert!(first_unused(&recipes[..1], &used).is_none());
    }

    #[test]
    fn test_validation() {
        let corpus = Corpus::default();
        let planner = MealPlanner::new(&corpus);
        let mut rng = rand::thread_rng();
        assert!(planner.plan(&PlanRequest::new(2000.0, 6, 1), &mut rng).is_err());
        assert!(planner.plan(&PlanRequest::new(2000.0, 3, 0), &mut rng).is_err());
        assert!(planner.plan(&PlanRequest::new(-5.0, 3, 1), &mut rng).is_err());
    }

    #[test]
    fn test_budget_summary_display() {
        let summary = PlanBudgetSummary {
            estimated_shopping_cost: 12.0,
            total_recipe_cost: 40.0,
            total_budget: Some(35.0),
        };
        assert_eq!(summary.remaining(), Some(-5.0));
        assert!(summary.to_string().contains("Over Budget: $5.00 over $35.00 total"));
    }
}
