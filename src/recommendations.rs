//! Single-shot recommendation flows: a custom nutrition target, and the
//! per-meal diet recommendation driven by a [`HealthProfile`].

use rand::Rng;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::PlannerSettings;
use crate::errors::{RecommenderError, Result};
use crate::filters::cheapest;
use crate::images::ImageLookup;
use crate::planner::targets::{slot_weights, uniform, MealSlot};
use crate::profile::HealthProfile;
use crate::recipe::{NutritionVector, ScoredRecipe};
use crate::search::data_loader::Corpus;
use crate::search::ingredient_filter::split_ingredient_terms;
use crate::search::pipeline::{recommend, RecommendationRequest};

#[derive(Debug, Clone, PartialEq)]
pub struct CustomRequest {
    pub nutrition: NutritionVector,
    /// `;`-separated ingredient substrings.
    pub ingredients: String,
    pub count: usize,
    pub budget_per_recipe: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CustomRecommendations {
    pub recipes: Vec<ScoredRecipe>,
    pub warning: Option<String>,
}

/// Returns `Ok(None)` when the ingredient filter leaves too few recipes for
/// `count * 3` neighbors.
pub fn custom_recommendations(
    corpus: &Corpus,
    request: &CustomRequest,
    images: &dyn ImageLookup,
) -> Result<Option<CustomRecommendations>> {
    if request.count == 0 {
        return Err(RecommenderError::InvalidInput(
            "recommendation count must be at least 1".to_string(),
        ));
    }

    let pipeline_request = RecommendationRequest::new(request.nutrition, request.count * 3)
        .with_ingredients(split_ingredient_terms(&request.ingredients));
    let Some(mut candidates) = recommend(corpus, &pipeline_request)? else {
        return Ok(None);
    };
    for candidate in &mut candidates {
        candidate.image_link = images.image_link(candidate.name());
    }

    let mut warning = None;
    let recipes = match request.budget_per_recipe {
        Some(budget) => {
            let in_budget: Vec<ScoredRecipe> = candidates
                .iter()
                .filter(|c| c.estimated_cost <= budget)
                .cloned()
                .collect();
            if in_budget.is_empty() {
                let fallback = cheapest(candidates, request.count);
                let cheapest_cost = fallback.first().map(|c| c.estimated_cost).unwrap_or(0.0);
                warning = Some(format!(
                    "No recipes found under ${budget:.2}. Showing cheapest options starting from ${cheapest_cost:.2}."
                ));
                fallback
            } else {
                in_budget.into_iter().take(request.count).collect()
            }
        }
        None => {
            candidates.truncate(request.count);
            candidates
        }
    };

    info!(count = recipes.len(), over_budget = warning.is_some(), "custom recommendations ready");
    Ok(Some(CustomRecommendations { recipes, warning }))
}

/// Uniform draw ranges for the eight non-calorie dimensions of one diet slot.
#[derive(Debug, Clone, Copy, PartialEq)]
struct SlotRanges {
    fat: (f64, f64),
    saturated_fat: (f64, f64),
    cholesterol: (f64, f64),
    sodium: (f64, f64),
    carbohydrate: (f64, f64),
    fiber: (f64, f64),
    sugar: (f64, f64),
    protein: (f64, f64),
}

impl SlotRanges {
    fn for_slot(slot: MealSlot) -> Self {
        let light = SlotRanges {
            fat: (10.0, 30.0),
            saturated_fat: (0.0, 4.0),
            cholesterol: (0.0, 30.0),
            sodium: (0.0, 400.0),
            carbohydrate: (40.0, 75.0),
            fiber: (4.0, 10.0),
            sugar: (0.0, 10.0),
            protein: (30.0, 100.0),
        };
        if slot.is_main_meal() {
            SlotRanges {
                fat: (20.0, 40.0),
                fiber: (4.0, 20.0),
                protein: (50.0, 175.0),
                ..light
            }
        } else {
            light
        }
    }

    fn sample<R: Rng + ?Sized>(&self, calories: f64, rng: &mut R) -> NutritionVector {
        NutritionVector::new([
            calories,
            uniform(rng, self.fat),
            uniform(rng, self.saturated_fat),
            uniform(rng, self.cholesterol),
            uniform(rng, self.sodium),
            uniform(rng, self.carbohydrate),
            uniform(rng, self.fiber),
            uniform(rng, self.sugar),
            uniform(rng, self.protein),
        ])
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SlotRecommendations {
    pub slot: MealSlot,
    pub target_calories: f64,
    pub recipes: Vec<ScoredRecipe>,
    pub warning: Option<String>,
}

/// One list of recipes per meal slot for the profile's weight plan.
pub fn diet_recommendations<R: Rng + ?Sized>(
    corpus: &Corpus,
    profile: &HealthProfile,
    settings: &PlannerSettings,
    images: &dyn ImageLookup,
    rng: &mut R,
) -> Result<Vec<SlotRecommendations>> {
    profile.validate()?;
    let weights = slot_weights(profile.meals_per_day)?;
    let daily_calories = profile.target_calories();
    let budget_per_meal = profile
        .daily_budget
        .map(|daily| daily / profile.meals_per_day as f64);

    let mut slots = Vec::with_capacity(weights.len());
    for &(slot, weight) in weights {
        let calories = daily_calories * weight;
        let target = SlotRanges::for_slot(slot).sample(calories, rng);
        let request = RecommendationRequest::new(target, settings.diet_neighbors);

        let Some(candidates) = recommend(corpus, &request)? else {
            warn!(slot = %slot, "no candidates for diet slot");
            slots.push(SlotRecommendations {
                slot,
                target_calories: calories,
                recipes: Vec::new(),
                warning: Some(format!("No recipes available for {}.", slot.title())),
            });
            continue;
        };

        let mut warning = None;
        let mut recipes = match budget_per_meal {
            Some(budget) => {
                let in_budget: Vec<ScoredRecipe> = candidates
                    .iter()
                    .filter(|c| c.estimated_cost <= budget)
                    .cloned()
                    .collect();
                if in_budget.is_empty() {
                    warning = Some(format!(
                        "No recipes found within ${budget:.2} budget for {}. Showing cheapest options.",
                        slot.key()
                    ));
                    cheapest(candidates, settings.diet_top)
                } else {
                    cheapest(in_budget, settings.diet_top)
                }
            }
            None => candidates,
        };
        for recipe in &mut recipes {
            recipe.image_link = images.image_link(recipe.name());
        }

        slots.push(SlotRecommendations {
            slot,
            target_calories: calories,
            recipes,
            warning,
        });
    }
    Ok(slots)
}

/// Summed nutrition of one pick per slot, e.g. the user's chosen composition.
/// Slots whose pick index is out of range contribute nothing.
pub fn composition_totals(slots: &[SlotRecommendations], picks: &[usize]) -> NutritionVector {
    let mut totals = [0.0; crate::recipe::NUTRITION_DIMENSION];
    for (slot, &pick) in slots.iter().zip(picks) {
        if let Some(choice) = slot.recipes.get(pick) {
            for (total, value) in totals.iter_mut().zip(choice.recipe.nutrition.as_array()) {
                *total += value;
            }
        }
    }
    NutritionVector::new(totals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::images::NoImages;
    use crate::profile::{ActivityLevel, Gender, WeightPlan};
    use crate::recipe::Recipe;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn corpus(n: usize) -> Corpus {
        let recipes = (0..n)
            .map(|i| {
                let x = i as f64;
                let parts = if i % 2 == 0 {
                    vec!["saffron".to_string(), "rice".to_string()]
                } else {
                    vec!["eggs".to_string(), "flour".to_string()]
                };
                Recipe {
                    name: format!("Recipe {i}"),
                    nutrition: NutritionVector::new([
                        200.0 + 10.0 * x,
                        5.0 + x % 7.0,
                        1.0,
                        20.0,
                        300.0 + x,
                        30.0 + x % 11.0,
                        3.0,
                        5.0 + x % 5.0,
                        10.0 + x % 13.0,
                    ]),
                    ingredient_parts: parts,
                    instructions: vec!["Cook.".to_string()],
                    cook_time: 10,
                    prep_time: 5,
                    total_time: 15,
                    cuisine: crate::cuisine::Cuisine::Other,
                }
            })
            .collect();
        Corpus::new(recipes)
    }

    fn request(count: usize, budget: Option<f64>) -> CustomRequest {
        CustomRequest {
            nutrition: NutritionVector::new([400.0, 10.0, 1.0, 20.0, 320.0, 35.0, 3.0, 6.0, 15.0]),
            ingredients: String::new(),
            count,
            budget_per_recipe: budget,
        }
    }

    #[test]
    fn test_custom_without_budget_keeps_count() -> anyhow::Result<()> {
        let found = custom_recommendations(&corpus(40), &request(5, None), &NoImages)?;
        let found = found.ok_or_else(|| anyhow::anyhow!("expected recommendations"))?;
        assert_eq!(found.recipes.len(), 5);
        assert!(found.warning.is_none());
        Ok(())
    }

    #[test]
    fn test_custom_budget_fallback_warns() -> anyhow::Result<()> {
        // "eggs" + "flour" and "rice" + "saffron" both cost more than $1
        let found = custom_recommendations(&corpus(40), &request(4, Some(1.0)), &NoImages)?
            .ok_or_else(|| anyhow::anyhow!("expected recommendations"))?;
        assert_eq!(found.recipes.len(), 4);
        let warning = found.warning.unwrap_or_default();
        assert!(warning.starts_with("No recipes found under $1.00."), "{warning}");
        let costs: Vec<f64> = found.recipes.iter().map(|r| r.estimated_cost).collect();
        assert!(costs.windows(2).all(|w| w[0] <= w[1]));
        Ok(())
    }

    #[test]
    fn test_custom_ingredient_filter_too_narrow() -> anyhow::Result<()> {
        let mut req = request(5, None);
        req.ingredients = "saffron;eggs".to_string();
        assert!(custom_recommendations(&corpus(40), &req, &NoImages)?.is_none());
        Ok(())
    }

    #[test]
    fn test_diet_slots_follow_meal_count() -> anyhow::Result<()> {
        let profile = HealthProfile {
            age: 30,
            height_cm: 175.0,
            weight_kg: 70.0,
            gender: Gender::Female,
            activity: ActivityLevel::Light,
            plan: WeightPlan::Maintain,
            meals_per_day: 4,
            daily_budget: Some(1000.0),
        };
        let mut rng = StdRng::seed_from_u64(7);
        let slots = diet_recommendations(
            &corpus(60),
            &profile,
            &PlannerSettings::default(),
            &NoImages,
            &mut rng,
        )?;
        assert_eq!(slots.len(), 4);
        for slot in &slots {
            assert_eq!(slot.recipes.len(), 5);
            assert!(slot.warning.is_none());
        }
        let total: f64 = slots.iter().map(|s| s.target_calories).sum();
        assert!((total - profile.target_calories()).abs() < 1e-6);

        let totals = composition_totals(&slots, &[0, 0, 0, 0]);
        let expected: f64 = slots.iter().map(|s| s.recipes[0].recipe.nutrition.calories()).sum();
        assert!((totals.calories() - expected).abs() < 1e-9);

        // out-of-range picks and missing slots add nothing
        let partial = composition_totals(&slots, &[1, 99]);
        let expected = slots[0].recipes[1].recipe.nutrition.calories();
        assert!((partial.calories() - expected).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn test_main_meal_ranges_are_wider() {
        let lunch = SlotRanges::for_slot(MealSlot::Lunch);
        let snack = SlotRanges::for_slot(MealSlot::MorningSnack);
        assert_eq!(lunch.protein, (50.0, 175.0));
        assert_eq!(snack.protein, (30.0, 100.0));
        assert_eq!(lunch.sodium, snack.sodium);
    }
}
