//! Plain-text context blobs handed to the chat backends.

use std::fmt::Write;

use crate::planner::MealPlan;
use crate::recipe::ScoredRecipe;
use crate::recommendations::SlotRecommendations;

const NO_RECOMMENDATIONS: &str = "No recommendations available.";
const MAIN_INGREDIENT_COUNT: usize = 5;

fn main_ingredients(recipe: &ScoredRecipe) -> String {
    recipe
        .recipe
        .ingredient_parts
        .iter()
        .take(MAIN_INGREDIENT_COUNT)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Numbered list of recipes with their headline nutrition.
pub fn recipes_context(recipes: &[ScoredRecipe]) -> String {
    if recipes.is_empty() {
        return NO_RECOMMENDATIONS.to_string();
    }
    let mut lines = vec!["Recommended Recipes:".to_string()];
    for (i, recipe) in recipes.iter().enumerate() {
        let nutrition = &recipe.recipe.nutrition;
        lines.push(format!("\n{}. {}", i + 1, recipe.name()));
        lines.push(format!(
            "   Calories: {}, Protein: {}g, Carbs: {}g",
            nutrition.calories(),
            nutrition.protein(),
            nutrition.carbohydrate()
        ));
        lines.push(format!("   Main ingredients: {}", main_ingredients(recipe)));
    }
    lines.join("\n")
}

/// Recipes grouped under upper-cased slot headings.
pub fn diet_context(slots: &[SlotRecommendations]) -> String {
    if slots.is_empty() {
        return NO_RECOMMENDATIONS.to_string();
    }
    let mut lines = Vec::new();
    for slot in slots {
        lines.push(format!("\n{}:", slot.slot.key().to_uppercase()));
        for recipe in &slot.recipes {
            let nutrition = &recipe.recipe.nutrition;
            lines.push(format!(
                "  - {} (Calories: {}, Protein: {}g)",
                recipe.name(),
                nutrition.calories(),
                nutrition.protein()
            ));
            lines.push(format!("    Main ingredients: {}", main_ingredients(recipe)));
        }
    }
    lines.join("\n")
}

pub fn meal_plan_context(plan: &MealPlan) -> String {
    let mut text = String::from("Weekly Meal Plan:\n");
    for day in plan.days() {
        let _ = write!(text, "\n{}:\n", day.label);
        for (slot, recipe) in &day.meals {
            let _ = writeln!(
                text,
                "  - {}: {} ({:.0} kcal)",
                slot.key(),
                recipe.name(),
                recipe.recipe.nutrition.calories()
            );
        }
    }
    text
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Assistant,
}

/// `User: ...` / `Assistant: ...` lines, one per turn.
pub fn history_text(turns: &[(Speaker, String)]) -> String {
    turns
        .iter()
        .map(|(speaker, text)| match speaker {
            Speaker::User => format!("User: {text}\n"),
            Speaker::Assistant => format!("Assistant: {text}\n"),
        })
        .collect()
}

/// Inverse of [`history_text`]; lines without a speaker prefix are dropped.
pub fn parse_history(text: &str) -> Vec<(Speaker, String)> {
    text.lines()
        .filter_map(|line| {
            if let Some(rest) = line.strip_prefix("User:") {
                Some((Speaker::User, rest.trim().to_string()))
            } else {
                line.strip_prefix("Assistant:")
                    .map(|rest| (Speaker::Assistant, rest.trim().to_string()))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cuisine::Cuisine;
    use crate::recipe::{NutritionVector, Recipe};
    use std::sync::Arc;

    fn scored(name: &str, parts: &[&str]) -> ScoredRecipe {
        let recipe = Recipe {
            name: name.to_string(),
            nutrition: NutritionVector::new([250.0, 1.0, 0.0, 0.0, 0.0, 30.5, 0.0, 0.0, 12.0]),
            ingredient_parts: parts.iter().map(|s| s.to_string()).collect(),
            instructions: Vec::new(),
            cook_time: 0,
            prep_time: 0,
            total_time: 0,
            cuisine: Cuisine::Other,
        };
        ScoredRecipe::new(Arc::new(recipe), None)
    }

    #[test]
    fn test_recipes_context_lists_five_ingredients() {
        let parts = ["a", "b", "c", "d", "e", "f"];
        let text = recipes_context(&[scored("Oats", &parts)]);
        assert_eq!(
            text,
            "Recommended Recipes:\n\n1. Oats\n   Calories: 250, Protein: 12g, Carbs: 30.5g\n   Main ingredients: a, b, c, d, e"
        );
        assert_eq!(recipes_context(&[]), "No recommendations available.");
    }

    #[test]
    fn test_history_round_trip() {
        let turns = vec![
            (Speaker::User, "Can I swap eggs?".to_string()),
            (Speaker::Assistant, "Use flax.".to_string()),
        ];
        let text = history_text(&turns);
        assert_eq!(text, "User: Can I swap eggs?\nAssistant: Use flax.\n");
        assert_eq!(parse_history(&format!("noise\n{text}")), turns);
    }
}
