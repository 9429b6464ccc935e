use std::fmt;
use std::ops::Index;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::cuisine::Cuisine;

/// Number of nutrition features used for neighbor search.
pub const NUTRITION_DIMENSION: usize = 9;

/// Dataset column names for the nutrition features, in vector order.
pub const NUTRITION_COLUMNS: [&str; NUTRITION_DIMENSION] = [
    "Calories",
    "FatContent",
    "SaturatedFatContent",
    "CholesterolContent",
    "SodiumContent",
    "CarbohydrateContent",
    "FiberContent",
    "SugarContent",
    "ProteinContent",
];

/// Fixed-size nutrition vector: calories, fat, saturated fat, cholesterol,
/// sodium, carbohydrate, fiber, sugar, protein.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NutritionVector(pub [f64; NUTRITION_DIMENSION]);

impl NutritionVector {
    pub fn new(values: [f64; NUTRITION_DIMENSION]) -> Self {
        Self(values)
    }

    /// Builds a vector from a slice, rejecting anything that is not 9 values long.
    pub fn from_slice(values: &[f64]) -> crate::errors::Result<Self> {
        let array: [f64; NUTRITION_DIMENSION] = values.try_into().map_err(|_| {
            crate::errors::RecommenderError::DimensionMismatch {
                expected: NUTRITION_DIMENSION,
                got: values.len(),
            }
        })?;
        Ok(Self(array))
    }

    pub fn as_array(&self) -> &[f64; NUTRITION_DIMENSION] {
        &self.0
    }

    pub fn calories(&self) -> f64 {
        self.0[0]
    }

    pub fn protein(&self) -> f64 {
        self.0[8]
    }

    pub fn carbohydrate(&self) -> f64 {
        self.0[5]
    }
}

impl Index<usize> for NutritionVector {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.0[index]
    }
}

/// One row of the recipe corpus. Immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Recipe {
    pub name: String,
    pub nutrition: NutritionVector,
    pub ingredient_parts: Vec<String>,
    pub instructions: Vec<String>,
    pub cook_time: u32,
    pub prep_time: u32,
    pub total_time: u32,
    pub cuisine: Cuisine,
}

impl Recipe {
    /// Ingredient parts joined with single spaces. Ingredient matching runs on
    /// this blob, so a term can span two adjacent ingredients.
    pub fn ingredient_text(&self) -> String {
        self.ingredient_parts.join(" ")
    }

    /// Lower-cased `name + ingredients` text used by the preference filters.
    pub fn searchable_text(&self) -> String {
        format!("{} {}", self.name, self.ingredient_parts.join(" ")).to_lowercase()
    }
}

/// A recipe surfaced by a request, carrying request-scoped annotations.
/// The underlying corpus row is shared, never modified.
#[derive(Debug, Clone)]
pub struct ScoredRecipe {
    pub recipe: Arc<Recipe>,
    pub distance: Option<f64>,
    pub estimated_cost: f64,
    pub image_link: Option<String>,
}

impl ScoredRecipe {
    pub fn new(recipe: Arc<Recipe>, distance: Option<f64>) -> Self {
        let estimated_cost = crate::pricing::estimate_recipe_cost(&recipe);
        Self {
            recipe,
            distance,
            estimated_cost,
            image_link: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.recipe.name
    }
}

impl Serialize for ScoredRecipe {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let recipe = &self.recipe;
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("Name", &recipe.name)?;
        for (column, value) in NUTRITION_COLUMNS.iter().zip(recipe.nutrition.0.iter()) {
            map.serialize_entry(column, value)?;
        }
        map.serialize_entry("RecipeIngredientParts", &recipe.ingredient_parts)?;
        map.serialize_entry("RecipeInstructions", &recipe.instructions)?;
        map.serialize_entry("CookTime", &recipe.cook_time)?;
        map.serialize_entry("PrepTime", &recipe.prep_time)?;
        map.serialize_entry("TotalTime", &recipe.total_time)?;
        map.serialize_entry("Cuisine", &recipe.cuisine)?;
        map.serialize_entry("estimated_cost", &self.estimated_cost)?;
        if let Some(link) = &self.image_link {
            map.serialize_entry("image_link", link)?;
        }
        if let Some(distance) = self.distance {
            map.serialize_entry("distance", &distance)?;
        }
        map.end()
    }
}

impl fmt::Display for ScoredRecipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({:.0} kcal, {:.0}g protein, ~${:.2})",
            self.recipe.name,
            self.recipe.nutrition.calories(),
            self.recipe.nutrition.protein(),
            self.estimated_cost
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe(name: &str, parts: &[&str]) -> Recipe {
        Recipe {
            name: name.to_string(),
            nutrition: NutritionVector::default(),
            ingredient_parts: parts.iter().map(|s| s.to_string()).collect(),
            instructions: vec![],
            cook_time: 0,
            prep_time: 0,
            total_time: 0,
            cuisine: Cuisine::Other,
        }
    }

    #[test]
    fn test_from_slice_rejects_wrong_dimension() {
        let err = NutritionVector::from_slice(&[1.0, 2.0]).unwrap_err();
        assert!(err.to_string().contains("expected 9"));
        assert!(NutritionVector::from_slice(&[0.0; 9]).is_ok());
    }

    #[test]
    fn test_searchable_text_is_lowercase_name_and_ingredients() {
        let r = recipe("Chicken Curry", &["Chicken", "Garam Masala"]);
        assert_eq!(r.searchable_text(), "chicken curry chicken garam masala");
        assert_eq!(r.ingredient_text(), "Chicken Garam Masala");
    }

    #[test]
    fn test_scored_recipe_serializes_dataset_columns() {
        let mut r = recipe("Toast", &["bread", "butter"]);
        r.nutrition = NutritionVector::new([120.0, 4.0, 2.0, 10.0, 200.0, 18.0, 1.0, 2.0, 3.0]);
        let scored = ScoredRecipe::new(Arc::new(r), None);
        let value = serde_json::to_value(&scored).unwrap();
        assert_eq!(value["Name"], "Toast");
        assert_eq!(value["Calories"], 120.0);
        assert_eq!(value["Cuisine"], "Other");
        assert!(value.get("image_link").is_none());
        assert!(value["estimated_cost"].as_f64().unwrap() > 0.0);
    }
}
