//! Filter, fit, index and query: one recommendation request end to end.

use tracing::debug;

use crate::errors::{RecommenderError, Result};
use crate::recipe::{NutritionVector, ScoredRecipe};
use crate::search::data_loader::Corpus;
use crate::search::ingredient_filter::filter_by_ingredients;
use crate::search::nn_index::CosineIndex;
use crate::search::scaler::StandardScaler;

#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationRequest {
    pub nutrition: NutritionVector,
    /// Required ingredient substrings, all of which must match.
    pub ingredients: Vec<String>,
    pub neighbors: usize,
    pub return_distance: bool,
}

impl RecommendationRequest {
    pub fn new(nutrition: NutritionVector, neighbors: usize) -> Self {
        Self {
            nutrition,
            ingredients: Vec::new(),
            neighbors,
            return_distance: false,
        }
    }

    pub fn with_ingredients(mut self, ingredients: Vec<String>) -> Self {
        self.ingredients = ingredients;
        self
    }

    pub fn with_distance(mut self) -> Self {
        self.return_distance = true;
        self
    }
}

/// Runs one recommendation request against the corpus.
///
/// The scaler and index are rebuilt on the ingredient-filtered subset every
/// call. Returns `Ok(None)` when fewer than `neighbors` recipes survive the
/// ingredient filter; otherwise exactly `neighbors` recipes, closest first.
pub fn recommend(corpus: &Corpus, request: &RecommendationRequest) -> Result<Option<Vec<ScoredRecipe>>> {
    if request.neighbors == 0 {
        return Err(RecommenderError::InvalidInput(
            "neighbor count must be at least 1".to_string(),
        ));
    }

    let subset = filter_by_ingredients(corpus.recipes(), &request.ingredients);
    if subset.len() < request.neighbors {
        debug!(
            available = subset.len(),
            wanted = request.neighbors,
            "not enough candidates for a recommendation"
        );
        return Ok(None);
    }

    let scaler = StandardScaler::fit(subset.iter().map(|r| &r.nutrition));
    let index = CosineIndex::build(subset.iter().map(|r| scaler.transform(&r.nutrition)));
    let hits = index.query(&scaler.transform(&request.nutrition), request.neighbors);

    let results = hits
        .into_iter()
        .map(|hit| {
            let distance = request.return_distance.then_some(hit.distance);
            ScoredRecipe::new(subset[hit.index].clone(), distance)
        })
        .collect::<Vec<_>>();

    debug!(
        subset = subset.len(),
        returned = results.len(),
        "recommendation query finished"
    );
    Ok(Some(results))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cuisine::Cuisine;
    use crate::recipe::{Recipe, NUTRITION_DIMENSION};

    fn recipe(name: &str, calories: f64, protein: f64, parts: &[&str]) -> Recipe {
        let mut values = [1.0; NUTRITION_DIMENSION];
        values[0] = calories;
        values[8] = protein;
        Recipe {
            name: name.to_string(),
            nutrition: NutritionVector::new(values),
            ingredient_parts: parts.iter().map(|s| s.to_string()).collect(),
            instructions: vec![],
            cook_time: 0,
            prep_time: 0,
            total_time: 0,
            cuisine: Cuisine::Other,
        }
    }

    fn corpus() -> Corpus {
        Corpus::new(vec![
            recipe("Light Salad", 150.0, 5.0, &["lettuce", "tomato"]),
            recipe("Chicken Bowl", 600.0, 45.0, &["chicken", "rice"]),
            recipe("Chicken Wrap", 550.0, 40.0, &["chicken", "tortilla"]),
            recipe("Pasta Bake", 800.0, 20.0, &["pasta", "cheese"]),
        ])
    }

    fn query(calories: f64, protein: f64) -> NutritionVector {
        let mut values = [1.0; NUTRITION_DIMENSION];
        values[0] = calories;
        values[8] = protein;
        NutritionVector::new(values)
    }

    #[test]
    fn test_returns_exactly_k_closest_first() -> anyhow::Result<()> {
        let request = RecommendationRequest::new(query(580.0, 44.0), 2).with_distance();
        let results = recommend(&corpus(), &request)?.expect("enough candidates");
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.name().starts_with("Chicken")));
        let d0 = results[0].distance.unwrap();
        let d1 = results[1].distance.unwrap();
        assert!(d0 <= d1);
        Ok(())
    }

    #[test]
    fn test_distance_omitted_unless_requested() -> anyhow::Result<()> {
        let request = RecommendationRequest::new(query(580.0, 44.0), 1);
        let results = recommend(&corpus(), &request)?.expect("enough candidates");
        assert!(results[0].distance.is_none());
        assert!(results[0].estimated_cost > 0.0);
        Ok(())
    }

    #[test]
    fn test_insufficient_candidates_is_none() -> anyhow::Result<()> {
        let request = RecommendationRequest::new(query(500.0, 30.0), 3)
            .with_ingredients(vec!["chicken".to_string()]);
        assert!(recommend(&corpus(), &request)?.is_none());

        let too_many = RecommendationRequest::new(query(500.0, 30.0), 5);
        assert!(recommend(&corpus(), &too_many)?.is_none());
        Ok(())
    }

    #[test]
    fn test_results_come_from_filtered_subset() -> anyhow::Result<()> {
        let request = RecommendationRequest::new(query(150.0, 5.0), 2)
            .with_ingredients(vec!["Chicken".to_string()]);
        let results = recommend(&corpus(), &request)?.expect("two chicken recipes");
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.recipe.ingredient_text().contains("chicken")));
        Ok(())
    }

    #[test]
    fn test_zero_neighbors_is_rejected() {
        let request = RecommendationRequest::new(query(1.0, 1.0), 0);
        assert!(recommend(&corpus(), &request).is_err());
    }
}
