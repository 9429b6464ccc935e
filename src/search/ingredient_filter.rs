use std::sync::Arc;

use crate::recipe::Recipe;

/// Keeps the recipes whose ingredient text contains every term, ignoring case.
///
/// Matching runs on the ingredient parts joined with spaces, so a term may
/// straddle two adjacent ingredients. Blank terms are ignored and an empty
/// term list keeps the whole input. Input order is preserved.
pub fn filter_by_ingredients<S: AsRef<str>>(recipes: &[Arc<Recipe>], terms: &[S]) -> Vec<Arc<Recipe>> {
    let terms: Vec<String> = terms
        .iter()
        .map(|t| t.as_ref().trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect();
    if terms.is_empty() {
        return recipes.to_vec();
    }

    recipes
        .iter()
        .filter(|recipe| {
            let text = recipe.ingredient_text().to_lowercase();
            terms.iter().all(|term| text.contains(term.as_str()))
        })
        .cloned()
        .collect()
}

/// Splits a `;`-separated ingredient field into terms.
pub fn split_ingredient_terms(text: &str) -> Vec<String> {
    text.split(';')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
