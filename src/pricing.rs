//! Heuristic ingredient pricing for recipes and aggregated shopping lists.

use std::sync::LazyLock;

use crate::recipe::Recipe;
use crate::shopping_list::ShoppingList;

/// Share of a keyword's unit price charged for one recipe ingredient.
const PARTIAL_UNIT_SHARE: f64 = 0.3;
const UNMATCHED_INGREDIENT_COST: f64 = 1.5;
const EMPTY_RECIPE_COST: f64 = 5.0;
/// Below this matched share the per-ingredient floor kicks in.
const MIN_MATCHED_SHARE: f64 = 0.3;
const FLOOR_PER_INGREDIENT: f64 = 1.2;
const UNMATCHED_SHOPPING_UNIT_PRICE: f64 = 1.0;

const RECIPE_PRICES: &[(&str, f64)] = &[
    ("chicken", 3.5),
    ("beef", 5.5),
    ("pork", 4.0),
    ("turkey", 4.5),
    ("fish", 6.5),
    ("salmon", 8.0),
    ("shrimp", 9.0),
    ("tuna", 3.0),
    ("cheese", 4.5),
    ("milk", 2.5),
    ("cream", 3.5),
    ("butter", 3.0),
    ("egg", 2.5),
    ("rice", 2.0),
    ("pasta", 1.8),
    ("bread", 2.5),
    ("flour", 2.0),
    ("sugar", 2.5),
    ("oil", 3.5),
    ("olive oil", 6.0),
    ("tomato", 2.0),
    ("onion", 1.5),
    ("garlic", 1.0),
    ("potato", 2.0),
    ("carrot", 1.5),
    ("broccoli", 2.5),
    ("spinach", 2.5),
    ("lettuce", 2.0),
    ("pepper", 2.5),
    ("mushroom", 3.0),
    ("avocado", 2.0),
    ("lemon", 1.0),
    ("lime", 1.0),
    ("apple", 3.0),
    ("banana", 2.0),
    ("berry", 4.0),
    ("herbs", 2.5),
    ("spice", 3.0),
    ("sauce", 2.5),
    ("broth", 2.0),
    ("stock", 2.5),
    ("wine", 8.0),
    ("vinegar", 2.5),
];

const SHOPPING_PRICES: &[(&str, f64)] = &[
    ("chicken", 3.0),
    ("beef", 5.0),
    ("fish", 6.0),
    ("cheese", 4.0),
    ("milk", 3.5),
    ("egg", 0.25),
    ("rice", 2.0),
    ("pasta", 1.5),
    ("bread", 2.5),
    ("tomato", 0.5),
    ("onion", 0.3),
    ("potato", 0.4),
    ("carrot", 0.3),
];

static DEFAULT_RECIPE_TABLE: LazyLock<PriceTable> =
    LazyLock::new(|| PriceTable::from_entries(RECIPE_PRICES));
static DEFAULT_SHOPPING_TABLE: LazyLock<PriceTable> =
    LazyLock::new(|| PriceTable::from_entries(SHOPPING_PRICES));

/// Ordered keyword -> price lookup. The first keyword contained in an
/// ingredient string decides its price.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceTable {
    entries: Vec<(String, f64)>,
}

impl PriceTable {
    pub fn from_entries(entries: &[(&str, f64)]) -> Self {
        Self {
            entries: entries
                .iter()
                .map(|(keyword, price)| (keyword.to_string(), *price))
                .collect(),
        }
    }

    /// Table used for per-recipe cost estimates.
    pub fn recipe_default() -> Self {
        DEFAULT_RECIPE_TABLE.clone()
    }

    /// Coarser per-unit table used for shopping-list totals.
    pub fn shopping_default() -> Self {
        DEFAULT_SHOPPING_TABLE.clone()
    }

    /// Existing keywords keep their position with the new price; unknown
    /// keywords are appended after the built-in ones.
    pub fn with_overrides<K: AsRef<str>>(mut self, overrides: &[(K, f64)]) -> Self {
        for (keyword, price) in overrides {
            let keyword = keyword.as_ref().to_lowercase();
            match self.entries.iter_mut().find(|(k, _)| *k == keyword) {
                Some(entry) => entry.1 = *price,
                None => self.entries.push((keyword, *price)),
            }
        }
        self
    }

    pub fn lookup(&self, ingredient: &str) -> Option<f64> {
        let ingredient = ingredient.to_lowercase();
        self.entries
            .iter()
            .find(|(keyword, _)| ingredient.contains(keyword.as_str()))
            .map(|(_, price)| *price)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Approximate cost of a recipe from its ingredient strings, in cents precision.
    pub fn estimate_ingredients_cost<S: AsRef<str>>(&self, ingredients: &[S]) -> f64 {
        if ingredients.is_empty() {
            return EMPTY_RECIPE_COST;
        }

        let mut total = 0.0;
        let mut matched = 0usize;
        for ingredient in ingredients {
            match self.lookup(ingredient.as_ref()) {
                Some(price) => {
                    total += price * PARTIAL_UNIT_SHARE;
                    matched += 1;
                }
                None => total += UNMATCHED_INGREDIENT_COST,
            }
        }

        let count = ingredients.len() as f64;
        if (matched as f64) < count * MIN_MATCHED_SHARE {
            total = total.max(count * FLOOR_PER_INGREDIENT);
        }
        round_cents(total)
    }

    /// Sum of `quantity * unit price` over every aggregated entry.
    pub fn estimate_shopping_cost(&self, list: &ShoppingList) -> f64 {
        list.entries()
            .map(|entry| {
                let price = self
                    .lookup(&entry.original_name)
                    .unwrap_or(UNMATCHED_SHOPPING_UNIT_PRICE);
                entry.quantity * price
            })
            .sum()
    }
}

impl Default for PriceTable {
    fn default() -> Self {
        Self::recipe_default()
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Estimated cost of a recipe using the built-in recipe price table.
pub fn estimate_recipe_cost(recipe: &Recipe) -> f64 {
    DEFAULT_RECIPE_TABLE.estimate_ingredients_cost(&recipe.ingredient_parts)
}

/// Estimated cost of a shopping list using the built-in shopping price table.
pub fn estimate_shopping_cost(list: &ShoppingList) -> f64 {
    DEFAULT_SHOPPING_TABLE.estimate_shopping_cost(list)
}
