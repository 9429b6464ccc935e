//! Consolidated shopping list built from the ingredient lines of many recipes.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::recipe::Recipe;

const UNITS: &[&str] = &[
    "cup", "cups", "tablespoon", "tablespoons", "tbsp", "teaspoon", "teaspoons", "tsp", "pound",
    "pounds", "lb", "lbs", "ounce", "ounces", "oz", "gram", "grams", "g", "kilogram", "kilograms",
    "kg", "milliliter", "milliliters", "ml", "liter", "liters", "l", "pinch", "dash", "clove",
    "cloves", "slice", "slices", "can", "cans", "package", "packages", "bottle", "bottles",
];

/// Abbreviation and plural spellings mapped to the canonical singular unit.
const UNIT_ALIASES: &[(&str, &str)] = &[
    ("cups", "cup"),
    ("tablespoons", "tablespoon"),
    ("tbsp", "tablespoon"),
    ("teaspoons", "teaspoon"),
    ("tsp", "teaspoon"),
    ("pounds", "pound"),
    ("lb", "pound"),
    ("lbs", "pound"),
    ("ounces", "ounce"),
    ("oz", "ounce"),
    ("grams", "gram"),
    ("g", "gram"),
    ("kilograms", "kilogram"),
    ("kg", "kilogram"),
    ("milliliters", "milliliter"),
    ("ml", "milliliter"),
    ("liters", "liter"),
    ("l", "liter"),
    ("cloves", "clove"),
    ("slices", "slice"),
    ("cans", "can"),
    ("packages", "package"),
    ("bottles", "bottle"),
];

const PLURALIZABLE_UNITS: &[&str] = &[
    "tablespoon", "teaspoon", "pound", "ounce", "gram", "kilogram", "milliliter", "liter", "cup",
    "can", "package", "bottle", "slice", "clove",
];

const DESCRIPTORS: &[&str] = &[
    "fresh", "frozen", "dried", "canned", "chopped", "diced", "minced", "sliced", "shredded",
    "grated", "crushed", "large", "small", "medium", "whole", "ground",
];

static INGREDIENT_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    // longest spelling first so "cups" wins over "cup"
    let mut units = UNITS.to_vec();
    units.sort_by_key(|u| std::cmp::Reverse(u.len()));
    Regex::new(&format!(r"^([\d./\s]+)?\s*(?:({})\b)?\s*(.+)$", units.join("|"))).ok()
});

static DESCRIPTOR_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(&format!(r"\b(?:{})\b", DESCRIPTORS.join("|"))).ok());

/// Store sections, in the order a shopping list is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Category {
    Produce,
    #[serde(rename = "Meat & Seafood")]
    MeatSeafood,
    #[serde(rename = "Dairy & Eggs")]
    DairyEggs,
    #[serde(rename = "Pantry & Staples")]
    PantryStaples,
    #[serde(rename = "Condiments & Sauces")]
    CondimentsSauces,
    Frozen,
    Beverages,
    Other,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::Produce => "Produce",
            Category::MeatSeafood => "Meat & Seafood",
            Category::DairyEggs => "Dairy & Eggs",
            Category::PantryStaples => "Pantry & Staples",
            Category::CondimentsSauces => "Condiments & Sauces",
            Category::Frozen => "Frozen",
            Category::Beverages => "Beverages",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

const CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (
        Category::Produce,
        &[
            "lettuce", "tomato", "onion", "garlic", "potato", "carrot", "celery", "pepper",
            "spinach", "broccoli", "cauliflower", "cucumber", "zucchini", "mushroom", "avocado",
            "lemon", "lime", "apple", "banana", "orange", "berry", "fruit", "vegetable", "herb",
            "parsley", "cilantro", "basil", "thyme", "rosemary",
        ],
    ),
    (
        Category::MeatSeafood,
        &[
            "chicken", "beef", "pork", "turkey", "lamb", "fish", "salmon", "tuna", "shrimp",
            "bacon", "sausage", "ham", "steak", "meat",
        ],
    ),
    (
        Category::DairyEggs,
        &[
            "milk", "cheese", "butter", "cream", "yogurt", "egg", "sour cream", "cottage cheese",
            "cheddar", "mozzarella", "parmesan",
        ],
    ),
    (
        Category::PantryStaples,
        &[
            "flour", "sugar", "salt", "pepper", "oil", "vinegar", "rice", "pasta", "bread",
            "cereal", "oat", "bean", "lentil", "quinoa", "sauce", "broth", "stock", "spice",
            "seasoning", "baking",
        ],
    ),
    (
        Category::CondimentsSauces,
        &[
            "ketchup", "mustard", "mayonnaise", "soy sauce", "hot sauce", "salsa", "dressing",
            "marinade", "paste", "syrup",
        ],
    ),
    (Category::Frozen, &["frozen", "ice cream", "popsicle"]),
    (
        Category::Beverages,
        &["juice", "soda", "coffee", "tea", "water", "wine", "beer"],
    ),
];

/// One ingredient line split into quantity, canonical unit and free text.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedIngredient {
    pub quantity: f64,
    /// Canonical singular unit, or empty when none was recognised.
    pub unit: String,
    pub ingredient: String,
}

/// Parses "1 1/2 cups flour" style text. Unparsable quantities become 1.0 and
/// an unrecognised unit is left in the ingredient text.
pub fn parse_ingredient(text: &str) -> ParsedIngredient {
    let text = text.trim().to_lowercase();
    let fallback = || ParsedIngredient {
        quantity: 1.0,
        unit: String::new(),
        ingredient: text.clone(),
    };

    let Some(caps) = INGREDIENT_PATTERN.as_ref().and_then(|re| re.captures(&text)) else {
        return fallback();
    };

    let quantity = caps
        .get(1)
        .and_then(|m| parse_quantity(m.as_str()))
        .unwrap_or(1.0);
    let unit = caps
        .get(2)
        .map(|m| canonical_unit(m.as_str()).to_string())
        .unwrap_or_default();
    let ingredient = caps
        .get(3)
        .map_or_else(String::new, |m| m.as_str().trim().to_string());

    ParsedIngredient {
        quantity,
        unit,
        ingredient,
    }
}

/// "2", "0.5", "1/2" or "1 1/2".
fn parse_quantity(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let value = if raw.contains('/') {
        let parts: Vec<&str> = raw.split_whitespace().collect();
        match parts.as_slice() {
            [whole, fraction] => whole.parse::<f64>().ok()? + parse_fraction(fraction)?,
            _ => parse_fraction(raw)?,
        }
    } else {
        raw.parse::<f64>().ok()?
    };
    value.is_finite().then_some(value)
}

fn parse_fraction(raw: &str) -> Option<f64> {
    let (numerator, denominator) = raw.split_once('/')?;
    let denominator = denominator.trim().parse::<f64>().ok()?;
    if denominator == 0.0 {
        return None;
    }
    Some(numerator.trim().parse::<f64>().ok()? / denominator)
}

fn canonical_unit(unit: &str) -> &str {
    UNIT_ALIASES
        .iter()
        .find(|(alias, _)| *alias == unit)
        .map_or(unit, |(_, canonical)| canonical)
}

/// Drops descriptor words and applies suffix singularisation. Heuristic:
/// "glass" stays, "tomatoes" becomes "tomato", "cheeses" becomes "chees".
pub fn normalize_ingredient_name(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    let stripped = match DESCRIPTOR_PATTERN.as_ref() {
        Some(re) => re.replace_all(&lowered, ""),
        None => lowered.as_str().into(),
    };
    let name = stripped.split_whitespace().collect::<Vec<_>>().join(" ");

    let singular = if let Some(stem) = name.strip_suffix("ies") {
        format!("{stem}y")
    } else if let Some(stem) = name.strip_suffix("es") {
        stem.to_string()
    } else if name.ends_with('s') && !name.ends_with("ss") {
        name[..name.len() - 1].to_string()
    } else {
        name
    };
    singular.trim().to_string()
}

/// Canonical unit name, pluralised when the quantity exceeds one.
pub fn normalize_unit(unit: &str, quantity: f64) -> String {
    let unit = unit.trim().to_lowercase();
    let canonical = canonical_unit(&unit);
    if quantity > 1.0 && PLURALIZABLE_UNITS.contains(&canonical) {
        format!("{canonical}s")
    } else {
        canonical.to_string()
    }
}

/// First category with a keyword contained in the name; `Other` otherwise.
pub fn categorize_ingredient(name: &str) -> Category {
    let name = name.to_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| name.contains(k)))
        .map_or(Category::Other, |(category, _)| *category)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShoppingListEntry {
    /// Normalised name used as the aggregation key.
    pub name: String,
    /// Representative ingredient text as written in a recipe.
    pub original_name: String,
    pub quantity: f64,
    /// Unit pluralised for `quantity`, or empty.
    pub unit: String,
    pub category: Category,
    pub display: String,
}

/// Entries grouped by category; iteration follows the render order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ShoppingList {
    categories: BTreeMap<Category, Vec<ShoppingListEntry>>,
}

impl ShoppingList {
    pub fn categories(&self) -> impl Iterator<Item = (Category, &[ShoppingListEntry])> {
        self.categories.iter().map(|(c, items)| (*c, items.as_slice()))
    }

    pub fn get(&self, category: Category) -> Option<&[ShoppingListEntry]> {
        self.categories.get(&category).map(Vec::as_slice)
    }

    pub fn entries(&self) -> impl Iterator<Item = &ShoppingListEntry> {
        self.categories.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

#[derive(Default)]
struct Aggregate {
    quantities: Vec<f64>,
    original_names: Vec<String>,
}

/// Aggregates every ingredient line of `recipes` by (normalised name, unit).
///
/// The result does not depend on recipe or ingredient order: quantities are
/// summed in sorted order and the representative name is the smallest
/// original spelling seen for the key.
pub fn generate_shopping_list<'a, I>(recipes: I) -> ShoppingList
where
    I: IntoIterator<Item = &'a Recipe>,
{
    let mut aggregates: BTreeMap<(String, String), Aggregate> = BTreeMap::new();

    for recipe in recipes {
        for line in &recipe.ingredient_parts {
            if line.trim().is_empty() {
                continue;
            }
            let parsed = parse_ingredient(line);
            let key = (normalize_ingredient_name(&parsed.ingredient), parsed.unit);
            let entry = aggregates.entry(key).or_default();
            entry.quantities.push(parsed.quantity);
            entry.original_names.push(parsed.ingredient);
        }
    }

    let mut categories: BTreeMap<Category, Vec<ShoppingListEntry>> = BTreeMap::new();
    for ((name, unit), mut aggregate) in aggregates {
        aggregate.quantities.sort_by(f64::total_cmp);
        let quantity: f64 = aggregate.quantities.iter().sum();
        let original_name = aggregate.original_names.into_iter().min().unwrap_or_default();
        let unit = if unit.is_empty() {
            unit
        } else {
            normalize_unit(&unit, quantity)
        };
        let category = categorize_ingredient(&original_name);
        let display = display_line(quantity, &unit, &original_name);

        categories.entry(category).or_default().push(ShoppingListEntry {
            name,
            original_name,
            quantity,
            unit,
            category,
            display,
        });
    }

    for items in categories.values_mut() {
        items.sort_by(|a, b| {
            a.original_name
                .cmp(&b.original_name)
                .then_with(|| a.unit.cmp(&b.unit))
        });
    }

    ShoppingList { categories }
}

fn format_quantity(quantity: f64) -> String {
    if quantity.fract() == 0.0 {
        format!("{}", quantity as i64)
    } else {
        let fixed = format!("{quantity:.2}");
        fixed.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

fn display_line(quantity: f64, unit: &str, name: &str) -> String {
    let quantity_text = format_quantity(quantity);
    if !unit.is_empty() {
        format!("{quantity_text} {unit} {name}")
    } else if quantity > 1.0 {
        format!("{quantity_text}x {name}")
    } else {
        name.to_string()
    }
}

pub fn format_shopping_list_markdown(list: &ShoppingList) -> String {
    if list.is_empty() {
        return "No items in shopping list.".to_string();
    }

    let mut markdown = String::from("## 🛒 Shopping List\n\n");
    let mut total_items = 0;
    for (category, items) in list.categories() {
        markdown.push_str(&format!("### 📦 {category}\n\n"));
        for item in items {
            markdown.push_str(&format!("- {}\n", item.display));
            total_items += 1;
        }
        markdown.push('\n');
    }
    markdown.push_str(&format!("---\n**Total Items: {total_items}**\n"));
    markdown
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cuisine::Cuisine;
    use crate::recipe::NutritionVector;

    fn recipe(parts: &[&str]) -> Recipe {
        Recipe {
            name: "r".to_string(),
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
    fn test_parse_mixed_fraction_with_plural_unit() {
        let parsed = parse_ingredient("1 1/2 cups flour");
        assert_eq!(parsed.quantity, 1.5);
        assert_eq!(parsed.unit, "cup");
        assert_eq!(parsed.ingredient, "flour");
    }

    #[test]
    fn test_parse_quantity_forms() {
        assert_eq!(parse_ingredient("1/2 tsp salt").quantity, 0.5);
        assert_eq!(parse_ingredient("1/2 tsp salt").unit, "teaspoon");
        assert_eq!(parse_ingredient("2.5 lbs Chicken").quantity, 2.5);
        assert_eq!(parse_ingredient("2.5 lbs Chicken").ingredient, "chicken");
        assert_eq!(parse_ingredient("3 eggs").unit, "");
    }

    #[test]
    fn test_parse_malformed_quantity_defaults_to_one() {
        let parsed = parse_ingredient("1/0 cup sugar");
        assert_eq!(parsed.quantity, 1.0);
        assert_eq!(parsed.unit, "cup");
        let parsed = parse_ingredient("saffron");
        assert_eq!(parsed.quantity, 1.0);
        assert_eq!(parsed.unit, "");
        assert_eq!(parsed.ingredient, "saffron");
    }

    #[test]
    fn test_single_letter_units_need_a_word_boundary() {
        let parsed = parse_ingredient("lemon juice");
        assert_eq!(parsed.unit, "");
        assert_eq!(parsed.ingredient, "lemon juice");
        let parsed = parse_ingredient("500 g garlic");
        assert_eq!(parsed.unit, "gram");
        assert_eq!(parsed.ingredient, "garlic");
    }

    #[test]
    fn test_normalize_unit() {
        assert_eq!(normalize_unit("tbsp", 2.0), "tablespoons");
        assert_eq!(normalize_unit("tbsp", 1.0), "tablespoon");
        assert_eq!(normalize_unit("pinch", 3.0), "pinch");
        assert_eq!(normalize_unit("LB", 0.5), "pound");
    }

    #[test]
    fn test_normalize_ingredient_name() {
        assert_eq!(normalize_ingredient_name("Fresh Chopped Tomatoes"), "tomato");
        assert_eq!(normalize_ingredient_name("berries"), "berry");
        assert_eq!(normalize_ingredient_name("carrots"), "carrot");
        assert_eq!(normalize_ingredient_name("watercress"), "watercress");
        // descriptors only match whole words
        assert_eq!(normalize_ingredient_name("groundnut oil"), "groundnut oil");
    }

    #[test]
    fn test_categorize_first_match_wins() {
        assert_eq!(categorize_ingredient("red bell pepper"), Category::Produce);
        assert_eq!(categorize_ingredient("chicken broth"), Category::MeatSeafood);
        assert_eq!(categorize_ingredient("soy sauce"), Category::PantryStaples);
        assert_eq!(categorize_ingredient("ketchup"), Category::CondimentsSauces);
        assert_eq!(categorize_ingredient("saffron"), Category::Other);
    }

    #[test]
    fn test_generate_aggregates_by_name_and_unit() {
        let recipes = [
            recipe(&["1 cup milk", "2 carrots", "salt"]),
            recipe(&["1/2 cup milk", "1 carrot", ""]),
        ];
        let list = generate_shopping_list(&recipes);

        let dairy = list.get(Category::DairyEggs).unwrap();
        assert_eq!(dairy.len(), 1);
        assert_eq!(dairy[0].quantity, 1.5);
        assert_eq!(dairy[0].unit, "cups");
        assert_eq!(dairy[0].display, "1.5 cups milk");

        let produce = list.get(Category::Produce).unwrap();
        assert_eq!(produce[0].quantity, 3.0);
        assert_eq!(produce[0].display, "3x carrot");

        let pantry = list.get(Category::PantryStaples).unwrap();
        assert_eq!(pantry[0].display, "salt");
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_generate_is_order_independent() {
        let a = recipe(&["2 Tomatoes", "1 tbsp olive oil", "1/3 cup rice"]);
        let b = recipe(&["1 tomato", "2 tbsp olive oil", "frozen peas", "1/3 cup rice"]);
        let forward = generate_shopping_list([&a, &b]);

        let mut b_shuffled = b.clone();
        b_shuffled.ingredient_parts.reverse();
        let backward = generate_shopping_list([&b_shuffled, &a]);

        assert_eq!(forward, backward);
    }

    #[test]
    fn test_markdown_layout() {
        let list = generate_shopping_list(&[recipe(&["2 eggs", "1 apple"])]);
        let markdown = format_shopping_list_markdown(&list);
        assert_eq!(
            markdown,
            "## 🛒 Shopping List\n\n### 📦 Produce\n\n- apple\n\n### 📦 Dairy & Eggs\n\n- 2x eggs\n\n---\n**Total Items: 2**\n"
        );
        assert_eq!(
            format_shopping_list_markdown(&ShoppingList::default()),
            "No items in shopping list."
        );
    }

    #[test]
    fn test_format_quantity() {
        assert_eq!(format_quantity(2.0), "2");
        assert_eq!(format_quantity(0.333333), "0.33");
        assert_eq!(format_quantity(1.5), "1.5");
    }
}
