#![allow(dead_code)]

use std::io::Write;

use meal_recommender::cuisine::Cuisine;
use meal_recommender::recipe::{NutritionVector, Recipe};
use meal_recommender::search::Corpus;
use tempfile::NamedTempFile;

const HEADER: &str = "RecipeId,Name,CookTime,PrepTime,TotalTime,RecipeIngredientParts,Calories,FatContent,SaturatedFatContent,CholesterolContent,SodiumContent,CarbohydrateContent,FiberContent,SugarContent,ProteinContent,RecipeInstructions,Cuisine";

const DISHES: &[&str] = &["Bowl", "Salad", "Stew", "Bake", "Skillet", "Wrap", "Soup"];
const INGREDIENT_SETS: &[&[&str]] = &[
    &["chicken breast", "rice", "onion"],
    &["eggs", "flour", "milk"],
    &["tomato", "pasta", "garlic"],
    &["beef", "potato", "carrot"],
    &["tofu", "broccoli", "soy sauce"],
    &["salmon", "lemon", "spinach"],
    &["lentils", "cumin", "water"],
];
const CUISINES: &[Cuisine] = &[
    Cuisine::Italian,
    Cuisine::Mexican,
    Cuisine::Chinese,
    Cuisine::American,
    Cuisine::Other,
];

/// Deterministic corpus with spread-out nutrition and unique names. No
/// recipe is tagged Indian.
pub fn synthetic_recipes(n: usize) -> Vec<Recipe> {
    (0..n)
        .map(|i| {
            let x = i as f64;
            let parts = INGREDIENT_SETS[i % INGREDIENT_SETS.len()];
            Recipe {
                name: format!("Recipe {i} {}", DISHES[i % DISHES.len()]),
                nutrition: NutritionVector::new([
                    150.0 + (i * 37 % 900) as f64,
                    2.0 + (i * 7 % 40) as f64,
                    0.5 + (i % 9) as f64,
                    (i * 13 % 120) as f64,
                    100.0 + (i * 53 % 700) as f64,
                    10.0 + (i * 11 % 90) as f64,
                    (i % 12) as f64,
                    (i * 3 % 25) as f64,
                    5.0 + x % 45.0,
                ]),
                ingredient_parts: parts.iter().map(|s| s.to_string()).collect(),
                instructions: vec!["Prepare.".to_string(), "Cook.".to_string()],
                cook_time: 20,
                prep_time: 10,
                total_time: 30,
                cuisine: CUISINES[i % CUISINES.len()],
            }
        })
        .collect()
}

pub fn synthetic_corpus(n: usize) -> Corpus {
    Corpus::new(synthetic_recipes(n))
}

fn r_list(items: &[String]) -> String {
    let quoted: Vec<String> = items.iter().map(|s| format!("\"\"{s}\"\"")).collect();
    format!("\"c({})\"", quoted.join(", "))
}

/// Writes recipes in the dataset CSV layout.
pub fn write_corpus_csv(recipes: &[Recipe]) -> anyhow::Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    writeln!(file, "{HEADER}")?;
    for (i, recipe) in recipes.iter().enumerate() {
        let nutrition: Vec<String> = recipe.nutrition.0.iter().map(|v| v.to_string()).collect();
        writeln!(
            file,
            "{},{},{},{},{},{},{},{},{}",
            i + 1,
            recipe.name,
            recipe.cook_time,
            recipe.prep_time,
            recipe.total_time,
            r_list(&recipe.ingredient_parts),
            nutrition.join(","),
            r_list(&recipe.instructions),
            recipe.cuisine.label(),
        )?;
    }
    file.flush()?;
    Ok(file)
}
