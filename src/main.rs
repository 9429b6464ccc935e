use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use meal_recommender::chat::{self, ChatBackend};
use meal_recommender::cli::{parse_args, Command};
use meal_recommender::config::EngineConfig;
use meal_recommender::cuisine::tag_corpus_file;
use meal_recommender::images::{ImageLookup, NoImages, SearchUrlImages};
use meal_recommender::logging::init_tracing;
use meal_recommender::planner::{MealPlanner, PlanBudgetSummary, PlanRequest};
use meal_recommender::profile::HealthProfile;
use meal_recommender::recipe::NUTRITION_COLUMNS;
use meal_recommender::recommendations::{
    composition_totals, custom_recommendations, diet_recommendations, CustomRequest,
};
use meal_recommender::search::{load_recipe_corpus, resolve_corpus_path, Corpus};
use meal_recommender::shopping_list::format_shopping_list_markdown;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::fs;
use tracing::info;

fn load_corpus(config: &EngineConfig) -> Result<Corpus> {
    let path = resolve_corpus_path(&config.dataset_candidates())
        .context("No recipe corpus found; pass --dataset or set RECIPE_DATASET_PATH")?;
    load_recipe_corpus(&path)
        .with_context(|| format!("Failed to load recipe corpus from '{}'", path.display()))
}

fn rng_from(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

async fn write_output(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents)
        .await
        .with_context(|| format!("Failed to write '{}'", path.display()))?;
    info!(path = %path.display(), "wrote output file");
    Ok(())
}

async fn read_optional(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read '{}'", path.display())),
        None => Ok(String::new()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli_args = parse_args();
    init_tracing(cli_args.log_format, "info")?;

    let mut config = EngineConfig::from_env();
    if let Some(path) = cli_args.dataset {
        config.dataset_path = Some(path);
    }
    let images: Box<dyn ImageLookup> = match &config.image_search_url {
        Some(url) => Box::new(SearchUrlImages::new(url.clone())),
        None => Box::new(NoImages),
    };

    match cli_args.command {
        Command::Recommend {
            nutrition,
            ingredients,
            count,
            budget,
            context_out,
        } => {
            let corpus = load_corpus(&config)?;
            let request = CustomRequest {
                nutrition,
                ingredients,
                count,
                budget_per_recipe: budget,
            };
            let Some(found) = custom_recommendations(&corpus, &request, images.as_ref())? else {
                println!("Not enough recipes contain the requested ingredients.");
                return Ok(());
            };
            if let Some(warning) = &found.warning {
                println!("Warning: {warning}");
            }
            for (i, recipe) in found.recipes.iter().enumerate() {
                println!("{}. {recipe}", i + 1);
            }
            if let Some(path) = context_out {
                write_output(&path, &chat::recipes_context(&found.recipes)).await?;
            }
        }
        Command::Diet {
            age,
            height,
            weight,
            gender,
            activity,
            plan,
            meals,
            budget,
            seed,
            picks,
            context_out,
        } => {
            let profile = HealthProfile {
                age,
                height_cm: height,
                weight_kg: weight,
                gender,
                activity,
                plan,
                meals_per_day: meals,
                daily_budget: budget,
            };
            profile.validate()?;
            println!("BMI: {:.2} kg/m² ({})", profile.bmi(), profile.bmi_category());
            for (weight_plan, calories) in profile.daily_calorie_targets() {
                println!(
                    "{weight_plan}: {calories:.0} Calories/day ({})",
                    weight_plan.weekly_change()
                );
            }

            let corpus = load_corpus(&config)?;
            let mut rng = rng_from(seed);
            let slots = diet_recommendations(
                &corpus,
                &profile,
                &config.planner,
                images.as_ref(),
                &mut rng,
            )?;
            for slot in &slots {
                println!("\n{} (~{:.0} kcal)", slot.slot.title(), slot.target_calories);
                if let Some(warning) = &slot.warning {
                    println!("  Warning: {warning}");
                }
                for (i, recipe) in slot.recipes.iter().enumerate() {
                    println!("  {i}. {recipe}");
                }
            }

            let picks = if picks.is_empty() {
                vec![0; slots.len()]
            } else {
                picks
            };
            let totals = composition_totals(&slots, &picks);
            println!(
                "\nChosen composition: {:.0} of {:.0} Calories",
                totals.calories(),
                profile.target_calories()
            );
            for (column, value) in NUTRITION_COLUMNS.iter().zip(totals.as_array()).skip(1) {
                println!("  {column}: {value:.1}");
            }
            if let Some(path) = context_out {
                write_output(&path, &chat::diet_context(&slots)).await?;
            }
        }
        Command::Plan {
            calories,
            meals,
            days,
            restrictions,
            cuisines,
            budget,
            seed,
            json_out,
            markdown_out,
            context_out,
        } => {
            let corpus = load_corpus(&config)?;
            let request = PlanRequest {
                daily_calories: calories,
                meals_per_day: meals,
                days,
                restrictions,
                cuisines,
                budget,
            };
            let mut rng = rng_from(seed);
            let report = MealPlanner::new(&corpus)
                .with_settings(config.planner.clone())
                .with_images(images.as_ref())
                .plan(&request, &mut rng)?;

            for day in report.plan.days() {
                println!("\n{}", day.label);
                for (slot, recipe) in &day.meals {
                    println!("  {}: {recipe}", slot.title());
                }
            }
            for notice in &report.notices {
                println!("Note: {notice}");
            }

            let shopping_list = report.plan.shopping_list();
            let markdown = format_shopping_list_markdown(&shopping_list);
            println!("\n{markdown}");
            println!("{}", PlanBudgetSummary::new(&report.plan, budget, days));

            if let Some(path) = json_out {
                write_output(&path, &report.plan.to_json_pretty()?).await?;
            }
            if let Some(path) = markdown_out {
                write_output(&path, &markdown).await?;
            }
            if let Some(path) = context_out {
                write_output(&path, &chat::meal_plan_context(&report.plan)).await?;
            }
        }
        Command::TagCuisines { input, output } => {
            let tagged = tag_corpus_file(&input, &output).with_context(|| {
                format!("Failed to tag cuisines from '{}'", input.display())
            })?;
            println!("Tagged {tagged} recipes into {}", output.display());
        }
        Command::Chat {
            question,
            context_file,
            history_file,
            generative,
        } => {
            let context = read_optional(context_file.as_ref()).await?;
            let history = read_optional(history_file.as_ref()).await?;
            let backend = if generative {
                ChatBackend::generative(&config.api_key_env_var, config.chat_model.clone())
            } else {
                ChatBackend::Faq
            };
            let answer = backend.answer(&context, &history, &question).await;
            println!("{answer}");

            if let Some(path) = history_file {
                let mut turns = chat::parse_history(&history);
                turns.push((chat::Speaker::User, question));
                // one history line per turn
                let flattened = answer
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .collect::<Vec<_>>()
                    .join(" ");
                turns.push((chat::Speaker::Assistant, flattened));
                write_output(&path, &chat::history_text(&turns)).await?;
            }
        }
    }

    Ok(())
}
