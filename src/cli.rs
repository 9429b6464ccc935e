use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cuisine::Cuisine;
use crate::logging::LogFormat;
use crate::planner::{BudgetTier, DietaryRestriction};
use crate::profile::{ActivityLevel, Gender, WeightPlan};
use crate::recipe::NutritionVector;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Recipe corpus CSV; falls back to RECIPE_DATASET_PATH and the default locations
    #[arg(long, global = true)]
    pub dataset: Option<PathBuf>,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty, global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Recipes closest to a nutrition target
    Recommend {
        /// Calories,Fat,SaturatedFat,Cholesterol,Sodium,Carbohydrate,Fiber,Sugar,Protein
        #[arg(value_parser = parse_nutrition)]
        nutrition: NutritionVector,

        /// Required ingredients separated by ';'
        #[arg(short, long, default_value = "")]
        ingredients: String,

        #[arg(short = 'n', long, default_value_t = 5)]
        count: usize,

        /// Maximum estimated cost per recipe
        #[arg(long)]
        budget: Option<f64>,

        /// Write the chat context for these recipes to a file
        #[arg(long)]
        context_out: Option<PathBuf>,
    },
    /// Per-meal recommendations from body metrics
    Diet {
        #[arg(long)]
        age: u32,
        /// Height in cm
        #[arg(long)]
        height: f64,
        /// Weight in kg
        #[arg(long)]
        weight: f64,
        #[arg(long, default_value = "male")]
        gender: Gender,
        #[arg(long, default_value = "moderate")]
        activity: ActivityLevel,
        #[arg(long, default_value = "maintain")]
        plan: WeightPlan,
        #[arg(long, default_value_t = 3)]
        meals: usize,
        /// Daily food budget
        #[arg(long)]
        budget: Option<f64>,
        #[arg(long)]
        seed: Option<u64>,
        /// Chosen recipe index per meal for the composition totals, e.g. 0,2,1
        #[arg(long, value_delimiter = ',')]
        picks: Vec<usize>,
        #[arg(long)]
        context_out: Option<PathBuf>,
    },
    /// Multi-day meal plan with shopping list
    Plan {
        #[arg(long, default_value_t = 2000.0)]
        calories: f64,
        #[arg(long, default_value_t = 3)]
        meals: usize,
        #[arg(long, default_value_t = 7)]
        days: usize,
        /// e.g. vegetarian, vegan, prefer-chicken
        #[arg(long, value_delimiter = ',')]
        restrictions: Vec<DietaryRestriction>,
        #[arg(long, value_delimiter = ',')]
        cuisines: Vec<Cuisine>,
        #[arg(long, default_value = "no-limit")]
        budget: BudgetTier,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        json_out: Option<PathBuf>,
        #[arg(long)]
        markdown_out: Option<PathBuf>,
        #[arg(long)]
        context_out: Option<PathBuf>,
    },
    /// Add or refresh the Cuisine column of a corpus CSV
    TagCuisines {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Ask a question about a saved recommendation context
    Chat {
        #[arg(short, long)]
        question: String,
        #[arg(long)]
        context_file: Option<PathBuf>,
        #[arg(long)]
        history_file: Option<PathBuf>,
        /// Use the hosted model instead of the canned answers
        #[arg(long)]
        generative: bool,
    },
}

fn parse_nutrition(text: &str) -> Result<NutritionVector, String> {
    let values = text
        .split(',')
        .map(|v| {
            v.trim()
                .parse::<f64>()
                .map_err(|e| format!("invalid number '{}': {e}", v.trim()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    NutritionVector::from_slice(&values).map_err(|e| e.to_string())
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
