//! Per-slot nutrition targets: calorie shares, jittered query vectors and the
//! user-facing planning options (budget tiers, dietary restrictions).

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::Serialize;

use crate::errors::{RecommenderError, Result};
use crate::recipe::NutritionVector;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MealSlot {
    Breakfast,
    MorningSnack,
    Lunch,
    AfternoonSnack,
    Dinner,
}

impl MealSlot {
    /// Key used in exported plans.
    pub fn key(&self) -> &'static str {
        match self {
            MealSlot::Breakfast => "breakfast",
            MealSlot::MorningSnack => "morning_snack",
            MealSlot::Lunch => "lunch",
            MealSlot::AfternoonSnack => "afternoon_snack",
            MealSlot::Dinner => "dinner",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            MealSlot::Breakfast => "Breakfast",
            MealSlot::MorningSnack => "Morning Snack",
            MealSlot::Lunch => "Lunch",
            MealSlot::AfternoonSnack => "Afternoon Snack",
            MealSlot::Dinner => "Dinner",
        }
    }

    pub fn is_main_meal(&self) -> bool {
        matches!(self, MealSlot::Lunch | MealSlot::Dinner)
    }
}

impl fmt::Display for MealSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Share of the daily calories per slot for 3, 4 or 5 meals a day.
pub fn slot_weights(meals_per_day: usize) -> Result<&'static [(MealSlot, f64)]> {
    match meals_per_day {
        3 => Ok(&[
            (MealSlot::Breakfast, 0.35),
            (MealSlot::Lunch, 0.40),
            (MealSlot::Dinner, 0.25),
        ]),
        4 => Ok(&[
            (MealSlot::Breakfast, 0.30),
            (MealSlot::MorningSnack, 0.05),
            (MealSlot::Lunch, 0.40),
            (MealSlot::Dinner, 0.25),
        ]),
        5 => Ok(&[
            (MealSlot::Breakfast, 0.30),
            (MealSlot::MorningSnack, 0.05),
            (MealSlot::Lunch, 0.40),
            (MealSlot::AfternoonSnack, 0.05),
            (MealSlot::Dinner, 0.20),
        ]),
        other => Err(RecommenderError::InvalidInput(format!(
            "meals per day must be 3, 4 or 5, got {other}"
        ))),
    }
}

/// Whole-calorie budget per slot, truncated like the rest of the plan display.
pub fn slot_calories(daily_calories: f64, meals_per_day: usize) -> Result<Vec<(MealSlot, f64)>> {
    Ok(slot_weights(meals_per_day)?
        .iter()
        .map(|(slot, weight)| (*slot, (daily_calories * weight).trunc()))
        .collect())
}

/// Bounds of the random perturbation applied to a slot target. Ratios are
/// multiplied by the jittered calories; integer ranges are inclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct JitterRange {
    pub calories: (f64, f64),
    pub fat_ratio: (f64, f64),
    pub saturated_fat_ratio: f64,
    pub cholesterol: (u32, u32),
    pub sodium: (u32, u32),
    pub carbohydrate_ratio: (f64, f64),
    pub fiber: (u32, u32),
    pub sugar: (u32, u32),
    pub protein_ratio: (f64, f64),
}

impl JitterRange {
    /// First-choice perturbation, about +/-10% on calories.
    pub fn standard() -> Self {
        Self {
            calories: (0.9, 1.1),
            fat_ratio: (0.025, 0.035),
            saturated_fat_ratio: 0.007,
            cholesterol: (40, 60),
            sodium: (350, 450),
            carbohydrate_ratio: (0.11, 0.15),
            fiber: (6, 10),
            sugar: (8, 12),
            protein_ratio: (0.045, 0.055),
        }
    }

    /// Wider perturbation used when every first-choice candidate was taken.
    pub fn wide() -> Self {
        Self {
            calories: (0.85, 1.15),
            fat_ratio: (0.02, 0.04),
            saturated_fat_ratio: 0.007,
            cholesterol: (30, 70),
            sodium: (300, 500),
            carbohydrate_ratio: (0.10, 0.16),
            fiber: (5, 12),
            sugar: (6, 15),
            protein_ratio: (0.04, 0.06),
        }
    }

    pub fn sample<R: Rng + ?Sized>(&self, slot_calories: f64, rng: &mut R) -> NutritionVector {
        let calories = slot_calories * uniform(rng, self.calories);
        NutritionVector::new([
            calories,
            calories * uniform(rng, self.fat_ratio),
            calories * self.saturated_fat_ratio,
            f64::from(int(rng, self.cholesterol)),
            f64::from(int(rng, self.sodium)),
            calories * uniform(rng, self.carbohydrate_ratio),
            f64::from(int(rng, self.fiber)),
            f64::from(int(rng, self.sugar)),
            calories * uniform(rng, self.protein_ratio),
        ])
    }
}

pub(crate) fn uniform<R: Rng + ?Sized>(rng: &mut R, (low, high): (f64, f64)) -> f64 {
    if low >= high {
        return low;
    }
    rng.gen_range(low..=high)
}

fn int<R: Rng + ?Sized>(rng: &mut R, (low, high): (u32, u32)) -> u32 {
    if low >= high {
        return low;
    }
    rng.gen_range(low..=high)
}

/// Daily spending tiers offered to the planner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub enum BudgetTier {
    #[default]
    NoLimit,
    /// $15-20 a day.
    BudgetFriendly,
    /// $20-35 a day.
    Moderate,
    /// $35-50 a day.
    Flexible,
    /// $50+ a day.
    Premium,
}

impl BudgetTier {
    pub fn daily_budget(&self) -> Option<f64> {
        match self {
            BudgetTier::NoLimit => None,
            BudgetTier::BudgetFriendly => Some(17.5),
            BudgetTier::Moderate => Some(27.5),
            BudgetTier::Flexible => Some(42.5),
            BudgetTier::Premium => Some(60.0),
        }
    }

    pub fn per_meal(&self, meals_per_day: usize) -> Option<f64> {
        self.daily_budget()
            .filter(|_| meals_per_day > 0)
            .map(|daily| daily / meals_per_day as f64)
    }
}

impl FromStr for BudgetTier {
    type Err = RecommenderError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace(['-', '_'], " ").as_str() {
            "none" | "no limit" | "any" => Ok(BudgetTier::NoLimit),
            "budget" | "budget friendly" | "low" => Ok(BudgetTier::BudgetFriendly),
            "moderate" | "medium" => Ok(BudgetTier::Moderate),
            "flexible" | "high" => Ok(BudgetTier::Flexible),
            "premium" => Ok(BudgetTier::Premium),
            _ => Err(RecommenderError::InvalidInput(format!("unknown budget tier '{s}'"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DietaryRestriction {
    Vegetarian,
    Vegan,
    PreferChicken,
    PreferFish,
    PreferBeef,
    PreferPork,
}

const MEAT_TOKENS: &[&str] = &[
    "beef", "pork", "chicken", "fish", "meat", "turkey", "lamb", "seafood",
];
const ANIMAL_PRODUCT_TOKENS: &[&str] = &["milk", "cheese", "egg", "butter", "cream", "yogurt", "whey"];

impl DietaryRestriction {
    /// Tokens a recipe should not contain. Advisory.
    pub fn excluded_tokens(&self) -> Vec<&'static str> {
        match self {
            DietaryRestriction::Vegetarian => MEAT_TOKENS.to_vec(),
            DietaryRestriction::Vegan => [MEAT_TOKENS, ANIMAL_PRODUCT_TOKENS].concat(),
            _ => Vec::new(),
        }
    }

    /// Tokens of which a recipe must contain at least one. Strict.
    pub fn included_tokens(&self) -> &'static [&'static str] {
        match self {
            DietaryRestriction::PreferChicken => &["chicken", "poultry"],
            DietaryRestriction::PreferFish => &[
                "fish", "salmon", "tuna", "shrimp", "seafood", "prawn", "cod", "tilapia",
            ],
            DietaryRestriction::PreferBeef => &["beef", "steak", "ground beef"],
            DietaryRestriction::PreferPork => &["pork", "bacon", "ham", "sausage"],
            _ => &[],
        }
    }
}

impl FromStr for DietaryRestriction {
    type Err = RecommenderError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace(['-', '_', ' ', '/'], "").as_str() {
            "vegetarian" => Ok(DietaryRestriction::Vegetarian),
            "vegan" => Ok(DietaryRestriction::Vegan),
            "preferchicken" | "chicken" => Ok(DietaryRestriction::PreferChicken),
            "preferfish" | "preferfishseafood" | "fish" | "seafood" => Ok(DietaryRestriction::PreferFish),
            "preferbeef" | "beef" => Ok(DietaryRestriction::PreferBeef),
            "preferpork" | "pork" => Ok(DietaryRestriction::PreferPork),
            _ => Err(RecommenderError::InvalidInput(format!(
                "unknown dietary restriction '{s}'"
            ))),
        }
    }
}

/// Combined (excluded, included) token lists for a set of restrictions, in
/// restriction order with duplicates kept.
pub fn restriction_tokens(restrictions: &[DietaryRestriction]) -> (Vec<String>, Vec<String>) {
    let excluded = restrictions
        .iter()
        .flat_map(|r| r.excluded_tokens())
        .map(str::to_string)
        .collect();
    let included = restrictions
        .iter()
        .flat_map(|r| r.included_tokens().iter())
        .map(|t| t.to_string())
        .collect();
    (excluded, included)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_slot_weights_sum_to_one() -> anyhow::Result<()> {
        for meals in 3..=5 {
            let weights = slot_weights(meals)?;
            assert_eq!(weights.len(), meals);
            let total: f64 = weights.iter().map(|(_, w)| w).sum();
            assert!((total - 1.0).abs() < 1e-9);
        }
        assert!(slot_weights(2).is_err());
        assert!(slot_weights(6).is_err());
        Ok(())
    }

    #[test]
    fn test_slot_calories_truncate() -> anyhow::Result<()> {
        let slots = slot_calories(2001.0, 3)?;
        assert_eq!(slots[0], (MealSlot::Breakfast, 700.0));
        assert_eq!(slots[1], (MealSlot::Lunch, 800.0));
        assert_eq!(slots[2], (MealSlot::Dinner, 500.0));
        Ok(())
    }

    #[test]
    fn test_jitter_stays_within_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let range = JitterRange::standard();
        for _ in 0..200 {
            let target = range.sample(500.0, &mut rng);
            let calories = target.calories();
            assert!((450.0..=550.0).contains(&calories));
            assert!((calories * 0.025..=calories * 0.035).contains(&target[1]));
            assert!((40.0..=60.0).contains(&target[3]));
            assert_eq!(target[4].fract(), 0.0);
            assert!((calories * 0.045..=calories * 0.055).contains(&target.protein()));
        }
    }

    #[test]
    fn test_wide_jitter_is_wider() {
        let standard = JitterRange::standard();
        let wide = JitterRange::wide();
        assert!(wide.calories.0 < standard.calories.0 && wide.calories.1 > standard.calories.1);
        assert!(wide.sodium.0 < standard.sodium.0 && wide.sodium.1 > standard.sodium.1);
    }

    #[test]
    fn test_budget_tiers() {
        assert_eq!(BudgetTier::NoLimit.per_meal(3), None);
        assert_eq!(BudgetTier::Premium.per_meal(4), Some(15.0));
        assert_eq!(BudgetTier::BudgetFriendly.daily_budget(), Some(17.5));
        assert_eq!("budget-friendly".parse::<BudgetTier>().unwrap(), BudgetTier::BudgetFriendly);
        assert!("lavish".parse::<BudgetTier>().is_err());
    }

    #[test]
    fn test_restriction_tokens() {
        let (excluded, included) =
            restriction_tokens(&[DietaryRestriction::Vegan, DietaryRestriction::PreferFish]);
        assert!(excluded.contains(&"whey".to_string()));
        assert!(excluded.contains(&"chicken".to_string()));
        assert_eq!(included.len(), 8);
        assert_eq!(
            "Prefer Fish/Seafood".parse::<DietaryRestriction>().unwrap(),
            DietaryRestriction::PreferFish
        );
    }
}
