//! Body metrics and daily calorie needs for the diet recommendation.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::errors::{RecommenderError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Gender {
    Male,
    Female,
}

impl FromStr for Gender {
    type Err = RecommenderError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            _ => Err(RecommenderError::InvalidInput(format!("unknown gender '{s}'"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ActivityLevel {
    /// Little or no exercise.
    Sedentary,
    Light,
    /// 3-5 days a week.
    Moderate,
    /// 6-7 days a week.
    VeryActive,
    /// Very active with a physical job.
    ExtraActive,
}

impl ActivityLevel {
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::VeryActive => 1.725,
            ActivityLevel::ExtraActive => 1.9,
        }
    }
}

impl FromStr for ActivityLevel {
    type Err = RecommenderError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "sedentary" | "none" | "little" => Ok(ActivityLevel::Sedentary),
            "light" => Ok(ActivityLevel::Light),
            "moderate" => Ok(ActivityLevel::Moderate),
            "veryactive" | "active" => Ok(ActivityLevel::VeryActive),
            "extraactive" | "extra" => Ok(ActivityLevel::ExtraActive),
            _ => Err(RecommenderError::InvalidInput(format!(
                "unknown activity level '{s}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum WeightPlan {
    #[default]
    Maintain,
    /// -0.25 kg/week.
    MildLoss,
    /// -0.5 kg/week.
    Loss,
    /// -1 kg/week.
    ExtremeLoss,
}

impl WeightPlan {
    pub const ALL: [WeightPlan; 4] = [
        WeightPlan::Maintain,
        WeightPlan::MildLoss,
        WeightPlan::Loss,
        WeightPlan::ExtremeLoss,
    ];

    pub fn factor(&self) -> f64 {
        match self {
            WeightPlan::Maintain => 1.0,
            WeightPlan::MildLoss => 0.9,
            WeightPlan::Loss => 0.8,
            WeightPlan::ExtremeLoss => 0.6,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WeightPlan::Maintain => "Maintain weight",
            WeightPlan::MildLoss => "Mild weight loss",
            WeightPlan::Loss => "Weight loss",
            WeightPlan::ExtremeLoss => "Extreme weight loss",
        }
    }

    pub fn weekly_change(&self) -> &'static str {
        match self {
            WeightPlan::Maintain => "-0 kg/week",
            WeightPlan::MildLoss => "-0.25 kg/week",
            WeightPlan::Loss => "-0.5 kg/week",
            WeightPlan::ExtremeLoss => "-1 kg/week",
        }
    }
}

impl fmt::Display for WeightPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for WeightPlan {
    type Err = RecommenderError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "maintain" | "maintainweight" => Ok(WeightPlan::Maintain),
            "mild" | "mildloss" | "mildweightloss" => Ok(WeightPlan::MildLoss),
            "loss" | "weightloss" => Ok(WeightPlan::Loss),
            "extreme" | "extremeloss" | "extremeweightloss" => Ok(WeightPlan::ExtremeLoss),
            _ => Err(RecommenderError::InvalidInput(format!("unknown weight plan '{s}'"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obesity,
}

impl BmiCategory {
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiCategory::Underweight
        } else if bmi < 25.0 {
            BmiCategory::Normal
        } else if bmi < 30.0 {
            BmiCategory::Overweight
        } else {
            BmiCategory::Obesity
        }
    }
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthProfile {
    pub age: u32,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub gender: Gender,
    pub activity: ActivityLevel,
    pub plan: WeightPlan,
    pub meals_per_day: usize,
    /// Daily spending limit shared across the meals.
    pub daily_budget: Option<f64>,
}

impl HealthProfile {
    pub fn validate(&self) -> Result<()> {
        if !(2..=120).contains(&self.age) {
            return Err(RecommenderError::InvalidInput(format!("age {} out of range", self.age)));
        }
        if !(50.0..=300.0).contains(&self.height_cm) || !(10.0..=300.0).contains(&self.weight_kg) {
            return Err(RecommenderError::InvalidInput(
                "height must be 50-300 cm and weight 10-300 kg".to_string(),
            ));
        }
        if !(3..=5).contains(&self.meals_per_day) {
            return Err(RecommenderError::InvalidInput(format!(
                "meals per day must be 3, 4 or 5, got {}",
                self.meals_per_day
            )));
        }
        Ok(())
    }

    /// kg/m², rounded to two decimals.
    pub fn bmi(&self) -> f64 {
        let meters = self.height_cm / 100.0;
        (self.weight_kg / (meters * meters) * 100.0).round() / 100.0
    }

    pub fn bmi_category(&self) -> BmiCategory {
        BmiCategory::from_bmi(self.bmi())
    }

    /// Mifflin-St Jeor basal metabolic rate.
    pub fn bmr(&self) -> f64 {
        let base = 10.0 * self.weight_kg + 6.25 * self.height_cm - 5.0 * f64::from(self.age);
        match self.gender {
            Gender::Male => base + 5.0,
            Gender::Female => base - 161.0,
        }
    }

    pub fn maintenance_calories(&self) -> f64 {
        self.bmr() * self.activity.multiplier()
    }

    /// Daily calories for the selected weight plan.
    pub fn target_calories(&self) -> f64 {
        self.maintenance_calories() * self.plan.factor()
    }

    /// Rounded daily calories for every weight plan.
    pub fn daily_calorie_targets(&self) -> Vec<(WeightPlan, f64)> {
        let maintenance = self.maintenance_calories();
        WeightPlan::ALL
            .iter()
            .map(|plan| (*plan, (maintenance * plan.factor()).round()))
            .collect()
    }
}
