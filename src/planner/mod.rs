pub mod meal_plan;
pub mod targets;

pub use meal_plan::{
    MealPlan, MealPlanner, NoticeKind, PlanBudgetSummary, PlanReport, PlanRequest, SlotNotice,
};
pub use targets::{BudgetTier, DietaryRestriction, JitterRange, MealSlot};
