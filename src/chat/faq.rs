//! Keyword-routed canned answers. Topics are checked in table order and the
//! first topic with a matching keyword wins.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaqTopic {
    Substitute,
    Allergy,
    Cooking,
    Nutrition,
    MealPrep,
    Budget,
}

const TOPIC_KEYWORDS: &[(FaqTopic, &[&str])] = &[
    (
        FaqTopic::Substitute,
        &["substitute", "replace", "instead", "swap", "alternative"],
    ),
    (
        FaqTopic::Allergy,
        &["allergy", "allergic", "intolerance", "sensitive"],
    ),
    (
        FaqTopic::Cooking,
        &["cook", "prepare", "recipe", "how to", "tips"],
    ),
    (
        FaqTopic::Nutrition,
        &["nutrition", "healthy", "calories", "protein", "vitamins"],
    ),
    (
        FaqTopic::MealPrep,
        &["meal prep", "prepare ahead", "batch", "planning"],
    ),
    (
        FaqTopic::Budget,
        &["budget", "cheap", "affordable", "save money", "cost"],
    ),
];

const SUBSTITUTE_ANSWER: &str = "Here are common ingredient substitutions:

- Eggs: use flax eggs (1 tbsp ground flaxseed + 3 tbsp water per egg), applesauce, or mashed banana
- Milk: try almond milk, oat milk, soy milk, or coconut milk
- Butter: use coconut oil, olive oil, or vegan butter
- Chicken: substitute with tofu, tempeh, or chickpeas
- Fish: try tofu, mushrooms, or plant-based alternatives
- Cheese: use nutritional yeast, cashew cheese, or vegan cheese
- Bread: try lettuce wraps, rice paper, or gluten-free bread
- Pasta: use zucchini noodles, shirataki noodles, or whole wheat pasta";

const ALLERGY_ANSWER: &str = "For common allergies, here are safe alternatives:

- Nut allergies: use sunflower seed butter, tahini, or soy nut butter
- Gluten: choose rice, quinoa, buckwheat, or certified gluten-free products
- Dairy: opt for coconut, almond, oat, or soy-based alternatives
- Shellfish: avoid all shellfish; use plant-based proteins instead
- Eggs: use commercial egg replacers or flax/chia eggs

Always read labels carefully and consult with a healthcare provider for severe allergies.";

const COOKING_ANSWER: &str = "Quick cooking tips:

- Save time: prep ingredients in advance, use a pressure cooker, or batch cook
- Better flavor: season in layers, taste as you go, and let meat rest before cutting
- Texture: don't overcrowd the pan, use high heat for searing, low for braising
- Storage: cool food before refrigerating, use airtight containers, label with dates
- Reduce waste: save vegetable scraps for stock, freeze herbs in oil, repurpose leftovers";

const NUTRITION_ANSWER: &str = "Nutrition basics:

- Balanced plate: 1/2 vegetables, 1/4 protein, 1/4 whole grains
- Protein: aim for 0.8g per kg body weight (more if active)
- Hydration: drink 8-10 glasses of water daily
- Fiber: get 25-30g daily from fruits, vegetables, and whole grains
- Healthy fats: include nuts, seeds, avocado, and olive oil
- Sugar: limit added sugars to less than 10% of daily calories";

const MEAL_PREP_ANSWER: &str = "Meal prep strategies:

- Plan ahead: choose 3-4 recipes for the week
- Smart shopping: make a list, shop once, buy in bulk
- Batch cook: cook grains, proteins, and veggies in large batches
- Portion control: use containers to pre-portion meals
- Freeze smart: label everything, freeze flat for easy storage
- Mix and match: prepare versatile ingredients that work in multiple dishes";

const BUDGET_ANSWER: &str = "Eating healthy on a budget:

- Buy smart: choose seasonal produce, buy frozen vegetables, use store brands
- Protein sources: eggs, beans, lentils, and canned fish are affordable
- Pantry staples: stock rice, pasta, canned tomatoes, and dried beans
- Reduce waste: use leftovers creatively, freeze extras, plan portions
- Shop sales: buy in bulk when on sale, use coupons, compare unit prices";

pub const DEFAULT_ANSWER: &str = "I can help with:

- Ingredient substitutions: ask about swapping ingredients
- Allergy alternatives: get safe food alternatives
- Cooking tips: learn cooking techniques
- Nutrition advice: understand nutritional basics
- Meal prep: plan and prepare meals efficiently
- Budget tips: eat healthy affordably

Try asking a more specific question, or use the generative backend for personalized answers!";

impl FaqTopic {
    pub fn answer(&self) -> &'static str {
        match self {
            FaqTopic::Substitute => SUBSTITUTE_ANSWER,
            FaqTopic::Allergy => ALLERGY_ANSWER,
            FaqTopic::Cooking => COOKING_ANSWER,
            FaqTopic::Nutrition => NUTRITION_ANSWER,
            FaqTopic::MealPrep => MEAL_PREP_ANSWER,
            FaqTopic::Budget => BUDGET_ANSWER,
        }
    }
}

/// Case-insensitive substring routing.
pub fn match_topic(question: &str) -> Option<FaqTopic> {
    let question = question.to_lowercase();
    TOPIC_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| question.contains(k)))
        .map(|(topic, _)| *topic)
}

pub fn quick_answer(question: &str) -> &'static str {
    match_topic(question).map_or(DEFAULT_ANSWER, |topic| topic.answer())
}
