// SPDX-License-Identifier: Apache-2.0

//! Demo accounts, recipes and a planned week for local development.

use crate::meal_plans::{add_meal_plan_item_at, NewMealPlanItem};
use crate::recipes::{create_recipe_at, NewIngredient, NewRecipe};
use crate::social::{create_follow_at, toggle_like};
use crate::users::{create_user_at, find_user_by_email, NewUser};
use crate::StoreError;
use chrono::Duration;
use dormchef_model::{now_utc, DayIndex, MealType, Recipe, Servings, User, WeekOf};
use rusqlite::Connection;
use tracing::info;

pub const DEMO_PASSWORD: &str = "password";

/// (name, email) of the demo accounts; the first one owns the demo plan.
pub const DEMO_USERS: [(&str, &str); 3] = [
    ("Dave Johnson", "dave@dormchef.dev"),
    ("Mike Chen", "mike@dormchef.dev"),
    ("Sam Rodriguez", "sam@dormchef.dev"),
];

struct DemoRecipe {
    title: &'static str,
    cook_time_min: u32,
    servings: u32,
    tags: &'static [&'static str],
    steps: &'static [&'static str],
    ingredients: &'static [(&'static str, f64, &'static str, f64)],
}

const DEMO_RECIPES: [DemoRecipe; 10] = [
    DemoRecipe {
        title: "Microwave Mac & Cheese",
        cook_time_min: 5,
        servings: 1,
        tags: &["microwave-only", "under-$5", "5-ingredient", "dorm-friendly"],
        steps: &[
            "Add 1/3 cup pasta to microwave-safe bowl",
            "Add water to cover pasta plus 2 inches",
            "Microwave for pasta time + 3-4 minutes",
            "Drain water, add milk and cheese",
            "Microwave 30 seconds, stir and enjoy",
        ],
        ingredients: &[
            ("Elbow pasta", 0.33, "cup", 0.25),
            ("Shredded cheese", 0.25, "cup", 0.75),
            ("Milk", 2.0, "tbsp", 0.10),
        ],
    },
    DemoRecipe {
        title: "Protein Oats Bowl",
        cook_time_min: 3,
        servings: 1,
        tags: &["high-protein", "microwave-only", "under-$5", "healthy"],
        steps: &[
            "Mix oats, protein powder, and water in microwave-safe bowl",
            "Microwave for 90 seconds",
            "Stir and add more water if needed",
            "Top with peanut butter and banana",
            "Mix and enjoy your gains",
        ],
        ingredients: &[
            ("Rolled oats", 0.5, "cup", 0.30),
            ("Protein powder", 1.0, "scoop", 1.50),
            ("Peanut butter", 1.0, "tbsp", 0.25),
            ("Banana", 0.5, "piece", 0.50),
        ],
    },
    DemoRecipe {
        title: "Air Fryer Chicken Thighs",
        cook_time_min: 25,
        servings: 2,
        tags: &["high-protein", "no-oven", "under-$5"],
        steps: &[
            "Pat chicken thighs dry with paper towel",
            "Season both sides with salt, pepper, and garlic powder",
            "Preheat air fryer to 380°F",
            "Cook skin-side down for 12 minutes",
            "Flip and cook another 10-15 minutes until internal temp 165°F",
            "Let rest 5 minutes before serving",
        ],
        ingredients: &[
            ("Chicken thighs", 2.0, "piece", 3.00),
            ("Salt", 0.5, "tsp", 0.01),
            ("Black pepper", 0.25, "tsp", 0.02),
            ("Garlic powder", 0.5, "tsp", 0.05),
        ],
    },
    DemoRecipe {
        title: "Black Bean Quesadilla",
        cook_time_min: 10,
        servings: 2,
        tags: &["vegetarian", "under-$5", "5-ingredient", "dorm-friendly"],
        steps: &[
            "Mash half the black beans with a fork",
            "Mix mashed and whole beans with cumin",
            "Spread bean mixture on one tortilla",
            "Add cheese and top with second tortilla",
            "Cook in skillet 2-3 minutes per side until crispy",
            "Cut into wedges and serve with salsa",
        ],
        ingredients: &[
            ("Flour tortillas", 2.0, "piece", 0.50),
            ("Black beans (canned)", 0.5, "cup", 0.75),
            ("Shredded cheese", 0.5, "cup", 1.50),
            ("Ground cumin", 0.25, "tsp", 0.05),
            ("Salsa", 2.0, "tbsp", 0.25),
        ],
    },
    DemoRecipe {
        title: "Greek Yogurt Parfait",
        cook_time_min: 2,
        servings: 1,
        tags: &["high-protein", "healthy", "no-cooking", "5-ingredient"],
        steps: &[
            "Layer half the yogurt in a bowl or mason jar",
            "Add half the berries and granola",
            "Add remaining yogurt",
            "Top with remaining berries, granola, and honey",
            "Enjoy immediately or refrigerate for later",
        ],
        ingredients: &[
            ("Greek yogurt", 1.0, "cup", 1.50),
            ("Mixed berries", 0.5, "cup", 2.00),
            ("Granola", 0.25, "cup", 0.75),
            ("Honey", 1.0, "tbsp", 0.25),
        ],
    },
    DemoRecipe {
        title: "Microwave Fried Rice",
        cook_time_min: 8,
        servings: 2,
        tags: &["microwave-only", "under-$5", "dorm-friendly"],
        steps: &[
            "Microwave rice with water in covered bowl for 5 minutes",
            "Let stand 2 minutes, then fluff with fork",
            "Beat egg and microwave 1 minute, stirring halfway",
            "Mix egg into rice with soy sauce",
            "Add frozen vegetables and microwave 1 more minute",
            "Stir and season to taste",
        ],
        ingredients: &[
            ("Instant rice", 0.5, "cup", 0.30),
            ("Egg", 1.0, "piece", 0.25),
            ("Frozen mixed vegetables", 0.5, "cup", 0.75),
            ("Soy sauce", 1.0, "tbsp", 0.10),
        ],
    },
    DemoRecipe {
        title: "Cottage Cheese Power Bowl",
        cook_time_min: 1,
        servings: 1,
        tags: &["high-protein", "no-cooking", "healthy", "under-$5"],
        steps: &[
            "Scoop cottage cheese into bowl",
            "Add chopped cucumber and cherry tomatoes",
            "Drizzle with olive oil",
            "Season with salt, pepper, and everything bagel seasoning",
            "Mix and enjoy this protein-packed meal",
        ],
        ingredients: &[
            ("Cottage cheese", 1.0, "cup", 1.25),
            ("Cucumber", 0.5, "cup", 0.50),
            ("Cherry tomatoes", 0.5, "cup", 1.00),
            ("Olive oil", 1.0, "tsp", 0.15),
            ("Everything bagel seasoning", 0.5, "tsp", 0.10),
        ],
    },
    DemoRecipe {
        title: "Canned Chicken Wrap",
        cook_time_min: 5,
        servings: 1,
        tags: &["high-protein", "no-cooking", "under-$5", "dorm-friendly"],
        steps: &[
            "Drain canned chicken and add to bowl",
            "Mix chicken with mayo and hot sauce",
            "Spread mixture on tortilla",
            "Add lettuce and cheese",
            "Roll tightly and slice in half",
            "Wrap in foil for easy eating",
        ],
        ingredients: &[
            ("Canned chicken breast", 1.0, "can", 2.50),
            ("Flour tortilla", 1.0, "piece", 0.25),
            ("Mayonnaise", 1.0, "tbsp", 0.15),
            ("Lettuce", 0.25, "cup", 0.50),
            ("Shredded cheese", 2.0, "tbsp", 0.60),
        ],
    },
    DemoRecipe {
        title: "Microwave Lentil Soup",
        cook_time_min: 12,
        servings: 2,
        tags: &["vegetarian", "microwave-only", "healthy", "under-$5"],
        steps: &[
            "Combine lentils, broth, and diced tomatoes in microwave-safe bowl",
            "Cover and microwave for 8 minutes",
            "Stir and add frozen vegetables",
            "Microwave 3 more minutes",
            "Season with salt, pepper, and Italian seasoning",
            "Let stand 2 minutes before serving",
        ],
        ingredients: &[
            ("Red lentils", 0.5, "cup", 1.00),
            ("Vegetable broth", 1.5, "cup", 0.75),
            ("Diced tomatoes (canned)", 0.5, "cup", 0.50),
            ("Frozen mixed vegetables", 0.5, "cup", 0.75),
            ("Italian seasoning", 0.5, "tsp", 0.05),
        ],
    },
    DemoRecipe {
        title: "Frozen Veggie Stir-Up",
        cook_time_min: 6,
        servings: 1,
        tags: &["vegetarian", "microwave-only", "healthy", "under-$5"],
        steps: &[
            "Add frozen vegetables to microwave-safe bowl",
            "Add a splash of water",
            "Microwave for 3 minutes",
            "Drain excess water",
            "Add soy sauce, garlic powder, and sesame oil",
            "Stir well and serve over rice if desired",
        ],
        ingredients: &[
            ("Frozen stir-fry vegetables", 1.0, "cup", 1.25),
            ("Soy sauce", 1.0, "tbsp", 0.10),
            ("Garlic powder", 0.25, "tsp", 0.02),
            ("Sesame oil", 0.5, "tsp", 0.15),
        ],
    },
];

/// (day, meal, recipe index into the demo list, servings) for Dave's week.
const DEMO_PLAN: [(i64, MealType, usize, i64); 6] = [
    (0, MealType::Breakfast, 1, 1),
    (0, MealType::Lunch, 3, 1),
    (1, MealType::Breakfast, 4, 1),
    (1, MealType::Dinner, 2, 1),
    (2, MealType::Lunch, 5, 1),
    (3, MealType::Dinner, 8, 2),
];

/// (user index, recipe index) pairs.
const DEMO_LIKES: [(usize, usize); 6] = [(0, 1), (0, 2), (1, 0), (1, 4), (2, 3), (2, 6)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeedReport {
    pub users: usize,
    pub follows: usize,
    pub recipes: usize,
    pub plan_items: usize,
    pub likes: usize,
    /// The demo accounts were already present; nothing was written.
    pub skipped: bool,
}

impl DemoRecipe {
    fn to_new(&self) -> NewRecipe {
        NewRecipe {
            title: self.title.to_string(),
            hero_image: None,
            cook_time_min: self.cook_time_min,
            servings: self.servings,
            tags: self.tags.iter().map(|t| (*t).to_string()).collect(),
            steps: self.steps.iter().map(|s| (*s).to_string()).collect(),
            ingredients: self
                .ingredients
                .iter()
                .map(|(name, qty, unit, price)| NewIngredient {
                    name: (*name).to_string(),
                    qty: *qty,
                    unit: (*unit).to_string(),
                    approx_price: *price,
                })
                .collect(),
        }
    }
}

/// Loads the demo data set. `password_hash` is the stored form of
/// [`DEMO_PASSWORD`]; the plan lands on `week`. Running it twice is a
/// no-op once the first demo account exists.
pub fn seed_demo_data(
    conn: &mut Connection,
    password_hash: &str,
    week: WeekOf,
) -> Result<SeedReport, StoreError> {
    if find_user_by_email(conn, DEMO_USERS[0].1)?.is_some() {
        info!("demo data already present; skipping seed");
        return Ok(SeedReport {
            skipped: true,
            ..SeedReport::default()
        });
    }

    // Spread creation times so feed and list ordering follow the demo order.
    let start = now_utc() - Duration::minutes(60);
    let mut minute = 0_i64;
    let mut tick = || {
        minute += 1;
        start + Duration::minutes(minute)
    };

    let mut report = SeedReport::default();
    let mut users: Vec<User> = Vec::with_capacity(DEMO_USERS.len());
    for (name, email) in DEMO_USERS {
        let user = create_user_at(
            conn,
            &NewUser {
                name: name.to_string(),
                email: email.to_string(),
                password_hash: password_hash.to_string(),
                image: None,
            },
            tick(),
        )?;
        users.push(user);
        report.users += 1;
    }

    for followee in &users[1..] {
        create_follow_at(conn, &users[0].id, &followee.id, tick())?;
        report.follows += 1;
    }

    let mut recipes: Vec<Recipe> = Vec::with_capacity(DEMO_RECIPES.len());
    for (idx, demo) in DEMO_RECIPES.iter().enumerate() {
        let author = &users[idx % users.len()];
        let recipe = create_recipe_at(conn, &author.id, &demo.to_new(), tick())?;
        recipes.push(recipe);
        report.recipes += 1;
    }

    for (day, meal_type, recipe_idx, servings) in DEMO_PLAN {
        let item = NewMealPlanItem {
            recipe_id: recipes[recipe_idx].id.clone(),
            day_index: DayIndex::new(day).map_err(StoreError::corrupt)?,
            meal_type,
            servings: Servings::new(servings).map_err(StoreError::corrupt)?,
            week_of: week,
        };
        add_meal_plan_item_at(conn, &users[0].id, &item, tick())?;
        report.plan_items += 1;
    }

    for (user_idx, recipe_idx) in DEMO_LIKES {
        toggle_like(conn, &users[user_idx].id, &recipes[recipe_idx].id)?;
        report.likes += 1;
    }

    info!(
        users = report.users,
        recipes = report.recipes,
        plan_items = report.plan_items,
        "demo data seeded"
    );
    Ok(report)
}
