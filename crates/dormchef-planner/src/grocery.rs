// SPDX-License-Identifier: Apache-2.0

use crate::category::{categorize, Category};
use dormchef_model::{Ingredient, MealPlanItem, Servings};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroceryItem {
    pub name: String,
    pub unit: String,
    pub qty: f64,
    pub approx_price: f64,
    pub category: Category,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroceryList {
    pub items: Vec<GroceryItem>,
    pub total_cost: f64,
    pub categorized_items: BTreeMap<Category, Vec<GroceryItem>>,
}

impl GroceryList {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Sums ingredients keyed by exact (name, unit), keeping first-seen order.
#[derive(Debug, Default)]
pub struct GroceryAccumulator {
    entries: IndexMap<(String, String), GroceryItem>,
}

impl GroceryAccumulator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, ingredient: &Ingredient, servings: Servings) {
        let factor = f64::from(servings.get());
        let qty = ingredient.qty * factor;
        let price = ingredient.approx_price * factor;
        let key = (ingredient.name.clone(), ingredient.unit.clone());
        match self.entries.get_mut(&key) {
            Some(existing) => {
                existing.qty += qty;
                existing.approx_price += price;
            }
            None => {
                self.entries.insert(
                    key,
                    GroceryItem {
                        name: ingredient.name.clone(),
                        unit: ingredient.unit.clone(),
                        qty,
                        approx_price: price,
                        category: categorize(&ingredient.name),
                    },
                );
            }
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn finish(self) -> GroceryList {
        let items: Vec<GroceryItem> = self.entries.into_values().collect();
        let total_cost = items.iter().map(|item| item.approx_price).sum();
        let mut categorized_items: BTreeMap<Category, Vec<GroceryItem>> = BTreeMap::new();
        for item in &items {
            categorized_items
                .entry(item.category)
                .or_default()
                .push(item.clone());
        }
        GroceryList {
            items,
            total_cost,
            categorized_items,
        }
    }
}

/// Grocery list for every ingredient of every planned meal, scaled by the
/// servings planned for that meal.
#[must_use]
pub fn build_grocery_list(items: &[MealPlanItem]) -> GroceryList {
    let mut acc = GroceryAccumulator::new();
    for item in items {
        for ingredient in &item.recipe.ingredients {
            acc.add(ingredient, item.servings);
        }
    }
    acc.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dormchef_model::{IngredientId, RecipeId};
    use pretty_assertions::assert_eq;

    fn ing(name: &str, qty: f64, unit: &str, price: f64) -> Ingredient {
        Ingredient {
            id: IngredientId::generate(),
            recipe_id: RecipeId::parse("r1").expect("id"),
            name: name.to_string(),
            qty,
            unit: unit.to_string(),
            approx_price: price,
        }
    }

    fn servings(n: i64) -> Servings {
        Servings::new(n).expect("servings")
    }

    #[test]
    fn merges_same_name_and_unit() {
        let mut acc = GroceryAccumulator::new();
        acc.add(&ing("Shredded cheese", 0.25, "cup", 0.75), servings(1));
        acc.add(&ing("Shredded cheese", 0.5, "cup", 1.5), servings(2));
        let list = acc.finish();
        assert_eq!(list.items.len(), 1);
        assert_eq!(list.items[0].qty, 1.25);
        assert_eq!(list.items[0].approx_price, 3.75);
        assert_eq!(list.total_cost, 3.75);
    }

    #[test]
    fn different_units_stay_separate() {
        let mut acc = GroceryAccumulator::new();
        acc.add(&ing("Shredded cheese", 0.5, "cup", 1.5), servings(1));
        acc.add(&ing("Shredded cheese", 2.0, "tbsp", 0.6), servings(1));
        acc.add(&ing("shredded cheese", 2.0, "tbsp", 0.6), servings(1));
        assert_eq!(acc.len(), 3);
    }

    #[test]
    fn keeps_first_seen_order_and_buckets() {
        let mut acc = GroceryAccumulator::new();
        acc.add(&ing("Soy sauce", 1.0, "tbsp", 0.1), servings(1));
        acc.add(&ing("Egg", 1.0, "piece", 0.25), servings(1));
        acc.add(&ing("Instant rice", 0.5, "cup", 0.3), servings(1));
        let list = acc.finish();
        let names: Vec<&str> = list.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Soy sauce", "Egg", "Instant rice"]);
        let buckets: Vec<Category> = list.categorized_items.keys().copied().collect();
        assert_eq!(
            buckets,
            vec![Category::Protein, Category::Grains, Category::Pantry]
        );
    }

    #[test]
    fn empty_plan_serializes_to_empty_shape() {
        let list = build_grocery_list(&[]);
        assert!(list.is_empty());
        let json = serde_json::to_value(&list).expect("json");
        assert_eq!(
            json,
            serde_json::json!({"items": [], "totalCost": 0.0, "categorizedItems": {}})
        );
    }
}
