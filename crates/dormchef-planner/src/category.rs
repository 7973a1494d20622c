// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Grocery aisle bucket. Variant order is the display order clients use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Protein,
    Produce,
    Dairy,
    Grains,
    Pantry,
}

/// Keyword lists in match priority order; the first hit wins.
pub const CATEGORY_KEYWORDS: [(Category, &[&str]); 4] = [
    (
        Category::Protein,
        &["chicken", "beef", "pork", "fish", "egg", "protein"],
    ),
    (Category::Grains, &["rice", "bread", "pasta", "oats", "flour"]),
    (
        Category::Produce,
        &["tomato", "onion", "pepper", "lettuce", "spinach"],
    ),
    (Category::Dairy, &["milk", "cheese", "yogurt", "butter"]),
];

impl Category {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Protein => "protein",
            Self::Produce => "produce",
            Self::Dairy => "dairy",
            Self::Grains => "grains",
            Self::Pantry => "pantry",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Substring match on the lowercased name, so "Eggplant" lands in protein
/// and "Black pepper" in produce.
#[must_use]
pub fn categorize(name: &str) -> Category {
    let lowered = name.to_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k)))
        .map_or(Category::Pantry, |(category, _)| *category)
}
