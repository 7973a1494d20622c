// SPDX-License-Identifier: Apache-2.0
#![forbid(unsafe_code)]

//! Aggregation over planned meals: grocery lists and the social feed.
//!
//! Everything here is pure list processing over records the store has
//! already loaded; nothing touches the database.

mod category;
mod feed;
mod grocery;

pub use category::{categorize, Category, CATEGORY_KEYWORDS};
pub use feed::{merge_feed, FeedItem, FeedItemKind, PlanActivity, FEED_LIMIT};
pub use grocery::{build_grocery_list, GroceryAccumulator, GroceryItem, GroceryList};

pub const CRATE_NAME: &str = "dormchef-planner";
