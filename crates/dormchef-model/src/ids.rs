// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub const ID_MAX_LEN: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError(pub String);

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ValidationError {}

fn validate_id(kind: &str, input: &str) -> Result<(), ValidationError> {
    if input.is_empty() {
        return Err(ValidationError(format!("{kind} must not be empty")));
    }
    if input.len() > ID_MAX_LEN {
        return Err(ValidationError(format!(
            "{kind} exceeds max length {ID_MAX_LEN}"
        )));
    }
    if input.chars().any(char::is_whitespace) {
        return Err(ValidationError(format!(
            "{kind} must not contain whitespace"
        )));
    }
    Ok(())
}

macro_rules! string_id {
    ($name:ident, $kind:literal) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn parse(input: &str) -> Result<Self, ValidationError> {
                validate_id($kind, input)?;
                Ok(Self(input.to_string()))
            }

            #[must_use]
            pub fn generate() -> Self {
                Self(uuid::Uuid::new_v4().to_string())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(UserId, "user id");
string_id!(RecipeId, "recipe id");
string_id!(IngredientId, "ingredient id");
string_id!(MealPlanId, "meal plan id");
string_id!(MealPlanItemId, "meal plan item id");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_parse_back() {
        let id = RecipeId::generate();
        assert_eq!(RecipeId::parse(id.as_str()).expect("parse"), id);
    }

    #[test]
    fn rejects_empty_and_whitespace() {
        assert!(UserId::parse("").is_err());
        assert!(UserId::parse("a b").is_err());
        assert!(UserId::parse(&"x".repeat(ID_MAX_LEN + 1)).is_err());
    }

    #[test]
    fn serializes_transparently() {
        let id = UserId::parse("u1").expect("id");
        assert_eq!(serde_json::to_string(&id).expect("json"), "\"u1\"");
    }
}
