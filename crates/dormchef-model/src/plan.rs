// SPDX-License-Identifier: Apache-2.0

use crate::ids::ValidationError;
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub const DAYS_PER_WEEK: u8 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealType {
    pub const ALL: [Self; 3] = [Self::Breakfast, Self::Lunch, Self::Dinner];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Breakfast => "Breakfast",
            Self::Lunch => "Lunch",
            Self::Dinner => "Dinner",
        }
    }
}

impl Display for MealType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| {
                ValidationError(format!(
                    "mealType must be one of Breakfast, Lunch, Dinner (got {s:?})"
                ))
            })
    }
}

/// Day of the plan week, 0 = Monday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct DayIndex(u8);

impl DayIndex {
    pub fn new(value: i64) -> Result<Self, ValidationError> {
        if !(0..i64::from(DAYS_PER_WEEK)).contains(&value) {
            return Err(ValidationError(format!(
                "dayIndex must be between 0 and 6 (got {value})"
            )));
        }
        Ok(Self(value as u8))
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl<'de> Deserialize<'de> for DayIndex {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = i64::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Servings(u32);

impl Servings {
    pub const ONE: Self = Self(1);

    pub fn new(value: i64) -> Result<Self, ValidationError> {
        if value < 1 {
            return Err(ValidationError(format!(
                "servings must be at least 1 (got {value})"
            )));
        }
        u32::try_from(value)
            .map(Self)
            .map_err(|_| ValidationError(format!("servings out of range: {value}")))
    }

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl Default for Servings {
    fn default() -> Self {
        Self::ONE
    }
}

impl<'de> Deserialize<'de> for Servings {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = i64::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

/// Calendar date naming one user's plan week.
///
/// Clients send the Monday they computed locally, either as `YYYY-MM-DD`
/// or as a full RFC 3339 timestamp. Only the date is kept; no weekday
/// normalisation is applied, so two different dates of the same week are
/// two different plans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WeekOf(NaiveDate);

impl WeekOf {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let raw = input.trim();
        if raw.is_empty() {
            return Err(ValidationError("weekOf must not be empty".to_string()));
        }
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Ok(Self(date));
        }
        DateTime::parse_from_rfc3339(raw)
            .map(|ts| Self(ts.with_timezone(&Utc).date_naive()))
            .map_err(|_| ValidationError(format!("weekOf is not a valid date: {raw}")))
    }

    #[must_use]
    pub const fn from_date(date: NaiveDate) -> Self {
        Self(date)
    }

    #[must_use]
    pub fn current() -> Self {
        Self(week_start(Utc::now().date_naive()))
    }

    #[must_use]
    pub const fn date(self) -> NaiveDate {
        self.0
    }

    #[must_use]
    pub fn as_key(self) -> String {
        self.0.format("%Y-%m-%d").to_string()
    }
}

impl Display for WeekOf {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.as_key())
    }
}

impl Serialize for WeekOf {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_key())
    }
}

impl<'de> Deserialize<'de> for WeekOf {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Monday on or before `date`.
#[must_use]
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = i64::from(date.weekday().num_days_from_monday());
    date - Duration::days(offset)
}
