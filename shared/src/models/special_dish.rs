//! Special Dish Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Special dish (chef's suggestion), separate namespace from menu items
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpecialDish {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub category_id: i64,
    pub is_available: bool,
    /// Offer window start (Unix millis), open if absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_from: Option<i64>,
    /// Offer window end (Unix millis), open if absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<i64>,
    pub created_at: i64,
    pub modified_at: i64,
}

impl SpecialDish {
    /// Available and inside its offer window at `now`
    pub fn is_offered_at(&self, now: i64) -> bool {
        self.is_available
            && self.valid_from.is_none_or(|from| from <= now)
            && self.valid_until.is_none_or(|until| now <= until)
    }
}

/// Create special dish payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecialDishCreate {
    pub name: String,
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub category_id: i64,
    pub is_available: Option<bool>,
    pub valid_from: Option<i64>,
    pub valid_until: Option<i64>,
}

/// Update special dish payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpecialDishUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    pub category_id: Option<i64>,
    pub is_available: Option<bool>,
    pub valid_from: Option<i64>,
    pub valid_until: Option<i64>,
}
