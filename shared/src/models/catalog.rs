//! Catalog references
//!
//! Menu items and special dishes have independent id spaces, so an order line
//! points at its source through a tagged [`CatalogRef`].

use super::{Category, MenuItem, SpecialDish};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which catalog namespace a reference points into
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CatalogKind {
    Menu,
    Special,
}

/// Tagged reference to a menu item or special dish
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CatalogRef {
    pub kind: CatalogKind,
    pub id: i64,
}

impl CatalogRef {
    pub fn menu(id: i64) -> Self {
        Self {
            kind: CatalogKind::Menu,
            id,
        }
    }

    pub fn special(id: i64) -> Self {
        Self {
            kind: CatalogKind::Special,
            id,
        }
    }
}

impl fmt::Display for CatalogRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            CatalogKind::Menu => write!(f, "menu:{}", self.id),
            CatalogKind::Special => write!(f, "special:{}", self.id),
        }
    }
}

/// Catalog data captured onto an order line
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedItem {
    pub name: String,
    pub unit_price: Decimal,
    pub category_name: Option<String>,
}

/// Full catalog for clients that take orders offline
///
/// Read from a single snapshot, so the three lists are mutually consistent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogSnapshot {
    pub categories: Vec<Category>,
    /// Every menu item, available or not
    pub menu_items: Vec<MenuItem>,
    /// Specials on offer at `generated_at`
    pub specials: Vec<SpecialDish>,
    pub generated_at: i64,
}
