//! Dining Table Model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of seating position
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    /// Regular dining table
    #[default]
    Table,
    /// Counter pick-up position
    Pickup,
    /// Bar seat
    Bar,
}

impl TableKind {
    pub const ALL: [TableKind; 3] = [Self::Table, Self::Pickup, Self::Bar];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Pickup => "pickup",
            Self::Bar => "bar",
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TableKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// Table occupancy status, set by staff and by closing the table
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum TableStatus {
    #[default]
    Available,
    Occupied,
    Cleaning,
    OutOfService,
}

impl TableStatus {
    pub const ALL: [TableStatus; 4] = [
        Self::Available,
        Self::Occupied,
        Self::Cleaning,
        Self::OutOfService,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Occupied => "occupied",
            Self::Cleaning => "cleaning",
            Self::OutOfService => "out_of_service",
        }
    }
}

impl fmt::Display for TableStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TableStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// Dining table entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiningTable {
    pub id: i64,
    /// Display number, e.g. "4" or "P1"
    pub number: String,
    pub name: String,
    pub capacity: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub kind: TableKind,
    pub status: TableStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
    pub modified_at: i64,
}

/// Create dining table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTableCreate {
    pub number: String,
    /// Defaults to "Table {number}" when omitted
    pub name: Option<String>,
    pub capacity: i32,
    pub location: Option<String>,
    #[serde(default)]
    pub kind: TableKind,
    pub description: Option<String>,
}

/// Update dining table payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiningTableUpdate {
    pub number: Option<String>,
    pub name: Option<String>,
    pub capacity: Option<i32>,
    pub location: Option<String>,
    pub kind: Option<TableKind>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

/// Set-status payload
///
/// `status` is kept as a raw string so unknown values surface as
/// `InvalidStatus` rather than a generic deserialization failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableStatusUpdate {
    pub status: String,
    pub changed_by: Option<String>,
    pub reason: Option<String>,
}

/// Table status history entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TableStatusChange {
    pub table_id: i64,
    pub previous: TableStatus,
    pub current: TableStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changed_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub changed_at: i64,
}

/// Aggregated table statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TableStats {
    pub total: u32,
    pub tables: u32,
    pub pickup: u32,
    pub bar: u32,
    pub available: u32,
    pub occupied: u32,
    pub cleaning: u32,
    pub out_of_service: u32,
    pub total_capacity: i64,
    /// Average capacity rounded to 2 decimals (0 when there are no tables)
    pub average_capacity: f64,
}

impl TableStats {
    /// Compute statistics over the given (active) tables
    pub fn from_tables<'a>(tables: impl IntoIterator<Item = &'a DiningTable>) -> Self {
        let mut stats = Self::default();
        for table in tables {
            stats.total += 1;
            match table.kind {
                TableKind::Table => stats.tables += 1,
                TableKind::Pickup => stats.pickup += 1,
                TableKind::Bar => stats.bar += 1,
            }
            match table.status {
                TableStatus::Available => stats.available += 1,
                TableStatus::Occupied => stats.occupied += 1,
                TableStatus::Cleaning => stats.cleaning += 1,
                TableStatus::OutOfService => stats.out_of_service += 1,
            }
            stats.total_capacity += i64::from(table.capacity);
        }
        if stats.total > 0 {
            let avg = stats.total_capacity as f64 / f64::from(stats.total);
            stats.average_capacity = (avg * 100.0).round() / 100.0;
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(kind: TableKind, status: TableStatus, capacity: i32) -> DiningTable {
        DiningTable {
            id: 1,
            number: "1".to_string(),
            name: "Table 1".to_string(),
            capacity,
            location: None,
            kind,
            status,
            description: None,
            is_active: true,
            created_at: 0,
            modified_at: 0,
        }
    }

    #[test]
    fn status_parses_snake_case_only() {
        assert_eq!("out_of_service".parse(), Ok(TableStatus::OutOfService));
        assert_eq!("available".parse(), Ok(TableStatus::Available));
        assert!("ocupada".parse::<TableStatus>().is_err());
        assert!("Available".parse::<TableStatus>().is_err());
    }

    #[test]
    fn kind_serializes_snake_case() {
        let json = serde_json::to_string(&TableKind::Pickup).unwrap();
        assert_eq!(json, "\"pickup\"");
        assert_eq!("bar".parse(), Ok(TableKind::Bar));
    }

    #[test]
    fn stats_count_kinds_statuses_and_capacity() {
        let tables = vec![
            table(TableKind::Table, TableStatus::Available, 4),
            table(TableKind::Table, TableStatus::Occupied, 2),
            table(TableKind::Pickup, TableStatus::Available, 1),
        ];
        let stats = TableStats::from_tables(&tables);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.tables, 2);
        assert_eq!(stats.pickup, 1);
        assert_eq!(stats.bar, 0);
        assert_eq!(stats.available, 2);
        assert_eq!(stats.occupied, 1);
        assert_eq!(stats.total_capacity, 7);
        assert_eq!(stats.average_capacity, 2.33);
    }

    #[test]
    fn stats_of_nothing_is_zero() {
        let stats = TableStats::from_tables(&[]);
        assert_eq!(stats, TableStats::default());
    }
}
