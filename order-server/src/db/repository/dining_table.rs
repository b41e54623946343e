//! Dining Table Repository

use super::{RepoError, RepoResult};
use crate::db::{
    DINING_TABLES_TABLE, DbService, OPEN_ORDERS_TABLE, TABLE_HISTORY_TABLE, get_json, put_json,
    scan_json,
};
use redb::{ReadableTable, WriteTransaction};
use shared::models::{
    DiningTable, DiningTableCreate, DiningTableUpdate, TableKind, TableStats, TableStatus,
    TableStatusChange,
};
use shared::util::{now_millis, snowflake_id};
use std::cmp::Ordering;

/// List filter for dining tables
#[derive(Debug, Clone, Default)]
pub struct TableFilter {
    pub kind: Option<TableKind>,
    pub status: Option<TableStatus>,
    pub include_inactive: bool,
}

impl TableFilter {
    fn matches(&self, table: &DiningTable) -> bool {
        (self.include_inactive || table.is_active)
            && self.kind.is_none_or(|k| table.kind == k)
            && self.status.is_none_or(|s| table.status == s)
    }
}

/// Kind first, then numeric table number; non-numeric numbers sort last
fn display_order(a: &DiningTable, b: &DiningTable) -> Ordering {
    let rank = |k: TableKind| TableKind::ALL.iter().position(|x| *x == k);
    rank(a.kind)
        .cmp(&rank(b.kind))
        .then_with(|| {
            match (a.number.parse::<i64>(), b.number.parse::<i64>()) {
                (Ok(x), Ok(y)) => x.cmp(&y),
                (Ok(_), Err(_)) => Ordering::Less,
                (Err(_), Ok(_)) => Ordering::Greater,
                (Err(_), Err(_)) => a.number.cmp(&b.number),
            }
        })
}

#[derive(Clone)]
pub struct DiningTableRepository {
    db: DbService,
}

impl DiningTableRepository {
    pub fn new(db: DbService) -> Self {
        Self { db }
    }

    /// Find tables matching the filter, in display order
    pub fn find_all(&self, filter: &TableFilter) -> RepoResult<Vec<DiningTable>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(DINING_TABLES_TABLE)?;
        let mut tables: Vec<DiningTable> = scan_json(&table)?;
        tables.retain(|t| filter.matches(t));
        tables.sort_by(display_order);
        Ok(tables)
    }

    /// Find table by id (inactive tables included)
    pub fn find_by_id(&self, id: i64) -> RepoResult<Option<DiningTable>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(DINING_TABLES_TABLE)?;
        Ok(get_json(&table, id)?)
    }

    /// Find table by id (within transaction)
    pub fn find_by_id_txn(
        &self,
        txn: &WriteTransaction,
        id: i64,
    ) -> RepoResult<Option<DiningTable>> {
        let table = txn.open_table(DINING_TABLES_TABLE)?;
        Ok(get_json(&table, id)?)
    }

    /// Store a table (within transaction)
    pub fn store_txn(&self, txn: &WriteTransaction, dining_table: &DiningTable) -> RepoResult<()> {
        let mut table = txn.open_table(DINING_TABLES_TABLE)?;
        put_json(&mut table, dining_table.id, dining_table)?;
        Ok(())
    }

    /// Active table with the same number and kind, other than `except`
    fn find_duplicate_txn(
        &self,
        txn: &WriteTransaction,
        number: &str,
        kind: TableKind,
        except: Option<i64>,
    ) -> RepoResult<Option<DiningTable>> {
        let table = txn.open_table(DINING_TABLES_TABLE)?;
        let tables: Vec<DiningTable> = scan_json(&table)?;
        Ok(tables.into_iter().find(|t| {
            t.is_active && t.number == number && t.kind == kind && Some(t.id) != except
        }))
    }

    /// Create a new dining table
    pub fn create(&self, data: DiningTableCreate) -> RepoResult<DiningTable> {
        let txn = self.db.begin_write()?;

        if self
            .find_duplicate_txn(&txn, &data.number, data.kind, None)?
            .is_some()
        {
            return Err(RepoError::TableNumberExists(data.number));
        }

        let now = now_millis();
        let name = data
            .name
            .unwrap_or_else(|| format!("Table {}", data.number));
        let dining_table = DiningTable {
            id: snowflake_id(),
            number: data.number,
            name,
            capacity: data.capacity,
            location: data.location,
            kind: data.kind,
            status: TableStatus::Available,
            description: data.description,
            is_active: true,
            created_at: now,
            modified_at: now,
        };

        self.store_txn(&txn, &dining_table)?;
        txn.commit()?;
        Ok(dining_table)
    }

    /// Update a dining table (partial)
    pub fn update(&self, id: i64, data: DiningTableUpdate) -> RepoResult<DiningTable> {
        let txn = self.db.begin_write()?;
        let mut dining_table = self
            .find_by_id_txn(&txn, id)?
            .ok_or(RepoError::TableNotFound(id))?;

        if data.number.is_some() || data.kind.is_some() {
            let number = data.number.as_deref().unwrap_or(&dining_table.number);
            let kind = data.kind.unwrap_or(dining_table.kind);
            if self
                .find_duplicate_txn(&txn, number, kind, Some(id))?
                .is_some()
            {
                return Err(RepoError::TableNumberExists(number.to_string()));
            }
        }

        if let Some(number) = data.number {
            dining_table.number = number;
        }
        if let Some(name) = data.name {
            dining_table.name = name;
        }
        if let Some(capacity) = data.capacity {
            dining_table.capacity = capacity;
        }
        if let Some(location) = data.location {
            dining_table.location = Some(location);
        }
        if let Some(kind) = data.kind {
            dining_table.kind = kind;
        }
        if let Some(description) = data.description {
            dining_table.description = Some(description);
        }
        if let Some(is_active) = data.is_active {
            dining_table.is_active = is_active;
        }
        dining_table.modified_at = now_millis();

        self.store_txn(&txn, &dining_table)?;
        txn.commit()?;
        Ok(dining_table)
    }

    /// Change a table's status and append a history record
    pub fn set_status(
        &self,
        id: i64,
        status: TableStatus,
        changed_by: Option<String>,
        reason: Option<String>,
    ) -> RepoResult<DiningTable> {
        let txn = self.db.begin_write()?;
        let mut dining_table = self
            .find_by_id_txn(&txn, id)?
            .ok_or(RepoError::TableNotFound(id))?;
        self.set_status_txn(&txn, &mut dining_table, status, changed_by, reason)?;
        txn.commit()?;

        tracing::info!(table_id = id, status = %status, "Table status changed");
        Ok(dining_table)
    }

    /// Change a table's status (within transaction)
    ///
    /// Persists the table and appends a [`TableStatusChange`].
    pub fn set_status_txn(
        &self,
        txn: &WriteTransaction,
        dining_table: &mut DiningTable,
        status: TableStatus,
        changed_by: Option<String>,
        reason: Option<String>,
    ) -> RepoResult<TableStatusChange> {
        let now = now_millis();
        let change = TableStatusChange {
            table_id: dining_table.id,
            previous: dining_table.status,
            current: status,
            changed_by,
            reason,
            changed_at: now,
        };

        dining_table.status = status;
        dining_table.modified_at = now;
        self.store_txn(txn, dining_table)?;

        let mut history = txn.open_table(TABLE_HISTORY_TABLE)?;
        let next_seq = history
            .range((dining_table.id, i64::MIN)..=(dining_table.id, i64::MAX))?
            .next_back()
            .transpose()?
            .map(|(key, _)| key.value().1 + 1)
            .unwrap_or(1);
        let bytes = serde_json::to_vec(&change)?;
        history.insert((dining_table.id, next_seq), bytes.as_slice())?;

        Ok(change)
    }

    /// Status history for a table, newest first
    pub fn history(&self, id: i64) -> RepoResult<Vec<TableStatusChange>> {
        let read_txn = self.db.begin_read()?;
        let history = read_txn.open_table(TABLE_HISTORY_TABLE)?;

        let mut changes = Vec::new();
        for result in history.range((id, i64::MIN)..=(id, i64::MAX))? {
            let (_key, value) = result?;
            changes.push(serde_json::from_slice::<TableStatusChange>(value.value())?);
        }
        changes.reverse();
        Ok(changes)
    }

    /// Soft delete a dining table
    ///
    /// Refused while the table still has open orders.
    pub fn delete(&self, id: i64) -> RepoResult<()> {
        let txn = self.db.begin_write()?;
        let mut dining_table = self
            .find_by_id_txn(&txn, id)?
            .ok_or(RepoError::TableNotFound(id))?;

        {
            let open_orders = txn.open_table(OPEN_ORDERS_TABLE)?;
            for result in open_orders.iter()? {
                let (_order_id, table_id) = result?;
                if table_id.value() == id {
                    return Err(RepoError::TableOccupied(id));
                }
            }
        }

        dining_table.is_active = false;
        dining_table.modified_at = now_millis();
        self.store_txn(&txn, &dining_table)?;
        txn.commit()?;

        tracing::info!(table_id = id, "Table deactivated");
        Ok(())
    }

    /// Statistics over active tables
    pub fn stats(&self) -> RepoResult<TableStats> {
        let tables = self.find_all(&TableFilter::default())?;
        Ok(TableStats::from_tables(&tables))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo() -> DiningTableRepository {
        DiningTableRepository::new(DbService::open_in_memory().unwrap())
    }

    fn create(repo: &DiningTableRepository, number: &str, kind: TableKind) -> DiningTable {
        repo.create(DiningTableCreate {
            number: number.to_string(),
            name: None,
            capacity: 4,
            location: None,
            kind,
            description: None,
        })
        .unwrap()
    }

    #[test]
    fn create_defaults_name_and_status() {
        let repo = repo();
        let table = create(&repo, "4", TableKind::Table);
        assert_eq!(table.name, "Table 4");
        assert_eq!(table.status, TableStatus::Available);
        assert!(table.is_active);
        assert_eq!(repo.find_by_id(table.id).unwrap(), Some(table));
    }

    #[test]
    fn number_is_unique_per_kind() {
        let repo = repo();
        create(&repo, "1", TableKind::Table);
        create(&repo, "1", TableKind::Bar);

        let err = repo
            .create(DiningTableCreate {
                number: "1".to_string(),
                name: None,
                capacity: 2,
                location: None,
                kind: TableKind::Table,
                description: None,
            })
            .unwrap_err();
        assert!(matches!(err, RepoError::TableNumberExists(n) if n == "1"));
    }

    #[test]
    fn list_sorts_by_kind_then_numeric_number() {
        let repo = repo();
        create(&repo, "10", TableKind::Table);
        create(&repo, "P1", TableKind::Pickup);
        create(&repo, "2", TableKind::Table);
        create(&repo, "1", TableKind::Bar);

        let numbers: Vec<String> = repo
            .find_all(&TableFilter::default())
            .unwrap()
            .into_iter()
            .map(|t| t.number)
            .collect();
        assert_eq!(numbers, vec!["2", "10", "P1", "1"]);

        let bars = repo
            .find_all(&TableFilter {
                kind: Some(TableKind::Bar),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(bars.len(), 1);
    }

    #[test]
    fn set_status_records_history_newest_first() {
        let repo = repo();
        let table = create(&repo, "3", TableKind::Table);

        repo.set_status(table.id, TableStatus::Occupied, Some("ana".into()), None)
            .unwrap();
        let updated = repo
            .set_status(
                table.id,
                TableStatus::Cleaning,
                None,
                Some("guests left".into()),
            )
            .unwrap();
        assert_eq!(updated.status, TableStatus::Cleaning);

        let history = repo.history(table.id).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].previous, TableStatus::Occupied);
        assert_eq!(history[0].current, TableStatus::Cleaning);
        assert_eq!(history[0].reason.as_deref(), Some("guests left"));
        assert_eq!(history[1].changed_by.as_deref(), Some("ana"));
    }

    #[test]
    fn delete_is_soft_and_hides_from_default_listing() {
        let repo = repo();
        let table = create(&repo, "5", TableKind::Table);
        repo.delete(table.id).unwrap();

        assert!(repo.find_all(&TableFilter::default()).unwrap().is_empty());
        let all = repo
            .find_all(&TableFilter {
                include_inactive: true,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(all.len(), 1);
        assert!(!all[0].is_active);
    }

    #[test]
    fn delete_refused_with_open_orders() {
        let db = DbService::open_in_memory().unwrap();
        let repo = DiningTableRepository::new(db.clone());
        let table = create(&repo, "6", TableKind::Table);

        let txn = db.begin_write().unwrap();
        {
            let mut open = txn.open_table(OPEN_ORDERS_TABLE).unwrap();
            open.insert(99i64, table.id).unwrap();
        }
        txn.commit().unwrap();

        assert!(matches!(
            repo.delete(table.id),
            Err(RepoError::TableOccupied(id)) if id == table.id
        ));
    }

    #[test]
    fn missing_table_errors() {
        let repo = repo();
        assert!(matches!(
            repo.set_status(1, TableStatus::Cleaning, None, None),
            Err(RepoError::TableNotFound(1))
        ));
        assert!(matches!(repo.delete(1), Err(RepoError::TableNotFound(1))));
    }
}
