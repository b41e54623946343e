//! Menu Item Repository

use super::{RepoError, RepoResult};
use crate::db::{CATEGORIES_TABLE, DbService, MENU_ITEMS_TABLE, get_json, put_json, scan_json};
use redb::WriteTransaction;
use shared::models::{Category, MenuItem, MenuItemCreate, MenuItemUpdate};
use shared::util::{now_millis, snowflake_id};

#[derive(Clone)]
pub struct MenuItemRepository {
    db: DbService,
}

impl MenuItemRepository {
    pub fn new(db: DbService) -> Self {
        Self { db }
    }

    /// Find menu items, optionally restricted to one category, ordered by name
    pub fn find_all(&self, category_id: Option<i64>) -> RepoResult<Vec<MenuItem>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(MENU_ITEMS_TABLE)?;
        let mut items: Vec<MenuItem> = scan_json(&table)?;
        items.retain(|i| category_id.is_none_or(|c| i.category_id == c));
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(items)
    }

    pub fn find_by_id(&self, id: i64) -> RepoResult<Option<MenuItem>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(MENU_ITEMS_TABLE)?;
        Ok(get_json(&table, id)?)
    }

    fn require_category(txn: &WriteTransaction, category_id: i64) -> RepoResult<()> {
        let categories = txn.open_table(CATEGORIES_TABLE)?;
        if get_json::<Category, _>(&categories, category_id)?.is_none() {
            return Err(RepoError::CategoryNotFound(category_id));
        }
        Ok(())
    }

    pub fn create(&self, data: MenuItemCreate) -> RepoResult<MenuItem> {
        let txn = self.db.begin_write()?;
        Self::require_category(&txn, data.category_id)?;

        let now = now_millis();
        let item = MenuItem {
            id: snowflake_id(),
            name: data.name,
            description: data.description,
            price: data.price,
            category_id: data.category_id,
            is_available: data.is_available.unwrap_or(true),
            created_at: now,
            modified_at: now,
        };
        {
            let mut table = txn.open_table(MENU_ITEMS_TABLE)?;
            put_json(&mut table, item.id, &item)?;
        }
        txn.commit()?;
        Ok(item)
    }

    pub fn update(&self, id: i64, data: MenuItemUpdate) -> RepoResult<MenuItem> {
        let txn = self.db.begin_write()?;
        if let Some(category_id) = data.category_id {
            Self::require_category(&txn, category_id)?;
        }

        let item = {
            let mut table = txn.open_table(MENU_ITEMS_TABLE)?;
            let mut item: MenuItem =
                get_json(&table, id)?.ok_or(RepoError::MenuItemNotFound(id))?;

            if let Some(name) = data.name {
                item.name = name;
            }
            if let Some(description) = data.description {
                item.description = Some(description);
            }
            if let Some(price) = data.price {
                item.price = price;
            }
            if let Some(category_id) = data.category_id {
                item.category_id = category_id;
            }
            if let Some(is_available) = data.is_available {
                item.is_available = is_available;
            }
            item.modified_at = now_millis();

            put_json(&mut table, id, &item)?;
            item
        };
        txn.commit()?;
        Ok(item)
    }

    pub fn set_availability(&self, id: i64, is_available: bool) -> RepoResult<MenuItem> {
        self.update(
            id,
            MenuItemUpdate {
                is_available: Some(is_available),
                ..Default::default()
            },
        )
    }

    /// Hard delete; order lines keep their own name/price snapshot
    pub fn delete(&self, id: i64) -> RepoResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(MENU_ITEMS_TABLE)?;
            if table.remove(id)?.is_none() {
                return Err(RepoError::MenuItemNotFound(id));
            }
        }
        txn.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::CategoryRepository;
    use rust_decimal::Decimal;
    use shared::models::CategoryCreate;

    fn setup() -> (MenuItemRepository, i64) {
        let db = DbService::open_in_memory().unwrap();
        let category = CategoryRepository::new(db.clone())
            .create(CategoryCreate {
                name: "Platos fuertes".into(),
                description: None,
            })
            .unwrap();
        (MenuItemRepository::new(db), category.id)
    }

    fn new_item(category_id: i64, name: &str) -> MenuItemCreate {
        MenuItemCreate {
            name: name.into(),
            description: None,
            price: Decimal::from(8500),
            category_id,
            is_available: None,
        }
    }

    #[test]
    fn create_requires_existing_category() {
        let (repo, _) = setup();
        let err = repo.create(new_item(42, "Arepa")).unwrap_err();
        assert!(matches!(err, RepoError::CategoryNotFound(42)));
    }

    #[test]
    fn crud_cycle() {
        let (repo, category_id) = setup();
        let item = repo.create(new_item(category_id, "Arepa")).unwrap();
        assert!(item.is_available);

        let updated = repo
            .update(
                item.id,
                MenuItemUpdate {
                    price: Some(Decimal::from(9000)),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.price, Decimal::from(9000));
        assert_eq!(updated.name, "Arepa");

        let hidden = repo.set_availability(item.id, false).unwrap();
        assert!(!hidden.is_available);

        assert_eq!(repo.find_all(Some(category_id)).unwrap().len(), 1);
        assert!(repo.find_all(Some(category_id + 1)).unwrap().is_empty());

        repo.delete(item.id).unwrap();
        assert!(repo.find_by_id(item.id).unwrap().is_none());
        assert!(matches!(
            repo.delete(item.id),
            Err(RepoError::MenuItemNotFound(_))
        ));
    }
}
