//! Special Dish Repository

use super::{RepoError, RepoResult};
use crate::db::{
    CATEGORIES_TABLE, DbService, SPECIAL_DISHES_TABLE, get_json, put_json, scan_json,
};
use redb::WriteTransaction;
use shared::models::{Category, SpecialDish, SpecialDishCreate, SpecialDishUpdate};
use shared::util::{now_millis, snowflake_id};

#[derive(Clone)]
pub struct SpecialDishRepository {
    db: DbService,
}

impl SpecialDishRepository {
    pub fn new(db: DbService) -> Self {
        Self { db }
    }

    /// Find specials, optionally restricted to one category, ordered by name
    pub fn find_all(&self, category_id: Option<i64>) -> RepoResult<Vec<SpecialDish>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SPECIAL_DISHES_TABLE)?;
        let mut dishes: Vec<SpecialDish> = scan_json(&table)?;
        dishes.retain(|d| category_id.is_none_or(|c| d.category_id == c));
        dishes.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(dishes)
    }

    /// Specials that can be ordered at `now`
    pub fn find_available(&self, now: i64) -> RepoResult<Vec<SpecialDish>> {
        let mut dishes = self.find_all(None)?;
        dishes.retain(|d| d.is_offered_at(now));
        Ok(dishes)
    }

    pub fn find_by_id(&self, id: i64) -> RepoResult<Option<SpecialDish>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SPECIAL_DISHES_TABLE)?;
        Ok(get_json(&table, id)?)
    }

    fn require_category(txn: &WriteTransaction, category_id: i64) -> RepoResult<()> {
        let categories = txn.open_table(CATEGORIES_TABLE)?;
        if get_json::<Category, _>(&categories, category_id)?.is_none() {
            return Err(RepoError::CategoryNotFound(category_id));
        }
        Ok(())
    }

    pub fn create(&self, data: SpecialDishCreate) -> RepoResult<SpecialDish> {
        let txn = self.db.begin_write()?;
        Self::require_category(&txn, data.category_id)?;

        let now = now_millis();
        let dish = SpecialDish {
            id: snowflake_id(),
            name: data.name,
            description: data.description,
            price: data.price,
            category_id: data.category_id,
            is_available: data.is_available.unwrap_or(true),
            valid_from: data.valid_from,
            valid_until: data.valid_until,
            created_at: now,
            modified_at: now,
        };
        {
            let mut table = txn.open_table(SPECIAL_DISHES_TABLE)?;
            put_json(&mut table, dish.id, &dish)?;
        }
        txn.commit()?;
        Ok(dish)
    }

    pub fn update(&self, id: i64, data: SpecialDishUpdate) -> RepoResult<SpecialDish> {
        let txn = self.db.begin_write()?;
        if let Some(category_id) = data.category_id {
            Self::require_category(&txn, category_id)?;
        }

        let dish = {
            let mut table = txn.open_table(SPECIAL_DISHES_TABLE)?;
            let mut dish: SpecialDish =
                get_json(&table, id)?.ok_or(RepoError::SpecialNotFound(id))?;

            if let Some(name) = data.name {
                dish.name = name;
            }
            if let Some(description) = data.description {
                dish.description = Some(description);
            }
            if let Some(price) = data.price {
                dish.price = price;
            }
            if let Some(category_id) = data.category_id {
                dish.category_id = category_id;
            }
            if let Some(is_available) = data.is_available {
                dish.is_available = is_available;
            }
            if let Some(valid_from) = data.valid_from {
                dish.valid_from = Some(valid_from);
            }
            if let Some(valid_until) = data.valid_until {
                dish.valid_until = Some(valid_until);
            }
            dish.modified_at = now_millis();

            put_json(&mut table, id, &dish)?;
            dish
        };
        txn.commit()?;
        Ok(dish)
    }

    pub fn set_availability(&self, id: i64, is_available: bool) -> RepoResult<SpecialDish> {
        self.update(
            id,
            SpecialDishUpdate {
                is_available: Some(is_available),
                ..Default::default()
            },
        )
    }

    pub fn delete(&self, id: i64) -> RepoResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(SPECIAL_DISHES_TABLE)?;
            if table.remove(id)?.is_none() {
                return Err(RepoError::SpecialNotFound(id));
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

    fn setup() -> (SpecialDishRepository, i64) {
        let db = DbService::open_in_memory().unwrap();
        let category = CategoryRepository::new(db.clone())
            .create(CategoryCreate {
                name: "Del chef".into(),
                description: None,
            })
            .unwrap();
        (SpecialDishRepository::new(db), category.id)
    }

    fn new_special(
        category_id: i64,
        name: &str,
        valid_from: Option<i64>,
        valid_until: Option<i64>,
    ) -> SpecialDishCreate {
        SpecialDishCreate {
            name: name.into(),
            description: None,
            price: Decimal::from(4000),
            category_id,
            is_available: None,
            valid_from,
            valid_until,
        }
    }

    #[test]
    fn available_respects_window_and_flag() {
        let (repo, category_id) = setup();
        repo.create(new_special(category_id, "Always", None, None))
            .unwrap();
        repo.create(new_special(category_id, "Expired", None, Some(50)))
            .unwrap();
        let hidden = repo
            .create(new_special(category_id, "Hidden", None, None))
            .unwrap();
        repo.set_availability(hidden.id, false).unwrap();

        let names: Vec<String> = repo
            .find_available(100)
            .unwrap()
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, vec!["Always"]);
        assert_eq!(repo.find_all(Some(category_id)).unwrap().len(), 3);
    }

    #[test]
    fn update_and_delete_missing() {
        let (repo, _) = setup();
        assert!(matches!(
            repo.update(5, SpecialDishUpdate::default()),
            Err(RepoError::SpecialNotFound(5))
        ));
        assert!(matches!(repo.delete(5), Err(RepoError::SpecialNotFound(5))));
    }
}
