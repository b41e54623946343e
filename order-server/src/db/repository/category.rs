//! Category Repository

use super::{RepoError, RepoResult};
use crate::db::{CATEGORIES_TABLE, DbService, get_json, put_json, scan_json};
use shared::models::{Category, CategoryCreate};
use shared::util::{now_millis, snowflake_id};

#[derive(Clone)]
pub struct CategoryRepository {
    db: DbService,
}

impl CategoryRepository {
    pub fn new(db: DbService) -> Self {
        Self { db }
    }

    /// Find all categories ordered by name
    pub fn find_all(&self) -> RepoResult<Vec<Category>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CATEGORIES_TABLE)?;
        let mut categories: Vec<Category> = scan_json(&table)?;
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    pub fn find_by_id(&self, id: i64) -> RepoResult<Option<Category>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CATEGORIES_TABLE)?;
        Ok(get_json(&table, id)?)
    }

    /// Create a category; names are unique (case-insensitive)
    pub fn create(&self, data: CategoryCreate) -> RepoResult<Category> {
        let txn = self.db.begin_write()?;
        let category = {
            let mut table = txn.open_table(CATEGORIES_TABLE)?;
            let existing: Vec<Category> = scan_json(&table)?;
            let name = data.name.trim().to_string();
            if existing.iter().any(|c| c.name.eq_ignore_ascii_case(&name)) {
                return Err(RepoError::CategoryNameExists(name));
            }

            let category = Category {
                id: snowflake_id(),
                name,
                description: data.description,
                created_at: now_millis(),
            };
            put_json(&mut table, category.id, &category)?;
            category
        };
        txn.commit()?;

        tracing::info!(category_id = category.id, name = %category.name, "Category created");
        Ok(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_and_list_sorted() {
        let repo = CategoryRepository::new(DbService::open_in_memory().unwrap());
        repo.create(CategoryCreate {
            name: "Postres".into(),
            description: None,
        })
        .unwrap();
        let entradas = repo
            .create(CategoryCreate {
                name: "Entradas".into(),
                description: Some("Para compartir".into()),
            })
            .unwrap();

        let names: Vec<String> = repo.find_all().unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Entradas", "Postres"]);
        assert_eq!(repo.find_by_id(entradas.id).unwrap(), Some(entradas));
    }

    #[test]
    fn duplicate_name_rejected() {
        let repo = CategoryRepository::new(DbService::open_in_memory().unwrap());
        repo.create(CategoryCreate {
            name: "Bebidas".into(),
            description: None,
        })
        .unwrap();
        let err = repo
            .create(CategoryCreate {
                name: "bebidas ".into(),
                description: None,
            })
            .unwrap_err();
        assert!(matches!(err, RepoError::CategoryNameExists(_)));
    }
}
