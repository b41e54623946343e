//! Catalog Service - resolves order lines and serves the client catalog
//!
//! Menu items and specials have independent id spaces; lookups always go
//! through a tagged [`CatalogRef`]. Availability is a display concern and is
//! not checked when resolving: a line resolves as long as the referenced item
//! exists.

use crate::db::{
    CATEGORIES_TABLE, DbService, MENU_ITEMS_TABLE, SPECIAL_DISHES_TABLE, StorageResult, get_json,
    scan_json,
};
use redb::{ReadableTable, WriteTransaction};
use shared::models::{
    CatalogKind, CatalogRef, CatalogSnapshot, Category, MenuItem, ResolvedItem, SpecialDish,
};

#[derive(Clone, Debug)]
pub struct CatalogService {
    db: DbService,
}

impl CatalogService {
    pub fn new(db: DbService) -> Self {
        Self { db }
    }

    /// Categories, menu items and the specials offered at `now`
    ///
    /// All three lists come from one read transaction.
    pub fn snapshot(&self, now: i64) -> StorageResult<CatalogSnapshot> {
        let read_txn = self.db.begin_read()?;

        let mut categories: Vec<Category> =
            scan_json(&read_txn.open_table(CATEGORIES_TABLE)?)?;
        categories.sort_by(|a, b| a.name.cmp(&b.name));

        let mut menu_items: Vec<MenuItem> = scan_json(&read_txn.open_table(MENU_ITEMS_TABLE)?)?;
        menu_items.sort_by(|a, b| a.name.cmp(&b.name));

        let mut specials: Vec<SpecialDish> =
            scan_json(&read_txn.open_table(SPECIAL_DISHES_TABLE)?)?;
        specials.retain(|d| d.is_offered_at(now));
        specials.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(CatalogSnapshot {
            categories,
            menu_items,
            specials,
            generated_at: now,
        })
    }

    /// Resolve a catalog reference to its name, unit price and category name
    /// within the caller's write transaction
    pub fn resolve_txn(
        &self,
        txn: &WriteTransaction,
        catalog_ref: &CatalogRef,
    ) -> StorageResult<Option<ResolvedItem>> {
        let menu = txn.open_table(MENU_ITEMS_TABLE)?;
        let specials = txn.open_table(SPECIAL_DISHES_TABLE)?;
        let categories = txn.open_table(CATEGORIES_TABLE)?;
        resolve_in(&menu, &specials, &categories, catalog_ref)
    }
}

fn resolve_in<M, S, C>(
    menu: &M,
    specials: &S,
    categories: &C,
    catalog_ref: &CatalogRef,
) -> StorageResult<Option<ResolvedItem>>
where
    M: ReadableTable<i64, &'static [u8]>,
    S: ReadableTable<i64, &'static [u8]>,
    C: ReadableTable<i64, &'static [u8]>,
{
    let (name, unit_price, category_id) = match catalog_ref.kind {
        CatalogKind::Menu => match get_json::<MenuItem, _>(menu, catalog_ref.id)? {
            Some(item) => (item.name, item.price, item.category_id),
            None => return Ok(None),
        },
        CatalogKind::Special => match get_json::<SpecialDish, _>(specials, catalog_ref.id)? {
            Some(dish) => (dish.name, dish.price, dish.category_id),
            None => return Ok(None),
        },
    };

    let category_name = get_json::<Category, _>(categories, category_id)?.map(|c| c.name);

    Ok(Some(ResolvedItem {
        name,
        unit_price,
        category_name,
    }))
}
