use std::sync::Arc;

use crate::core::{Config, Result};
use crate::db::DbService;
use crate::orders::OrdersManager;
use crate::services::{CatalogService, HttpsService};

/// Server state - shared handles for every service
///
/// Cloning is cheap: every field is a handle over shared data.
///
/// | Field | Type | Purpose |
/// |-------|------|---------|
/// | config | Config | configuration (immutable) |
/// | db | DbService | embedded redb database |
/// | orders | `Arc<OrdersManager>` | order lifecycle engine |
/// | catalog | CatalogService | catalog snapshot for client sync |
/// | https | HttpsService | cached router |
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Config,
    pub db: DbService,
    pub orders: Arc<OrdersManager>,
    pub catalog: CatalogService,
    pub https: HttpsService,
}

impl ServerState {
    /// Build the state over an opened database and cache the router
    pub fn new(config: Config, db: DbService) -> Self {
        let orders = Arc::new(OrdersManager::new(
            db.clone(),
            config.release_table_on_close,
        ));
        let state = Self {
            catalog: CatalogService::new(db.clone()),
            https: HttpsService::new(config.clone()),
            config,
            db,
            orders,
        };
        state.https.initialize(state.clone());
        state
    }

    /// Open the database under the work directory and build the state
    pub fn initialize(config: &Config) -> Result<Self> {
        std::fs::create_dir_all(&config.work_dir)?;
        let db = DbService::open(config.database_path())?;
        Ok(Self::new(config.clone(), db))
    }
}
