//! Comanda Order Server - restaurant order management
//!
//! # Architecture
//!
//! - **Orders** (`orders`): item aggregation, kitchen priority and the order
//!   lifecycle engine
//! - **Database** (`db`): embedded redb storage for orders, tables and catalog
//! - **HTTP API** (`api`): RESTful routes over axum
//!
//! # Layout
//!
//! ```text
//! order-server/src/
//! ├── core/          # config, state, server, background tasks
//! ├── services/      # catalog resolution, router
//! ├── api/           # HTTP routes and handlers
//! ├── utils/         # logging, validation
//! ├── db/            # redb tables and repositories
//! └── orders/        # order engine
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod orders;
pub mod services;
pub mod utils;

use anyhow::Context;

pub use core::{Config, Server, ServerState};
pub use db::DbService;
pub use orders::{OrderStorage, OrdersManager};
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

pub use utils::logger::{init_logger, init_logger_with_file};

/// Load `.env`, create the work directories and install the logger
pub fn setup_environment() -> anyhow::Result<Config> {
    // A missing .env file is fine
    let _ = dotenv::dotenv();

    let config = Config::from_env();
    std::fs::create_dir_all(&config.work_dir)
        .with_context(|| format!("Failed to create work dir {}", config.work_dir))?;
    let log_dir = config.log_dir();
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log dir {}", log_dir.display()))?;

    let file_logging = config.is_production().then_some(log_dir.as_path());
    init_logger_with_file(&config.log_level, file_logging);
    api::health::mark_started();

    Ok(config)
}

pub fn print_banner() {
    println!(
        r#"
  ____                                _
 / ___|___  _ __ ___   __ _ _ __   __| | __ _
| |   / _ \| '_ ` _ \ / _` | '_ \ / _` |/ _` |
| |__| (_) | | | | | | (_| | | | | (_| | (_| |
 \____\___/|_| |_| |_|\__,_|_| |_|\__,_|\__,_|
    "#
    );
}
