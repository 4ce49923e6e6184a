//! Todo Backend
//!
//! Layered architecture:
//! - domain: Core entities, business rules and the position reindexer
//! - repository: Data access abstractions and SQLite implementations
//! - commands: Request handlers called by the HTTP layer
//! - config: Application configuration

use std::sync::Arc;

pub mod commands;
pub mod config;
pub mod domain;
pub mod repository;

use config::Config;
use domain::{DomainResult, List, Task};
use repository::{init_db, DbState, ListRepository, PositionManager, TaskRepository};

/// Application state shared across commands
pub struct AppState {
    pub db_state: DbState,
    pub config: Config,
    pub list_repo: Arc<ListRepository>,
    pub task_repo: Arc<TaskRepository>,
    pub list_positions: PositionManager<List>,
    pub task_positions: PositionManager<Task>,
}

impl AppState {
    /// Start logging, open the database and wire the repositories
    pub async fn init(config: Config) -> DomainResult<Self> {
        if config.logging.enabled {
            if let Err(e) = rolling_logger::init_logger(&config.logging.dir, &config.logging.app_name) {
                eprintln!("[{}] Failed to init rolling logger: {}", chrono::Local::now().format("%H:%M:%S%.3f"), e);
            }
        }

        log::info!("Opening database at {:?}", config.database.path);
        let db_state = init_db(&config.database.path).await?;
        Ok(Self::with_db(config, db_state))
    }

    /// Build state over an already initialized database
    pub fn with_db(config: Config, db_state: DbState) -> Self {
        let list_repo = Arc::new(ListRepository::new(db_state.conn.clone()));
        let task_repo = Arc::new(TaskRepository::new(db_state.conn.clone()));

        Self {
            list_positions: PositionManager::new(list_repo.clone()),
            task_positions: PositionManager::new(task_repo.clone()),
            list_repo,
            task_repo,
            db_state,
            config,
        }
    }
}
