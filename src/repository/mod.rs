//! Repository Layer
//!
//! Data access abstractions, SQLite implementations and the position manager.

mod db;
mod list;
mod positioning;
mod scoped_table;
mod task;
mod traits;


pub use db::{init_db, DbState, SharedConnection};
pub use list::ListRepository;
pub use positioning::{PositionManager, ScopeLocks};
pub use task::TaskRepository;
pub use traits::{PositionStore, Repository};
