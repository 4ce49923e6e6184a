//! Task Repository Module
//!
//! - task_repo: Core CRUD operations
//! - task_positioning: Position store for tasks, scoped by list

mod task_positioning;
mod task_repo;

pub use task_repo::TaskRepository;
