//! List Repository Module
//!
//! - list_repo: Core CRUD operations
//! - list_positioning: Position store for lists, scoped by user

mod list_positioning;
mod list_repo;

pub use list_repo::ListRepository;
