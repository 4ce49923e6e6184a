//! Domain Layer
//!
//! Contains all domain entities and core abstractions.
//! This layer has NO storage dependencies (only serde, chrono and thiserror).

mod entity;
mod list;
mod position;
mod task;

pub use entity::{Entity, DomainError, DomainResult};
pub use list::{List, ListId, UserId};
pub use position::{reposition, Position, PositionUpdate, PositionedItem};
pub use task::{Task, TaskId};
