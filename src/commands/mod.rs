//! Commands Layer
//!
//! Request handlers that the HTTP layer calls with an authenticated user id.

mod error;
mod list_cmd;
mod task_cmd;

pub use error::*;
pub use list_cmd::*;
pub use task_cmd::*;
