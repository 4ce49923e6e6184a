//! Task Entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::Entity;
use super::list::ListId;
use super::position::{Position, PositionedItem};

pub type TaskId = u32;

/// A task inside a list, positioned per list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub list_id: ListId,
    pub description: String,
    pub position: Position,
    pub is_completed: bool,
    /// Set when the task is completed, cleared when reopened
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    pub fn new(id: TaskId, list_id: ListId, description: String, position: Position) -> Self {
        let now = Utc::now();
        Self {
            id,
            list_id,
            description,
            position,
            is_completed: false,
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn set_completed(&mut self, completed: bool) {
        self.is_completed = completed;
        self.completed_at = if completed { Some(Utc::now()) } else { None };
    }
}

impl Entity for Task {
    type Id = TaskId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

impl PositionedItem for Task {
    type Scope = ListId;

    fn position(&self) -> Position {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_toggles_timestamp() {
        let mut task = Task::new(1, 2, "Buy milk".to_string(), 1);
        assert!(!task.is_completed);

        task.set_completed(true);
        assert!(task.is_completed);
        assert!(task.completed_at.is_some());

        task.set_completed(false);
        assert!(task.completed_at.is_none());
    }
}
