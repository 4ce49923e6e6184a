//! List Entity
//!
//! A user's todo list. Lists are ordered per user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::Entity;
use super::position::{Position, PositionedItem};

/// Authenticated caller identity, supplied by the auth layer
pub type UserId = u32;

pub type ListId = u32;

/// A todo list owned by a single user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct List {
    /// Unique identifier
    pub id: ListId,
    /// Owner; lists are positioned per user
    pub user_id: UserId,
    pub title: String,
    /// Hex color, e.g. "#FF5733"
    pub color: Option<String>,
    /// Position among the user's lists
    pub position: Position,
    /// Whether the reminder has already fired
    pub is_reminded: bool,
    pub reminder_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl List {
    /// Create a new list at the given position
    pub fn new(id: ListId, user_id: UserId, title: String, position: Position) -> Self {
        let now = Utc::now();
        Self {
            id,
            user_id,
            title,
            color: None,
            position,
            is_reminded: true,
            reminder_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set or clear the reminder; the list becomes due again
    pub fn set_reminder(&mut self, reminder_at: Option<DateTime<Utc>>) {
        self.reminder_at = reminder_at;
        self.is_reminded = false;
    }
}

impl Entity for List {
    type Id = ListId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

impl PositionedItem for List {
    type Scope = UserId;

    fn position(&self) -> Position {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_creation() {
        let list = List::new(1, 7, "Groceries".to_string(), 3);
        assert_eq!(list.id(), 1);
        assert_eq!(list.user_id, 7);
        assert_eq!(list.position(), 3);
        assert!(list.color.is_none());
        assert!(list.is_reminded);
    }

    #[test]
    fn test_set_reminder_resets_flag() {
        let mut list = List::new(1, 7, "Groceries".to_string(), 1);
        list.set_reminder(Some(Utc::now()));
        assert!(!list.is_reminded);
        assert!(list.reminder_at.is_some());

        list.set_reminder(None);
        assert!(list.reminder_at.is_none());
    }
}
