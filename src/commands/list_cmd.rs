//! Commands for List operations
//!
//! Every list command is scoped to the authenticated caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

use crate::config::LimitsConfig;
use crate::domain::{DomainError, DomainResult, List, ListId, UserId};
use crate::repository::Repository;
use crate::AppState;
use super::error::{CommandResult, Message};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateListInput {
    pub title: String,
}

/// Partial update; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateListInput {
    #[serde(default)]
    pub title: Option<String>,
    /// An empty string clears the color
    #[serde(default)]
    pub color: Option<String>,
    /// `Some(None)` (explicit null) clears the reminder
    #[serde(default, deserialize_with = "present")]
    pub reminder_at: Option<Option<DateTime<Utc>>>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct MovePositionInput {
    pub endpoint_id: u32,
}

/// Keep an explicit `null` apart from a missing field
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn validate_title(title: &str, limits: &LimitsConfig) -> DomainResult<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(DomainError::InvalidInput("title is required".to_string()));
    }
    if title.chars().count() > limits.title_max_len {
        return Err(DomainError::InvalidInput(format!(
            "title is longer than {} characters",
            limits.title_max_len
        )));
    }
    Ok(title.to_string())
}

fn validate_color(color: &str, limits: &LimitsConfig) -> DomainResult<Option<String>> {
    if color.is_empty() {
        return Ok(None);
    }

    let valid = color.len() <= limits.color_max_len
        && color
            .strip_prefix('#')
            .is_some_and(|hex| !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit()));

    if !valid {
        return Err(DomainError::InvalidInput(format!("invalid color {:?}", color)));
    }
    Ok(Some(color.to_string()))
}

/// List the caller's lists in display order
pub async fn list_lists(state: &AppState, user_id: UserId) -> CommandResult<Vec<List>> {
    Ok(state.list_repo.list(user_id).await?)
}

/// Get one of the caller's lists
pub async fn get_list(state: &AppState, user_id: UserId, id: ListId) -> CommandResult<List> {
    let list = state
        .list_repo
        .find_by_id(user_id, id)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("List {}", id)))?;
    Ok(list)
}

/// Create a list at the end of the caller's lists
pub async fn create_list(state: &AppState, user_id: UserId, input: CreateListInput) -> CommandResult<List> {
    let title = validate_title(&input.title, &state.config.limits)?;
    let list = state
        .list_positions
        .append(user_id, |position| async move {
            state.list_repo.create(&List::new(0, user_id, title, position)).await
        })
        .await?;
    log::info!("Created list {} for user {} at position {}", list.id, user_id, list.position);
    Ok(list)
}

/// Update title, color or reminder
pub async fn update_list(
    state: &AppState,
    user_id: UserId,
    id: ListId,
    input: UpdateListInput,
) -> CommandResult<List> {
    let mut list = get_list(state, user_id, id).await?;
    let limits = &state.config.limits;

    if let Some(title) = input.title {
        list.title = validate_title(&title, limits)?;
    }
    if let Some(color) = input.color {
        list.color = validate_color(&color, limits)?;
    }
    if let Some(reminder_at) = input.reminder_at {
        list.set_reminder(reminder_at);
    }

    Ok(state.list_repo.update(&list).await?)
}

/// Move a list next to `endpoint_id`
pub async fn move_list(
    state: &AppState,
    user_id: UserId,
    id: ListId,
    input: MovePositionInput,
) -> CommandResult<Message> {
    state.list_positions.reposition(user_id, id, input.endpoint_id).await?;
    Ok(Message::position_changed())
}

/// Delete a list with its tasks; remaining positions are not compacted
pub async fn delete_list(state: &AppState, user_id: UserId, id: ListId) -> CommandResult<()> {
    state.list_repo.delete(user_id, id).await?;
    log::info!("Deleted list {} of user {}", id, user_id);
    Ok(())
}
