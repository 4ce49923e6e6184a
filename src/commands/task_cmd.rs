//! Commands for Task operations
//!
//! Tasks are addressed through their list; the list must belong to the caller.

use serde::Deserialize;

use crate::domain::{DomainError, DomainResult, ListId, Task, TaskId, UserId};
use crate::repository::Repository;
use crate::AppState;
use super::error::{CommandResult, Message};
use super::list_cmd::MovePositionInput;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTaskInput {
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTaskInput {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_completed: Option<bool>,
}

async fn ensure_list_owner(state: &AppState, user_id: UserId, list_id: ListId) -> DomainResult<()> {
    if state.list_repo.is_owned_by(user_id, list_id).await? {
        Ok(())
    } else {
        Err(DomainError::Forbidden(format!(
            "user {} has no permission on list {}",
            user_id, list_id
        )))
    }
}

fn validate_description(description: &str, max_len: usize) -> DomainResult<String> {
    let description = description.trim();
    if description.is_empty() {
        return Err(DomainError::InvalidInput("description is required".to_string()));
    }
    if description.chars().count() > max_len {
        return Err(DomainError::InvalidInput(format!(
            "description is longer than {} characters",
            max_len
        )));
    }
    Ok(description.to_string())
}

/// List the tasks of a list in display order
pub async fn list_tasks(state: &AppState, user_id: UserId, list_id: ListId) -> CommandResult<Vec<Task>> {
    ensure_list_owner(state, user_id, list_id).await?;
    Ok(state.task_repo.list(list_id).await?)
}

/// Create a task at the end of the list
pub async fn create_task(
    state: &AppState,
    user_id: UserId,
    list_id: ListId,
    input: CreateTaskInput,
) -> CommandResult<Task> {
    ensure_list_owner(state, user_id, list_id).await?;
    let description = validate_description(&input.description, state.config.limits.title_max_len)?;
    let task = state
        .task_positions
        .append(list_id, |position| async move {
            state.task_repo.create(&Task::new(0, list_id, description, position)).await
        })
        .await?;
    log::info!("Created task {} in list {} at position {}", task.id, list_id, task.position);
    Ok(task)
}

/// Update description or completion
pub async fn update_task(
    state: &AppState,
    user_id: UserId,
    list_id: ListId,
    id: TaskId,
    input: UpdateTaskInput,
) -> CommandResult<Task> {
    ensure_list_owner(state, user_id, list_id).await?;

    let mut task = state
        .task_repo
        .find_by_id(list_id, id)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("Task {}", id)))?;

    if let Some(description) = input.description {
        task.description = validate_description(&description, state.config.limits.title_max_len)?;
    }
    if let Some(completed) = input.is_completed {
        task.set_completed(completed);
    }

    Ok(state.task_repo.update(&task).await?)
}

/// Move a task next to `endpoint_id` within the same list
pub async fn move_task(
    state: &AppState,
    user_id: UserId,
    list_id: ListId,
    id: TaskId,
    input: MovePositionInput,
) -> CommandResult<Message> {
    ensure_list_owner(state, user_id, list_id).await?;
    state.task_positions.reposition(list_id, id, input.endpoint_id).await?;
    Ok(Message::position_changed())
}

/// Delete a task; remaining positions are not compacted
pub async fn delete_task(state: &AppState, user_id: UserId, list_id: ListId, id: TaskId) -> CommandResult<()> {
    ensure_list_owner(state, user_id, list_id).await?;
    state.task_repo.delete(list_id, id).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{create_list, CreateListInput, ErrorCode};
    use crate::config::Config;

    const USER: UserId = 1;
    const OTHER: UserId = 2;

    async fn setup_state() -> (AppState, ListId) {
        let state = AppState::init(Config::for_test()).await.expect("Failed to init state");
        let list = create_list(&state, USER, CreateListInput { title: "Work".into() })
            .await
            .unwrap();
        (state, list.id)
    }

    async fn create(state: &AppState, list_id: ListId, description: &str) -> Task {
        create_task(state, USER, list_id, CreateTaskInput { description: description.into() })
            .await
            .expect("Failed to create task")
    }

    async fn descriptions(state: &AppState, list_id: ListId) -> Vec<(String, i32)> {
        list_tasks(state, USER, list_id)
            .await
            .unwrap()
            .into_iter()
            .map(|t| (t.description, t.position))
            .collect()
    }

    #[tokio::test]
    async fn test_create_and_list_tasks() {
        let (state, list_id) = setup_state().await;
        create(&state, list_id, "one").await;
        create(&state, list_id, "two").await;

        assert_eq!(
            descriptions(&state, list_id).await,
            vec![("one".to_string(), 1), ("two".to_string(), 2)]
        );
    }

    #[tokio::test]
    async fn test_foreign_list_is_forbidden() {
        let (state, list_id) = setup_state().await;
        let task = create(&state, list_id, "one").await;

        let err = list_tasks(&state, OTHER, list_id).await.unwrap_err();
        assert_eq!(err.status, 403);
        assert_eq!(err.code, ErrorCode::Forbidden);

        let err = create_task(&state, OTHER, list_id, CreateTaskInput { description: "x".into() })
            .await
            .unwrap_err();
        assert_eq!(err.status, 403);

        let err = move_task(&state, OTHER, list_id, task.id, MovePositionInput { endpoint_id: task.id })
            .await
            .unwrap_err();
        assert_eq!(err.status, 403);

        let err = delete_task(&state, OTHER, list_id, task.id).await.unwrap_err();
        assert_eq!(err.status, 403);

        let err = list_tasks(&state, USER, 999).await.unwrap_err();
        assert_eq!(err.status, 403);
    }

    #[tokio::test]
    async fn test_update_task_completion() {
        let (state, list_id) = setup_state().await;
        let task = create(&state, list_id, "ship it").await;

        let done = update_task(
            &state,
            USER,
            list_id,
            task.id,
            UpdateTaskInput { is_completed: Some(true), ..Default::default() },
        )
        .await
        .unwrap();
        assert!(done.is_completed);
        assert!(done.completed_at.is_some());

        let reopened = update_task(
            &state,
            USER,
            list_id,
            task.id,
            UpdateTaskInput { is_completed: Some(false), description: Some("ship it again".into()) },
        )
        .await
        .unwrap();
        assert!(!reopened.is_completed);
        assert!(reopened.completed_at.is_none());
        assert_eq!(reopened.description, "ship it again");
        assert_eq!(reopened.position, 1);
    }

    #[tokio::test]
    async fn test_update_missing_task_is_not_found() {
        let (state, list_id) = setup_state().await;
        let err = update_task(&state, USER, list_id, 42, UpdateTaskInput::default())
            .await
            .unwrap_err();
        assert_eq!(err.status, 404);
    }

    #[tokio::test]
    async fn test_move_task() {
        let (state, list_id) = setup_state().await;
        create(&state, list_id, "A").await;
        let b = create(&state, list_id, "B").await;
        create(&state, list_id, "C").await;
        let d = create(&state, list_id, "D").await;

        move_task(&state, USER, list_id, d.id, MovePositionInput { endpoint_id: b.id })
            .await
            .unwrap();

        let expected: Vec<(String, i32)> =
            [("A", 1), ("D", 2), ("B", 3), ("C", 4)].iter().map(|&(t, p)| (t.to_string(), p)).collect();
        assert_eq!(descriptions(&state, list_id).await, expected);
    }

    #[tokio::test]
    async fn test_move_task_across_lists_is_not_found() {
        let (state, work) = setup_state().await;
        let home = create_list(&state, USER, CreateListInput { title: "Home".into() })
            .await
            .unwrap()
            .id;
        let t = create(&state, work, "work task").await;
        let h = create(&state, home, "home task").await;

        let err = move_task(&state, USER, work, t.id, MovePositionInput { endpoint_id: h.id })
            .await
            .unwrap_err();
        assert_eq!(err.status, 404);
        assert_eq!(descriptions(&state, work).await, vec![("work task".to_string(), 1)]);
    }

    #[tokio::test]
    async fn test_delete_task() {
        let (state, list_id) = setup_state().await;
        let a = create(&state, list_id, "A").await;
        create(&state, list_id, "B").await;

        delete_task(&state, USER, list_id, a.id).await.unwrap();
        assert_eq!(descriptions(&state, list_id).await, vec![("B".to_string(), 2)]);

        let err = delete_task(&state, USER, list_id, a.id).await.unwrap_err();
        assert_eq!(err.status, 404);
    }
}
