//! Todo repository functions, all scoped by the owning user id.
//!
//! Every read and write filters by `user_id`; a todo owned by another user is
//! reported as absent (NotFound), never as forbidden, so existence does not
//! leak across accounts.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::entities::todos;
use crate::errors::domain::{DomainError, NotFoundKind};
use crate::infra::db_errors::map_db_err;

/// Todo priority, stored as lowercase text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TodoPriority {
    Low,
    Normal,
    Medium,
    High,
    Top,
}

impl TodoPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TodoPriority::Low => "low",
            TodoPriority::Normal => "normal",
            TodoPriority::Medium => "medium",
            TodoPriority::High => "high",
            TodoPriority::Top => "top",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "low" => Some(TodoPriority::Low),
            "normal" => Some(TodoPriority::Normal),
            "medium" => Some(TodoPriority::Medium),
            "high" => Some(TodoPriority::High),
            "top" => Some(TodoPriority::Top),
            _ => None,
        }
    }
}

/// Todo domain model
#[derive(Debug, Clone, PartialEq)]
pub struct Todo {
    pub id: Uuid,
    pub user_id: Uuid,
    pub description: String,
    pub due_date: Option<OffsetDateTime>,
    pub is_completed: bool,
    pub completed_at: Option<OffsetDateTime>,
    pub priority: TodoPriority,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewTodo {
    pub description: String,
    pub due_date: Option<OffsetDateTime>,
    pub priority: TodoPriority,
}

#[derive(Debug, Clone)]
pub struct UpdateTodo {
    pub description: String,
    pub due_date: Option<OffsetDateTime>,
    pub priority: TodoPriority,
}

pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: Uuid,
    new_todo: NewTodo,
) -> Result<Todo, DomainError> {
    let todo_active = todos::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        description: Set(new_todo.description),
        due_date: Set(new_todo.due_date),
        is_completed: Set(false),
        completed_at: Set(None),
        priority: Set(new_todo.priority.as_str().to_string()),
        created_at: Set(OffsetDateTime::now_utc()),
    };

    let model = todo_active.insert(conn).await.map_err(map_db_err)?;
    Todo::try_from(model)
}

pub async fn list_for_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: Uuid,
) -> Result<Vec<Todo>, DomainError> {
    let models = todos::Entity::find()
        .filter(todos::Column::UserId.eq(user_id))
        .order_by_asc(todos::Column::CreatedAt)
        .all(conn)
        .await
        .map_err(map_db_err)?;

    models.into_iter().map(Todo::try_from).collect()
}

/// Fetch one todo owned by `user_id`. Absence and foreign ownership are
/// indistinguishable.
pub async fn find_for_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: Uuid,
    todo_id: Uuid,
) -> Result<Todo, DomainError> {
    let model = todos::Entity::find()
        .filter(todos::Column::Id.eq(todo_id))
        .filter(todos::Column::UserId.eq(user_id))
        .one(conn)
        .await
        .map_err(map_db_err)?
        .ok_or_else(|| DomainError::not_found(NotFoundKind::Todo, format!("todo {todo_id}")))?;

    Todo::try_from(model)
}

pub async fn update_for_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: Uuid,
    todo_id: Uuid,
    update: UpdateTodo,
) -> Result<Todo, DomainError> {
    let existing = find_for_user(conn, user_id, todo_id).await?;

    let mut active = existing_model(existing).into_active_model();
    active.description = Set(update.description);
    active.due_date = Set(update.due_date);
    active.priority = Set(update.priority.as_str().to_string());

    let model = active.update(conn).await.map_err(map_db_err)?;
    Todo::try_from(model)
}

/// Mark a todo completed. Idempotent: a second call returns the todo
/// unchanged, preserving the original `completed_at`.
pub async fn complete_for_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: Uuid,
    todo_id: Uuid,
) -> Result<Todo, DomainError> {
    let existing = find_for_user(conn, user_id, todo_id).await?;
    if existing.is_completed {
        return Ok(existing);
    }

    let mut active = existing_model(existing).into_active_model();
    active.is_completed = Set(true);
    active.completed_at = Set(Some(OffsetDateTime::now_utc()));

    let model = active.update(conn).await.map_err(map_db_err)?;
    Todo::try_from(model)
}

pub async fn delete_for_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: Uuid,
    todo_id: Uuid,
) -> Result<(), DomainError> {
    let existing = find_for_user(conn, user_id, todo_id).await?;

    todos::Entity::delete_by_id(existing.id)
        .exec(conn)
        .await
        .map_err(map_db_err)?;
    Ok(())
}

fn existing_model(todo: Todo) -> todos::Model {
    todos::Model {
        id: todo.id,
        user_id: todo.user_id,
        description: todo.description,
        due_date: todo.due_date,
        is_completed: todo.is_completed,
        completed_at: todo.completed_at,
        priority: todo.priority.as_str().to_string(),
        created_at: todo.created_at,
    }
}

impl TryFrom<todos::Model> for Todo {
    type Error = DomainError;

    fn try_from(model: todos::Model) -> Result<Self, DomainError> {
        let priority = TodoPriority::parse(&model.priority).ok_or_else(|| {
            DomainError::validation(format!("unknown priority '{}' in storage", model.priority))
        })?;
        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            description: model.description,
            due_date: model.due_date,
            is_completed: model.is_completed,
            completed_at: model.completed_at,
            priority,
            created_at: model.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::TodoPriority;

    #[test]
    fn priority_roundtrips_through_storage_form() {
        for p in [
            TodoPriority::Low,
            TodoPriority::Normal,
            TodoPriority::Medium,
            TodoPriority::High,
            TodoPriority::Top,
        ] {
            assert_eq!(TodoPriority::parse(p.as_str()), Some(p));
        }
    }

    #[test]
    fn unknown_priority_rejected() {
        assert_eq!(TodoPriority::parse("urgent"), None);
        assert_eq!(TodoPriority::parse("Medium"), None);
    }
}
