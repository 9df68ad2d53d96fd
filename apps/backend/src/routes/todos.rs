use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::db::require_db;
use crate::db::txn::with_txn;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::extractors::{CurrentUser, ValidatedJson};
use crate::repos::todos::{self, NewTodo, Todo, TodoPriority, UpdateTodo};
use crate::state::app_state::AppState;

fn default_priority() -> TodoPriority {
    TodoPriority::Medium
}

#[derive(Debug, Deserialize)]
pub struct CreateTodoRequest {
    pub description: String,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub due_date: Option<OffsetDateTime>,
    #[serde(default = "default_priority")]
    pub priority: TodoPriority,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTodoRequest {
    pub description: String,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub due_date: Option<OffsetDateTime>,
    #[serde(default = "default_priority")]
    pub priority: TodoPriority,
}

#[derive(Debug, Serialize)]
pub struct TodoResponse {
    pub id: Uuid,
    pub description: String,
    pub due_date: Option<String>,
    pub is_completed: bool,
    pub completed_at: Option<String>,
    pub priority: TodoPriority,
    pub created_at: String,
}

impl From<Todo> for TodoResponse {
    fn from(todo: Todo) -> Self {
        let fmt = |ts: OffsetDateTime| ts.format(&Rfc3339).unwrap_or_else(|_| ts.to_string());
        Self {
            id: todo.id,
            description: todo.description,
            due_date: todo.due_date.map(fmt),
            is_completed: todo.is_completed,
            completed_at: todo.completed_at.map(fmt),
            priority: todo.priority,
            created_at: fmt(todo.created_at),
        }
    }
}

fn validated_description(description: &str) -> Result<String, AppError> {
    let trimmed = description.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(
            ErrorCode::ValidationError,
            "Description cannot be empty",
        ));
    }
    Ok(trimmed.to_string())
}

async fn create_todo(
    current_user: CurrentUser,
    app_state: web::Data<AppState>,
    body: ValidatedJson<CreateTodoRequest>,
) -> Result<HttpResponse, AppError> {
    let payload = body.into_inner();
    let description = validated_description(&payload.description)?;
    let user_id = current_user.id;

    let todo = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            todos::create(
                txn,
                user_id,
                NewTodo {
                    description,
                    due_date: payload.due_date,
                    priority: payload.priority,
                },
            )
            .await
            .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Created().json(TodoResponse::from(todo)))
}

async fn list_todos(
    current_user: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let todos = todos::list_for_user(db, current_user.id).await?;
    let response: Vec<TodoResponse> = todos.into_iter().map(TodoResponse::from).collect();
    Ok(HttpResponse::Ok().json(response))
}

async fn get_todo(
    current_user: CurrentUser,
    app_state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let todo = todos::find_for_user(db, current_user.id, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(TodoResponse::from(todo)))
}

async fn update_todo(
    current_user: CurrentUser,
    app_state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: ValidatedJson<UpdateTodoRequest>,
) -> Result<HttpResponse, AppError> {
    let payload = body.into_inner();
    let description = validated_description(&payload.description)?;
    let user_id = current_user.id;
    let todo_id = path.into_inner();

    let todo = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            todos::update_for_user(
                txn,
                user_id,
                todo_id,
                UpdateTodo {
                    description,
                    due_date: payload.due_date,
                    priority: payload.priority,
                },
            )
            .await
            .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(TodoResponse::from(todo)))
}

async fn complete_todo(
    current_user: CurrentUser,
    app_state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let user_id = current_user.id;
    let todo_id = path.into_inner();

    let todo = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            todos::complete_for_user(txn, user_id, todo_id)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(TodoResponse::from(todo)))
}

async fn delete_todo(
    current_user: CurrentUser,
    app_state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let user_id = current_user.id;
    let todo_id = path.into_inner();

    with_txn(&app_state, move |txn| {
        Box::pin(async move {
            todos::delete_for_user(txn, user_id, todo_id)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::NoContent().finish())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::post().to(create_todo))
        .route("", web::get().to(list_todos))
        .route("/{todo_id}", web::get().to(get_todo))
        .route("/{todo_id}", web::put().to(update_todo))
        .route("/{todo_id}/complete", web::put().to(complete_todo))
        .route("/{todo_id}", web::delete().to(delete_todo));
}
