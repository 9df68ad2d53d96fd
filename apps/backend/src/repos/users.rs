//! User repository functions for the domain layer (generic over ConnectionTrait).

use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::entities::users;
use crate::errors::domain::DomainError;
use crate::infra::db_errors::map_db_err;

/// User domain model
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub created_at: time::OffsetDateTime,
    pub updated_at: time::OffsetDateTime,
}

/// Fields required to persist a new user. `password_hash` must already be
/// hashed; the plaintext must never reach this layer.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
}

/// Look up a user by email. Callers are expected to pass the normalized
/// (lowercased, trimmed) form; emails are stored normalized at registration.
pub async fn find_by_email<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    email: &str,
) -> Result<Option<User>, DomainError> {
    let user = users::Entity::find()
        .filter(users::Column::Email.eq(email))
        .one(conn)
        .await
        .map_err(map_db_err)?;
    Ok(user.map(User::from))
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: Uuid,
) -> Result<Option<User>, DomainError> {
    let user = users::Entity::find_by_id(user_id)
        .one(conn)
        .await
        .map_err(map_db_err)?;
    Ok(user.map(User::from))
}

/// Insert a new user row. A unique-email violation surfaces as
/// `DomainError::Conflict(UniqueEmail, _)` via `map_db_err`.
pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    new_user: NewUser,
) -> Result<User, DomainError> {
    let now = time::OffsetDateTime::now_utc();
    let user_active = users::ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(new_user.email),
        first_name: Set(new_user.first_name),
        last_name: Set(new_user.last_name),
        password_hash: Set(new_user.password_hash),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let user = user_active.insert(conn).await.map_err(map_db_err)?;
    Ok(User::from(user))
}

/// Replace the stored password hash for a user.
pub async fn update_password_hash<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: Uuid,
    password_hash: String,
) -> Result<(), DomainError> {
    let user_active = users::ActiveModel {
        id: Set(user_id),
        password_hash: Set(password_hash),
        updated_at: Set(time::OffsetDateTime::now_utc()),
        ..Default::default()
    };
    user_active.update(conn).await.map_err(map_db_err)?;
    Ok(())
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            first_name: model.first_name,
            last_name: model.last_name,
            password_hash: model.password_hash,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
