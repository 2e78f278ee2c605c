//! User and admin-user endpoints.
//!
//! Requests carry a plaintext password that is hashed server-side; stored
//! hashes never leave this module. Responses are a view without the hash.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use atrium_core::error::ValidationError;
use atrium_core::types::{AdminUser, AdminUserUpdate, NewAdminUser, NewUser, User, UserUpdate};
use atrium_core::validation::{
    validate_admin_user_update, validate_new_admin_user, validate_new_user, validate_user_update,
};
use atrium_db::{Page, StoreError};

use crate::auth::hash_password;
use crate::error::{ok, ApiResult, Envelope};
use crate::extract::Json;
use crate::state::AppState;

use super::ListParams;

/// Minimum accepted password length.
const MIN_PASSWORD_LEN: usize = 8;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list).post(create))
        .route("/users/{id}", get(get_one).put(update).delete(remove))
        .route("/admin-users", get(list_admins).post(create_admin))
        .route(
            "/admin-users/{id}",
            get(get_admin).put(update_admin).delete(remove_admin),
        )
}

// =============================================================================
// Request / Response Shapes
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateUserRequest {
    username: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    client_id: Option<String>,
    password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateAdminUserRequest {
    username: String,
    #[serde(default)]
    email: Option<String>,
    password: String,
}

/// A user record without its password hash.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UserView {
    id: String,
    username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    client_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        UserView {
            id: user.id,
            username: user.username,
            email: user.email,
            client_id: user.client_id,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<AdminUser> for UserView {
    fn from(user: AdminUser) -> Self {
        UserView {
            id: user.id,
            username: user.username,
            email: user.email,
            client_id: None,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

fn check_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::single(
            "password",
            format!("password must be at least {MIN_PASSWORD_LEN} characters"),
        ));
    }
    Ok(())
}

/// Username uniqueness is enforced here, before the hash is ever computed.
async fn reject_taken_username(state: &AppState, username: &str) -> ApiResult<()> {
    if state.db.users().find_by_username(username).await?.is_some()
        || state
            .db
            .admin_users()
            .find_by_username(username)
            .await?
            .is_some()
    {
        return Err(StoreError::already_exists("Users", username).into());
    }
    Ok(())
}

// =============================================================================
// Portal Users
// =============================================================================

async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Envelope<Page<UserView>>>> {
    let users = state.db.users();
    let page = match &params.client_id {
        Some(client_id) => users.for_client(client_id, params.query()).await?,
        None => users.list(params.page()).await?,
    };
    Ok(ok(Page {
        items: page.items.into_iter().map(UserView::from).collect(),
        next_cursor: page.next_cursor,
    }))
}

async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<Envelope<UserView>>)> {
    check_password(&req.password)?;

    let new_user = NewUser {
        username: req.username,
        email: req.email,
        client_id: req.client_id,
        password_hash: hash_password(&req.password)?,
    };
    validate_new_user(&new_user)?;
    reject_taken_username(&state, &new_user.username).await?;

    let user = state.db.users().create(new_user).await?;
    Ok((StatusCode::CREATED, ok(user.into())))
}

async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<UserView>>> {
    let user = state
        .db
        .users()
        .get(&id)
        .await?
        .ok_or_else(|| StoreError::not_found("Users", &id))?;
    Ok(ok(user.into()))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateUserRequest {
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    client_id: Option<String>,
    /// New plaintext password; hashed before storage.
    #[serde(default)]
    password: Option<String>,
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateUserRequest>,
) -> ApiResult<Json<Envelope<UserView>>> {
    let password_hash = match &req.password {
        Some(password) => {
            check_password(password)?;
            Some(hash_password(password)?)
        }
        None => None,
    };

    let update = UserUpdate {
        email: req.email,
        client_id: req.client_id,
        password_hash,
    };
    validate_user_update(&update)?;

    let user = state.db.users().update(&id, update).await?;
    Ok(ok(user.into()))
}

async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<()>>> {
    state.db.users().delete(&id).await?;
    Ok(ok(()))
}

// =============================================================================
// Admin Users
// =============================================================================

async fn list_admins(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Envelope<Page<UserView>>>> {
    let page = state.db.admin_users().list(params.page()).await?;
    Ok(ok(Page {
        items: page.items.into_iter().map(UserView::from).collect(),
        next_cursor: page.next_cursor,
    }))
}

async fn create_admin(
    State(state): State<AppState>,
    Json(req): Json<CreateAdminUserRequest>,
) -> ApiResult<(StatusCode, Json<Envelope<UserView>>)> {
    check_password(&req.password)?;

    let new_admin = NewAdminUser {
        username: req.username,
        email: req.email,
        password_hash: hash_password(&req.password)?,
    };
    validate_new_admin_user(&new_admin)?;
    reject_taken_username(&state, &new_admin.username).await?;

    let admin = state.db.admin_users().create(new_admin).await?;
    Ok((StatusCode::CREATED, ok(admin.into())))
}

async fn get_admin(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<UserView>>> {
    let admin = state
        .db
        .admin_users()
        .get(&id)
        .await?
        .ok_or_else(|| StoreError::not_found("AdminUsers", &id))?;
    Ok(ok(admin.into()))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateAdminUserRequest {
    #[serde(default)]
    email: Option<String>,
    /// New plaintext password; hashed before storage.
    #[serde(default)]
    password: Option<String>,
}

async fn update_admin(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateAdminUserRequest>,
) -> ApiResult<Json<Envelope<UserView>>> {
    let password_hash = match &req.password {
        Some(password) => {
            check_password(password)?;
            Some(hash_password(password)?)
        }
        None => None,
    };

    let update = AdminUserUpdate {
        email: req.email,
        password_hash,
    };
    validate_admin_user_update(&update)?;

    let admin = state.db.admin_users().update(&id, update).await?;
    Ok(ok(admin.into()))
}

async fn remove_admin(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<()>>> {
    state.db.admin_users().delete(&id).await?;
    Ok(ok(()))
}
