//! Client endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;

use atrium_core::types::{Client, ClientUpdate, NewClient};
use atrium_core::validation::{validate_client_update, validate_new_client};
use atrium_db::{Page, StoreError};

use crate::error::{ok, ApiResult, Envelope};
use crate::extract::Json;
use crate::state::AppState;

use super::ListParams;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/clients", get(list).post(create))
        .route("/clients/{id}", get(get_one).put(update).delete(remove))
}

async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Envelope<Page<Client>>>> {
    let page = state.db.clients().list(params.page()).await?;
    Ok(ok(page))
}

async fn create(
    State(state): State<AppState>,
    Json(req): Json<NewClient>,
) -> ApiResult<(StatusCode, Json<Envelope<Client>>)> {
    validate_new_client(&req)?;
    let client = state.db.clients().create(req).await?;
    Ok((StatusCode::CREATED, ok(client)))
}

async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<Client>>> {
    let client = state
        .db
        .clients()
        .get(&id)
        .await?
        .ok_or_else(|| StoreError::not_found("Clients", &id))?;
    Ok(ok(client))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ClientUpdate>,
) -> ApiResult<Json<Envelope<Client>>> {
    validate_client_update(&req)?;
    let client = state.db.clients().update(&id, req).await?;
    Ok(ok(client))
}

async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<()>>> {
    state.db.clients().delete(&id).await?;
    Ok(ok(()))
}
