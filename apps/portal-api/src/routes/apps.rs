//! App endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;

use atrium_core::types::{App, AppUpdate, NewApp};
use atrium_core::validation::{validate_app_update, validate_new_app};
use atrium_db::{Page, StoreError};

use crate::error::{ok, ApiResult, Envelope};
use crate::extract::Json;
use crate::state::AppState;

use super::ListParams;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/apps", get(list).post(create))
        .route("/apps/{id}", get(get_one).put(update).delete(remove))
}

async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Envelope<Page<App>>>> {
    let page = state.db.apps().list(params.page()).await?;
    Ok(ok(page))
}

async fn create(
    State(state): State<AppState>,
    Json(req): Json<NewApp>,
) -> ApiResult<(StatusCode, Json<Envelope<App>>)> {
    validate_new_app(&req)?;
    let app = state.db.apps().create(req).await?;
    Ok((StatusCode::CREATED, ok(app)))
}

async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<App>>> {
    let app = state
        .db
        .apps()
        .get(&id)
        .await?
        .ok_or_else(|| StoreError::not_found("Apps", &id))?;
    Ok(ok(app))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AppUpdate>,
) -> ApiResult<Json<Envelope<App>>> {
    validate_app_update(&req)?;
    let app = state.db.apps().update(&id, req).await?;
    Ok(ok(app))
}

async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<()>>> {
    state.db.apps().delete(&id).await?;
    Ok(ok(()))
}
