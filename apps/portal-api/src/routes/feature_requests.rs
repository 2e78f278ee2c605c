//! Feature request endpoints, voting included.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;

use atrium_core::types::{FeatureRequest, FeatureRequestUpdate, NewFeatureRequest};
use atrium_core::validation::{validate_feature_request_update, validate_new_feature_request};
use atrium_db::{Page, StoreError};

use crate::error::{ok, ApiResult, Envelope};
use crate::extract::Json;
use crate::state::AppState;

use super::ListParams;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/feature-requests", get(list).post(create))
        .route(
            "/feature-requests/{id}",
            get(get_one).put(update).delete(remove),
        )
        .route("/feature-requests/{id}/vote", post(vote))
}

async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Envelope<Page<FeatureRequest>>>> {
    let requests = state.db.feature_requests();
    let page = match &params.client_id {
        Some(client_id) => requests.for_client(client_id, params.query()).await?,
        None => requests.list(params.page()).await?,
    };
    Ok(ok(page))
}

async fn create(
    State(state): State<AppState>,
    Json(req): Json<NewFeatureRequest>,
) -> ApiResult<(StatusCode, Json<Envelope<FeatureRequest>>)> {
    validate_new_feature_request(&req)?;
    let request = state.db.feature_requests().create(req).await?;
    Ok((StatusCode::CREATED, ok(request)))
}

async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<FeatureRequest>>> {
    let request = state
        .db
        .feature_requests()
        .get(&id)
        .await?
        .ok_or_else(|| StoreError::not_found("FeatureRequests", &id))?;
    Ok(ok(request))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<FeatureRequestUpdate>,
) -> ApiResult<Json<Envelope<FeatureRequest>>> {
    validate_feature_request_update(&req)?;
    let request = state.db.feature_requests().update(&id, req).await?;
    Ok(ok(request))
}

async fn vote(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<FeatureRequest>>> {
    let request = state.db.feature_requests().vote(&id).await?;
    Ok(ok(request))
}

async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<()>>> {
    state.db.feature_requests().delete(&id).await?;
    Ok(ok(()))
}
