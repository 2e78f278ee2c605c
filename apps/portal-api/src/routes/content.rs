//! Landing-page content endpoints: recent updates and popular topics.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;

use atrium_core::types::{
    NewPopularTopic, NewRecentUpdate, PopularTopic, PopularTopicUpdate, RecentUpdate,
    RecentUpdateUpdate,
};
use atrium_core::validation::{
    validate_new_popular_topic, validate_new_recent_update, validate_popular_topic_update,
    validate_recent_update_update,
};
use atrium_db::{Page, StoreError};

use crate::error::{ok, ApiResult, Envelope};
use crate::extract::Json;
use crate::state::AppState;

use super::ListParams;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/recent-updates", get(list_updates).post(create_update))
        .route(
            "/recent-updates/{id}",
            get(get_update).put(edit_update).delete(remove_update),
        )
        .route("/popular-topics", get(list_topics).post(create_topic))
        .route(
            "/popular-topics/{id}",
            get(get_topic).put(edit_topic).delete(remove_topic),
        )
        .route("/popular-topics/{id}/view", post(record_view))
}

// =============================================================================
// Recent Updates
// =============================================================================

async fn list_updates(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Envelope<Page<RecentUpdate>>>> {
    let page = state.db.recent_updates().list(params.page()).await?;
    Ok(ok(page))
}

async fn create_update(
    State(state): State<AppState>,
    Json(req): Json<NewRecentUpdate>,
) -> ApiResult<(StatusCode, Json<Envelope<RecentUpdate>>)> {
    validate_new_recent_update(&req)?;
    let update = state.db.recent_updates().create(req).await?;
    Ok((StatusCode::CREATED, ok(update)))
}

async fn get_update(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<RecentUpdate>>> {
    let update = state
        .db
        .recent_updates()
        .get(&id)
        .await?
        .ok_or_else(|| StoreError::not_found("RecentUpdates", &id))?;
    Ok(ok(update))
}

async fn edit_update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<RecentUpdateUpdate>,
) -> ApiResult<Json<Envelope<RecentUpdate>>> {
    validate_recent_update_update(&req)?;
    let update = state.db.recent_updates().update(&id, req).await?;
    Ok(ok(update))
}

async fn remove_update(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<()>>> {
    state.db.recent_updates().delete(&id).await?;
    Ok(ok(()))
}

// =============================================================================
// Popular Topics
// =============================================================================

async fn list_topics(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Envelope<Page<PopularTopic>>>> {
    let page = state.db.popular_topics().list(params.page()).await?;
    Ok(ok(page))
}

async fn create_topic(
    State(state): State<AppState>,
    Json(req): Json<NewPopularTopic>,
) -> ApiResult<(StatusCode, Json<Envelope<PopularTopic>>)> {
    validate_new_popular_topic(&req)?;
    let topic = state.db.popular_topics().create(req).await?;
    Ok((StatusCode::CREATED, ok(topic)))
}

async fn get_topic(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<PopularTopic>>> {
    let topic = state
        .db
        .popular_topics()
        .get(&id)
        .await?
        .ok_or_else(|| StoreError::not_found("PopularTopics", &id))?;
    Ok(ok(topic))
}

async fn edit_topic(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<PopularTopicUpdate>,
) -> ApiResult<Json<Envelope<PopularTopic>>> {
    validate_popular_topic_update(&req)?;
    let topic = state.db.popular_topics().update(&id, req).await?;
    Ok(ok(topic))
}

/// Bumps the topic's view counter by one.
async fn record_view(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<PopularTopic>>> {
    let topic = state.db.popular_topics().record_view(&id).await?;
    Ok(ok(topic))
}

async fn remove_topic(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<()>>> {
    state.db.popular_topics().delete(&id).await?;
    Ok(ok(()))
}
