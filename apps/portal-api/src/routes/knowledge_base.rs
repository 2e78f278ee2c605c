//! Knowledge-base endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use serde::Deserialize;

use atrium_core::types::{KbArticle, KbArticleUpdate, NewKbArticle};
use atrium_core::validation::{validate_kb_article_update, validate_new_kb_article};
use atrium_db::{Page, StoreError};

use crate::error::{ok, ApiResult, Envelope};
use crate::extract::Json;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/knowledge-base", get(list).post(create))
        .route(
            "/knowledge-base/{id}",
            get(get_one).put(update).delete(remove),
        )
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct KbListParams {
    limit: Option<u32>,
    cursor: Option<String>,
    category: Option<String>,
}

/// Lists articles; `?category=` scopes to one category via the index.
async fn list(
    State(state): State<AppState>,
    Query(params): Query<KbListParams>,
) -> ApiResult<Json<Envelope<Page<KbArticle>>>> {
    let kb = state.db.knowledge_base();
    let page = match &params.category {
        Some(category) => {
            kb.by_category(
                category,
                atrium_db::QueryOptions {
                    limit: params.limit,
                    cursor: params.cursor.clone(),
                    ..Default::default()
                },
            )
            .await?
        }
        None => {
            kb.list(atrium_db::PageRequest {
                limit: params.limit,
                cursor: params.cursor.clone(),
                filter: None,
            })
            .await?
        }
    };
    Ok(ok(page))
}

async fn create(
    State(state): State<AppState>,
    Json(req): Json<NewKbArticle>,
) -> ApiResult<(StatusCode, Json<Envelope<KbArticle>>)> {
    validate_new_kb_article(&req)?;
    let article = state.db.knowledge_base().create(req).await?;
    Ok((StatusCode::CREATED, ok(article)))
}

async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<KbArticle>>> {
    let article = state
        .db
        .knowledge_base()
        .get(&id)
        .await?
        .ok_or_else(|| StoreError::not_found("KnowledgeBase", &id))?;
    Ok(ok(article))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<KbArticleUpdate>,
) -> ApiResult<Json<Envelope<KbArticle>>> {
    validate_kb_article_update(&req)?;
    let article = state.db.knowledge_base().update(&id, req).await?;
    Ok(ok(article))
}

async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<()>>> {
    state.db.knowledge_base().delete(&id).await?;
    Ok(ok(()))
}
