//! QR code endpoints. Addressed by code value, not by generated id.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;

use atrium_core::types::{NewQrCode, QrCode};
use atrium_core::validation::validate_new_qr_code;
use atrium_db::{Page, StoreError};

use crate::error::{ok, ApiResult, Envelope};
use crate::extract::Json;
use crate::state::AppState;

use super::ListParams;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/qr-codes", get(list).post(create))
        .route("/qr-codes/{code}", get(get_one).delete(remove))
}

async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Envelope<Page<QrCode>>>> {
    let page = state.db.qr_codes().list(params.page()).await?;
    Ok(ok(page))
}

async fn create(
    State(state): State<AppState>,
    Json(req): Json<NewQrCode>,
) -> ApiResult<(StatusCode, Json<Envelope<QrCode>>)> {
    validate_new_qr_code(&req)?;
    let code = state.db.qr_codes().create(req).await?;
    Ok((StatusCode::CREATED, ok(code)))
}

async fn get_one(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> ApiResult<Json<Envelope<QrCode>>> {
    let record = state
        .db
        .qr_codes()
        .get(&code)
        .await?
        .ok_or_else(|| StoreError::not_found("QrCodes", &code))?;
    Ok(ok(record))
}

async fn remove(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> ApiResult<Json<Envelope<()>>> {
    state.db.qr_codes().delete(&code).await?;
    Ok(ok(()))
}
