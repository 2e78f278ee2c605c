//! Invoice endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;

use atrium_core::types::{Invoice, InvoiceUpdate, NewInvoice};
use atrium_core::validation::{validate_invoice_update, validate_new_invoice};
use atrium_db::{Page, StoreError};

use crate::error::{ok, ApiResult, Envelope};
use crate::extract::Json;
use crate::state::AppState;

use super::ListParams;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/invoices", get(list).post(create))
        .route("/invoices/{id}", get(get_one).put(update).delete(remove))
}

/// Lists invoices; `?clientId=` scopes to one client via the index.
async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Envelope<Page<Invoice>>>> {
    let invoices = state.db.invoices();
    let page = match &params.client_id {
        Some(client_id) => invoices.for_client(client_id, params.query()).await?,
        None => invoices.list(params.page()).await?,
    };
    Ok(ok(page))
}

async fn create(
    State(state): State<AppState>,
    Json(req): Json<NewInvoice>,
) -> ApiResult<(StatusCode, Json<Envelope<Invoice>>)> {
    validate_new_invoice(&req)?;
    let invoice = state.db.invoices().create(req).await?;
    Ok((StatusCode::CREATED, ok(invoice)))
}

async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<Invoice>>> {
    let invoice = state
        .db
        .invoices()
        .get(&id)
        .await?
        .ok_or_else(|| StoreError::not_found("Invoices", &id))?;
    Ok(ok(invoice))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<InvoiceUpdate>,
) -> ApiResult<Json<Envelope<Invoice>>> {
    validate_invoice_update(&req)?;
    let invoice = state.db.invoices().update(&id, req).await?;
    Ok(ok(invoice))
}

async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<()>>> {
    state.db.invoices().delete(&id).await?;
    Ok(ok(()))
}
