//! Ticket endpoints, reply threads included.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;

use atrium_core::types::{NewTicket, NewTicketReply, Ticket, TicketUpdate};
use atrium_core::validation::{
    validate_new_ticket, validate_new_ticket_reply, validate_ticket_update,
};
use atrium_db::{Page, StoreError};

use crate::error::{ok, ApiResult, Envelope};
use crate::extract::Json;
use crate::state::AppState;

use super::ListParams;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/tickets", get(list).post(create))
        .route("/tickets/{id}", get(get_one).put(update).delete(remove))
        .route("/tickets/{id}/replies", post(add_reply))
}

/// Lists tickets; `?clientId=` scopes to one client via the index.
async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Envelope<Page<Ticket>>>> {
    let tickets = state.db.tickets();
    let page = match &params.client_id {
        Some(client_id) => tickets.for_client(client_id, params.query()).await?,
        None => tickets.list(params.page()).await?,
    };
    Ok(ok(page))
}

async fn create(
    State(state): State<AppState>,
    Json(req): Json<NewTicket>,
) -> ApiResult<(StatusCode, Json<Envelope<Ticket>>)> {
    validate_new_ticket(&req)?;
    let ticket = state.db.tickets().create(req).await?;
    Ok((StatusCode::CREATED, ok(ticket)))
}

async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<Ticket>>> {
    let ticket = state
        .db
        .tickets()
        .get(&id)
        .await?
        .ok_or_else(|| StoreError::not_found("Tickets", &id))?;
    Ok(ok(ticket))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<TicketUpdate>,
) -> ApiResult<Json<Envelope<Ticket>>> {
    validate_ticket_update(&req)?;
    let ticket = state.db.tickets().update(&id, req).await?;
    Ok(ok(ticket))
}

async fn add_reply(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<NewTicketReply>,
) -> ApiResult<(StatusCode, Json<Envelope<Ticket>>)> {
    validate_new_ticket_reply(&req)?;
    let ticket = state.db.tickets().add_reply(&id, req).await?;
    Ok((StatusCode::CREATED, ok(ticket)))
}

async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<()>>> {
    state.db.tickets().delete(&id).await?;
    Ok(ok(()))
}
