use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use holdem_engine::{PlayerAction, TableConfig, TableSnapshot, ViewerScope};

use crate::error::TransportError;
use crate::registry::Registry;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/tables", post(create_table))
        .route("/tables/:id/join", post(join_table))
        .route("/tables/:id/start", post(start_hand))
        .route("/tables/:id/action", post(act))
        .route("/tables/:id/snapshot", get(snapshot))
        .route("/tables/:id/reconnect", post(reconnect))
        .route("/admin/tables/:id", get(god_snapshot))
}

#[derive(Debug, Deserialize)]
struct CreateTableRequest {
    #[serde(default)]
    config: TableConfig,
}

#[derive(Debug, Serialize)]
struct CreateTableResponse {
    table_id: String,
}

async fn create_table(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateTableRequest>,
) -> Json<CreateTableResponse> {
    let table_id = state.registry.create_table(request.config).await;
    tracing::info!(table_id, "table created");
    Json(CreateTableResponse { table_id })
}

#[derive(Debug, Deserialize)]
struct JoinRequest {
    name: String,
    chips: u64,
}

#[derive(Debug, Serialize)]
struct JoinResponse {
    seat: usize,
}

async fn join_table(
    State(state): State<Arc<AppState>>,
    Path(table_id): Path<String>,
    Json(request): Json<JoinRequest>,
) -> Result<Json<JoinResponse>, TransportError> {
    let handle = table(&state.registry, &table_id).await?;
    let seat = handle.join(request.name, request.chips).await?;
    tracing::info!(table_id, seat, "player joined");
    Ok(Json(JoinResponse { seat }))
}

async fn start_hand(
    State(state): State<Arc<AppState>>,
    Path(table_id): Path<String>,
) -> Result<Json<TableSnapshot>, TransportError> {
    let handle = table(&state.registry, &table_id).await?;
    let snapshot = handle.start_hand().await?;
    tracing::info!(table_id, "hand started");
    Ok(Json(snapshot))
}

#[derive(Debug, Deserialize)]
struct ActRequest {
    seat: usize,
    action: PlayerAction,
}

async fn act(
    State(state): State<Arc<AppState>>,
    Path(table_id): Path<String>,
    Json(request): Json<ActRequest>,
) -> Result<Json<TableSnapshot>, TransportError> {
    let handle = table(&state.registry, &table_id).await?;
    tracing::info!(table_id, seat = request.seat, ?request.action, "action received");
    let snapshot = handle.act(request.seat, request.action).await?;
    Ok(Json(snapshot))
}

#[derive(Debug, Deserialize)]
struct SnapshotQuery {
    seat: Option<usize>,
}

async fn snapshot(
    State(state): State<Arc<AppState>>,
    Path(table_id): Path<String>,
    axum::extract::Query(query): axum::extract::Query<SnapshotQuery>,
) -> Result<Json<TableSnapshot>, TransportError> {
    let handle = table(&state.registry, &table_id).await?;
    let viewer = match query.seat {
        Some(seat) => ViewerScope::Seat(seat),
        None => ViewerScope::Spectator,
    };
    Ok(Json(handle.snapshot(viewer).await))
}

#[derive(Debug, Deserialize)]
struct ReconnectRequest {
    seat: usize,
}

async fn reconnect(
    State(state): State<Arc<AppState>>,
    Path(table_id): Path<String>,
    Json(request): Json<ReconnectRequest>,
) -> Result<Json<()>, TransportError> {
    let handle = table(&state.registry, &table_id).await?;
    handle.reconnect(request.seat).await?;
    tracing::info!(table_id, seat = request.seat, "seat reconnected");
    Ok(Json(()))
}

async fn god_snapshot(
    State(state): State<Arc<AppState>>,
    Path(table_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<TableSnapshot>, TransportError> {
    let token = headers
        .get("X-Admin-Token")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if token != state.config.admin_token {
        return Err(TransportError::Unauthorized);
    }
    let handle = table(&state.registry, &table_id).await?;
    Ok(Json(handle.snapshot(ViewerScope::God).await))
}

async fn table(
    registry: &Registry,
    table_id: &str,
) -> Result<crate::actor::TableHandle, TransportError> {
    registry.get(table_id).await.ok_or(TransportError::TableNotFound)
}
