use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use serde::Deserialize;

use crate::error::TransportError;
use crate::fanout::Viewer;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/tables/:id/ws", get(ws_handler))
}

#[derive(Debug, Deserialize)]
struct WsQuery {
    seat: Option<usize>,
}

async fn ws_handler(
    State(state): State<Arc<AppState>>,
    Path(table_id): Path<String>,
    Query(query): Query<WsQuery>,
    ws: WebSocketUpgrade,
) -> Result<impl IntoResponse, TransportError> {
    let handle = state
        .registry
        .get(&table_id)
        .await
        .ok_or(TransportError::TableNotFound)?;
    let viewer = match query.seat {
        Some(seat) => Viewer::Seat(seat),
        None => Viewer::Spectator,
    };
    Ok(ws.on_upgrade(move |socket| push_snapshots(socket, handle, viewer)))
}

/// The push side of the control surface (spec §4.5, §6): one subscription
/// per connection, forwarding every fanned-out snapshot as a JSON text
/// frame until the client disconnects. The socket never reads client
/// frames back — actions go through the HTTP surface, this is fire-and-
/// forget push only.
async fn push_snapshots(mut socket: WebSocket, handle: crate::actor::TableHandle, viewer: Viewer) {
    let (id, mut receiver) = handle.subscribe(viewer).await;
    loop {
        tokio::select! {
            snapshot = receiver.recv() => {
                match snapshot {
                    Some(snapshot) => {
                        let Ok(text) = serde_json::to_string(&snapshot) else { continue };
                        if socket.send(Message::Text(text)).await.is_err() {
                            break;
                        }
                    }
                    None => break,
                }
            }
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(_)) => break,
                    _ => {}
                }
            }
        }
    }
    handle.unsubscribe(id).await;
}
