//! HTTP surface for the room host.
//!
//! Thin adapter: every handler resolves the room, calls one room operation,
//! and returns the events it produced. Domain rejections come back as events
//! with `200 OK`. A room is closed as soon as its game is over.

use crate::events::{
    ChatRequest, CreateRoomRequest, JoinRequest, LeaveRequest, MoveRequest, RoomEvent,
};
use crate::room::{Room, RoomId};
use crate::rooms::{RoomError, RoomManager};
use axum::extract::{Path, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use derive_more::Display;
use omok_game::{JoinError, SessionSnapshot};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, instrument, warn};

/// Error returned by an HTTP handler.
#[derive(Debug, Clone, Display)]
pub enum ApiError {
    /// No room with this id.
    #[display("room {_0} not found")]
    NotFound(RoomId),
    /// The request conflicts with current state.
    #[display("{_0}")]
    Conflict(String),
    /// The request is malformed.
    #[display("{_0}")]
    BadRequest(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        warn!(error = %self, "Request failed");
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<JoinError> for ApiError {
    fn from(err: JoinError) -> Self {
        ApiError::Conflict(err.to_string())
    }
}

impl From<RoomError> for ApiError {
    fn from(err: RoomError) -> Self {
        match err {
            RoomError::AlreadyExists(_) => ApiError::Conflict(err.to_string()),
            RoomError::InvalidConfig(_) => ApiError::BadRequest(err.to_string()),
        }
    }
}

/// Body returned when a room is opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomCreated {
    /// Id of the new room.
    pub room_id: RoomId,
}

/// Builds the router over a shared room registry.
pub fn router(rooms: RoomManager) -> Router {
    Router::new()
        .route("/health-check", get(health_check))
        .route("/rooms", get(list_rooms).post(create_room))
        .route("/rooms/{room_id}", get(get_room).delete(dispose_room))
        .route("/rooms/{room_id}/join", post(join_room))
        .route("/rooms/{room_id}/moves", post(submit_move))
        .route("/rooms/{room_id}/leave", post(leave_room))
        .route("/rooms/{room_id}/chat", post(chat))
        .layer(middleware::from_fn(log_request))
        .with_state(rooms)
}

async fn log_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let response = next.run(req).await;
    info!(%method, %uri, status = %response.status(), "Handled request");
    response
}

fn find_room(rooms: &RoomManager, room_id: &str) -> Result<Room, ApiError> {
    rooms
        .room(room_id)
        .ok_or_else(|| ApiError::NotFound(room_id.to_string()))
}

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({ "status": "OK" }))
}

async fn list_rooms(State(rooms): State<RoomManager>) -> Json<Vec<RoomId>> {
    Json(rooms.list_rooms())
}

#[instrument(skip(rooms))]
async fn create_room(
    State(rooms): State<RoomManager>,
    Json(req): Json<CreateRoomRequest>,
) -> Result<(StatusCode, Json<RoomCreated>), ApiError> {
    let room = rooms.create_room(req.room_id, req.config)?;
    Ok((
        StatusCode::CREATED,
        Json(RoomCreated {
            room_id: room.id().clone(),
        }),
    ))
}

async fn get_room(
    State(rooms): State<RoomManager>,
    Path(room_id): Path<RoomId>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    Ok(Json(find_room(&rooms, &room_id)?.snapshot()))
}

#[instrument(skip(rooms))]
async fn dispose_room(
    State(rooms): State<RoomManager>,
    Path(room_id): Path<RoomId>,
) -> Result<StatusCode, ApiError> {
    if rooms.dispose_room(&room_id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(room_id))
    }
}

#[instrument(skip(rooms, req))]
async fn join_room(
    State(rooms): State<RoomManager>,
    Path(room_id): Path<RoomId>,
    Json(req): Json<JoinRequest>,
) -> Result<Json<Vec<RoomEvent>>, ApiError> {
    let room = find_room(&rooms, &room_id)?;
    Ok(Json(room.join(req)?))
}

#[instrument(skip(rooms, req))]
async fn submit_move(
    State(rooms): State<RoomManager>,
    Path(room_id): Path<RoomId>,
    Json(req): Json<MoveRequest>,
) -> Result<Json<Vec<RoomEvent>>, ApiError> {
    let room = find_room(&rooms, &room_id)?;
    let events = room.submit_move(req);
    rooms.dispose_if_over(&room);
    Ok(Json(events))
}

/// A departure ends the game, so the room closes with it.
#[instrument(skip(rooms, req))]
async fn leave_room(
    State(rooms): State<RoomManager>,
    Path(room_id): Path<RoomId>,
    Json(req): Json<LeaveRequest>,
) -> Result<Json<Vec<RoomEvent>>, ApiError> {
    let room = find_room(&rooms, &room_id)?;
    let events = room.leave(req);
    rooms.dispose_if_over(&room);
    Ok(Json(events))
}

#[instrument(skip(rooms, req))]
async fn chat(
    State(rooms): State<RoomManager>,
    Path(room_id): Path<RoomId>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<Vec<RoomEvent>>, ApiError> {
    let room = find_room(&rooms, &room_id)?;
    Ok(Json(room.chat(req)))
}
