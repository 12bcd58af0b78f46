use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::{
    TravelChatError,
    chat::ChatService,
    config::MapConfig,
    location_table::LocationTable,
    models::{ChatMessage, Location},
    selection::{MAX_SELECTED, SelectionStore, ToggleOutcome},
    session::{Session, SessionStore},
};

const SELECTED_COLOR: &str = "red";
const UNSELECTED_COLOR: &str = "blue";

/// Shared state injected into every handler
#[derive(Clone)]
pub struct AppState {
    pub locations: Arc<LocationTable>,
    pub sessions: SessionStore,
    pub chat: Arc<ChatService>,
    pub map: MapConfig,
    pub click_tolerance_km: f64,
}

#[derive(Serialize, Deserialize)]
pub struct ApiMap {
    pub center_latitude: f64,
    pub center_longitude: f64,
    pub zoom: u8,
    pub map_api_key_configured: bool,
}

#[derive(Serialize, Deserialize)]
pub struct ApiSession {
    pub id: Uuid,
    pub selection: Vec<Location>,
    pub selected_count: usize,
    pub max_selected: usize,
    pub counter: String,
    pub messages: Vec<ChatMessage>,
}

impl From<&Session> for ApiSession {
    fn from(session: &Session) -> Self {
        Self {
            id: session.id,
            selection: session.selection.list().to_vec(),
            selected_count: session.selection.len(),
            max_selected: MAX_SELECTED,
            counter: session.selection.counter_text(),
            messages: session.conversation.messages().to_vec(),
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct ApiMarker {
    pub index: usize,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub selected: bool,
    pub color: String,
}

#[derive(Serialize, Deserialize)]
pub struct ApiSelectionChange {
    /// `None` when a map click matched no location
    pub outcome: Option<ToggleOutcome>,
    pub location: Option<Location>,
    pub message: Option<String>,
    pub session: ApiSession,
}

#[derive(Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
}

#[derive(Deserialize)]
pub struct ToggleRequest {
    pub index: usize,
}

#[derive(Deserialize)]
pub struct MapClickRequest {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Deserialize)]
pub struct MessageRequest {
    pub text: String,
}

impl From<JsonRejection> for TravelChatError {
    fn from(rejection: JsonRejection) -> Self {
        TravelChatError::validation(rejection.body_text())
    }
}

impl IntoResponse for TravelChatError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {self}");
        }
        let body = ApiError {
            error: self.user_message(),
        };
        (status, Json(body)).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/locations", get(get_locations))
        .route("/map", get(get_map))
        .route("/sessions", post(create_session))
        .route("/sessions/{id}", get(get_session).delete(end_session))
        .route("/sessions/{id}/markers", get(get_markers))
        .route("/sessions/{id}/selection/toggle", post(toggle_selection))
        .route("/sessions/{id}/selection/click", post(click_map))
        .route("/sessions/{id}/selection/{index}", delete(remove_selection))
        .route("/sessions/{id}/messages", post(send_message))
        .with_state(state)
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn get_locations(State(state): State<AppState>) -> Json<Vec<Location>> {
    Json(state.locations.all().to_vec())
}

async fn get_map(State(state): State<AppState>) -> Json<ApiMap> {
    Json(ApiMap {
        center_latitude: state.map.center_latitude,
        center_longitude: state.map.center_longitude,
        zoom: state.map.zoom,
        map_api_key_configured: state.map.api_key.is_some(),
    })
}

async fn create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ApiSession>), TravelChatError> {
    let id = state.sessions.create(state.chat.new_conversation()).await;
    info!(%id, persona = ?state.chat.persona(), "New chat session");
    let session = state.sessions.get(id).await?;
    Ok((StatusCode::CREATED, Json(ApiSession::from(&session))))
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiSession>, TravelChatError> {
    let session = state.sessions.get(id).await?;
    Ok(Json(ApiSession::from(&session)))
}

async fn end_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, TravelChatError> {
    state.sessions.remove(id).await?;
    info!(%id, "Chat session ended");
    Ok(StatusCode::NO_CONTENT)
}

async fn get_markers(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ApiMarker>>, TravelChatError> {
    let session = state.sessions.get(id).await?;
    Ok(Json(markers(&state.locations, &session.selection)))
}

/// One marker per location, coloured by selection state
fn markers(locations: &LocationTable, selection: &SelectionStore) -> Vec<ApiMarker> {
    locations
        .all()
        .iter()
        .map(|location| {
            let selected = selection.contains(location);
            ApiMarker {
                index: location.index,
                address: location.address.clone(),
                latitude: location.latitude,
                longitude: location.longitude,
                selected,
                color: if selected {
                    SELECTED_COLOR
                } else {
                    UNSELECTED_COLOR
                }
                .to_string(),
            }
        })
        .collect()
}

async fn toggle_selection(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    request: Result<Json<ToggleRequest>, JsonRejection>,
) -> Result<Response, TravelChatError> {
    let Json(request) = request?;
    let location = lookup(&state.locations, request.index)?.clone();
    toggle(&state, id, Some(location)).await
}

async fn click_map(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    click: Result<Json<MapClickRequest>, JsonRejection>,
) -> Result<Response, TravelChatError> {
    let Json(click) = click?;
    let location = state
        .locations
        .nearest(click.latitude, click.longitude, state.click_tolerance_km)
        .cloned();
    if location.is_none() {
        tracing::debug!(
            "Map click at ({}, {}) matched no location",
            click.latitude,
            click.longitude
        );
    }
    toggle(&state, id, location).await
}

async fn toggle(
    state: &AppState,
    id: Uuid,
    location: Option<Location>,
) -> Result<Response, TravelChatError> {
    let (outcome, session) = state
        .sessions
        .with_session_mut(id, |session| {
            let outcome = location
                .as_ref()
                .map(|location| session.selection.toggle(location));
            (outcome, ApiSession::from(&*session))
        })
        .await?;

    let (status, message) = match outcome {
        Some(ToggleOutcome::Rejected) => (
            StatusCode::CONFLICT,
            Some(format!("You can select at most {MAX_SELECTED} locations")),
        ),
        _ => (StatusCode::OK, None),
    };

    let body = ApiSelectionChange {
        outcome,
        location,
        message,
        session,
    };
    Ok((status, Json(body)).into_response())
}

async fn remove_selection(
    State(state): State<AppState>,
    Path((id, index)): Path<(Uuid, usize)>,
) -> Result<Json<ApiSession>, TravelChatError> {
    let location = lookup(&state.locations, index)?;
    let session = state
        .sessions
        .with_session_mut(id, |session| {
            session.selection.remove(location);
            ApiSession::from(&*session)
        })
        .await?;
    Ok(Json(session))
}

async fn send_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    request: Result<Json<MessageRequest>, JsonRejection>,
) -> Result<Json<ApiSession>, TravelChatError> {
    let Json(request) = request?;
    let handle = state.sessions.handle(id).await?;
    let mut session = handle.lock().await;
    let Session {
        selection,
        conversation,
        ..
    } = &mut *session;
    state.chat.send(conversation, selection, &request.text).await;
    Ok(Json(ApiSession::from(&*session)))
}

fn lookup(locations: &LocationTable, index: usize) -> Result<&Location, TravelChatError> {
    locations
        .get(index)
        .ok_or_else(|| TravelChatError::not_found(format!("location {index}")))
}
