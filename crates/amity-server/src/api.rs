use std::sync::{Arc, Mutex, PoisonError};

use amity_core::{FriendProfile, Message, SocialNetwork, User};
use axum::{
    extract::{FromRequest, FromRequestParts, Path, State},
    http::{Method, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

use crate::config::ServerConfig;
use crate::error::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub network: Arc<Mutex<SocialNetwork>>,
    pub config: Arc<ServerConfig>,
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/api/users", get(list_users).post(create_user))
        .route(
            "/api/users/:id",
            get(get_user).put(rename_user).delete(delete_user),
        )
        .route("/api/friends/add", post(add_friend))
        .route("/api/friends/remove", post(remove_friend))
        .route("/api/friends/:user_id/friends", get(list_friends))
        .route("/api/friends/:user_id/friends/:friend_id", get(are_friends))
        .route("/api/messages/send", post(send_message))
        .route("/api/messages/:id", get(get_message))
        .route("/api/messages/between/:a/:b", get(messages_between))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    name: String,
    version: &'static str,
}

#[derive(Serialize)]
struct StatusMessage {
    message: &'static str,
}

#[derive(Serialize)]
struct AreFriendsResponse {
    friends: bool,
}

#[derive(Deserialize)]
struct UserRequest {
    name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FriendRequest {
    user_id: Uuid,
    friend_id: Uuid,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendMessageRequest {
    sender_id: Uuid,
    receiver_id: Uuid,
    content: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UserDto {
    id: Uuid,
    name: String,
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self { id: u.id, name: u.name }
    }
}

impl From<FriendProfile> for UserDto {
    fn from(f: FriendProfile) -> Self {
        Self { id: f.id, name: f.name }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MessageDto {
    id: Uuid,
    sender_id: Uuid,
    receiver_id: Uuid,
    content: String,
    sent_at: String,
}

impl From<Message> for MessageDto {
    fn from(m: Message) -> Self {
        Self {
            id: m.id,
            sender_id: m.sender_id,
            receiver_id: m.receiver_id,
            content: m.content,
            sent_at: m.sent_at.to_rfc3339(),
        }
    }
}

/// JSON body whose rejection is reported as a 400 validation failure.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
struct ApiJson<T>(T);

/// Path parameters whose rejection is reported as a 400 validation failure.
#[derive(FromRequestParts)]
#[from_request(via(Path), rejection(ApiError))]
struct ApiPath<T>(T);

/// Run a blocking core operation off the async executor.
async fn with_network<T, F>(state: &AppState, op: F) -> Result<T, ApiError>
where
    F: FnOnce(&SocialNetwork) -> amity_core::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let network = Arc::clone(&state.network);
    tokio::task::spawn_blocking(move || {
        // Each operation is one transaction; a poisoned lock guards no partial state.
        let guard = network.lock().unwrap_or_else(PoisonError::into_inner);
        op(&*guard).map_err(ApiError::from)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Blocking task failed: {e}")))?
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        name: state.config.instance_name.clone(),
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn create_user(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<UserRequest>,
) -> Result<(StatusCode, Json<UserDto>), ApiError> {
    let user = with_network(&state, move |net| net.create_user(&req.name)).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserDto>>, ApiError> {
    let users = with_network(&state, |net| net.list_users()).await?;
    Ok(Json(users.into_iter().map(UserDto::from).collect()))
}

async fn get_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<UserDto>, ApiError> {
    let user = with_network(&state, move |net| net.get_user(id)).await?;
    Ok(Json(user.into()))
}

async fn rename_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<UserRequest>,
) -> Result<Json<UserDto>, ApiError> {
    let user = with_network(&state, move |net| net.rename_user(id, &req.name)).await?;
    Ok(Json(user.into()))
}

async fn delete_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    with_network(&state, move |net| net.delete_user(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn add_friend(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<FriendRequest>,
) -> Result<Json<StatusMessage>, ApiError> {
    let FriendRequest { user_id, friend_id } = req;
    with_network(&state, move |net| net.add_friend(user_id, friend_id)).await?;
    info!(%user_id, %friend_id, "friend added via API");
    Ok(Json(StatusMessage {
        message: "Friend added",
    }))
}

async fn remove_friend(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<FriendRequest>,
) -> Result<Json<StatusMessage>, ApiError> {
    let FriendRequest { user_id, friend_id } = req;
    with_network(&state, move |net| net.remove_friend(user_id, friend_id)).await?;
    Ok(Json(StatusMessage {
        message: "Friend removed",
    }))
}

async fn list_friends(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<Uuid>,
) -> Result<Json<Vec<UserDto>>, ApiError> {
    let friends = with_network(&state, move |net| net.list_friends(user_id)).await?;
    Ok(Json(friends.into_iter().map(UserDto::from).collect()))
}

async fn are_friends(
    State(state): State<AppState>,
    ApiPath((user_id, friend_id)): ApiPath<(Uuid, Uuid)>,
) -> Result<Json<AreFriendsResponse>, ApiError> {
    with_network(&state, move |net| net.require_friends(user_id, friend_id)).await?;
    Ok(Json(AreFriendsResponse { friends: true }))
}

async fn send_message(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SendMessageRequest>,
) -> Result<Json<MessageDto>, ApiError> {
    let message = with_network(&state, move |net| {
        net.send_message(req.sender_id, req.receiver_id, &req.content)
    })
    .await?;
    Ok(Json(message.into()))
}

async fn get_message(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<MessageDto>, ApiError> {
    let message = with_network(&state, move |net| net.get_message(id)).await?;
    Ok(Json(message.into()))
}

async fn messages_between(
    State(state): State<AppState>,
    ApiPath((a, b)): ApiPath<(Uuid, Uuid)>,
) -> Result<Json<Vec<MessageDto>>, ApiError> {
    let messages = with_network(&state, move |net| net.get_messages_between(a, b)).await?;
    Ok(Json(messages.into_iter().map(MessageDto::from).collect()))
}

pub async fn serve(state: AppState, addr: std::net::SocketAddr) -> anyhow::Result<()> {
    let app = build_router(state);

    info!(addr = %addr, "Starting HTTP API server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
