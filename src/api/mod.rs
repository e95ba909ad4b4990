mod favorites;
mod friends;
mod posts;
mod remixes;
mod users;

use crate::config::AppConfig;
use crate::database::models::UserRecord;
use crate::database::Database;
use crate::error::ServiceError;
use crate::favorites::FavoriteService;
use crate::friends::FriendService;
use crate::identity::UserService;
use crate::posting::PostService;
use crate::remixes::RemixService;
use anyhow::{Context, Result};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Serialize;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub database: Database,
    pub users: UserService,
    pub posts: PostService,
    pub friends: FriendService,
    pub favorites: FavoriteService,
    pub remixes: RemixService,
}

impl AppState {
    pub fn new(config: AppConfig, database: Database) -> Self {
        Self {
            config,
            users: UserService::new(database.clone()),
            posts: PostService::new(database.clone()),
            friends: FriendService::new(database.clone()),
            favorites: FavoriteService::new(database.clone()),
            remixes: RemixService::new(database.clone()),
            database,
        }
    }
}

pub(crate) type ApiResult<T> = Result<Json<T>, ApiError>;

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized(String),
    NotFound(String),
    Conflict(String),
    Internal(anyhow::Error),
}

impl ApiError {
    fn into_response_parts(self) -> (StatusCode, ErrorResponse) {
        match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ErrorResponse { message: msg }),
            ApiError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, ErrorResponse { message: msg })
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorResponse { message: msg }),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, ErrorResponse { message: msg }),
            ApiError::Internal(err) => {
                tracing::error!(error = ?err, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        message: "internal server error".into(),
                    },
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = self.into_response_parts();
        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err)
    }
}

/// The one place engine errors become client-facing responses; the engines
/// themselves never shape HTTP output.
impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidOperation(msg) => ApiError::BadRequest(msg),
            ServiceError::AlreadyFriends
            | ServiceError::DuplicateRequest
            | ServiceError::AlreadyRemix
            | ServiceError::UsernameTaken => ApiError::Conflict(err.to_string()),
            ServiceError::NotFound(msg) => ApiError::NotFound(msg),
            ServiceError::Unauthorized => ApiError::Unauthorized(err.to_string()),
            ServiceError::Internal(err) => ApiError::Internal(err),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    message: String,
}

/// Resolves the caller from a `Authorization: Bearer <token>` header.
pub(crate) fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<UserRecord, ApiError> {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| ApiError::Unauthorized("missing bearer token".into()))?;
    Ok(state.users.authenticate(token)?)
}

async fn health_handler() -> StatusCode {
    StatusCode::OK
}

/// The full dispatch table, built once at startup. Each route maps to a
/// handler that calls exactly one service operation.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/users", post(users::register))
        .route("/users/:username", get(users::get_profile))
        .route("/users/:username/favorites", get(favorites::list_for_user))
        .route("/sessions", post(users::login).delete(users::logout))
        .route(
            "/friends/requests",
            get(friends::list_requests).post(friends::send_request),
        )
        .route("/friends/requests/:username", delete(friends::withdraw_request))
        .route("/friends/requests/:username/accept", post(friends::accept_request))
        .route("/friends/requests/:username/reject", post(friends::reject_request))
        .route("/friends", get(friends::list_friends))
        .route("/friends/:username", delete(friends::remove_friend))
        .route("/posts", post(posts::create_post))
        .route("/posts/:id", get(posts::get_post).delete(posts::delete_post))
        .route("/posts/:id/favorite", post(favorites::toggle_favorite))
        .route("/posts/:id/favorites/count", get(favorites::get_count))
        .route(
            "/posts/:id/remixes",
            get(remixes::list_remixes).post(remixes::create_remix),
        )
        .route("/posts/:id/original", get(remixes::get_original))
        .route("/trending/favorites", get(favorites::trending))
        .route("/trending/remixes", get(remixes::trending))
        .layer(cors)
        .with_state(state)
}

pub async fn serve_http(config: AppConfig, database: Database) -> Result<()> {
    let api_port = config.api_port;
    let state = AppState::new(config, database);
    let router = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], api_port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind API listener on {addr}"))?;
    tracing::info!(%addr, "REST API listening");
    axum::serve(listener, router)
        .await
        .context("API server terminated")
}
