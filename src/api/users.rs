use super::{ApiError, ApiResult, AppState};
use crate::database::models::UserRecord;
use axum::extract::{Path, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub(crate) struct CredentialsRequest {
    username: String,
    password: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct UserView {
    pub id: String,
    pub username: String,
    pub created_at: String,
}

impl UserView {
    pub(crate) fn from_record(record: UserRecord) -> Self {
        Self {
            id: record.id.0,
            username: record.username,
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct SessionResponse {
    token: String,
    user: UserView,
}

pub(crate) async fn register(
    State(state): State<AppState>,
    Json(payload): Json<CredentialsRequest>,
) -> ApiResult<UserView> {
    let record = state.users.register(&payload.username, &payload.password)?;
    Ok(Json(UserView::from_record(record)))
}

pub(crate) async fn login(
    State(state): State<AppState>,
    Json(payload): Json<CredentialsRequest>,
) -> ApiResult<SessionResponse> {
    let session = state.users.login(&payload.username, &payload.password)?;
    let user = state.users.get(&session.user_id)?;
    Ok(Json(SessionResponse {
        token: session.token,
        user: UserView::from_record(user),
    }))
}

pub(crate) async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| ApiError::Unauthorized("missing bearer token".into()))?;
    state.users.logout(token)?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn get_profile(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> ApiResult<UserView> {
    let record = state.users.lookup(&username)?;
    Ok(Json(UserView::from_record(record)))
}
