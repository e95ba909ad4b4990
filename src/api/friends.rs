//! Friend endpoints. The other party is always addressed by username; the
//! handlers resolve names to identity references before calling the engine.

use super::users::UserView;
use super::{authenticate, ApiError, ApiResult, AppState};
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub(crate) struct SendRequestRequest {
    username: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct FriendRequestView {
    from: String,
    to: String,
    created_at: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct FriendsResponse {
    friends: Vec<UserView>,
}

pub(crate) async fn send_request(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<SendRequestRequest>,
) -> ApiResult<FriendRequestView> {
    let caller = authenticate(&state, &headers)?;
    let recipient = state.users.lookup(&payload.username)?;
    let request = state.friends.send_request(&caller.id, &recipient.id)?;
    Ok(Json(FriendRequestView {
        from: caller.username,
        to: recipient.username,
        created_at: request.created_at,
    }))
}

pub(crate) async fn withdraw_request(
    State(state): State<AppState>,
    Path(to_username): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let caller = authenticate(&state, &headers)?;
    let recipient = state.users.lookup(&to_username)?;
    state.friends.remove_request(&caller.id, &recipient.id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn accept_request(
    State(state): State<AppState>,
    Path(from_username): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let caller = authenticate(&state, &headers)?;
    let sender = state.users.lookup(&from_username)?;
    state.friends.accept_request(&sender.id, &caller.id)?;
    Ok(StatusCode::OK)
}

pub(crate) async fn reject_request(
    State(state): State<AppState>,
    Path(from_username): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let caller = authenticate(&state, &headers)?;
    let sender = state.users.lookup(&from_username)?;
    state.friends.reject_request(&sender.id, &caller.id)?;
    Ok(StatusCode::OK)
}

pub(crate) async fn remove_friend(
    State(state): State<AppState>,
    Path(username): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let caller = authenticate(&state, &headers)?;
    let other = state.users.lookup(&username)?;
    state.friends.remove_friend(&caller.id, &other.id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn list_friends(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<FriendsResponse> {
    let caller = authenticate(&state, &headers)?;
    let mut friends = Vec::new();
    for friend_id in state.friends.friends_of(&caller.id)? {
        friends.push(UserView::from_record(state.users.get(&friend_id)?));
    }
    Ok(Json(FriendsResponse { friends }))
}

pub(crate) async fn list_requests(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Vec<FriendRequestView>> {
    let caller = authenticate(&state, &headers)?;
    let mut views = Vec::new();
    for request in state.friends.requests_for(&caller.id)? {
        let sender = state.users.get(&request.from_user)?;
        views.push(FriendRequestView {
            from: sender.username,
            to: caller.username.clone(),
            created_at: request.created_at,
        });
    }
    Ok(Json(views))
}
