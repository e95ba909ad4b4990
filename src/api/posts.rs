use super::{authenticate, ApiError, ApiResult, AppState};
use crate::database::models::{PostId, PostRecord};
use crate::posting::CreatePostInput;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub(crate) struct PostView {
    pub id: String,
    pub author_id: String,
    pub title: String,
    pub body: String,
    pub original_artist: String,
    pub created_at: String,
}

impl PostView {
    pub(crate) fn from_record(record: PostRecord) -> Self {
        Self {
            id: record.id.0,
            author_id: record.author_id.0,
            title: record.title,
            body: record.body,
            original_artist: record.original_artist,
            created_at: record.created_at,
        }
    }
}

pub(crate) async fn create_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreatePostInput>,
) -> ApiResult<PostView> {
    let caller = authenticate(&state, &headers)?;
    let record = state.posts.create(&caller.id, payload)?;
    Ok(Json(PostView::from_record(record)))
}

pub(crate) async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<PostView> {
    let record = state.posts.get(&PostId(id))?;
    Ok(Json(PostView::from_record(record)))
}

pub(crate) async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let caller = authenticate(&state, &headers)?;
    state.posts.delete(&caller.id, &PostId(id))?;
    Ok(StatusCode::NO_CONTENT)
}
