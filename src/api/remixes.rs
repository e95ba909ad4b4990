use super::favorites::{TrendingQuery, DEFAULT_TRENDING_DAYS, DEFAULT_TRENDING_LIMIT};
use super::posts::PostView;
use super::{authenticate, ApiResult, AppState};
use crate::database::models::PostId;
use crate::posting::CreatePostInput;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub(crate) struct OriginalResponse {
    original: Option<PostView>,
}

/// Creates a new post and links it as a remix of the addressed post in one
/// request; the response carries the propagated artist credit.
pub(crate) async fn create_remix(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(payload): Json<CreatePostInput>,
) -> ApiResult<PostView> {
    let caller = authenticate(&state, &headers)?;
    let original = PostId(id);
    // Resolving the original up front doubles as the existence check.
    state.posts.get(&original)?;

    let remix = state.posts.create(&caller.id, payload)?;
    state.remixes.create_remix(&original, &remix.id)?;

    let record = state.posts.get(&remix.id)?;
    Ok(Json(PostView::from_record(record)))
}

pub(crate) async fn list_remixes(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<PostView>> {
    let remixes = state.remixes.remixes_of(&PostId(id))?;
    let records = state.posts.get_many(&remixes)?;
    Ok(Json(records.into_iter().map(PostView::from_record).collect()))
}

/// One hop only: the original of a remix of a remix is the middle post.
pub(crate) async fn get_original(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<OriginalResponse> {
    let post = PostId(id);
    state.posts.get(&post)?;
    let original = match state.remixes.original_of(&post)? {
        Some(original_id) => Some(PostView::from_record(state.posts.get(&original_id)?)),
        None => None,
    };
    Ok(Json(OriginalResponse { original }))
}

pub(crate) async fn trending(
    State(state): State<AppState>,
    Query(query): Query<TrendingQuery>,
) -> ApiResult<Vec<PostView>> {
    let days = query.days.unwrap_or(DEFAULT_TRENDING_DAYS);
    let limit = query.limit.unwrap_or(DEFAULT_TRENDING_LIMIT);

    let candidates: Vec<PostId> = state
        .posts
        .recent(days)?
        .into_iter()
        .map(|record| record.id)
        .collect();
    let top = state.remixes.most_remixed(candidates, limit)?;
    let records = state.posts.get_many(&top)?;
    Ok(Json(records.into_iter().map(PostView::from_record).collect()))
}
