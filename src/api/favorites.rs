use super::posts::PostView;
use super::{authenticate, ApiError, ApiResult, AppState};
use crate::database::models::PostId;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(crate) struct ToggleResponse {
    favorited: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct CountResponse {
    count: usize,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TrendingQuery {
    pub(crate) days: Option<i64>,
    pub(crate) limit: Option<i64>,
}

pub(crate) const DEFAULT_TRENDING_DAYS: i64 = 7;
pub(crate) const DEFAULT_TRENDING_LIMIT: i64 = 10;

pub(crate) async fn toggle_favorite(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<ToggleResponse> {
    let caller = authenticate(&state, &headers)?;
    let post = PostId(id);
    // The engine treats the reference as opaque; existence is checked here.
    if !state.posts.exists(&post)? {
        return Err(ApiError::NotFound(format!("no post {post}")));
    }
    let favorited = state.favorites.toggle(&caller.id, &post)?;
    Ok(Json(ToggleResponse { favorited }))
}

pub(crate) async fn get_count(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<CountResponse> {
    let count = state.favorites.count_for(&PostId(id))?;
    Ok(Json(CountResponse { count }))
}

pub(crate) async fn list_for_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> ApiResult<Vec<PostView>> {
    let user = state.users.lookup(&username)?;
    let favorites = state.favorites.favorited_by(&user.id)?;
    let records = state.posts.get_many(&favorites)?;
    Ok(Json(records.into_iter().map(PostView::from_record).collect()))
}

pub(crate) async fn trending(
    State(state): State<AppState>,
    Query(query): Query<TrendingQuery>,
) -> ApiResult<Vec<PostView>> {
    let days = query.days.unwrap_or(DEFAULT_TRENDING_DAYS);
    let limit = query.limit.unwrap_or(DEFAULT_TRENDING_LIMIT);

    // Candidates arrive most recent first, so equal favorite counts rank
    // newer posts ahead.
    let candidates: Vec<PostId> = state
        .posts
        .recent(days)?
        .into_iter()
        .map(|record| record.id)
        .collect();
    let top = state.favorites.most_favorited(candidates, limit)?;
    let records = state.posts.get_many(&top)?;
    Ok(Json(records.into_iter().map(PostView::from_record).collect()))
}
