use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::{
    models::{BlogPage, NewPost, Post, PostUpdate},
    pagination::{ListParams, PageRequest},
    Error, Result,
};

use super::AppState;

pub async fn list_blogs(
    State(state): State<Arc<AppState>>,
    query: std::result::Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<BlogPage>> {
    let Query(pairs) = query.map_err(|rejection| Error::Validation(rejection.body_text()))?;
    let params = ListParams::from_pairs(pairs);
    let request = PageRequest::from_params(&params, state.page_size, state.max_page_size);
    let page = state.posts.list(request).await?;

    Ok(Json(page))
}

pub async fn create_blog(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<NewPost>, JsonRejection>,
) -> Result<(StatusCode, Json<Post>)> {
    let Json(new_post) = payload.map_err(rejected)?;
    let post = state.posts.create(new_post).await?;

    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn get_blog(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Post>> {
    Ok(Json(state.posts.get(&id).await?))
}

pub async fn update_blog(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<PostUpdate>, JsonRejection>,
) -> Result<Json<Post>> {
    let Json(update) = payload.map_err(rejected)?;

    Ok(Json(state.posts.update(&id, update).await?))
}

pub async fn delete_blog(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.posts.delete(&id).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn health() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}

fn rejected(rejection: JsonRejection) -> Error {
    tracing::debug!("Rejected request body: {}", rejection);
    Error::Validation(rejection.body_text())
}
