//! Posts handlers

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::posts::{CreatePostCommand, UpdatePostCommand};

use super::{
    SearchQuery, TagQuery, json_rejection, parse_post_id, query_rejection, required_param,
};
use crate::infra::http::api::error::{ApiError, post_to_api};
use crate::infra::http::api::models::*;
use crate::infra::http::api::state::ApiState;

pub async fn create_post(
    State(state): State<ApiState>,
    payload: Result<Json<PostCreateRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload.map_err(json_rejection)?;

    let command = CreatePostCommand {
        title: payload.title,
        content: payload.content,
        tags: payload.tags,
    };

    let post = state.posts.create(command).await.map_err(post_to_api)?;

    Ok((
        StatusCode::CREATED,
        Json(PostEnvelope {
            post: PostView::from(post),
        }),
    ))
}

pub async fn get_post(
    State(state): State<ApiState>,
    Path(raw_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_post_id(&raw_id)?;

    let post = state.posts.get_and_cache(id).await.map_err(post_to_api)?;

    Ok(Json(PostEnvelope {
        post: PostView::from(post),
    }))
}

pub async fn update_post(
    State(state): State<ApiState>,
    Path(raw_id): Path<String>,
    payload: Result<Json<PostUpdateRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_post_id(&raw_id)?;
    let Json(payload) = payload.map_err(json_rejection)?;

    let command = UpdatePostCommand {
        id,
        title: payload.title,
        content: payload.content,
        tags: payload.tags,
    };

    let post = state.posts.update(command).await.map_err(post_to_api)?;

    Ok(Json(PostEnvelope {
        post: PostView::from(post),
    }))
}

pub async fn search_by_tag(
    State(state): State<ApiState>,
    query: Result<Query<TagQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) = query.map_err(query_rejection)?;
    let tag = required_param(query.tag, "tag")?;

    let posts = state.posts.find_by_tag(&tag).await.map_err(post_to_api)?;

    Ok(Json(posts_envelope(posts)))
}

pub async fn search_posts(
    State(state): State<ApiState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) = query.map_err(query_rejection)?;
    let q = required_param(query.q, "q")?;

    let posts = state.posts.search(&q).await.map_err(post_to_api)?;

    Ok(Json(posts_envelope(posts)))
}
