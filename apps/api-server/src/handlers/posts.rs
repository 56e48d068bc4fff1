//! Post handlers: detail view, creation, editing and deletion.

use actix_web::{HttpResponse, web};
use chrono::Utc;
use uuid::Uuid;

use quill_core::domain::{Post, PostDraft};
use quill_core::guard;
use quill_core::visibility::VisibilityScope;
use quill_shared::dto::{PostDetailResponse, PostPayload};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

use super::{comment_response, post_detail_path, post_response};

fn validate_payload(payload: &PostPayload) -> Vec<String> {
    let mut errors = Vec::new();

    if payload.title.trim().is_empty() {
        errors.push("title must not be empty".to_string());
    }
    if payload.title.len() > 256 {
        errors.push("title must be at most 256 characters".to_string());
    }
    if payload.text.trim().is_empty() {
        errors.push("text must not be empty".to_string());
    }

    errors
}

async fn draft_from(state: &AppState, payload: PostPayload) -> AppResult<PostDraft> {
    let errors = validate_payload(&payload);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    if let Some(category_id) = payload.category_id {
        if state.categories.find_by_id(category_id).await?.is_none() {
            return Err(AppError::Validation(vec![
                "category does not exist".to_string(),
            ]));
        }
    }

    Ok(PostDraft {
        title: payload.title,
        text: payload.text,
        pub_date: payload.pub_date,
        image: payload.image,
        category_id: payload.category_id,
        location_id: payload.location_id,
    })
}

/// GET /posts/{id}/
///
/// The post with all of its comments, oldest first. The public predicate
/// applies to every viewer, authors included: a hidden or not-yet-due post
/// is indistinguishable from a missing one. The owner's special view of
/// their own content lives on the profile feed, not here.
pub async fn post_detail(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = id.into_inner();

    let preview = state
        .posts
        .find_preview(id, &VisibilityScope::Public { now: Utc::now() })
        .await?
        .ok_or_else(|| AppError::NotFound("post not found".to_string()))?;

    let comments = state.comments.list_for_post(id).await?;

    Ok(HttpResponse::Ok().json(PostDetailResponse {
        post: post_response(preview),
        comments: comments.into_iter().map(comment_response).collect(),
    }))
}

/// POST /posts/create/
pub async fn create_post(
    state: web::Data<AppState>,
    identity: Identity,
    payload: web::Json<PostPayload>,
) -> AppResult<HttpResponse> {
    let draft = draft_from(&state, payload.into_inner()).await?;

    let post = state.posts.save(Post::new(identity.user_id, draft)).await?;

    tracing::info!(post_id = %post.id, author = %identity.username, "post created");

    let preview = state
        .posts
        .find_preview(post.id, &VisibilityScope::All)
        .await?
        .ok_or_else(|| AppError::Internal("saved post vanished".to_string()))?;

    Ok(HttpResponse::Created().json(post_response(preview)))
}

/// POST /posts/{id}/edit/
///
/// Only the author may edit; anyone else is redirected to the post's
/// detail view. The edit never changes authorship or publication state.
pub async fn edit_post(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
    identity: Identity,
    payload: web::Json<PostPayload>,
) -> AppResult<HttpResponse> {
    let id = id.into_inner();

    let mut post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("post not found".to_string()))?;

    guard::ensure_author(post.author_id, identity.user_id, post.id)
        .map_err(|e| AppError::OwnershipRedirect(post_detail_path(e.post_id)))?;

    let draft = draft_from(&state, payload.into_inner()).await?;
    post.apply(draft);
    let post = state.posts.save(post).await?;

    let preview = state
        .posts
        .find_preview(post.id, &VisibilityScope::All)
        .await?
        .ok_or_else(|| AppError::Internal("saved post vanished".to_string()))?;

    Ok(HttpResponse::Ok().json(post_response(preview)))
}

/// POST /posts/{id}/delete/
///
/// Deleting a post also removes all of its comments.
pub async fn delete_post(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let id = id.into_inner();

    let post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("post not found".to_string()))?;

    guard::ensure_author(post.author_id, identity.user_id, post.id)
        .map_err(|e| AppError::OwnershipRedirect(post_detail_path(e.post_id)))?;

    state.posts.delete(post.id).await?;

    tracing::info!(post_id = %post.id, author = %identity.username, "post deleted");

    Ok(HttpResponse::NoContent().finish())
}
