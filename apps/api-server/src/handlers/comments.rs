//! Comment handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::domain::Comment;
use quill_core::guard;
use quill_shared::dto::CommentPayload;

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

use super::{comment_response, post_detail_path};

fn validate_text(payload: &CommentPayload) -> AppResult<()> {
    if payload.text.trim().is_empty() {
        return Err(AppError::Validation(vec![
            "comment text must not be empty".to_string(),
        ]));
    }
    Ok(())
}

/// POST /posts/{id}/comment/
///
/// Commenting only requires the post to exist; hidden and future-dated
/// posts accept comments too.
pub async fn add_comment(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
    identity: Identity,
    payload: web::Json<CommentPayload>,
) -> AppResult<HttpResponse> {
    let post_id = id.into_inner();
    let payload = payload.into_inner();
    validate_text(&payload)?;

    if state.posts.find_by_id(post_id).await?.is_none() {
        return Err(AppError::NotFound("post not found".to_string()));
    }

    let comment = state
        .comments
        .save(Comment::new(post_id, identity.user_id, payload.text))
        .await?;

    Ok(HttpResponse::Created().json(comment_response(comment)))
}

/// POST /posts/{post_id}/edit_comment/{comment_id}
///
/// The comment must belong to the post in the path; a mismatched pairing
/// is a 404, checked before ownership. Non-owners are redirected to the
/// post's detail view.
pub async fn edit_comment(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, Uuid)>,
    identity: Identity,
    payload: web::Json<CommentPayload>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let payload = payload.into_inner();
    validate_text(&payload)?;

    let mut comment = state
        .comments
        .find_for_post(post_id, comment_id)
        .await?
        .ok_or_else(|| AppError::NotFound("comment not found".to_string()))?;

    guard::ensure_author(comment.author_id, identity.user_id, post_id)
        .map_err(|e| AppError::OwnershipRedirect(post_detail_path(e.post_id)))?;

    comment.text = payload.text;
    let comment = state.comments.save(comment).await?;

    Ok(HttpResponse::Ok().json(comment_response(comment)))
}

/// POST /posts/{post_id}/delete_comment/{comment_id}
pub async fn delete_comment(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, Uuid)>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();

    let comment = state
        .comments
        .find_for_post(post_id, comment_id)
        .await?
        .ok_or_else(|| AppError::NotFound("comment not found".to_string()))?;

    guard::ensure_author(comment.author_id, identity.user_id, post_id)
        .map_err(|e| AppError::OwnershipRedirect(post_detail_path(e.post_id)))?;

    state.comments.delete(comment.id).await?;

    Ok(HttpResponse::NoContent().finish())
}
