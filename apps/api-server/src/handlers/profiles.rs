//! Profile handlers: an author's page and self-service profile editing.

use actix_web::{HttpResponse, web};
use chrono::Utc;

use quill_core::listing;
use quill_shared::dto::{ProfileFeedResponse, ProfileUpdateRequest};

use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

use super::{PageQuery, page_response, profile_path, profile_response};

/// GET /profile/{username}/
///
/// The author's posts, newest first. The owner sees every post including
/// hidden and future-dated ones; everyone else sees the public subset.
pub async fn profile_feed(
    state: web::Data<AppState>,
    username: web::Path<String>,
    identity: OptionalIdentity,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let profile = state
        .users
        .find_by_username(&username)
        .await?
        .ok_or_else(|| AppError::NotFound("profile not found".to_string()))?;

    let feed = listing::profile_feed(&profile, &identity.viewer(), Utc::now(), query.page());
    let page = state.posts.feed_page(&feed, state.listing.page_size).await?;

    Ok(HttpResponse::Ok().json(ProfileFeedResponse {
        profile: profile_response(&profile),
        page: page_response(page),
    }))
}

fn validate_update(req: &ProfileUpdateRequest) -> Vec<String> {
    let mut errors = Vec::new();

    if req.username.trim().is_empty() {
        errors.push("username must not be empty".to_string());
    }
    if req.username.len() > 150 {
        errors.push("username must be at most 150 characters".to_string());
    }
    if !req.email.contains('@') {
        errors.push("email is not a valid address".to_string());
    }

    errors
}

/// POST /profile/{username}/edit
///
/// Users may only edit their own profile; anyone else is redirected to
/// the profile's read-only view.
pub async fn edit_profile(
    state: web::Data<AppState>,
    username: web::Path<String>,
    identity: Identity,
    payload: web::Json<ProfileUpdateRequest>,
) -> AppResult<HttpResponse> {
    let username = username.into_inner();
    let payload = payload.into_inner();

    let mut profile = state
        .users
        .find_by_username(&username)
        .await?
        .ok_or_else(|| AppError::NotFound("profile not found".to_string()))?;

    if profile.id != identity.user_id {
        return Err(AppError::OwnershipRedirect(profile_path(&username)));
    }

    let errors = validate_update(&payload);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    if payload.username != profile.username
        && state.users.find_by_username(&payload.username).await?.is_some()
    {
        return Err(AppError::Conflict("username is already taken".to_string()));
    }
    if payload.email != profile.email && state.users.find_by_email(&payload.email).await?.is_some() {
        return Err(AppError::Conflict("email is already registered".to_string()));
    }

    profile.username = payload.username;
    profile.first_name = payload.first_name;
    profile.last_name = payload.last_name;
    profile.email = payload.email;

    let profile = state.users.save(profile).await?;

    Ok(HttpResponse::Ok().json(profile_response(&profile)))
}
