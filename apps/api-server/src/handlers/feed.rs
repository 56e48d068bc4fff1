//! The home feed.

use actix_web::{HttpResponse, web};
use chrono::Utc;

use quill_core::listing;

use crate::middleware::error::AppResult;
use crate::state::AppState;

use super::{PageQuery, page_response};

/// GET /
///
/// Publicly visible posts across the whole platform, newest first.
pub async fn home_feed(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let feed = listing::home_feed(Utc::now(), query.page());
    let page = state.posts.feed_page(&feed, state.listing.page_size).await?;

    Ok(HttpResponse::Ok().json(page_response(page)))
}
