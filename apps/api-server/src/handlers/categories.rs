//! Category feed handler.

use actix_web::{HttpResponse, web};
use chrono::Utc;

use quill_core::listing;
use quill_shared::dto::{CategoryFeedResponse, CategoryResponse};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

use super::{PageQuery, page_response};

/// GET /category/{slug}/
///
/// Public posts in one published category. An unpublished or unknown
/// category is a 404 for the whole feed.
pub async fn category_feed(
    state: web::Data<AppState>,
    slug: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let category = state
        .categories
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound("category not found".to_string()))?;

    let feed = listing::category_feed(&category, Utc::now(), query.page())?;
    let page = state.posts.feed_page(&feed, state.listing.page_size).await?;

    Ok(HttpResponse::Ok().json(CategoryFeedResponse {
        category: CategoryResponse {
            title: category.title,
            description: category.description,
            slug: category.slug,
        },
        page: page_response(page),
    }))
}
