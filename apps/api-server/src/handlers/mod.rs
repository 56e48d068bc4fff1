//! HTTP handlers and route configuration.

mod auth;
mod categories;
mod comments;
mod feed;
mod health;
mod posts;
mod profiles;


use actix_web::web;
use serde::Deserialize;
use uuid::Uuid;

use quill_core::domain::{Comment, PostPreview, User};
use quill_core::listing::Page;
use quill_shared::dto::{CommentResponse, PageResponse, PostResponse, ProfileResponse};

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(feed::home_feed))
        .route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/auth")
                .route("/register", web::post().to(auth::register))
                .route("/login", web::post().to(auth::login)),
        )
        .route("/category/{slug}/", web::get().to(categories::category_feed))
        .route("/posts/create/", web::post().to(posts::create_post))
        .route("/posts/{id}/", web::get().to(posts::post_detail))
        .route("/posts/{id}/edit/", web::post().to(posts::edit_post))
        .route("/posts/{id}/delete/", web::post().to(posts::delete_post))
        .route("/posts/{id}/comment/", web::post().to(comments::add_comment))
        .route(
            "/posts/{post_id}/edit_comment/{comment_id}",
            web::post().to(comments::edit_comment),
        )
        .route(
            "/posts/{post_id}/delete_comment/{comment_id}",
            web::post().to(comments::delete_comment),
        )
        .route("/profile/{username}/", web::get().to(profiles::profile_feed))
        .route("/profile/{username}/edit", web::post().to(profiles::edit_profile));
}

/// `?page=N` query parameter, 1-based; absent means the first page.
#[derive(Debug, Deserialize)]
pub(crate) struct PageQuery {
    pub page: Option<u64>,
}

impl PageQuery {
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1)
    }
}

pub(crate) fn post_detail_path(post_id: Uuid) -> String {
    format!("/posts/{post_id}/")
}

pub(crate) fn profile_path(username: &str) -> String {
    format!("/profile/{username}/")
}

pub(crate) fn post_response(preview: PostPreview) -> PostResponse {
    PostResponse {
        id: preview.post.id,
        title: preview.post.title,
        text: preview.post.text,
        image: preview.post.image,
        pub_date: preview.post.pub_date,
        is_published: preview.post.is_published,
        author_username: preview.author_username,
        category_title: preview.category_title,
        category_slug: preview.category_slug,
        location_name: preview.location_name,
        comment_count: preview.comment_count,
        created_at: preview.post.created_at,
    }
}

pub(crate) fn page_response(page: Page<PostPreview>) -> PageResponse<PostResponse> {
    let has_next = page.has_next();
    let has_previous = page.has_previous();
    let page = page.map(post_response);

    PageResponse {
        items: page.items,
        page: page.page,
        total_pages: page.total_pages,
        total_items: page.total_items,
        has_next,
        has_previous,
    }
}

pub(crate) fn comment_response(comment: Comment) -> CommentResponse {
    CommentResponse {
        id: comment.id,
        post_id: comment.post_id,
        author_id: comment.author_id,
        text: comment.text,
        created_at: comment.created_at,
    }
}

pub(crate) fn profile_response(user: &User) -> ProfileResponse {
    ProfileResponse {
        username: user.username.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        email: user.email.clone(),
    }
}
