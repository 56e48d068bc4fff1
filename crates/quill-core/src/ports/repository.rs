use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Category, Comment, Post, PostPreview, User};
use crate::error::RepoError;
use crate::listing::{FeedQuery, Page};
use crate::visibility::VisibilityScope;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (create or update).
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific lookups.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their unique username (the profile URL identifier).
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;
}

/// Category repository.
#[async_trait]
pub trait CategoryRepository: BaseRepository<Category, Uuid> {
    /// Find a category by its unique slug.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError>;
}

/// Post repository. Feed queries apply the visibility scope, order by
/// `pub_date` descending and attach comment counts; pagination metadata
/// comes from the backing paginator.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// One page of a feed.
    async fn feed_page(
        &self,
        query: &FeedQuery,
        page_size: u64,
    ) -> Result<Page<PostPreview>, RepoError>;

    /// A single post seen through the given scope, annotated like a feed
    /// entry. Returns `None` both when absent and when hidden.
    async fn find_preview(
        &self,
        id: Uuid,
        scope: &VisibilityScope,
    ) -> Result<Option<PostPreview>, RepoError>;
}

/// Comment repository. Deleting a post removes its comments; that cascade
/// belongs to the post side (foreign key or equivalent), not to callers.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Uuid> {
    /// Find a comment by id, but only under the given post. A mismatched
    /// post/comment pairing is absent, not an error.
    async fn find_for_post(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
    ) -> Result<Option<Comment>, RepoError>;

    /// All comments on a post, oldest first.
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError>;
}
