//! In-memory repository implementations - used when no database is
//! configured, and by tests. Data is lost on process restart.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::{Category, Comment, Location, Post, PostPreview, User};
use quill_core::error::RepoError;
use quill_core::listing::{clamp_page, FeedFilter, FeedQuery, Page};
use quill_core::ports::{
    BaseRepository, CategoryRepository, CommentRepository, PostRepository, UserRepository,
};
use quill_core::visibility::VisibilityScope;

/// Shared backing store for the in-memory repositories.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    categories: RwLock<HashMap<Uuid, Category>>,
    locations: RwLock<HashMap<Uuid, Location>>,
    posts: RwLock<HashMap<Uuid, Post>>,
    comments: RwLock<HashMap<Uuid, Comment>>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Locations have no repository port of their own; they are seeded
    /// directly and only ever read through post previews.
    pub async fn put_location(&self, location: Location) {
        self.locations.write().await.insert(location.id, location);
    }
}

fn category_flag(post: &Post, categories: &HashMap<Uuid, Category>) -> Option<bool> {
    post.category_id
        .and_then(|id| categories.get(&id))
        .map(|category| category.is_published)
}

fn preview(
    post: &Post,
    users: &HashMap<Uuid, User>,
    categories: &HashMap<Uuid, Category>,
    locations: &HashMap<Uuid, Location>,
    comments: &HashMap<Uuid, Comment>,
) -> PostPreview {
    let category = post.category_id.and_then(|id| categories.get(&id));

    PostPreview {
        post: post.clone(),
        author_username: users
            .get(&post.author_id)
            .map(|user| user.username.clone())
            .unwrap_or_default(),
        category_title: category.map(|c| c.title.clone()),
        category_slug: category.map(|c| c.slug.clone()),
        location_name: post
            .location_id
            .and_then(|id| locations.get(&id))
            .map(|location| location.name.clone()),
        comment_count: comments.values().filter(|c| c.post_id == post.id).count() as i64,
    }
}

/// In-memory user repository.
pub struct InMemoryUserRepository {
    store: Arc<MemoryStore>,
}

impl InMemoryUserRepository {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.store.users.read().await.get(&id).cloned())
    }

    async fn save(&self, user: User) -> Result<User, RepoError> {
        self.store.users.write().await.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.store
            .users
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        Ok(self
            .store
            .users
            .read()
            .await
            .values()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        Ok(self
            .store
            .users
            .read()
            .await
            .values()
            .find(|user| user.email == email)
            .cloned())
    }
}

/// In-memory category repository.
pub struct InMemoryCategoryRepository {
    store: Arc<MemoryStore>,
}

impl InMemoryCategoryRepository {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl BaseRepository<Category, Uuid> for InMemoryCategoryRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, RepoError> {
        Ok(self.store.categories.read().await.get(&id).cloned())
    }

    async fn save(&self, category: Category) -> Result<Category, RepoError> {
        self.store
            .categories
            .write()
            .await
            .insert(category.id, category.clone());
        Ok(category)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.store
            .categories
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        Ok(self
            .store
            .categories
            .read()
            .await
            .values()
            .find(|category| category.slug == slug)
            .cloned())
    }
}

/// In-memory post repository.
pub struct InMemoryPostRepository {
    store: Arc<MemoryStore>,
}

impl InMemoryPostRepository {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.store.posts.read().await.get(&id).cloned())
    }

    async fn save(&self, post: Post) -> Result<Post, RepoError> {
        self.store.posts.write().await.insert(post.id, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let removed = self.store.posts.write().await.remove(&id);
        if removed.is_none() {
            return Err(RepoError::NotFound);
        }

        // The post owns its comments; mirror the FK cascade.
        self.store
            .comments
            .write()
            .await
            .retain(|_, comment| comment.post_id != id);

        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn feed_page(
        &self,
        query: &FeedQuery,
        page_size: u64,
    ) -> Result<Page<PostPreview>, RepoError> {
        let page_size = page_size.max(1);

        let posts = self.store.posts.read().await;
        let users = self.store.users.read().await;
        let categories = self.store.categories.read().await;
        let locations = self.store.locations.read().await;
        let comments = self.store.comments.read().await;

        let mut visible: Vec<&Post> = posts
            .values()
            .filter(|post| match query.filter {
                FeedFilter::Home => true,
                FeedFilter::Category { category_id } => post.category_id == Some(category_id),
                FeedFilter::Author { author_id } => post.author_id == author_id,
            })
            .filter(|post| query.scope.permits(post, category_flag(post, &categories)))
            .collect();
        visible.sort_by(|a, b| b.pub_date.cmp(&a.pub_date));

        let total_items = visible.len() as u64;
        let total_pages = total_items.div_ceil(page_size).max(1);
        let page = clamp_page(query.page, total_pages);

        let items = visible
            .into_iter()
            .skip(((page - 1) * page_size) as usize)
            .take(page_size as usize)
            .map(|post| preview(post, &users, &categories, &locations, &comments))
            .collect();

        Ok(Page {
            items,
            page,
            total_pages,
            total_items,
        })
    }

    async fn find_preview(
        &self,
        id: Uuid,
        scope: &VisibilityScope,
    ) -> Result<Option<PostPreview>, RepoError> {
        let posts = self.store.posts.read().await;
        let Some(post) = posts.get(&id) else {
            return Ok(None);
        };

        let users = self.store.users.read().await;
        let categories = self.store.categories.read().await;
        let locations = self.store.locations.read().await;
        let comments = self.store.comments.read().await;

        if !scope.permits(post, category_flag(post, &categories)) {
            return Ok(None);
        }

        Ok(Some(preview(post, &users, &categories, &locations, &comments)))
    }
}

/// In-memory comment repository.
pub struct InMemoryCommentRepository {
    store: Arc<MemoryStore>,
}

impl InMemoryCommentRepository {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl BaseRepository<Comment, Uuid> for InMemoryCommentRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        Ok(self.store.comments.read().await.get(&id).cloned())
    }

    async fn save(&self, comment: Comment) -> Result<Comment, RepoError> {
        self.store
            .comments
            .write()
            .await
            .insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.store
            .comments
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn find_for_post(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
    ) -> Result<Option<Comment>, RepoError> {
        Ok(self
            .store
            .comments
            .read()
            .await
            .get(&comment_id)
            .filter(|comment| comment.post_id == post_id)
            .cloned())
    }

    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let mut comments: Vec<Comment> = self
            .store
            .comments
            .read()
            .await
            .values()
            .filter(|comment| comment.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(comments)
    }
}
