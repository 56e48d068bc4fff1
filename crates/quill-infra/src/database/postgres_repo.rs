//! PostgreSQL repository implementations.
//!
//! Feed queries mirror the visibility rules in `quill_core::visibility` as
//! SQL conditions: published flag, published-or-absent category, and a
//! `pub_date` cutoff, ordered newest first with comment counts attached.

use async_trait::async_trait;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, FromQueryResult, JoinType, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Select,
};
use uuid::Uuid;

use quill_core::domain::{Category, Comment, Post, PostPreview, User};
use quill_core::error::RepoError;
use quill_core::listing::{clamp_page, FeedFilter, FeedQuery, Page};
use quill_core::ports::{CategoryRepository, CommentRepository, PostRepository, UserRepository};
use quill_core::visibility::VisibilityScope;

use super::entity::category::{self, Entity as CategoryEntity};
use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::location;
use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::PostgresBaseRepository;

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL category repository.
pub type PostgresCategoryRepository = PostgresBaseRepository<CategoryEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(%username, "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(self.db.as_ref())
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(result.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(self.db.as_ref())
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let result = CategoryEntity::find()
            .filter(category::Column::Slug.eq(slug))
            .one(self.db.as_ref())
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(result.map(Into::into))
    }
}

/// Row shape produced by the annotated feed query.
#[derive(Debug, FromQueryResult)]
struct PostPreviewRecord {
    id: Uuid,
    author_id: Uuid,
    title: String,
    text: String,
    image: Option<String>,
    pub_date: DateTimeWithTimeZone,
    is_published: bool,
    category_id: Option<Uuid>,
    location_id: Option<Uuid>,
    created_at: DateTimeWithTimeZone,
    author_username: String,
    category_title: Option<String>,
    category_slug: Option<String>,
    location_name: Option<String>,
    comment_count: i64,
}

impl From<PostPreviewRecord> for PostPreview {
    fn from(record: PostPreviewRecord) -> Self {
        Self {
            post: Post {
                id: record.id,
                author_id: record.author_id,
                title: record.title,
                text: record.text,
                image: record.image,
                pub_date: record.pub_date.into(),
                is_published: record.is_published,
                category_id: record.category_id,
                location_id: record.location_id,
                created_at: record.created_at.into(),
            },
            author_username: record.author_username,
            category_title: record.category_title,
            category_slug: record.category_slug,
            location_name: record.location_name,
            comment_count: record.comment_count,
        }
    }
}

fn scope_condition(scope: &VisibilityScope) -> Condition {
    match scope {
        VisibilityScope::All => Condition::all(),
        VisibilityScope::Public { now } => Condition::all()
            .add(post::Column::IsPublished.eq(true))
            .add(post::Column::PubDate.lte(*now))
            .add(
                // A post without a category bypasses the category clause.
                Condition::any()
                    .add(post::Column::CategoryId.is_null())
                    .add(category::Column::IsPublished.eq(true)),
            ),
    }
}

/// The annotated post query behind every feed and detail lookup.
fn preview_select(scope: &VisibilityScope) -> Select<PostEntity> {
    PostEntity::find()
        .join(JoinType::InnerJoin, post::Relation::Author.def())
        .join(JoinType::LeftJoin, post::Relation::Category.def())
        .join(JoinType::LeftJoin, post::Relation::Location.def())
        .join(JoinType::LeftJoin, post::Relation::Comments.def())
        .select_only()
        .columns([
            post::Column::Id,
            post::Column::AuthorId,
            post::Column::Title,
            post::Column::Text,
            post::Column::Image,
            post::Column::PubDate,
            post::Column::IsPublished,
            post::Column::CategoryId,
            post::Column::LocationId,
            post::Column::CreatedAt,
        ])
        .column_as(user::Column::Username, "author_username")
        .column_as(category::Column::Title, "category_title")
        .column_as(category::Column::Slug, "category_slug")
        .column_as(location::Column::Name, "location_name")
        .column_as(comment::Column::Id.count(), "comment_count")
        .group_by(post::Column::Id)
        .group_by(user::Column::Username)
        .group_by(category::Column::Title)
        .group_by(category::Column::Slug)
        .group_by(location::Column::Name)
        .filter(scope_condition(scope))
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn feed_page(
        &self,
        query: &FeedQuery,
        page_size: u64,
    ) -> Result<Page<PostPreview>, RepoError> {
        let mut select = preview_select(&query.scope).order_by_desc(post::Column::PubDate);

        select = match query.filter {
            FeedFilter::Home => select,
            FeedFilter::Category { category_id } => {
                select.filter(post::Column::CategoryId.eq(category_id))
            }
            FeedFilter::Author { author_id } => {
                select.filter(post::Column::AuthorId.eq(author_id))
            }
        };

        let paginator = select
            .into_model::<PostPreviewRecord>()
            .paginate(self.db.as_ref(), page_size);

        let counts = paginator
            .num_items_and_pages()
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        // An empty feed still serves one (empty) page.
        let total_pages = counts.number_of_pages.max(1);
        let page = clamp_page(query.page, total_pages);

        let records = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(Page {
            items: records.into_iter().map(Into::into).collect(),
            page,
            total_pages,
            total_items: counts.number_of_items,
        })
    }

    async fn find_preview(
        &self,
        id: Uuid,
        scope: &VisibilityScope,
    ) -> Result<Option<PostPreview>, RepoError> {
        let record = preview_select(scope)
            .filter(post::Column::Id.eq(id))
            .into_model::<PostPreviewRecord>()
            .one(self.db.as_ref())
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(record.map(Into::into))
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn find_for_post(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
    ) -> Result<Option<Comment>, RepoError> {
        let result = CommentEntity::find_by_id(comment_id)
            .filter(comment::Column::PostId.eq(post_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(result.map(Into::into))
    }

    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let result = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_asc(comment::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}
