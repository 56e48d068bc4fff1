#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{TimeDelta, Utc};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use uuid::Uuid;

    use quill_core::domain::{Category, Comment, Location, Post, PostDraft, User};
    use quill_core::listing;
    use quill_core::ports::{BaseRepository, CommentRepository, PostRepository};
    use quill_core::visibility::{Viewer, VisibilityScope};

    use crate::database::entity::post;
    use crate::database::memory::{
        InMemoryCommentRepository, InMemoryPostRepository, InMemoryUserRepository, MemoryStore,
    };
    use crate::database::postgres_repo::PostgresPostRepository;

    #[tokio::test]
    async fn test_find_post_by_id() {
        // Create mock database with expected query results
        let post_id = Uuid::new_v4();
        let author_id = Uuid::new_v4();
        let now = chrono::Utc::now();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![post::Model {
                id: post_id,
                author_id,
                title: "Test Post".to_owned(),
                text: "Content".to_owned(),
                image: None,
                pub_date: now.into(),
                is_published: true,
                category_id: None,
                location_id: None,
                created_at: now.into(),
            }]])
            .into_connection();

        let repo = PostgresPostRepository::new(Arc::new(db));

        let result: Option<Post> = repo.find_by_id(post_id).await.unwrap();

        assert!(result.is_some());
        let post = result.unwrap();
        assert_eq!(post.title, "Test Post");
        assert_eq!(post.id, post_id);
    }

    #[tokio::test]
    async fn test_find_preview_absent_is_none() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<post::Model>::new()])
            .into_connection();

        let repo = PostgresPostRepository::new(Arc::new(db));

        let result = repo
            .find_preview(Uuid::new_v4(), &VisibilityScope::All)
            .await
            .unwrap();

        assert!(result.is_none());
    }

    fn draft(pub_date: chrono::DateTime<Utc>, category_id: Option<Uuid>) -> PostDraft {
        PostDraft {
            title: "title".to_string(),
            text: "text".to_string(),
            pub_date,
            image: None,
            category_id,
            location_id: None,
        }
    }

    fn user(username: &str) -> User {
        User::new(
            username.to_string(),
            String::new(),
            String::new(),
            format!("{username}@example.com"),
            "hash".to_string(),
        )
    }

    struct Fixture {
        store: Arc<MemoryStore>,
        users: InMemoryUserRepository,
        posts: InMemoryPostRepository,
        comments: InMemoryCommentRepository,
    }

    fn fixture() -> Fixture {
        let store = MemoryStore::new();
        Fixture {
            users: InMemoryUserRepository::new(store.clone()),
            posts: InMemoryPostRepository::new(store.clone()),
            comments: InMemoryCommentRepository::new(store.clone()),
            store,
        }
    }

    #[tokio::test]
    async fn home_feed_applies_public_predicate() {
        let f = fixture();
        let now = Utc::now();

        let alice = f.users.save(user("alice")).await.unwrap();

        let visible = f
            .posts
            .save(Post::new(alice.id, draft(now - TimeDelta::hours(2), None)))
            .await
            .unwrap();

        let mut unpublished = Post::new(alice.id, draft(now - TimeDelta::hours(1), None));
        unpublished.is_published = false;
        f.posts.save(unpublished).await.unwrap();

        f.posts
            .save(Post::new(alice.id, draft(now + TimeDelta::days(1), None)))
            .await
            .unwrap();

        let query = listing::home_feed(now, 1);
        let page = f.posts.feed_page(&query, 10).await.unwrap();

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].post.id, visible.id);
        assert_eq!(page.items[0].author_username, "alice");
    }

    #[tokio::test]
    async fn unpublished_category_hides_posts_from_home_feed() {
        let f = fixture();
        let now = Utc::now();

        let alice = f.users.save(user("alice")).await.unwrap();

        let mut hidden_category = Category::new(
            "Hidden".to_string(),
            String::new(),
            "hidden".to_string(),
        );
        hidden_category.is_published = false;
        let categories = crate::database::memory::InMemoryCategoryRepository::new(f.store.clone());
        let hidden_category = categories.save(hidden_category).await.unwrap();

        f.posts
            .save(Post::new(
                alice.id,
                draft(now - TimeDelta::hours(1), Some(hidden_category.id)),
            ))
            .await
            .unwrap();

        // A post with no category bypasses the category clause.
        let uncategorized = f
            .posts
            .save(Post::new(alice.id, draft(now - TimeDelta::hours(2), None)))
            .await
            .unwrap();

        let page = f
            .posts
            .feed_page(&listing::home_feed(now, 1), 10)
            .await
            .unwrap();

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].post.id, uncategorized.id);
    }

    #[tokio::test]
    async fn profile_self_view_includes_hidden_posts() {
        let f = fixture();
        let now = Utc::now();

        let alice = f.users.save(user("alice")).await.unwrap();

        let mut hidden = Post::new(alice.id, draft(now - TimeDelta::hours(1), None));
        hidden.is_published = false;
        f.posts.save(hidden).await.unwrap();

        let self_viewer = Viewer::User {
            username: "alice".to_string(),
        };
        let own = listing::profile_feed(&alice, &self_viewer, now, 1);
        let own_page = f.posts.feed_page(&own, 10).await.unwrap();
        assert_eq!(own_page.items.len(), 1);

        let public = listing::profile_feed(&alice, &Viewer::Anonymous, now, 1);
        let public_page = f.posts.feed_page(&public, 10).await.unwrap();
        assert!(public_page.items.is_empty());
    }

    #[tokio::test]
    async fn feed_orders_newest_first_with_comment_counts() {
        let f = fixture();
        let now = Utc::now();

        let alice = f.users.save(user("alice")).await.unwrap();
        let older = f
            .posts
            .save(Post::new(alice.id, draft(now - TimeDelta::days(2), None)))
            .await
            .unwrap();
        let place = Location::new("Reykjavik".to_string());
        f.store.put_location(place.clone()).await;

        let mut newer_draft = draft(now - TimeDelta::days(1), None);
        newer_draft.location_id = Some(place.id);
        let newer = f.posts.save(Post::new(alice.id, newer_draft)).await.unwrap();

        f.comments
            .save(Comment::new(older.id, alice.id, "first".to_string()))
            .await
            .unwrap();
        f.comments
            .save(Comment::new(older.id, alice.id, "second".to_string()))
            .await
            .unwrap();

        let page = f
            .posts
            .feed_page(&listing::home_feed(now, 1), 10)
            .await
            .unwrap();

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].post.id, newer.id);
        assert_eq!(page.items[0].comment_count, 0);
        assert_eq!(page.items[0].location_name.as_deref(), Some("Reykjavik"));
        assert_eq!(page.items[1].post.id, older.id);
        assert_eq!(page.items[1].comment_count, 2);
    }

    #[tokio::test]
    async fn deleting_post_cascades_comments() {
        let f = fixture();
        let now = Utc::now();

        let alice = f.users.save(user("alice")).await.unwrap();
        let post = f
            .posts
            .save(Post::new(alice.id, draft(now, None)))
            .await
            .unwrap();
        let comment = f
            .comments
            .save(Comment::new(post.id, alice.id, "hello".to_string()))
            .await
            .unwrap();

        f.posts.delete(post.id).await.unwrap();

        assert!(f.comments.find_by_id(comment.id).await.unwrap().is_none());
        assert!(f
            .comments
            .list_for_post(post.id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn mismatched_comment_post_pair_is_absent() {
        let f = fixture();
        let now = Utc::now();

        let alice = f.users.save(user("alice")).await.unwrap();
        let first = f
            .posts
            .save(Post::new(alice.id, draft(now, None)))
            .await
            .unwrap();
        let second = f
            .posts
            .save(Post::new(alice.id, draft(now, None)))
            .await
            .unwrap();
        let comment = f
            .comments
            .save(Comment::new(first.id, alice.id, "hello".to_string()))
            .await
            .unwrap();

        assert!(f
            .comments
            .find_for_post(second.id, comment.id)
            .await
            .unwrap()
            .is_none());
        assert!(f
            .comments
            .find_for_post(first.id, comment.id)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn out_of_range_page_clamps_to_last() {
        let f = fixture();
        let now = Utc::now();

        let alice = f.users.save(user("alice")).await.unwrap();
        for i in 0..5 {
            f.posts
                .save(Post::new(
                    alice.id,
                    draft(now - TimeDelta::hours(i), None),
                ))
                .await
                .unwrap();
        }

        let query = listing::home_feed(now, 99);
        let page = f.posts.feed_page(&query, 2).await.unwrap();

        assert_eq!(page.total_items, 5);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.page, 3);
        assert_eq!(page.items.len(), 1);
        assert!(!page.has_next());
        assert!(page.has_previous());
    }

    #[tokio::test]
    async fn find_preview_hides_invisible_post() {
        let f = fixture();
        let now = Utc::now();

        let alice = f.users.save(user("alice")).await.unwrap();
        let mut hidden = Post::new(alice.id, draft(now - TimeDelta::hours(1), None));
        hidden.is_published = false;
        let hidden = f.posts.save(hidden).await.unwrap();

        let public = f
            .posts
            .find_preview(hidden.id, &VisibilityScope::Public { now })
            .await
            .unwrap();
        assert!(public.is_none());

        let all = f
            .posts
            .find_preview(hidden.id, &VisibilityScope::All)
            .await
            .unwrap();
        assert!(all.is_some());
    }
}
