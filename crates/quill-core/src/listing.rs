//! Feed composition.
//!
//! The listing service only decides which filter, scope and ordering a feed
//! uses; slicing and page metadata come from the persistence layer's
//! paginator.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Category, User};
use crate::error::DomainError;
use crate::visibility::{Viewer, VisibilityScope};

/// Listing configuration. The page size is passed in explicitly rather
/// than read from ambient state.
#[derive(Debug, Clone, Copy)]
pub struct ListingConfig {
    pub page_size: u64,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self { page_size: 10 }
    }
}

/// Which posts a feed draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedFilter {
    /// Every post on the platform.
    Home,
    /// Posts assigned to one category.
    Category { category_id: Uuid },
    /// Posts written by one author.
    Author { author_id: Uuid },
}

/// A fully shaped feed request: filter, visibility scope and 1-based page.
/// Ordering is always `pub_date` descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedQuery {
    pub filter: FeedFilter,
    pub scope: VisibilityScope,
    pub page: u64,
}

/// The home feed: publicly visible posts, newest first.
pub fn home_feed(now: DateTime<Utc>, page: u64) -> FeedQuery {
    FeedQuery {
        filter: FeedFilter::Home,
        scope: VisibilityScope::Public { now },
        page,
    }
}

/// A category feed. An unpublished category is NotFound for the whole
/// feed, not an empty page.
pub fn category_feed(
    category: &Category,
    now: DateTime<Utc>,
    page: u64,
) -> Result<FeedQuery, DomainError> {
    if !category.is_published {
        return Err(DomainError::NotFound {
            entity_type: "category",
            id: category.id,
        });
    }

    Ok(FeedQuery {
        filter: FeedFilter::Category {
            category_id: category.id,
        },
        scope: VisibilityScope::Public { now },
        page,
    })
}

/// A profile feed. The profile owner sees all of their posts; everyone
/// else sees the public subset.
pub fn profile_feed(profile: &User, viewer: &Viewer, now: DateTime<Utc>, page: u64) -> FeedQuery {
    FeedQuery {
        filter: FeedFilter::Author {
            author_id: profile.id,
        },
        scope: VisibilityScope::for_profile(viewer, &profile.username, now),
        page,
    }
}

/// One page of feed results with the paginator's metadata.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number actually served (after clamping).
    pub page: u64,
    pub total_pages: u64,
    pub total_items: u64,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            total_pages: self.total_pages,
            total_items: self.total_items,
        }
    }
}

/// Clamp a requested page into the valid range: zero requests serve the
/// first page, past-the-end requests serve the last. An empty result set
/// still counts as one (empty) page.
pub fn clamp_page(requested: u64, total_pages: u64) -> u64 {
    requested.max(1).min(total_pages.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(is_published: bool) -> Category {
        let mut category = Category::new(
            "News".to_string(),
            "All the news".to_string(),
            "news".to_string(),
        );
        category.is_published = is_published;
        category
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

    #[test]
    fn home_feed_is_public() {
        let now = Utc::now();
        let query = home_feed(now, 1);
        assert_eq!(query.filter, FeedFilter::Home);
        assert_eq!(query.scope, VisibilityScope::Public { now });
    }

    #[test]
    fn unpublished_category_feed_is_not_found() {
        let result = category_feed(&category(false), Utc::now(), 1);
        assert!(matches!(
            result,
            Err(DomainError::NotFound {
                entity_type: "category",
                ..
            })
        ));
    }

    #[test]
    fn published_category_feed_filters_by_category() {
        let category = category(true);
        let query = category_feed(&category, Utc::now(), 3).unwrap();
        assert_eq!(
            query.filter,
            FeedFilter::Category {
                category_id: category.id
            }
        );
        assert_eq!(query.page, 3);
    }

    #[test]
    fn own_profile_feed_is_unfiltered() {
        let alice = user("alice");
        let viewer = Viewer::User {
            username: "alice".to_string(),
        };
        let query = profile_feed(&alice, &viewer, Utc::now(), 1);
        assert_eq!(query.scope, VisibilityScope::All);
    }

    #[test]
    fn foreign_profile_feed_is_public() {
        let now = Utc::now();
        let alice = user("alice");
        let query = profile_feed(&alice, &Viewer::Anonymous, now, 1);
        assert_eq!(query.scope, VisibilityScope::Public { now });
        assert_eq!(
            query.filter,
            FeedFilter::Author {
                author_id: alice.id
            }
        );
    }

    #[test]
    fn page_clamping() {
        assert_eq!(clamp_page(0, 5), 1);
        assert_eq!(clamp_page(3, 5), 3);
        assert_eq!(clamp_page(9, 5), 5);
        assert_eq!(clamp_page(1, 0), 1);
    }

    #[test]
    fn page_metadata() {
        let page = Page {
            items: vec![1, 2, 3],
            page: 2,
            total_pages: 3,
            total_items: 25,
        };
        assert!(page.has_next());
        assert!(page.has_previous());

        let last = Page {
            items: vec![1],
            page: 3,
            total_pages: 3,
            total_items: 25,
        };
        assert!(!last.has_next());
    }
}
