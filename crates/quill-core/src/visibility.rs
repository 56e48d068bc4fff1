//! Content visibility rules.
//!
//! A post is publicly visible iff it is published, its category (when it has
//! one) is published, and its scheduled `pub_date` has passed. The owning
//! author sees all of their own posts on their profile regardless of flags,
//! but gets no special bypass anywhere else.

use chrono::{DateTime, Utc};

use crate::domain::Post;

/// Who is looking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Viewer {
    Anonymous,
    User { username: String },
}

impl Viewer {
    /// The viewer's username, empty for anonymous viewers. Profile self-view
    /// is decided by comparing this against the profile owner's username;
    /// usernames are never empty, so anonymous viewers always fall through
    /// to the public rules.
    pub fn username(&self) -> &str {
        match self {
            Viewer::Anonymous => "",
            Viewer::User { username } => username,
        }
    }

    pub fn is_profile_owner(&self, profile_username: &str) -> bool {
        self.username() == profile_username
    }
}

/// Query-shaping visibility scope handed to the repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityScope {
    /// Only publicly visible posts, evaluated at the given instant.
    Public { now: DateTime<Utc> },
    /// No filtering. Used solely for a profile owner's own feed.
    All,
}

impl VisibilityScope {
    /// Scope for a profile feed: the owner sees everything, anyone else
    /// sees the public subset.
    pub fn for_profile(viewer: &Viewer, profile_username: &str, now: DateTime<Utc>) -> Self {
        if viewer.is_profile_owner(profile_username) {
            VisibilityScope::All
        } else {
            VisibilityScope::Public { now }
        }
    }

    /// Whether a post passes this scope. `category_is_published` is `None`
    /// for posts without a category, which bypasses the category clause.
    pub fn permits(&self, post: &Post, category_is_published: Option<bool>) -> bool {
        match self {
            VisibilityScope::All => true,
            VisibilityScope::Public { now } => {
                post.is_published
                    && category_is_published.unwrap_or(true)
                    && post.pub_date <= *now
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PostDraft;
    use chrono::TimeDelta;
    use uuid::Uuid;

    fn post_at(pub_date: DateTime<Utc>) -> Post {
        Post::new(
            Uuid::new_v4(),
            PostDraft {
                title: "title".to_string(),
                text: "text".to_string(),
                pub_date,
                image: None,
                category_id: None,
                location_id: None,
            },
        )
    }

    #[test]
    fn published_past_post_is_public() {
        let now = Utc::now();
        let post = post_at(now - TimeDelta::hours(1));
        let scope = VisibilityScope::Public { now };

        assert!(scope.permits(&post, None));
        assert!(scope.permits(&post, Some(true)));
    }

    #[test]
    fn unpublished_post_is_hidden() {
        let now = Utc::now();
        let mut post = post_at(now - TimeDelta::hours(1));
        post.is_published = false;

        assert!(!VisibilityScope::Public { now }.permits(&post, None));
        assert!(VisibilityScope::All.permits(&post, None));
    }

    #[test]
    fn future_dated_post_is_hidden_until_due() {
        let now = Utc::now();
        let post = post_at(now + TimeDelta::days(1));

        assert!(!VisibilityScope::Public { now }.permits(&post, None));
        assert!(VisibilityScope::All.permits(&post, None));
    }

    #[test]
    fn unpublished_category_hides_post() {
        let now = Utc::now();
        let post = post_at(now - TimeDelta::hours(1));

        assert!(!VisibilityScope::Public { now }.permits(&post, Some(false)));
    }

    #[test]
    fn missing_category_bypasses_category_clause() {
        let now = Utc::now();
        let post = post_at(now - TimeDelta::hours(1));

        assert!(VisibilityScope::Public { now }.permits(&post, None));
    }

    #[test]
    fn profile_scope_unlocks_only_for_owner() {
        let now = Utc::now();
        let alice = Viewer::User {
            username: "alice".to_string(),
        };

        assert_eq!(
            VisibilityScope::for_profile(&alice, "alice", now),
            VisibilityScope::All
        );
        assert_eq!(
            VisibilityScope::for_profile(&alice, "bob", now),
            VisibilityScope::Public { now }
        );
        assert_eq!(
            VisibilityScope::for_profile(&Viewer::Anonymous, "alice", now),
            VisibilityScope::Public { now }
        );
    }
}
