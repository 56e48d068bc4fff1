use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Post entity - a blog entry scheduled for publication at `pub_date`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub text: String,
    /// Stored path of an optional attached image.
    pub image: Option<String>,
    /// Scheduled publication time. A post dated in the future is hidden
    /// from everyone but its author until the date passes.
    pub pub_date: DateTime<Utc>,
    pub is_published: bool,
    pub category_id: Option<Uuid>,
    pub location_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// The author-editable fields of a post. The author and the publication
/// flag are never taken from client input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDraft {
    pub title: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub image: Option<String>,
    pub category_id: Option<Uuid>,
    pub location_id: Option<Uuid>,
}

impl Post {
    /// Create a new post authored by `author_id`. New posts start published;
    /// hiding one is an administrative action.
    pub fn new(author_id: Uuid, draft: PostDraft) -> Self {
        Self {
            id: Uuid::new_v4(),
            author_id,
            title: draft.title,
            text: draft.text,
            image: draft.image,
            pub_date: draft.pub_date,
            is_published: true,
            category_id: draft.category_id,
            location_id: draft.location_id,
            created_at: Utc::now(),
        }
    }

    /// Apply an edit, leaving identity, authorship and publication state intact.
    pub fn apply(&mut self, draft: PostDraft) {
        self.title = draft.title;
        self.text = draft.text;
        self.image = draft.image;
        self.pub_date = draft.pub_date;
        self.category_id = draft.category_id;
        self.location_id = draft.location_id;
    }
}

/// A post as it appears in a feed: joined with its author, category and
/// location names and annotated with its total comment count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostPreview {
    pub post: Post,
    pub author_username: String,
    pub category_title: Option<String>,
    pub category_slug: Option<String>,
    pub location_name: Option<String>,
    /// Count of all comments on the post. Comments carry no publication
    /// flag, so the count is unconditional.
    pub comment_count: i64,
}
