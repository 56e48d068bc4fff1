//! Ownership checks for mutating operations.
//!
//! A failed check is not an error page: the caller is sent back to the
//! read-only detail view of the post the resource belongs to.

use thiserror::Error;
use uuid::Uuid;

/// The acting user does not own the resource. Carries the post whose
/// detail view the caller should be redirected to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("resource is owned by another user; redirect to post {post_id}")]
pub struct NotOwner {
    pub post_id: Uuid,
}

/// Verify that `acting_user` authored the resource before an edit or
/// delete. `parent_post` is the resource's own id for a post, or the
/// enclosing post's id for a comment.
pub fn ensure_author(
    resource_author: Uuid,
    acting_user: Uuid,
    parent_post: Uuid,
) -> Result<(), NotOwner> {
    if resource_author == acting_user {
        Ok(())
    } else {
        Err(NotOwner {
            post_id: parent_post,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_passes() {
        let user = Uuid::new_v4();
        assert!(ensure_author(user, user, Uuid::new_v4()).is_ok());
    }

    #[test]
    fn non_owner_is_redirected_to_parent_post() {
        let post_id = Uuid::new_v4();
        let err = ensure_author(Uuid::new_v4(), Uuid::new_v4(), post_id).unwrap_err();
        assert_eq!(err.post_id, post_id);
    }
}
