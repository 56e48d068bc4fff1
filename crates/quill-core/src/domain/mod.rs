//! Domain entities.

mod category;
mod comment;
mod location;
mod post;
mod user;

pub use category::Category;
pub use comment::Comment;
pub use location::Location;
pub use post::{Post, PostDraft, PostPreview};
pub use user::User;
