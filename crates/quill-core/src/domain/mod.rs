//! Domain entities - the core business objects.

mod blog;
mod category;
mod user;

pub use blog::{Blog, NewBlog};
pub use category::Category;
pub use user::User;

/// Store-native identifier shared by every entity.
pub use bson::oid::ObjectId;
