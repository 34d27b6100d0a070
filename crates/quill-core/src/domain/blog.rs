use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Blog entity - a content record owned by a user, tagged with a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blog {
    pub id: ObjectId,
    pub title: String,
    pub description: String,
    pub user: ObjectId,
    pub category: ObjectId,
    pub created_at: DateTime<Utc>,
}

/// Payload for inserting a blog. The store assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBlog {
    pub title: String,
    pub description: String,
    pub user: ObjectId,
    pub category: ObjectId,
}

impl NewBlog {
    pub fn new(
        user: ObjectId,
        category: ObjectId,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            user,
            category,
        }
    }

    /// Materialize the blog with store-assigned identity and timestamp.
    pub fn into_blog(self, id: ObjectId, created_at: DateTime<Utc>) -> Blog {
        Blog {
            id,
            title: self.title,
            description: self.description,
            user: self.user,
            category: self.category,
            created_at,
        }
    }
}
