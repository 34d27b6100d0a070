use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// User entity. Only its identity matters to the blog API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: ObjectId,
}

impl User {
    pub fn new(id: ObjectId) -> Self {
        Self { id }
    }
}
