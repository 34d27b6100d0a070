use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Category entity, referenced by blogs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: ObjectId,
}

impl Category {
    pub fn new(id: ObjectId) -> Self {
        Self { id }
    }
}
