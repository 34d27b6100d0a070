//! Request validation - identifier shape checks that run before any store access.

use bson::oid::ObjectId;

use crate::error::DomainError;

/// Parse a required identifier parameter.
///
/// The value must be present and be a 24 character hex ObjectId. `field` is the
/// wire name of the parameter and ends up in the error message.
pub fn parse_object_id(raw: Option<&str>, field: &str) -> Result<ObjectId, DomainError> {
    raw.filter(|value| !value.is_empty())
        .and_then(|value| ObjectId::parse_str(value).ok())
        .ok_or_else(|| DomainError::invalid_input(format!("Invalid or missing {field}")))
}

/// The user/category pair every blog operation is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlogOwner {
    pub user: ObjectId,
    pub category: ObjectId,
}

impl BlogOwner {
    /// Validate `userId` then `categoryId`. The first failure wins.
    pub fn parse(user_id: Option<&str>, category_id: Option<&str>) -> Result<Self, DomainError> {
        let user = parse_object_id(user_id, "userId")?;
        let category = parse_object_id(category_id, "categoryId")?;
        Ok(Self { user, category })
    }
}
