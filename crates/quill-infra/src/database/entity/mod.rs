//! SeaORM entities for the relational backend.
//!
//! Identifiers are stored as the 24 character hex form of an ObjectId so both
//! backends expose the same identifier format.

pub mod blog;
pub mod category;
pub mod user;

use quill_core::domain::ObjectId;
use quill_core::error::RepoError;

pub(crate) fn parse_stored_id(raw: &str) -> Result<ObjectId, RepoError> {
    ObjectId::parse_str(raw)
        .map_err(|e| RepoError::Query(format!("stored identifier {raw:?} is not an ObjectId: {e}")))
}
