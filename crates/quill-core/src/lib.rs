//! # Quill Core
//!
//! The domain layer of the Quill blog API.
//! This crate contains identifier validation, the blog query builder and the
//! blog service, with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod query;
pub mod services;
pub mod validation;

pub use error::{DomainError, RepoError};
