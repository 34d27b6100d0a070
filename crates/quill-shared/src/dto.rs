//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Query string for `GET /api/blogs`.
///
/// Every field is optional at the wire level; presence and shape are checked
/// by the handler so that failures produce the API's own error messages.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListBlogsQuery {
    pub user_id: Option<String>,
    pub category_id: Option<String>,
    pub keywords: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Query string scoping a blog operation to a user and category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogOwnerQuery {
    pub user_id: Option<String>,
    pub category_id: Option<String>,
}

/// Body of `POST /api/blogs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBlogRequest {
    pub title: String,
    pub description: String,
}

/// A blog as rendered to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub description: String,
    pub user: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

/// `{ "blogs": [...] }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogListResponse {
    pub blogs: Vec<BlogResponse>,
}

/// `{ "message": "...", "blog": {...} }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBlogResponse {
    pub message: String,
    pub blog: BlogResponse,
}
