//! MongoDB repository implementations.

use async_trait::async_trait;
use futures::TryStreamExt;
use serde::{Deserialize, Serialize};

use quill_core::domain::{Blog, Category, NewBlog, ObjectId, User};
use quill_core::error::RepoError;
use quill_core::ports::{BlogRepository, CategoryRepository, UserRepository};
use quill_core::query::BlogQuery;

use super::mongo_base::MongoBaseRepository;
use super::mongo_filter::{blog_filter, blog_sort};

pub const USERS: &str = "users";
pub const CATEGORIES: &str = "categories";
pub const BLOGS: &str = "blogs";

/// Only the identity of a user document is read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
}

impl From<UserDocument> for User {
    fn from(doc: UserDocument) -> Self {
        User::new(doc.id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
}

impl From<CategoryDocument> for Category {
    fn from(doc: CategoryDocument) -> Self {
        Category::new(doc.id)
    }
}

/// Stored shape of a blog, field names as written by the original ODM schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub user: ObjectId,
    pub category: ObjectId,
    pub created_at: bson::DateTime,
}

impl BlogDocument {
    fn from_new(blog: NewBlog) -> Self {
        Self {
            id: ObjectId::new(),
            title: blog.title,
            description: blog.description,
            user: blog.user,
            category: blog.category,
            created_at: bson::DateTime::now(),
        }
    }
}

impl From<BlogDocument> for Blog {
    fn from(doc: BlogDocument) -> Self {
        Self {
            id: doc.id,
            title: doc.title,
            description: doc.description,
            user: doc.user,
            category: doc.category,
            created_at: doc.created_at.to_chrono(),
        }
    }
}

/// MongoDB user repository.
pub type MongoUserRepository = MongoBaseRepository<UserDocument>;

/// MongoDB category repository.
pub type MongoCategoryRepository = MongoBaseRepository<CategoryDocument>;

/// MongoDB blog repository.
pub type MongoBlogRepository = MongoBaseRepository<BlogDocument>;

impl UserRepository for MongoUserRepository {}

impl CategoryRepository for MongoCategoryRepository {}

#[async_trait]
impl BlogRepository for MongoBlogRepository {
    #[tracing::instrument(name = "Find matching blogs in MongoDB", skip(self))]
    async fn find_matching(&self, query: &BlogQuery) -> Result<Vec<Blog>, RepoError> {
        let page = query.pagination();
        let limit = i64::try_from(page.limit()).unwrap_or(i64::MAX);

        let cursor = self
            .collection()
            .await?
            .find(blog_filter(query))
            .sort(blog_sort())
            .skip(page.skip())
            .limit(limit)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        let documents: Vec<BlogDocument> = cursor
            .try_collect()
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(documents.into_iter().map(Into::into).collect())
    }

    #[tracing::instrument(name = "Insert blog into MongoDB", skip(self, blog), fields(title = %blog.title))]
    async fn insert(&self, blog: NewBlog) -> Result<Blog, RepoError> {
        let document = BlogDocument::from_new(blog);

        self.collection()
            .await?
            .insert_one(&document)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(document.into())
    }
}
