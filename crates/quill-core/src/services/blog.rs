use std::sync::Arc;

use bson::oid::ObjectId;

use crate::domain::{Blog, NewBlog};
use crate::error::DomainError;
use crate::ports::{BlogRepository, CategoryRepository, UserRepository};
use crate::query::{BlogQuery, Pagination};
use crate::validation::BlogOwner;

/// Blog operations scoped to an existing user and category.
///
/// Identifiers reaching this service are already syntactically valid; the
/// service only checks that the referenced entities exist.
#[derive(Clone)]
pub struct BlogService {
    users: Arc<dyn UserRepository>,
    categories: Arc<dyn CategoryRepository>,
    blogs: Arc<dyn BlogRepository>,
}

impl BlogService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        categories: Arc<dyn CategoryRepository>,
        blogs: Arc<dyn BlogRepository>,
    ) -> Self {
        Self {
            users,
            categories,
            blogs,
        }
    }

    /// The user is checked before the category.
    pub async fn ensure_references(&self, owner: &BlogOwner) -> Result<(), DomainError> {
        if self.users.find_by_id(owner.user).await?.is_none() {
            tracing::debug!(user = %owner.user, "Referenced user does not exist");
            return Err(DomainError::not_found("User not found"));
        }
        if self.categories.find_by_id(owner.category).await?.is_none() {
            tracing::debug!(category = %owner.category, "Referenced category does not exist");
            return Err(DomainError::not_found("Category not found"));
        }
        Ok(())
    }

    pub async fn list(&self, query: &BlogQuery) -> Result<Vec<Blog>, DomainError> {
        let owner = BlogOwner {
            user: query.user(),
            category: query.category(),
        };
        self.ensure_references(&owner).await?;

        let blogs = self.blogs.find_matching(query).await?;
        tracing::debug!(count = blogs.len(), "Fetched blogs");
        Ok(blogs)
    }

    pub async fn create(&self, blog: NewBlog) -> Result<Blog, DomainError> {
        let owner = BlogOwner {
            user: blog.user,
            category: blog.category,
        };
        self.ensure_references(&owner).await?;

        let created = self.blogs.insert(blog).await?;
        tracing::info!(blog = %created.id, "Blog created");
        Ok(created)
    }

    /// A blog that exists but belongs to another user or category is reported
    /// as missing.
    pub async fn find_owned(&self, id: ObjectId, owner: &BlogOwner) -> Result<Blog, DomainError> {
        self.ensure_references(owner).await?;

        let query = BlogQuery::for_owner(*owner)
            .id(id)
            .pagination(Pagination::new(1, 1))
            .build();

        self.blogs
            .find_matching(&query)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::not_found("Blog not found"))
    }
}
