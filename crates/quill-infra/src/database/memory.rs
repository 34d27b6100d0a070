//! In-memory store - used when no database is configured.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use quill_core::domain::{Blog, Category, NewBlog, ObjectId, User};
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, BlogRepository, CategoryRepository, UserRepository};
use quill_core::query::BlogQuery;

/// Users, categories and blogs held in process memory.
///
/// Note: Data is lost on process restart.
#[derive(Default)]
pub struct InMemoryStore {
    users: RwLock<HashSet<ObjectId>>,
    categories: RwLock<HashSet<ObjectId>>,
    blogs: RwLock<Vec<Blog>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_user(&self, user: User) {
        self.users.write().await.insert(user.id);
    }

    pub async fn add_category(&self, category: Category) {
        self.categories.write().await.insert(category.id);
    }
}

#[async_trait]
impl BaseRepository<User, ObjectId> for InMemoryStore {
    async fn find_by_id(&self, id: ObjectId) -> Result<Option<User>, RepoError> {
        Ok(self.users.read().await.get(&id).map(|id| User::new(*id)))
    }
}

impl UserRepository for InMemoryStore {}

#[async_trait]
impl BaseRepository<Category, ObjectId> for InMemoryStore {
    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Category>, RepoError> {
        Ok(self
            .categories
            .read()
            .await
            .get(&id)
            .map(|id| Category::new(*id)))
    }
}

impl CategoryRepository for InMemoryStore {}

#[async_trait]
impl BaseRepository<Blog, ObjectId> for InMemoryStore {
    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Blog>, RepoError> {
        Ok(self.blogs.read().await.iter().find(|b| b.id == id).cloned())
    }
}

#[async_trait]
impl BlogRepository for InMemoryStore {
    async fn find_matching(&self, query: &BlogQuery) -> Result<Vec<Blog>, RepoError> {
        let blogs = self.blogs.read().await;

        let mut matching: Vec<Blog> = blogs.iter().filter(|b| query.matches(b)).cloned().collect();
        matching.sort_by_key(|b| b.created_at);

        let page = query.pagination();
        let skip = usize::try_from(page.skip()).unwrap_or(usize::MAX);
        let limit = usize::try_from(page.limit()).unwrap_or(usize::MAX);
        Ok(matching.into_iter().skip(skip).take(limit).collect())
    }

    async fn insert(&self, blog: NewBlog) -> Result<Blog, RepoError> {
        let blog = blog.into_blog(ObjectId::new(), Utc::now());
        self.blogs.write().await.push(blog.clone());
        Ok(blog)
    }
}
