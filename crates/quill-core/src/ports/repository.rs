use async_trait::async_trait;
use bson::oid::ObjectId;

use crate::domain::{Blog, Category, NewBlog, User};
use crate::error::RepoError;
use crate::query::BlogQuery;

/// Generic repository trait for identifier lookups.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;
}

/// User repository. Users are only ever checked for existence.
pub trait UserRepository: BaseRepository<User, ObjectId> {}

/// Category repository.
pub trait CategoryRepository: BaseRepository<Category, ObjectId> {}

/// Blog repository.
#[async_trait]
pub trait BlogRepository: BaseRepository<Blog, ObjectId> {
    /// Blogs satisfying `query`, ascending by creation time, paginated.
    async fn find_matching(&self, query: &BlogQuery) -> Result<Vec<Blog>, RepoError>;

    /// Persist a new blog, assigning its id and creation timestamp.
    async fn insert(&self, blog: NewBlog) -> Result<Blog, RepoError>;
}
