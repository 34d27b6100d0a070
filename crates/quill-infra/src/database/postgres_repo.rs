//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    Select,
};

use quill_core::domain::{Blog, NewBlog};
use quill_core::error::RepoError;
use quill_core::ports::{BlogRepository, CategoryRepository, UserRepository};
use quill_core::query::BlogQuery;

use super::entity::blog::{self, Entity as BlogEntity};
use super::entity::category::Entity as CategoryEntity;
use super::entity::user::Entity as UserEntity;
use super::postgres_base::PostgresBaseRepository;

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL category repository.
pub type PostgresCategoryRepository = PostgresBaseRepository<CategoryEntity>;

/// PostgreSQL blog repository.
pub type PostgresBlogRepository = PostgresBaseRepository<BlogEntity>;

impl UserRepository for PostgresUserRepository {}

impl CategoryRepository for PostgresCategoryRepository {}

/// Escape `%`, `_` and the escape character itself for a LIKE pattern.
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Build the SELECT for a blog query: owner equality ANDed with the optional
/// constraints, ascending by creation time, paginated.
pub(crate) fn blog_select(query: &BlogQuery) -> Select<BlogEntity> {
    let mut condition = Condition::all()
        .add(blog::Column::UserId.eq(query.user().to_hex()))
        .add(blog::Column::CategoryId.eq(query.category().to_hex()));

    if let Some(id) = query.id() {
        condition = condition.add(blog::Column::Id.eq(id.to_hex()));
    }

    if let Some(keywords) = query.keywords() {
        let pattern = format!("%{}%", escape_like(&keywords.to_lowercase()));
        condition = condition.add(
            Condition::any()
                .add(Expr::expr(Func::lower(Expr::col(blog::Column::Title))).like(pattern.as_str()))
                .add(
                    Expr::expr(Func::lower(Expr::col(blog::Column::Description)))
                        .like(pattern.as_str()),
                ),
        );
    }

    let range = query.created();
    if let Some(start) = range.start {
        condition = condition.add(blog::Column::CreatedAt.gte(start));
    }
    if let Some(end) = range.end {
        condition = condition.add(blog::Column::CreatedAt.lte(end));
    }

    let page = query.pagination();
    BlogEntity::find()
        .filter(condition)
        .order_by_asc(blog::Column::CreatedAt)
        .order_by_asc(blog::Column::Id)
        .offset(page.skip())
        .limit(page.limit())
}

#[async_trait]
impl BlogRepository for PostgresBlogRepository {
    #[tracing::instrument(name = "Find matching blogs in PostgreSQL", skip(self))]
    async fn find_matching(&self, query: &BlogQuery) -> Result<Vec<Blog>, RepoError> {
        let db = self.conn.db().await?;
        let models = blog_select(query)
            .all(db.as_ref())
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        models.into_iter().map(Blog::try_from).collect()
    }

    #[tracing::instrument(name = "Insert blog into PostgreSQL", skip(self, blog), fields(title = %blog.title))]
    async fn insert(&self, blog: NewBlog) -> Result<Blog, RepoError> {
        let db = self.conn.db().await?;
        let model = blog::ActiveModel::from(blog)
            .insert(db.as_ref())
            .await
            .map_err(|e| {
                let err_str = e.to_string();
                if err_str.contains("foreign key") || err_str.contains("violates") {
                    RepoError::Constraint(err_str)
                } else {
                    RepoError::Query(err_str)
                }
            })?;

        Blog::try_from(model)
    }
}
