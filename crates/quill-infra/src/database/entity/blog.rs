//! Blog entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use quill_core::domain::{Blog, NewBlog, ObjectId};
use quill_core::error::RepoError;

use super::parse_stored_id;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "blogs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub user_id: String,
    pub category_id: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Category,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain Blog.
impl TryFrom<Model> for Blog {
    type Error = RepoError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_stored_id(&model.id)?,
            title: model.title,
            description: model.description,
            user: parse_stored_id(&model.user_id)?,
            category: parse_stored_id(&model.category_id)?,
            created_at: model.created_at.into(),
        })
    }
}

/// Insertion model with a fresh identifier and the current time.
impl From<NewBlog> for ActiveModel {
    fn from(blog: NewBlog) -> Self {
        Self {
            id: Set(ObjectId::new().to_hex()),
            title: Set(blog.title),
            description: Set(blog.description),
            user_id: Set(blog.user.to_hex()),
            category_id: Set(blog.category.to_hex()),
            created_at: Set(chrono::Utc::now().into()),
        }
    }
}
