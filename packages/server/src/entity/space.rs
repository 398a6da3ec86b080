use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "spaces")]
pub struct Model {
    /// `SPACE_<millis>_<suffix>`.
    #[sea_orm(primary_key, auto_increment = false)]
    pub space_id: String,

    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub color: String,

    pub user_id: i32,
    #[sea_orm(belongs_to, from = "user_id", to = "id", on_delete = "Cascade")]
    pub user: HasOne<super::user::Entity>,

    /// NULL for root spaces.
    pub parent_space_id: Option<String>,
    #[sea_orm(
        self_ref,
        relation_enum = "Parent",
        from = "parent_space_id",
        to = "space_id",
        on_delete = "Cascade"
    )]
    pub parent: HasOne<Entity>,
    pub is_child_space: bool,

    #[sea_orm(has_many)]
    pub contents: HasMany<super::space_content::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
