use common::{ContentStatus, ContentType};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "space_content")]
pub struct Model {
    /// `CONTENT_<millis>_<suffix>`.
    #[sea_orm(primary_key, auto_increment = false)]
    pub content_id: String,

    pub space_id: String,
    #[sea_orm(belongs_to, from = "space_id", to = "space_id", on_delete = "Cascade")]
    pub space: HasOne<super::space::Entity>,

    #[sea_orm(column_name = "type")]
    pub content_type: ContentType,

    /// JSON text whose shape depends on `content_type`. Legacy rows may hold
    /// invalid JSON; readers must tolerate it.
    #[sea_orm(column_type = "Text")]
    pub data: String,

    pub status: ContentStatus,

    #[sea_orm(has_many)]
    pub files: HasMany<super::file_upload::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
