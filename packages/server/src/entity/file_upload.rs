use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "file_uploads")]
pub struct Model {
    /// `FILE_<millis>_<suffix>`.
    #[sea_orm(primary_key, auto_increment = false)]
    pub file_id: String,

    /// Owner of the space the file was uploaded into.
    pub user_id: i32,

    pub content_id: String,
    #[sea_orm(belongs_to, from = "content_id", to = "content_id", on_delete = "Cascade")]
    pub content: HasOne<super::space_content::Entity>,

    /// Always `space_content` for now.
    pub upload_context: String,
    /// Detected file category (document, code, audio, video, image, other).
    pub upload_type: String,
    pub original_filename: String,
    /// Virtual path, not backed by a filesystem.
    pub storage_path: String,
    pub file_size: i64,
    pub mime_type: String,
    pub file_extension: String,

    /// Raw file bytes.
    pub file_content: Vec<u8>,
    /// SHA-256 of `file_content`, hex encoded.
    pub content_hash: String,

    pub is_active: bool,
    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
