use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cards")]
pub struct Model {
    /// `CARD_<millis>_<suffix>`.
    #[sea_orm(primary_key, auto_increment = false)]
    pub card_id: String,

    pub user_id: i32,
    #[sea_orm(belongs_to, from = "user_id", to = "id", on_delete = "Cascade")]
    pub user: HasOne<super::user::Entity>,

    /// Name of a `card_styles` row. Checked by the handlers, not the schema.
    pub style_name: String,

    /// Serialized JSON document describing the card face.
    #[sea_orm(column_type = "Text")]
    pub card_data: String,
    pub qr_code_url: Option<String>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
