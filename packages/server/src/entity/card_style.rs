use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Read-only catalog of visual card styles, seeded on startup.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "card_styles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub name: String,
    pub description: String,
}

impl ActiveModelBehavior for ActiveModel {}
