use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::space;
use crate::error::AppError;

use super::shared::{non_blank, validate_not_blank};

pub const DEFAULT_SPACE_DESCRIPTION: &str = "No description provided";
pub const DEFAULT_SPACE_COLOR: &str = "#3498db";

#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSpaceRequest {
    #[schema(example = "Portfolio")]
    pub name: Option<String>,
    pub description: Option<String>,
    #[schema(example = "#3498db")]
    pub color: Option<String>,
    pub user_id: Option<i32>,
    /// Parent space; omit for a root space.
    #[serde(alias = "parentSpaceId")]
    pub parent_id: Option<String>,
    /// Accepted for compatibility; the stored flag always follows `parentId`.
    pub is_child_space: Option<bool>,
}

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateSpaceRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
}

/// A space together with its hierarchy context.
#[derive(Serialize, utoipa::ToSchema)]
pub struct SpaceResponse {
    #[schema(example = "SPACE_1718000000000_a1b2c3d4e")]
    pub space_id: String,
    pub name: String,
    pub description: String,
    pub color: String,
    pub user_id: i32,
    pub parent_space_id: Option<String>,
    pub is_child_space: bool,
    /// Name of the parent space, when there is one.
    pub parent_name: Option<String>,
    /// Number of direct child spaces.
    pub child_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteSpaceResponse {
    #[schema(example = "Space deleted successfully")]
    pub message: String,
    pub deleted_space_id: String,
}

impl SpaceResponse {
    pub fn new(m: space::Model, parent_name: Option<String>, child_count: u64) -> Self {
        Self {
            space_id: m.space_id,
            name: m.name,
            description: m.description,
            color: m.color,
            user_id: m.user_id,
            parent_space_id: m.parent_space_id,
            is_child_space: m.is_child_space,
            parent_name,
            child_count,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Create request after defaults are applied.
pub struct NewSpace {
    pub name: String,
    pub description: String,
    pub color: String,
    pub user_id: i32,
    pub parent_id: Option<String>,
}

pub fn validate_create_space(req: &CreateSpaceRequest) -> Result<NewSpace, AppError> {
    let (Some(name), Some(user_id)) = (non_blank(req.name.as_deref()), req.user_id) else {
        return Err(AppError::Validation(
            "Missing required fields: name and userId are required".into(),
        ));
    };

    Ok(NewSpace {
        name,
        description: non_blank(req.description.as_deref())
            .unwrap_or_else(|| DEFAULT_SPACE_DESCRIPTION.to_string()),
        color: non_blank(req.color.as_deref()).unwrap_or_else(|| DEFAULT_SPACE_COLOR.to_string()),
        user_id,
        parent_id: non_blank(req.parent_id.as_deref()),
    })
}

pub fn validate_update_space(req: &UpdateSpaceRequest) -> Result<(), AppError> {
    if *req == UpdateSpaceRequest::default() {
        return Err(AppError::Validation("No valid fields to update".into()));
    }
    validate_not_blank(req.name.as_deref(), "name")
}
