use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::user;
use crate::error::AppError;

use super::shared::{double_option, non_blank, validate_not_blank};

/// Signup payload. Keys are camelCase; snake_case aliases are accepted.
#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[serde(alias = "first_name")]
    pub first_name: Option<String>,
    #[serde(alias = "last_name")]
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(alias = "job_title")]
    pub job_title: Option<String>,
    pub company: Option<String>,
    pub website: Option<String>,
    pub linkedin: Option<String>,
    pub twitter: Option<String>,
}

/// Allow-listed partial update. Keys outside the list are ignored.
#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[serde(alias = "first_name")]
    pub first_name: Option<String>,
    #[serde(alias = "last_name")]
    pub last_name: Option<String>,
    pub email: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub phone: Option<Option<String>>,
    #[serde(default, alias = "job_title", deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub job_title: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub company: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub website: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub linkedin: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub twitter: Option<Option<String>>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct UserResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Ada")]
    pub first_name: String,
    #[schema(example = "Lovelace")]
    pub last_name: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    pub phone: Option<String>,
    pub job_title: Option<String>,
    pub company: Option<String>,
    pub website: Option<String>,
    pub linkedin: Option<String>,
    pub twitter: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<user::Model> for UserResponse {
    fn from(m: user::Model) -> Self {
        Self {
            id: m.id,
            first_name: m.first_name,
            last_name: m.last_name,
            email: m.email,
            phone: m.phone,
            job_title: m.job_title,
            company: m.company,
            website: m.website,
            linkedin: m.linkedin,
            twitter: m.twitter,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Required signup fields after trimming.
pub struct RequiredUserFields {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

pub fn validate_create_user(req: &CreateUserRequest) -> Result<RequiredUserFields, AppError> {
    match (
        non_blank(req.first_name.as_deref()),
        non_blank(req.last_name.as_deref()),
        non_blank(req.email.as_deref()),
    ) {
        (Some(first_name), Some(last_name), Some(email)) => Ok(RequiredUserFields {
            first_name,
            last_name,
            email,
        }),
        _ => Err(AppError::Validation(
            "Missing required fields: firstName, lastName, and email are required".into(),
        )),
    }
}

pub fn validate_update_user(req: &UpdateUserRequest) -> Result<(), AppError> {
    if *req == UpdateUserRequest::default() {
        return Err(AppError::Validation("No valid fields to update".into()));
    }
    validate_not_blank(req.first_name.as_deref(), "firstName")?;
    validate_not_blank(req.last_name.as_deref(), "lastName")?;
    validate_not_blank(req.email.as_deref(), "email")?;
    Ok(())
}
