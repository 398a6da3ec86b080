use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entity::{card, card_style, user};
use crate::error::AppError;

use super::shared::{double_option, is_falsy, validate_not_blank};

/// Style used when a card is created without one.
pub const DEFAULT_CARD_STYLE: &str = "modern";

#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCardRequest {
    #[schema(example = 1)]
    pub user_id: Option<i32>,
    /// Style name. Defaults to `modern`.
    #[schema(example = "gradient")]
    pub card_style: Option<String>,
    /// Style catalog id; used when `cardStyle` is absent.
    pub card_style_id: Option<i32>,
    #[schema(value_type = Object)]
    pub card_data: Option<Value>,
    pub qr_code_url: Option<String>,
}

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCardRequest {
    pub card_style: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub card_data: Option<Value>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub qr_code_url: Option<Option<String>>,
}

/// Card joined with the owner's identity.
#[derive(Serialize, utoipa::ToSchema)]
pub struct CardResponse {
    #[schema(example = "CARD_1718000000000_k3j9x0q2a")]
    pub card_id: String,
    pub user_id: i32,
    #[schema(example = "modern")]
    pub style_name: String,
    /// Parsed card document. Stored text that is not valid JSON is returned as a string.
    #[schema(value_type = Object)]
    pub card_data: Value,
    pub qr_code_url: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CardStyleResponse {
    pub id: i32,
    #[schema(example = "minimal")]
    pub name: String,
    pub description: String,
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteCardResponse {
    #[schema(example = "Card deleted successfully")]
    pub message: String,
    pub deleted_card_id: String,
}

impl CardResponse {
    pub fn new(card: card::Model, owner: user::Model) -> Self {
        Self {
            card_data: parse_card_data(&card.card_id, card.card_data),
            card_id: card.card_id,
            user_id: card.user_id,
            style_name: card.style_name,
            qr_code_url: card.qr_code_url,
            first_name: owner.first_name,
            last_name: owner.last_name,
            email: owner.email,
            created_at: card.created_at,
            updated_at: card.updated_at,
        }
    }
}

impl From<card_style::Model> for CardStyleResponse {
    fn from(m: card_style::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
        }
    }
}

fn parse_card_data(card_id: &str, raw: String) -> Value {
    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(card_id, error = %e, "Failed to parse card_data JSON");
            Value::String(raw)
        }
    }
}

/// Validated fields of a create request. The style is still unresolved.
pub struct NewCard {
    pub user_id: i32,
    pub card_data: Value,
}

pub fn validate_create_card(req: &CreateCardRequest) -> Result<NewCard, AppError> {
    let card_data = req.card_data.as_ref().filter(|v| !is_falsy(v));
    match (req.user_id, card_data) {
        (Some(user_id), Some(card_data)) if user_id > 0 => Ok(NewCard {
            user_id,
            card_data: card_data.clone(),
        }),
        _ => Err(AppError::Validation(
            "Missing required fields: userId and cardData are required".into(),
        )),
    }
}

pub fn validate_update_card(req: &UpdateCardRequest) -> Result<(), AppError> {
    if *req == UpdateCardRequest::default() {
        return Err(AppError::Validation("No valid fields to update".into()));
    }
    validate_not_blank(req.card_style.as_deref(), "cardStyle")
}
