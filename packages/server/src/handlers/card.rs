use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use common::ids::{CARD_PREFIX, generate_id};
use sea_orm::*;
use tracing::instrument;

use crate::entity::{card, card_style, user};
use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::handlers::user::find_user;
use crate::models::shared::blank_to_none;
use crate::models::card::*;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/styles",
    tag = "Cards",
    operation_id = "listCardStyles",
    summary = "List the card style catalog",
    responses(
        (status = 200, description = "Available styles ordered by id", body = Vec<CardStyleResponse>),
    ),
)]
#[instrument(skip(state))]
pub async fn list_styles(
    State(state): State<AppState>,
) -> Result<Json<Vec<CardStyleResponse>>, AppError> {
    let styles = card_style::Entity::find()
        .order_by_asc(card_style::Column::Id)
        .all(&state.db)
        .await?;
    Ok(Json(styles.into_iter().map(CardStyleResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/styles/{name}",
    tag = "Cards",
    operation_id = "getCardStyle",
    summary = "Get a card style by name",
    params(("name" = String, Path, description = "Style name, e.g. `modern`")),
    responses(
        (status = 200, description = "Style found", body = CardStyleResponse),
        (status = 404, description = "Style not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_style(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<CardStyleResponse>, AppError> {
    let style = card_style::Entity::find()
        .filter(card_style::Column::Name.eq(name))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Card style not found".into()))?;
    Ok(Json(style.into()))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Cards",
    operation_id = "createCard",
    summary = "Create a card",
    description = "Creates a card for an existing user. `cardStyle` defaults to `modern`; `cardStyleId` is resolved to a style name when `cardStyle` is absent.",
    request_body = CreateCardRequest,
    responses(
        (status = 201, description = "Card created", body = CardResponse),
        (status = 400, description = "Missing fields or unknown style (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "User not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(user_id = ?payload.user_id))]
pub async fn create_card(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateCardRequest>,
) -> Result<impl IntoResponse, AppError> {
    let new_card = validate_create_card(&payload)?;

    let style_name = resolve_style(&state.db, &payload).await?;
    let owner = find_user(&state.db, new_card.user_id).await?;

    let now = chrono::Utc::now();
    let model = card::ActiveModel {
        card_id: Set(generate_id(CARD_PREFIX)),
        user_id: Set(owner.id),
        style_name: Set(style_name),
        card_data: Set(new_card.card_data.to_string()),
        qr_code_url: Set(blank_to_none(payload.qr_code_url)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    tracing::info!(card_id = %model.card_id, "Card created");
    Ok((StatusCode::CREATED, Json(CardResponse::new(model, owner))))
}

#[utoipa::path(
    get,
    path = "/{card_id}",
    tag = "Cards",
    operation_id = "getCard",
    summary = "Get a card with its owner details",
    params(("card_id" = String, Path, description = "Card ID")),
    responses(
        (status = 200, description = "Card details", body = CardResponse),
        (status = 404, description = "Card not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_card(
    State(state): State<AppState>,
    Path(card_id): Path<String>,
) -> Result<Json<CardResponse>, AppError> {
    let (model, owner) = card::Entity::find_by_id(card_id)
        .find_also_related(user::Entity)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Card not found".into()))?;
    Ok(Json(card_details(model, owner)?))
}

#[utoipa::path(
    get,
    path = "/user/{user_id}",
    tag = "Cards",
    operation_id = "listUserCards",
    summary = "List a user's cards",
    description = "Returns every card owned by the user, newest first. Unknown users yield an empty list.",
    params(("user_id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "Cards, newest first", body = Vec<CardResponse>),
    ),
)]
#[instrument(skip(state))]
pub async fn list_user_cards(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> Result<Json<Vec<CardResponse>>, AppError> {
    let rows = card::Entity::find()
        .filter(card::Column::UserId.eq(user_id))
        .find_also_related(user::Entity)
        .order_by_desc(card::Column::CreatedAt)
        .all(&state.db)
        .await?;

    let cards = rows
        .into_iter()
        .map(|(model, owner)| card_details(model, owner))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(cards))
}

#[utoipa::path(
    put,
    path = "/{card_id}",
    tag = "Cards",
    operation_id = "updateCard",
    summary = "Update a card",
    description = "Partially updates `cardStyle`, `cardData` and `qrCodeUrl`.",
    params(("card_id" = String, Path, description = "Card ID")),
    request_body = UpdateCardRequest,
    responses(
        (status = 200, description = "Card updated", body = CardResponse),
        (status = 400, description = "No valid fields or unknown style (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Card not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn update_card(
    State(state): State<AppState>,
    Path(card_id): Path<String>,
    AppJson(payload): AppJson<UpdateCardRequest>,
) -> Result<Json<CardResponse>, AppError> {
    validate_update_card(&payload)?;

    let txn = state.db.begin().await?;

    let existing = find_card(&txn, &card_id).await?;
    let mut active: card::ActiveModel = existing.into();

    if let Some(ref style) = payload.card_style {
        active.style_name = Set(find_style_by_name(&txn, style.trim()).await?.name);
    }
    if let Some(ref card_data) = payload.card_data {
        active.card_data = Set(card_data.to_string());
    }
    if let Some(qr_code_url) = payload.qr_code_url {
        active.qr_code_url = Set(blank_to_none(qr_code_url));
    }
    active.updated_at = Set(chrono::Utc::now());

    let model = active.update(&txn).await?;
    let owner = find_user(&txn, model.user_id).await?;
    txn.commit().await?;

    Ok(Json(CardResponse::new(model, owner)))
}

#[utoipa::path(
    delete,
    path = "/{card_id}",
    tag = "Cards",
    operation_id = "deleteCard",
    summary = "Delete a card",
    params(("card_id" = String, Path, description = "Card ID")),
    responses(
        (status = 200, description = "Card deleted", body = DeleteCardResponse),
        (status = 404, description = "Card not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn delete_card(
    State(state): State<AppState>,
    Path(card_id): Path<String>,
) -> Result<Json<DeleteCardResponse>, AppError> {
    let result = card::Entity::delete_by_id(card_id.clone())
        .exec(&state.db)
        .await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Card not found".into()));
    }

    Ok(Json(DeleteCardResponse {
        message: "Card deleted successfully".into(),
        deleted_card_id: card_id,
    }))
}

async fn find_card<C: ConnectionTrait>(db: &C, card_id: &str) -> Result<card::Model, AppError> {
    card::Entity::find_by_id(card_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Card not found".into()))
}

async fn find_style_by_name<C: ConnectionTrait>(
    db: &C,
    name: &str,
) -> Result<card_style::Model, AppError> {
    card_style::Entity::find()
        .filter(card_style::Column::Name.eq(name))
        .one(db)
        .await?
        .ok_or_else(|| AppError::Validation(format!("Unknown card style: {name}")))
}

/// Pick the style for a new card: explicit name, then catalog id, then the default.
async fn resolve_style<C: ConnectionTrait>(
    db: &C,
    payload: &CreateCardRequest,
) -> Result<String, AppError> {
    if let Some(name) = payload.card_style.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
        return Ok(find_style_by_name(db, name).await?.name);
    }
    if let Some(style_id) = payload.card_style_id {
        let style = card_style::Entity::find_by_id(style_id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::Validation(format!("Unknown card style id: {style_id}")))?;
        return Ok(style.name);
    }
    Ok(find_style_by_name(db, DEFAULT_CARD_STYLE).await?.name)
}

fn card_details(model: card::Model, owner: Option<user::Model>) -> Result<CardResponse, AppError> {
    let owner = owner.ok_or_else(|| {
        AppError::Internal(format!("Card {} has no owner row", model.card_id))
    })?;
    Ok(CardResponse::new(model, owner))
}
