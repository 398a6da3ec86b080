use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::user;
use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::shared::blank_to_none;
use crate::models::user::*;
use crate::state::AppState;

const DUPLICATE_EMAIL: &str = "User with this email already exists";

#[utoipa::path(
    get,
    path = "/",
    tag = "Users",
    operation_id = "listUsers",
    summary = "List all users",
    responses(
        (status = 200, description = "All users ordered by id", body = Vec<UserResponse>),
    ),
)]
#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserResponse>>, AppError> {
    let users = user::Entity::find()
        .order_by_asc(user::Column::Id)
        .all(&state.db)
        .await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Users",
    operation_id = "createUser",
    summary = "Create a user",
    description = "Creates a user profile. `firstName`, `lastName` and `email` are required; snake_case keys are accepted too.",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 409, description = "Email already registered (CONFLICT)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(email = ?payload.email))]
pub async fn create_user(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    let required = validate_create_user(&payload)?;

    let existing = user::Entity::find()
        .filter(user::Column::Email.eq(required.email.as_str()))
        .count(&state.db)
        .await?;
    if existing > 0 {
        return Err(AppError::Conflict(DUPLICATE_EMAIL.into()));
    }

    let now = chrono::Utc::now();
    let new_user = user::ActiveModel {
        first_name: Set(required.first_name),
        last_name: Set(required.last_name),
        email: Set(required.email),
        phone: Set(blank_to_none(payload.phone)),
        job_title: Set(blank_to_none(payload.job_title)),
        company: Set(blank_to_none(payload.company)),
        website: Set(blank_to_none(payload.website)),
        linkedin: Set(blank_to_none(payload.linkedin)),
        twitter: Set(blank_to_none(payload.twitter)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let model = new_user.insert(&state.db).await.map_err(map_email_conflict)?;
    tracing::info!(user_id = model.id, "User created");

    Ok((StatusCode::CREATED, Json(UserResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/email/{email}",
    tag = "Users",
    operation_id = "getUserByEmail",
    summary = "Look up a user by email",
    params(("email" = String, Path, description = "Email address")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "User not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_user_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<UserResponse>, AppError> {
    let model = user::Entity::find()
        .filter(user::Column::Email.eq(email.trim()))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Users",
    operation_id = "getUser",
    summary = "Get a user by ID",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "User not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<UserResponse>, AppError> {
    let model = find_user(&state.db, id).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Users",
    operation_id = "updateUser",
    summary = "Update a user",
    description = "Partially updates the allow-listed profile fields. Unknown keys are ignored; nullable fields accept `null`.",
    params(("id" = i32, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "No valid fields to update (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "User not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Email already registered (CONFLICT)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(id))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    validate_update_user(&payload)?;

    let txn = state.db.begin().await?;

    let existing = find_user(&txn, id).await?;
    let mut active: user::ActiveModel = existing.into();

    if let Some(ref first_name) = payload.first_name {
        active.first_name = Set(first_name.trim().to_string());
    }
    if let Some(ref last_name) = payload.last_name {
        active.last_name = Set(last_name.trim().to_string());
    }
    if let Some(ref email) = payload.email {
        active.email = Set(email.trim().to_string());
    }
    if let Some(phone) = payload.phone {
        active.phone = Set(blank_to_none(phone));
    }
    if let Some(job_title) = payload.job_title {
        active.job_title = Set(blank_to_none(job_title));
    }
    if let Some(company) = payload.company {
        active.company = Set(blank_to_none(company));
    }
    if let Some(website) = payload.website {
        active.website = Set(blank_to_none(website));
    }
    if let Some(linkedin) = payload.linkedin {
        active.linkedin = Set(blank_to_none(linkedin));
    }
    if let Some(twitter) = payload.twitter {
        active.twitter = Set(blank_to_none(twitter));
    }
    active.updated_at = Set(chrono::Utc::now());

    let model = active.update(&txn).await.map_err(map_email_conflict)?;
    txn.commit().await?;

    Ok(Json(model.into()))
}

pub(crate) async fn find_user<C: ConnectionTrait>(db: &C, id: i32) -> Result<user::Model, AppError> {
    user::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))
}

fn map_email_conflict(e: DbErr) -> AppError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            tracing::debug!("Email uniqueness caught on write");
            AppError::Conflict(DUPLICATE_EMAIL.into())
        }
        _ => AppError::from(e),
    }
}
