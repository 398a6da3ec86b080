use std::collections::HashMap;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use common::ids::{SPACE_PREFIX, generate_id};
use sea_orm::sea_query::Query as SeaQuery;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{file_upload, space, space_content};
use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::handlers::user::find_user;
use crate::models::space::*;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/root",
    tag = "Spaces",
    operation_id = "listRootSpaces",
    summary = "List root spaces",
    description = "Returns every space without a parent, newest first.",
    responses(
        (status = 200, description = "Root spaces", body = Vec<SpaceResponse>),
    ),
)]
#[instrument(skip(state))]
pub async fn list_root_spaces(
    State(state): State<AppState>,
) -> Result<Json<Vec<SpaceResponse>>, AppError> {
    let spaces = space::Entity::find()
        .filter(space::Column::ParentSpaceId.is_null())
        .order_by_desc(space::Column::CreatedAt)
        .all(&state.db)
        .await?;
    Ok(Json(space_views(&state.db, spaces).await?))
}

#[utoipa::path(
    get,
    path = "/user/{user_id}",
    tag = "Spaces",
    operation_id = "listUserSpaces",
    summary = "List a user's spaces",
    params(("user_id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "Spaces owned by the user, newest first", body = Vec<SpaceResponse>),
    ),
)]
#[instrument(skip(state))]
pub async fn list_user_spaces(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> Result<Json<Vec<SpaceResponse>>, AppError> {
    let spaces = space::Entity::find()
        .filter(space::Column::UserId.eq(user_id))
        .order_by_desc(space::Column::CreatedAt)
        .all(&state.db)
        .await?;
    Ok(Json(space_views(&state.db, spaces).await?))
}

#[utoipa::path(
    get,
    path = "/user/{user_id}/root",
    tag = "Spaces",
    operation_id = "listUserRootSpaces",
    summary = "List a user's root spaces",
    params(("user_id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "Root spaces owned by the user, newest first", body = Vec<SpaceResponse>),
    ),
)]
#[instrument(skip(state))]
pub async fn list_user_root_spaces(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> Result<Json<Vec<SpaceResponse>>, AppError> {
    let spaces = space::Entity::find()
        .filter(space::Column::UserId.eq(user_id))
        .filter(space::Column::ParentSpaceId.is_null())
        .order_by_desc(space::Column::CreatedAt)
        .all(&state.db)
        .await?;
    Ok(Json(space_views(&state.db, spaces).await?))
}

#[utoipa::path(
    get,
    path = "/{space_id}",
    tag = "Spaces",
    operation_id = "getSpace",
    summary = "Get a space",
    params(("space_id" = String, Path, description = "Space ID")),
    responses(
        (status = 200, description = "Space with parent name and child count", body = SpaceResponse),
        (status = 404, description = "Space not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_space(
    State(state): State<AppState>,
    Path(space_id): Path<String>,
) -> Result<Json<SpaceResponse>, AppError> {
    let model = find_space(&state.db, &space_id).await?;
    let mut views = space_views(&state.db, vec![model]).await?;
    views
        .pop()
        .map(Json)
        .ok_or_else(|| AppError::Internal("Space view lost its row".into()))
}

#[utoipa::path(
    get,
    path = "/{space_id}/children",
    tag = "Spaces",
    operation_id = "listChildSpaces",
    summary = "List the direct children of a space",
    params(("space_id" = String, Path, description = "Parent space ID")),
    responses(
        (status = 200, description = "Child spaces, newest first", body = Vec<SpaceResponse>),
    ),
)]
#[instrument(skip(state))]
pub async fn list_child_spaces(
    State(state): State<AppState>,
    Path(space_id): Path<String>,
) -> Result<Json<Vec<SpaceResponse>>, AppError> {
    let spaces = space::Entity::find()
        .filter(space::Column::ParentSpaceId.eq(space_id))
        .order_by_desc(space::Column::CreatedAt)
        .all(&state.db)
        .await?;
    Ok(Json(space_views(&state.db, spaces).await?))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Spaces",
    operation_id = "createSpace",
    summary = "Create a space",
    description = "Creates a root space, or a child space when `parentId` names an existing space.",
    request_body = CreateSpaceRequest,
    responses(
        (status = 201, description = "Space created", body = SpaceResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "User or parent space not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(name = ?payload.name, parent = ?payload.parent_id))]
pub async fn create_space(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateSpaceRequest>,
) -> Result<impl IntoResponse, AppError> {
    let new_space = validate_create_space(&payload)?;

    let owner = find_user(&state.db, new_space.user_id).await?;
    let parent = match new_space.parent_id.as_deref() {
        Some(parent_id) => Some(
            space::Entity::find_by_id(parent_id)
                .one(&state.db)
                .await?
                .ok_or_else(|| AppError::NotFound("Parent space not found".into()))?,
        ),
        None => None,
    };

    let now = chrono::Utc::now();
    let model = space::ActiveModel {
        space_id: Set(generate_id(SPACE_PREFIX)),
        name: Set(new_space.name),
        description: Set(new_space.description),
        color: Set(new_space.color),
        user_id: Set(owner.id),
        parent_space_id: Set(parent.as_ref().map(|p| p.space_id.clone())),
        is_child_space: Set(parent.is_some()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .map_err(|e| map_missing_reference(e, parent.is_some()))?;

    tracing::info!(space_id = %model.space_id, child = model.is_child_space, "Space created");
    Ok((
        StatusCode::CREATED,
        Json(SpaceResponse::new(model, parent.map(|p| p.name), 0)),
    ))
}

#[utoipa::path(
    put,
    path = "/{space_id}",
    tag = "Spaces",
    operation_id = "updateSpace",
    summary = "Update a space",
    description = "Updates `name`, `description` and `color`. Other keys are ignored.",
    params(("space_id" = String, Path, description = "Space ID")),
    request_body = UpdateSpaceRequest,
    responses(
        (status = 200, description = "Space updated", body = SpaceResponse),
        (status = 400, description = "No valid fields to update (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Space not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn update_space(
    State(state): State<AppState>,
    Path(space_id): Path<String>,
    AppJson(payload): AppJson<UpdateSpaceRequest>,
) -> Result<Json<SpaceResponse>, AppError> {
    validate_update_space(&payload)?;

    let txn = state.db.begin().await?;

    let existing = find_space(&txn, &space_id).await?;
    let mut active: space::ActiveModel = existing.into();

    if let Some(ref name) = payload.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(description) = payload.description {
        active.description = Set(description);
    }
    if let Some(ref color) = payload.color {
        active.color = Set(color.trim().to_string());
    }
    active.updated_at = Set(chrono::Utc::now());

    let model = active.update(&txn).await?;
    let mut views = space_views(&txn, vec![model]).await?;
    txn.commit().await?;

    views
        .pop()
        .map(Json)
        .ok_or_else(|| AppError::Internal("Space view lost its row".into()))
}

#[utoipa::path(
    delete,
    path = "/{space_id}",
    tag = "Spaces",
    operation_id = "deleteSpace",
    summary = "Delete a space and everything under it",
    description = "Deletes the space, all descendant spaces, their content items and uploaded files in one transaction.",
    params(("space_id" = String, Path, description = "Space ID")),
    responses(
        (status = 200, description = "Space deleted", body = DeleteSpaceResponse),
        (status = 404, description = "Space not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn delete_space(
    State(state): State<AppState>,
    Path(space_id): Path<String>,
) -> Result<Json<DeleteSpaceResponse>, AppError> {
    let txn = state.db.begin().await?;

    let root = find_space(&txn, &space_id).await?;
    let doomed = collect_subtree(&txn, root.space_id).await?;

    file_upload::Entity::delete_many()
        .filter(
            file_upload::Column::ContentId.in_subquery(
                SeaQuery::select()
                    .column(space_content::Column::ContentId)
                    .from(space_content::Entity)
                    .and_where(space_content::Column::SpaceId.is_in(doomed.clone()))
                    .to_owned(),
            ),
        )
        .exec(&txn)
        .await?;

    space_content::Entity::delete_many()
        .filter(space_content::Column::SpaceId.is_in(doomed.clone()))
        .exec(&txn)
        .await?;

    let deleted = space::Entity::delete_many()
        .filter(space::Column::SpaceId.is_in(doomed))
        .exec(&txn)
        .await?;

    txn.commit().await?;
    tracing::info!(space_id = %space_id, spaces = deleted.rows_affected, "Space subtree deleted");

    Ok(Json(DeleteSpaceResponse {
        message: "Space deleted successfully".into(),
        deleted_space_id: space_id,
    }))
}

pub(crate) async fn find_space<C: ConnectionTrait>(
    db: &C,
    space_id: &str,
) -> Result<space::Model, AppError> {
    space::Entity::find_by_id(space_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Space not found".into()))
}

/// The given space plus all of its descendants, breadth first.
async fn collect_subtree<C: ConnectionTrait>(db: &C, root: String) -> Result<Vec<String>, DbErr> {
    let mut all = vec![root.clone()];
    let mut frontier = vec![root];

    while !frontier.is_empty() {
        let children: Vec<String> = space::Entity::find()
            .select_only()
            .column(space::Column::SpaceId)
            .filter(space::Column::ParentSpaceId.is_in(frontier))
            .into_tuple()
            .all(db)
            .await?;
        // Guard against parent cycles written outside the API.
        frontier = children.into_iter().filter(|id| !all.contains(id)).collect();
        all.extend(frontier.iter().cloned());
    }

    Ok(all)
}

/// A foreign key failure on insert means the owner or parent vanished
/// after it was looked up.
fn map_missing_reference(e: DbErr, has_parent: bool) -> AppError {
    match e.sql_err() {
        Some(SqlErr::ForeignKeyConstraintViolation(_)) if has_parent => {
            AppError::NotFound("Parent space not found".into())
        }
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
            AppError::NotFound("User not found".into())
        }
        _ => AppError::from(e),
    }
}

/// Attach parent names and direct child counts to a batch of spaces.
async fn space_views<C: ConnectionTrait>(
    db: &C,
    spaces: Vec<space::Model>,
) -> Result<Vec<SpaceResponse>, AppError> {
    if spaces.is_empty() {
        return Ok(Vec::new());
    }

    let parent_ids: Vec<String> = spaces
        .iter()
        .filter_map(|s| s.parent_space_id.clone())
        .collect();
    let parent_names: HashMap<String, String> = if parent_ids.is_empty() {
        HashMap::new()
    } else {
        space::Entity::find()
            .select_only()
            .column(space::Column::SpaceId)
            .column(space::Column::Name)
            .filter(space::Column::SpaceId.is_in(parent_ids))
            .into_tuple::<(String, String)>()
            .all(db)
            .await?
            .into_iter()
            .collect()
    };

    let ids: Vec<String> = spaces.iter().map(|s| s.space_id.clone()).collect();
    let child_counts: HashMap<String, i64> = space::Entity::find()
        .select_only()
        .column(space::Column::ParentSpaceId)
        .column_as(space::Column::SpaceId.count(), "child_count")
        .filter(space::Column::ParentSpaceId.is_in(ids))
        .group_by(space::Column::ParentSpaceId)
        .into_tuple::<(String, i64)>()
        .all(db)
        .await?
        .into_iter()
        .collect();

    Ok(spaces
        .into_iter()
        .map(|s| {
            let parent_name = s
                .parent_space_id
                .as_ref()
                .and_then(|p| parent_names.get(p).cloned());
            let child_count = std::cmp::Ord::max(child_counts.get(&s.space_id).copied().unwrap_or(0), 0) as u64;
            SpaceResponse::new(s, parent_name, child_count)
        })
        .collect())
}
