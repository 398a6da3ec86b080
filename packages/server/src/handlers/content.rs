use std::collections::HashMap;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use common::ids::{CONTENT_PREFIX, FILE_PREFIX, generate_id};
use common::{ContentStatus, ContentType};
use sea_orm::*;
use tracing::instrument;

use crate::entity::{file_upload, space_content};
use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::handlers::space::find_space;
use crate::models::content::*;
use crate::state::AppState;

const UPLOAD_CONTEXT: &str = "space_content";

#[utoipa::path(
    post,
    path = "/",
    tag = "Space Content",
    operation_id = "addContent",
    summary = "Add a content item to a space",
    description = "Adds a note, link or upload. Upload bytes (`fileContent` or `fileData`, base64 or data URL) are decoded and stored alongside the item in the same transaction.",
    params(("space_id" = String, Path, description = "Space ID")),
    request_body = CreateContentRequest,
    responses(
        (status = 201, description = "Content created", body = ContentResponse),
        (status = 400, description = "Missing fields, bad file content or file too large (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Space not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(content_type = ?payload.content_type))]
pub async fn add_content(
    State(state): State<AppState>,
    Path(space_id): Path<String>,
    AppJson(payload): AppJson<CreateContentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let NewContent { content_type, data } = validate_create_content(payload)?;

    let (stored_data, file) = match content_type {
        ContentType::Upload => {
            let upload = parse_upload_payload(data)?;
            (upload_summary(&upload), prepare_upload(upload)?)
        }
        ContentType::Notes | ContentType::Url => (data, None),
    };

    let txn = state.db.begin().await?;

    let space = find_space(&txn, &space_id).await?;

    let now = chrono::Utc::now();
    let content = space_content::ActiveModel {
        content_id: Set(generate_id(CONTENT_PREFIX)),
        space_id: Set(space.space_id),
        content_type: Set(content_type),
        data: Set(stored_data.to_string()),
        status: Set(ContentStatus::Active),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    // The file row is written without RETURNING so its bytes are not read back.
    let stored_file = match file {
        Some(file) => {
            let file_id = generate_id(FILE_PREFIX);
            let storage_path = format!("/uploads/{file_id}");
            let meta = FileMeta::for_prepared(&content.content_id, &storage_path, &file);
            let row = file_upload::ActiveModel {
                storage_path: Set(storage_path),
                file_id: Set(file_id.clone()),
                user_id: Set(space.user_id),
                content_id: Set(content.content_id.clone()),
                upload_context: Set(UPLOAD_CONTEXT.to_string()),
                upload_type: Set(file.category.to_string()),
                original_filename: Set(file.original_filename),
                file_size: Set(meta.file_size),
                mime_type: Set(file.mime_type),
                file_extension: Set(file.extension),
                file_content: Set(file.bytes),
                content_hash: Set(file.content_hash),
                is_active: Set(true),
                created_at: Set(now),
                ..Default::default()
            };
            file_upload::Entity::insert(row)
                .exec_without_returning(&txn)
                .await?;
            Some((file_id, meta))
        }
        None => None,
    };

    txn.commit().await?;

    let response = ContentResponse::from(content);
    let response = match stored_file {
        Some((file_id, meta)) => {
            tracing::info!(
                content_id = %response.content_id,
                file_id = %file_id,
                size = meta.file_size,
                "Upload stored"
            );
            response.with_file(&meta)
        }
        None => response,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Space Content",
    operation_id = "listContent",
    summary = "List the active content of a space",
    description = "Returns at most 100 active items, newest first. Upload items carry file metadata but never the file bytes.",
    params(("space_id" = String, Path, description = "Space ID")),
    responses(
        (status = 200, description = "Active content items", body = Vec<ContentResponse>),
    ),
)]
#[instrument(skip(state))]
pub async fn list_content(
    State(state): State<AppState>,
    Path(space_id): Path<String>,
) -> Result<Json<Vec<ContentResponse>>, AppError> {
    let items = space_content::Entity::find()
        .filter(space_content::Column::SpaceId.eq(space_id))
        .filter(space_content::Column::Status.eq(ContentStatus::Active))
        .order_by_desc(space_content::Column::CreatedAt)
        .limit(CONTENT_LIST_LIMIT)
        .all(&state.db)
        .await?;

    let upload_ids: Vec<String> = items
        .iter()
        .filter(|c| c.content_type == ContentType::Upload)
        .map(|c| c.content_id.clone())
        .collect();

    let mut metas: HashMap<String, FileMeta> = HashMap::new();
    if !upload_ids.is_empty() {
        let rows = file_upload::Entity::find()
            .select_only()
            .column(file_upload::Column::ContentId)
            .column(file_upload::Column::OriginalFilename)
            .column(file_upload::Column::StoragePath)
            .column(file_upload::Column::FileSize)
            .column(file_upload::Column::MimeType)
            .column(file_upload::Column::FileExtension)
            .column(file_upload::Column::UploadType)
            .filter(file_upload::Column::ContentId.is_in(upload_ids))
            .filter(file_upload::Column::IsActive.eq(true))
            .order_by_asc(file_upload::Column::CreatedAt)
            .into_model::<FileMeta>()
            .all(&state.db)
            .await?;
        for meta in rows {
            metas.entry(meta.content_id.clone()).or_insert(meta);
        }
    }

    let response = items
        .into_iter()
        .map(|item| {
            let meta = metas.get(&item.content_id);
            let response = ContentResponse::from(item);
            match meta {
                Some(meta) => response.with_file(meta),
                None => response,
            }
        })
        .collect();

    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/{content_id}/full",
    tag = "Space Content",
    operation_id = "getFullContent",
    summary = "Get one content item including file bytes",
    description = "Upload items carry `fileContent` as a `data:<mime>;base64,...` URL.",
    params(
        ("space_id" = String, Path, description = "Space ID"),
        ("content_id" = String, Path, description = "Content ID"),
    ),
    responses(
        (status = 200, description = "Content item", body = ContentResponse),
        (status = 404, description = "Content not found or deleted (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_full_content(
    State(state): State<AppState>,
    Path((space_id, content_id)): Path<(String, String)>,
) -> Result<Json<ContentResponse>, AppError> {
    let item = space_content::Entity::find_by_id(content_id)
        .filter(space_content::Column::SpaceId.eq(space_id))
        .filter(space_content::Column::Status.eq(ContentStatus::Active))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Content not found".into()))?;

    let file = if item.content_type == ContentType::Upload {
        file_upload::Entity::find()
            .filter(file_upload::Column::ContentId.eq(item.content_id.as_str()))
            .filter(file_upload::Column::IsActive.eq(true))
            .order_by_asc(file_upload::Column::CreatedAt)
            .one(&state.db)
            .await?
    } else {
        None
    };

    let response = ContentResponse::from(item);
    Ok(Json(match file {
        Some(file) => response
            .with_file(&FileMeta::from(&file))
            .with_file_content(&file.mime_type, &file.file_content),
        None => response,
    }))
}

#[utoipa::path(
    patch,
    path = "/{content_id}",
    tag = "Space Content",
    operation_id = "updateContentStatus",
    summary = "Soft-delete a content item",
    description = "The only supported action is `soft_delete`, which hides the item from listings.",
    params(
        ("space_id" = String, Path, description = "Space ID"),
        ("content_id" = String, Path, description = "Content ID"),
    ),
    request_body = ContentActionRequest,
    responses(
        (status = 200, description = "Action applied", body = ContentActionResponse),
        (status = 400, description = "Unsupported action (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Content not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(action = ?payload.action))]
pub async fn update_content_status(
    State(state): State<AppState>,
    Path((space_id, content_id)): Path<(String, String)>,
    AppJson(payload): AppJson<ContentActionRequest>,
) -> Result<Json<ContentActionResponse>, AppError> {
    if payload.action.as_deref() != Some(SOFT_DELETE_ACTION) {
        return Err(AppError::Validation("Invalid action".into()));
    }

    let existing = find_content(&state.db, &space_id, &content_id).await?;
    let mut active: space_content::ActiveModel = existing.into();
    active.status = Set(ContentStatus::Deleted);
    active.updated_at = Set(chrono::Utc::now());
    active.update(&state.db).await?;

    Ok(Json(ContentActionResponse {
        message: "Content moved to deleted status".into(),
        content_id,
        action: SOFT_DELETE_ACTION.into(),
    }))
}

#[utoipa::path(
    delete,
    path = "/{content_id}",
    tag = "Space Content",
    operation_id = "deleteContent",
    summary = "Permanently delete a content item",
    description = "Removes the item and any stored file.",
    params(
        ("space_id" = String, Path, description = "Space ID"),
        ("content_id" = String, Path, description = "Content ID"),
    ),
    responses(
        (status = 200, description = "Content deleted", body = DeleteContentResponse),
        (status = 404, description = "Content not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn delete_content(
    State(state): State<AppState>,
    Path((space_id, content_id)): Path<(String, String)>,
) -> Result<Json<DeleteContentResponse>, AppError> {
    let txn = state.db.begin().await?;

    let existing = find_content(&txn, &space_id, &content_id).await?;

    file_upload::Entity::delete_many()
        .filter(file_upload::Column::ContentId.eq(existing.content_id.as_str()))
        .exec(&txn)
        .await?;
    space_content::Entity::delete_by_id(existing.content_id)
        .exec(&txn)
        .await?;

    txn.commit().await?;

    Ok(Json(DeleteContentResponse {
        message: "Content permanently deleted".into(),
        deleted_content_id: content_id,
    }))
}

async fn find_content<C: ConnectionTrait>(
    db: &C,
    space_id: &str,
    content_id: &str,
) -> Result<space_content::Model, AppError> {
    space_content::Entity::find_by_id(content_id)
        .filter(space_content::Column::SpaceId.eq(space_id))
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Content not found".into()))
}
