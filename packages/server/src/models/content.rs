use std::borrow::Cow;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::{DateTime, Utc};
use common::file_kind::{extension_of, guess_mime};
use common::size::format_file_size;
use common::{ContentStatus, ContentType, FileCategory};
use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use sha2::{Digest, Sha256};

use crate::entity::{file_upload, space_content};
use crate::error::AppError;

use super::shared::is_falsy;

/// Listing never returns more items than this.
pub const CONTENT_LIST_LIMIT: u64 = 100;

pub const SOFT_DELETE_ACTION: &str = "soft_delete";

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateContentRequest {
    #[serde(rename = "type")]
    pub content_type: Option<ContentType>,
    /// Shape depends on `type`. Uploads carry `fileName`, optional
    /// `description`, `fileType`, and the file itself as `fileContent`
    /// (or `fileData`) in base64 or data-URL form.
    #[schema(value_type = Object)]
    pub data: Option<Value>,
}

/// Upload fields read out of a content `data` object.
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UploadPayload {
    pub file_name: Option<String>,
    pub description: Option<String>,
    pub file_type: Option<String>,
    #[serde(alias = "fileData")]
    pub file_content: Option<String>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct ContentActionRequest {
    #[schema(example = "soft_delete")]
    pub action: Option<String>,
}

/// Content item as returned by the API. For uploads, file metadata is
/// merged into `data`.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ContentResponse {
    #[schema(example = "CONTENT_1718000000000_0zq8m1c2d")]
    pub content_id: String,
    pub space_id: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    #[schema(value_type = Object)]
    pub data: Value,
    pub status: ContentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContentActionResponse {
    #[schema(example = "Content moved to deleted status")]
    pub message: String,
    pub content_id: String,
    pub action: String,
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteContentResponse {
    #[schema(example = "Content permanently deleted")]
    pub message: String,
    pub deleted_content_id: String,
}

/// File metadata joined onto upload items. Never includes the bytes.
#[derive(Clone, Debug, FromQueryResult)]
pub struct FileMeta {
    pub content_id: String,
    pub original_filename: String,
    pub storage_path: String,
    pub file_size: i64,
    pub mime_type: String,
    pub file_extension: String,
    pub upload_type: String,
}

impl FileMeta {
    /// Metadata for a file about to be stored, without reading the row back.
    pub fn for_prepared(content_id: &str, storage_path: &str, file: &PreparedFile) -> Self {
        Self {
            content_id: content_id.to_string(),
            original_filename: file.original_filename.clone(),
            storage_path: storage_path.to_string(),
            file_size: file.bytes.len() as i64,
            mime_type: file.mime_type.clone(),
            file_extension: file.extension.clone(),
            upload_type: file.category.to_string(),
        }
    }
}

impl From<&file_upload::Model> for FileMeta {
    fn from(m: &file_upload::Model) -> Self {
        Self {
            content_id: m.content_id.clone(),
            original_filename: m.original_filename.clone(),
            storage_path: m.storage_path.clone(),
            file_size: m.file_size,
            mime_type: m.mime_type.clone(),
            file_extension: m.file_extension.clone(),
            upload_type: m.upload_type.clone(),
        }
    }
}

impl From<space_content::Model> for ContentResponse {
    fn from(m: space_content::Model) -> Self {
        Self {
            data: parse_content_data(&m.content_id, &m.data),
            content_id: m.content_id,
            space_id: m.space_id,
            content_type: m.content_type,
            status: m.status,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

impl ContentResponse {
    /// Merge upload metadata into `data`.
    pub fn with_file(self, meta: &FileMeta) -> Self {
        self.merge_data([
            ("fileName", json!(meta.original_filename)),
            ("fileSize", json!(meta.file_size)),
            ("fileType", json!(meta.mime_type)),
            ("fileExtension", json!(meta.file_extension)),
            ("filePath", json!(meta.storage_path)),
            (
                "fileSizeFormatted",
                json!(format_file_size(meta.file_size.max(0) as u64)),
            ),
            ("uploadType", json!(meta.upload_type)),
        ])
    }

    /// Attach the file bytes as a data URL under `fileContent`.
    pub fn with_file_content(self, mime_type: &str, bytes: &[u8]) -> Self {
        let url = to_data_url(mime_type, bytes);
        self.merge_data([("fileContent", Value::String(url))])
    }

    fn merge_data<const N: usize>(mut self, entries: [(&str, Value); N]) -> Self {
        let mut fields = match std::mem::take(&mut self.data) {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        for (key, value) in entries {
            fields.insert(key.to_string(), value);
        }
        self.data = Value::Object(fields);
        self
    }
}

/// Parse stored content JSON. Anything unreadable becomes `{}`.
pub fn parse_content_data(content_id: &str, raw: &str) -> Value {
    if raw.starts_with("[object") {
        tracing::warn!(content_id, data = raw, "Invalid JSON data detected, using empty object");
        return json!({});
    }
    match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(content_id, error = %e, "Failed to parse content data JSON");
            json!({})
        }
    }
}

/// Validated create request.
pub struct NewContent {
    pub content_type: ContentType,
    pub data: Value,
}

pub fn validate_create_content(req: CreateContentRequest) -> Result<NewContent, AppError> {
    match (req.content_type, req.data) {
        (Some(content_type), Some(data)) if !is_falsy(&data) => {
            Ok(NewContent { content_type, data })
        }
        _ => Err(AppError::Validation(
            "Missing required fields: type and data are required".into(),
        )),
    }
}

pub fn parse_upload_payload(data: Value) -> Result<UploadPayload, AppError> {
    serde_json::from_value(data)
        .map_err(|e| AppError::Validation(format!("Invalid upload data: {e}")))
}

/// What gets stored in `space_content.data` for an upload; the file itself
/// lives in its own row.
pub fn upload_summary(payload: &UploadPayload) -> Value {
    json!({
        "fileName": payload.file_name,
        "description": payload.description.clone().unwrap_or_default(),
    })
}

/// File bytes decoded from a base64 string or `data:` URL.
#[derive(Debug, PartialEq)]
pub struct DecodedFile {
    pub bytes: Vec<u8>,
    /// MIME type from the data-URL header, if any.
    pub mime_type: Option<String>,
}

pub fn decode_file_content(raw: &str) -> Result<DecodedFile, AppError> {
    let (mime_type, encoded) = match raw.strip_prefix("data:") {
        Some(rest) => {
            let (header, body) = rest
                .split_once(',')
                .ok_or_else(|| AppError::Validation("Malformed data URL".into()))?;
            let mime = header
                .strip_suffix(";base64")
                .ok_or_else(|| AppError::Validation("Data URL must be base64 encoded".into()))?;
            let mime = mime.split(';').next().unwrap_or_default().trim();
            ((!mime.is_empty()).then(|| mime.to_string()), body)
        }
        None => (None, raw),
    };

    // Line-wrapped base64 is accepted; unwrapped input is decoded in place.
    let encoded: Cow<'_, str> = if encoded.bytes().any(|b| b.is_ascii_whitespace()) {
        Cow::Owned(encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect())
    } else {
        Cow::Borrowed(encoded)
    };
    let bytes = STANDARD
        .decode(encoded.as_bytes())
        .map_err(|e| AppError::Validation(format!("File content is not valid base64: {e}")))?;

    Ok(DecodedFile { bytes, mime_type })
}

/// An upload ready to be written as a `file_uploads` row.
#[derive(Debug)]
pub struct PreparedFile {
    pub original_filename: String,
    pub extension: String,
    pub category: FileCategory,
    pub mime_type: String,
    pub bytes: Vec<u8>,
    /// Hex SHA-256 of `bytes`.
    pub content_hash: String,
}

/// Decode and classify the file carried by an upload payload.
///
/// Returns `None` when the payload carries no file bytes. The encoded text
/// is released as soon as it has been decoded.
pub fn prepare_upload(payload: UploadPayload) -> Result<Option<PreparedFile>, AppError> {
    let UploadPayload {
        file_name,
        file_type,
        file_content,
        ..
    } = payload;
    let Some(raw) = file_content.filter(|c| !c.is_empty()) else {
        return Ok(None);
    };
    let original_filename = file_name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AppError::Validation("fileName is required for uploads".into()))?
        .to_string();

    let decoded = decode_file_content(&raw)?;
    drop(raw);
    let extension = extension_of(&original_filename);
    let category = FileCategory::detect(&extension);

    let size = decoded.bytes.len() as u64;
    if size > category.max_size() {
        return Err(AppError::Validation(format!(
            "File too large: {} exceeds the {} limit for {} files",
            format_file_size(size),
            format_file_size(category.max_size()),
            category
        )));
    }

    let mime_type = decoded
        .mime_type
        .or_else(|| {
            file_type
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| guess_mime(&original_filename));

    Ok(Some(PreparedFile {
        content_hash: hex::encode(Sha256::digest(&decoded.bytes)),
        original_filename,
        extension,
        category,
        mime_type,
        bytes: decoded.bytes,
    }))
}

pub fn to_data_url(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{mime_type};base64,{}", STANDARD.encode(bytes))
}
