use std::path::Path;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::{DateTime, Utc};
use common::file_kind::{extension_of, guess_mime};
use common::size::format_file_size;
use common::slug::generate_slug;
use common::{ContentStatus, ContentType, FileCategory};
use rand::seq::IndexedRandom;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::ClientError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
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

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Default, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
}

/// Partial profile update. Unset fields are left alone by the server.
#[derive(Debug, Default, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CardStyle {
    pub id: i32,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Card {
    pub card_id: String,
    pub user_id: i32,
    pub style_name: String,
    /// Whatever the card designer stored; a string when the stored value
    /// was not valid JSON.
    pub card_data: Value,
    pub qr_code_url: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCard {
    pub user_id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_style: Option<String>,
    pub card_data: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qr_code_url: Option<String>,
}

#[derive(Debug, Default, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qr_code_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Space {
    pub space_id: String,
    pub name: String,
    pub description: String,
    pub color: String,
    pub user_id: i32,
    pub parent_space_id: Option<String>,
    pub is_child_space: bool,
    #[serde(default)]
    pub parent_name: Option<String>,
    #[serde(default)]
    pub child_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Space {
    pub fn slug(&self) -> String {
        generate_slug(&self.name)
    }
}

const SPACE_COLORS: &[&str] = &[
    "#e74c3c", "#3498db", "#2ecc71", "#f39c12", "#9b59b6", "#1abc9c", "#e67e22",
];

/// A color from the space palette, picked at random.
pub fn random_space_color() -> &'static str {
    SPACE_COLORS
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or(SPACE_COLORS[0])
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSpace {
    pub name: String,
    pub user_id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct SpaceUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Content {
    pub content_id: String,
    pub space_id: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub data: Value,
    pub status: ContentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Content {
    pub fn data_str(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(Value::as_str)
    }
}

/// Body of `POST /spaces/{id}/content`.
#[derive(Debug, Clone, Serialize)]
pub struct NewContent {
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub data: Value,
}

impl NewContent {
    /// A text note with word and character counts.
    pub fn note(text: &str) -> Self {
        Self {
            content_type: ContentType::Notes,
            data: json!({
                "text": text,
                "wordCount": text.split_whitespace().count(),
                "characterCount": text.chars().count(),
            }),
        }
    }

    /// A link. Unparseable URLs are still stored, flagged as such.
    pub fn link(url: &str) -> Self {
        let data = match Url::parse(url) {
            Ok(parsed) => json!({
                "url": url,
                "domain": parsed.host_str().unwrap_or_default(),
                "protocol": format!("{}:", parsed.scheme()),
                "isSecure": parsed.scheme() == "https",
            }),
            Err(_) => json!({
                "url": url,
                "domain": "Invalid URL",
                "protocol": "unknown",
                "isSecure": false,
            }),
        };
        Self {
            content_type: ContentType::Url,
            data,
        }
    }

    /// An upload built from raw bytes. Fails when the file is over the
    /// size limit for its category.
    pub fn upload(
        file_name: &str,
        bytes: &[u8],
        description: Option<&str>,
    ) -> Result<Self, ClientError> {
        let category = validate_file(file_name, bytes.len() as u64)?;
        let mime = guess_mime(file_name);
        let data_url = format!("data:{mime};base64,{}", STANDARD.encode(bytes));

        let mut data = json!({
            "fileName": file_name,
            "fileSize": bytes.len(),
            "fileType": mime,
            "fileExtension": extension_of(file_name),
            "detectedCategory": category,
            "uploadedAt": Utc::now().to_rfc3339(),
            "fileSizeFormatted": format_file_size(bytes.len() as u64),
            "fileData": data_url,
        });
        if let Some(description) = description {
            data["description"] = json!(description);
        }

        Ok(Self {
            content_type: ContentType::Upload,
            data,
        })
    }

    /// Read a file from disk and build an upload from it.
    pub fn upload_file(path: &Path, description: Option<&str>) -> Result<Self, ClientError> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ClientError::InvalidInput(format!("not a file: {}", path.display())))?;
        let size = std::fs::metadata(path)?.len();
        validate_file(file_name, size)?;
        let bytes = std::fs::read(path)?;
        Self::upload(file_name, &bytes, description)
    }
}

/// Check a file against its category's size ceiling.
pub fn validate_file(file_name: &str, size: u64) -> Result<FileCategory, ClientError> {
    let category = FileCategory::detect(&extension_of(file_name));
    let limit = category.max_size();
    if size > limit {
        return Err(ClientError::InvalidInput(format!(
            "File too large. Maximum size for {category} files is {}MB",
            limit / (1024 * 1024)
        )));
    }
    Ok(category)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentAction {
    pub message: String,
    pub content_id: String,
    pub action: String,
}

/// Acknowledgement returned by the delete endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct Receipt {
    pub message: String,
}
