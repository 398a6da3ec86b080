#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of item stored inside a space.
///
/// The server uses it to decide whether a file row accompanies the item;
/// clients use it to pick a renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")
)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// Free-form text.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "notes"))]
    Notes,
    /// A link to an external page.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "url"))]
    Url,
    /// An uploaded file.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "upload"))]
    Upload,
}

impl ContentType {
    pub const ALL: &'static [ContentType] = &[Self::Notes, Self::Url, Self::Upload];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Notes => "notes",
            Self::Url => "url",
            Self::Upload => "upload",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle flag of a content item. Soft delete flips it to `Deleted`.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema,
)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")
)]
#[serde(rename_all = "lowercase")]
pub enum ContentStatus {
    #[default]
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "active"))]
    Active,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "deleted"))]
    Deleted,
}

impl ContentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Deleted => "deleted",
        }
    }
}

impl fmt::Display for ContentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error when parsing an unknown content type string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseContentTypeError {
    invalid: String,
}

impl fmt::Display for ParseContentTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid content type '{}'. Valid values: {}",
            self.invalid,
            ContentType::ALL
                .iter()
                .map(|t| t.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

impl std::error::Error for ParseContentTypeError {}

impl FromStr for ContentType {
    type Err = ParseContentTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "notes" => Ok(Self::Notes),
            "url" => Ok(Self::Url),
            "upload" => Ok(Self::Upload),
            _ => Err(ParseContentTypeError {
                invalid: s.to_string(),
            }),
        }
    }
}
