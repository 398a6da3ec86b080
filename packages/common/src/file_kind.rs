use serde::{Deserialize, Serialize};
use std::fmt;

const MB: u64 = 1024 * 1024;

/// Broad category of an uploaded file, detected from its extension.
///
/// Each category carries its own size ceiling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    Document,
    Code,
    Audio,
    Video,
    Image,
    Other,
}

const DOCUMENT_EXTENSIONS: &[&str] = &[
    "pdf", "doc", "docx", "ppt", "pptx", "xls", "xlsx", "txt", "rtf", "md", "odt", "ods", "odp",
];

const CODE_EXTENSIONS: &[&str] = &[
    "html", "css", "js", "jsx", "ts", "tsx", "vue", "scss", "sass", "less", "json", "xml", "yaml",
    "yml", "py", "java", "cpp", "c", "cs", "go", "rb", "php", "swift", "kt", "dart", "r", "sql",
    "ipynb", "sh", "ps1", "bat",
];

const AUDIO_EXTENSIONS: &[&str] = &["mp3", "aac", "m4a", "wav", "ogg"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi", "webm", "mkv"];
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "svg", "bmp"];

/// Extensions rendered inline as text.
const TEXT_PREVIEW_EXTENSIONS: &[&str] = &[
    "txt", "md", "json", "html", "css", "js", "jsx", "ts", "tsx", "py", "java", "cpp", "c", "cs",
    "go", "rb", "php", "xml", "yaml", "yml", "sql",
];

impl FileCategory {
    /// Detect the category of a lowercase extension (without the dot).
    pub fn detect(extension: &str) -> Self {
        let ext = extension.trim_start_matches('.').to_ascii_lowercase();
        let ext = ext.as_str();
        if DOCUMENT_EXTENSIONS.contains(&ext) {
            Self::Document
        } else if CODE_EXTENSIONS.contains(&ext) {
            Self::Code
        } else if AUDIO_EXTENSIONS.contains(&ext) {
            Self::Audio
        } else if VIDEO_EXTENSIONS.contains(&ext) {
            Self::Video
        } else if IMAGE_EXTENSIONS.contains(&ext) {
            Self::Image
        } else {
            Self::Other
        }
    }

    /// Largest accepted file for this category, in bytes.
    pub fn max_size(&self) -> u64 {
        match self {
            Self::Document => 50 * MB,
            Self::Code => 10 * MB,
            Self::Audio => 100 * MB,
            Self::Video => 500 * MB,
            Self::Image => 25 * MB,
            Self::Other => 50 * MB,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Code => "code",
            Self::Audio => "audio",
            Self::Video => "video",
            Self::Image => "image",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a client should present an uploaded file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PreviewKind {
    Image,
    Pdf,
    Text,
    Video,
    Audio,
    /// No inline preview; offer the bytes for download.
    Download,
}

impl PreviewKind {
    pub fn for_extension(extension: &str) -> Self {
        let ext = extension.trim_start_matches('.').to_ascii_lowercase();
        let ext = ext.as_str();
        if IMAGE_EXTENSIONS.contains(&ext) {
            Self::Image
        } else if ext == "pdf" {
            Self::Pdf
        } else if TEXT_PREVIEW_EXTENSIONS.contains(&ext) {
            Self::Text
        } else if VIDEO_EXTENSIONS.contains(&ext) {
            Self::Video
        } else if AUDIO_EXTENSIONS.contains(&ext) {
            Self::Audio
        } else {
            Self::Download
        }
    }
}

/// Lowercase extension after the last dot, or an empty string when the
/// name has none.
pub fn extension_of(filename: &str) -> String {
    match filename.rsplit_once('.') {
        Some((_, ext)) => ext.to_ascii_lowercase(),
        None => String::new(),
    }
}

/// Best-effort MIME type for a filename.
pub fn guess_mime(filename: &str) -> String {
    mime_guess::from_path(filename)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}
