pub mod content;
pub mod file_kind;
pub mod ids;
pub mod size;
pub mod slug;

pub use content::{ContentStatus, ContentType};
pub use file_kind::{FileCategory, PreviewKind};
