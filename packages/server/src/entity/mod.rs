pub mod card;
pub mod card_style;
pub mod file_upload;
pub mod space;
pub mod space_content;
pub mod user;
