pub mod card;
pub mod content;
pub mod shared;
pub mod space;
pub mod user;
