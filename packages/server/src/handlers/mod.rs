pub mod card;
pub mod content;
pub mod health;
pub mod space;
pub mod user;
