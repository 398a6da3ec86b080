//! Thin typed wrappers over the REST endpoints, one per resource.

mod card;
mod space;
mod user;

pub use card::CardService;
pub use space::SpaceService;
pub use user::UserService;
