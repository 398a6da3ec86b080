mod cards;
mod common;
mod content;
mod spaces;
mod system;
