//! Category and settings files for the game.

pub mod load;
pub mod schema;

pub use load::*;
pub use schema::*;
