//! Core game logic for the pass-the-device party game. Keep this crate free
//! of IO and platform concerns; the only background work is the countdown.

pub mod cards;
pub mod config;
pub mod content;
pub mod countdown;
pub mod deck;
pub mod error;
pub mod events;
pub mod game;
pub mod rng;
pub mod roster;
pub mod round;
pub mod state;
pub mod table;

pub use cards::*;
pub use config::*;
pub use content::*;
pub use countdown::*;
pub use deck::*;
pub use error::*;
pub use events::*;
pub use game::*;
pub use rng::*;
pub use roster::*;
pub use round::*;
pub use state::*;
pub use table::*;
