//! Core game logic. Keep this crate free of IO and platform concerns.

pub mod blind;
pub mod boss;
pub mod cards;
pub mod config;
pub mod content;
pub mod deck;
pub mod events;
pub mod hand;
pub mod joker;
pub mod rng;
pub mod round;
pub mod rules;
pub mod scoring;
pub mod session;

pub use blind::*;
pub use boss::*;
pub use cards::*;
pub use config::*;
pub use content::*;
pub use deck::*;
pub use events::*;
pub use hand::*;
pub use joker::*;
pub use rng::*;
pub use round::*;
pub use rules::*;
pub use scoring::*;
pub use session::*;
