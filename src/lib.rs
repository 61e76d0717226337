//! Turns the unique id of an RFID tag into a short bytebeat piece.
//!
//! The id's nibbles pick one formula from each of two catalogs. The two formulas are summed
//! sample by sample and emitted at a fixed rate for a fixed duration.

pub mod args;
pub mod config;
pub mod formula;
pub mod identifier;
pub mod pacing;
pub mod player;
pub mod render;
pub mod selector;
pub mod signal;
pub mod signal_player;
pub mod sink;
pub mod source;

pub use config::PlaybackConfig;
pub use formula::{Catalog, Formula, CATALOG_A, CATALOG_B};
pub use identifier::Identifier;
pub use player::{LoopOutcome, Player, PlayerError};
pub use selector::{select, Selection, Voices};
pub use signal::Signal;
