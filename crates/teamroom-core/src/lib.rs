//! # Teamroom Core Library
//!
//! Core logic for a small toolbox of team widgets. Every operation is
//! available through the `teamroom` CLI, which is a thin layer over this
//! crate.
//!
//! ## Architecture
//!
//! - **Storage**: a flat string key-value store ([`KeyValueStore`]) backed by
//!   SQLite, plus TOML configuration
//! - **Poker**: planning-poker rooms, votes, heartbeat presence and round
//!   statistics, all kept in the key-value store
//! - **Retro**: a weighted recommender over seven retrospective formats
//! - **Shared**: date/URL helpers and the JSON response envelope
//!
//! ## Key Components
//!
//! - [`PokerSession`]: one participant's view of a room
//! - [`VoteStore`] / [`PresenceTracker`]: the per-room records
//! - [`Database`]: SQLite-backed key-value store
//! - [`Config`]: application configuration management

pub mod error;
pub mod poker;
pub mod retro;
pub mod shared;
pub mod storage;

pub use error::{ConfigError, CoreError, StorageError, ValidationError};
pub use poker::{
    Deck, PokerSession, PresenceTracker, RoomId, RoomLink, RoomSnapshot, RoundView,
    SessionSettings, UserName, Vote, VoteStore, VoteSummary, VoteValue,
};
pub use retro::{Feeling, Purpose, Recommendation, RetroMethod, TimeBudget};
pub use shared::ApiResponse;
pub use storage::{Config, Database, KeyValueStore, MemoryStore};
