//! Planning poker: rooms, votes, presence and round statistics.
//!
//! All state lives in a [`KeyValueStore`](crate::storage::KeyValueStore)
//! under the same flat key layout the browser widget uses, so a room is
//! nothing more than the records sharing its key prefix.

pub mod keys;
pub mod presence;
pub mod room;
pub mod session;
pub mod stats;
pub mod store;
pub mod vote;

pub use presence::{PresenceTracker, RoomUser};
pub use room::{RoomId, RoomLink};
pub use session::{PokerSession, RoomSnapshot, RoundView, SessionSettings, VoteStatus};
pub use stats::{summarize, DistributionBucket, NumericStats, VoteSummary};
pub use store::VoteStore;
pub use vote::{Deck, UserName, Vote, VoteValue};
