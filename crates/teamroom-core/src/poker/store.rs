//! Per-room vote records.

use chrono::{DateTime, Utc};

use super::keys::{vote_key, vote_prefix};
use super::room::RoomId;
use super::vote::{UserName, Vote, VoteValue};
use crate::error::Result;
use crate::storage::KeyValueStore;

/// Reads and writes votes under `planning-poker-{room}-{user}` keys.
pub struct VoteStore<S> {
    store: S,
}

impl<S: KeyValueStore> VoteStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Record `user`'s card, replacing any earlier vote this round.
    pub fn cast_vote(
        &self,
        room: &RoomId,
        user: &UserName,
        value: VoteValue,
        now: DateTime<Utc>,
    ) -> Result<Vote> {
        let vote = Vote {
            user_name: user.to_string(),
            value,
            timestamp: now.timestamp_millis(),
        };
        self.store
            .set(&vote_key(room, user), &serde_json::to_string(&vote)?)?;
        tracing::debug!(room = %room, user = %user, value = %value, "vote cast");
        Ok(vote)
    }

    /// The user's current vote, if any.
    pub fn get_vote(&self, room: &RoomId, user: &UserName) -> Result<Option<Vote>> {
        let key = vote_key(room, user);
        Ok(self
            .store
            .get(&key)?
            .and_then(|raw| decode_vote(&key, user.as_str(), &raw)))
    }

    /// Every readable vote in the room, ordered by user name.
    ///
    /// Malformed records are skipped.
    pub fn list_votes(&self, room: &RoomId) -> Result<Vec<Vote>> {
        let prefix = vote_prefix(room);
        let mut votes = Vec::new();
        for key in self.store.keys_with_prefix(&prefix)? {
            let Some(raw) = self.store.get(&key)? else {
                continue;
            };
            let owner = &key[prefix.len()..];
            if let Some(vote) = decode_vote(&key, owner, &raw) {
                votes.push(vote);
            }
        }
        Ok(votes)
    }

    /// Delete every vote in the room. Returns how many records were removed.
    pub fn reset_round(&self, room: &RoomId) -> Result<usize> {
        let keys = self.store.keys_with_prefix(&vote_prefix(room))?;
        for key in &keys {
            self.store.remove(key)?;
        }
        tracing::info!(room = %room, removed = keys.len(), "round reset");
        Ok(keys.len())
    }
}

/// Decode a stored vote, dropping it if it is malformed or filed under
/// another user's key.
fn decode_vote(key: &str, owner: &str, raw: &str) -> Option<Vote> {
    match serde_json::from_str::<Vote>(raw) {
        Ok(vote) if vote.user_name == owner => Some(vote),
        Ok(vote) => {
            tracing::debug!(key, stored_user = %vote.user_name, "skipping vote filed under another user");
            None
        }
        Err(e) => {
            tracing::debug!(key, error = %e, "skipping malformed vote");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poker::keys::users_key;
    use crate::storage::MemoryStore;
    use chrono::TimeZone;

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    fn room(id: &str) -> RoomId {
        RoomId::new(id).unwrap()
    }

    fn user(name: &str) -> UserName {
        UserName::new(name).unwrap()
    }

    #[test]
    fn revote_overwrites() {
        let kv = MemoryStore::new();
        let store = VoteStore::new(&kv);
        let r = room("r1");
        store.cast_vote(&r, &user("alice"), VoteValue::Points(3.0), at(1)).unwrap();
        store.cast_vote(&r, &user("alice"), VoteValue::Points(8.0), at(2)).unwrap();

        let votes = store.list_votes(&r).unwrap();
        assert_eq!(votes.len(), 1);
        assert_eq!(votes[0].value, VoteValue::Points(8.0));
        assert_eq!(votes[0].timestamp, 2);
    }

    #[test]
    fn list_votes_is_scoped_to_room() {
        let kv = MemoryStore::new();
        let store = VoteStore::new(&kv);
        store.cast_vote(&room("ab"), &user("a"), VoteValue::Points(1.0), at(1)).unwrap();
        store.cast_vote(&room("abc"), &user("b"), VoteValue::Points(2.0), at(1)).unwrap();

        let votes = store.list_votes(&room("ab")).unwrap();
        assert_eq!(votes.len(), 1);
        assert_eq!(votes[0].user_name, "a");
    }

    #[test]
    fn malformed_and_misfiled_records_are_skipped() {
        let kv = MemoryStore::new();
        let store = VoteStore::new(&kv);
        let r = room("r1");
        store.cast_vote(&r, &user("ok"), VoteValue::Unsure, at(1)).unwrap();
        kv.set("planning-poker-r1-broken", "{not json").unwrap();
        kv.set(
            "planning-poker-r1-mallory",
            r#"{"userName":"alice","value":1,"timestamp":1}"#,
        )
        .unwrap();

        let votes = store.list_votes(&r).unwrap();
        assert_eq!(votes.len(), 1);
        assert_eq!(votes[0].user_name, "ok");
        assert!(store.get_vote(&r, &user("broken")).unwrap().is_none());
    }

    #[test]
    fn reset_round_clears_only_that_rooms_votes() {
        let kv = MemoryStore::new();
        let store = VoteStore::new(&kv);
        let r = room("r1");
        let other = room("r2");
        store.cast_vote(&r, &user("a"), VoteValue::Points(1.0), at(1)).unwrap();
        store.cast_vote(&r, &user("b"), VoteValue::Unsure, at(1)).unwrap();
        store.cast_vote(&other, &user("c"), VoteValue::Points(5.0), at(1)).unwrap();
        kv.set(&users_key(&r), "[]").unwrap();

        assert_eq!(store.reset_round(&r).unwrap(), 2);
        assert!(store.list_votes(&r).unwrap().is_empty());
        assert_eq!(store.list_votes(&other).unwrap().len(), 1);
        assert!(kv.get(&users_key(&r)).unwrap().is_some());
        assert_eq!(store.reset_round(&r).unwrap(), 0);
    }

    #[test]
    fn get_vote_returns_own_vote() {
        let kv = MemoryStore::new();
        let store = VoteStore::new(&kv);
        let r = room("r1");
        assert!(store.get_vote(&r, &user("a")).unwrap().is_none());
        store.cast_vote(&r, &user("a"), VoteValue::Points(13.0), at(5)).unwrap();
        let vote = store.get_vote(&r, &user("a")).unwrap().unwrap();
        assert_eq!(vote.value, VoteValue::Points(13.0));
    }
}
