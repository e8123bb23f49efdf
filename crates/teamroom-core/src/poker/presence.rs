//! Presence tracking by heartbeat.
//!
//! Each room keeps a JSON array of `{userName, lastSeen}` under
//! `planning-poker-users-{room}`. Clients heartbeat on an interval; records
//! older than the staleness threshold are dropped whenever any client polls,
//! so pruning is only as timely as the slowest heartbeat in the room.

use std::collections::HashSet;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::keys::users_key;
use super::room::RoomId;
use super::vote::UserName;
use crate::error::Result;
use crate::storage::KeyValueStore;

/// Records not refreshed within this window are pruned.
pub const DEFAULT_STALE_AFTER: Duration = Duration::from_secs(30);

/// How often clients are expected to heartbeat.
pub const DEFAULT_HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);

/// One participant's presence record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomUser {
    pub user_name: String,
    /// Epoch milliseconds of the last heartbeat.
    pub last_seen: i64,
}

pub struct PresenceTracker<S> {
    store: S,
    stale_after: Duration,
}

impl<S: KeyValueStore> PresenceTracker<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            stale_after: DEFAULT_STALE_AFTER,
        }
    }

    pub fn with_stale_after(mut self, stale_after: Duration) -> Self {
        self.stale_after = stale_after;
        self
    }

    pub fn stale_after(&self) -> Duration {
        self.stale_after
    }

    /// Refresh `user`'s record, prune stale ones and persist the result.
    pub fn heartbeat(
        &self,
        room: &RoomId,
        user: &UserName,
        now: DateTime<Utc>,
    ) -> Result<Vec<RoomUser>> {
        let now_ms = now.timestamp_millis();
        let mut users = self.load(room)?;

        match users.iter_mut().find(|u| u.user_name == user.as_str()) {
            Some(existing) => existing.last_seen = now_ms,
            None => users.push(RoomUser {
                user_name: user.to_string(),
                last_seen: now_ms,
            }),
        }

        let mut seen = HashSet::new();
        users.retain(|u| seen.insert(u.user_name.clone()) && self.is_fresh(u, now_ms));

        self.save(room, &users)?;
        Ok(users)
    }

    /// Drop `user`'s record immediately.
    pub fn leave(&self, room: &RoomId, user: &UserName) -> Result<()> {
        let mut users = self.load(room)?;
        users.retain(|u| u.user_name != user.as_str());
        self.save(room, &users)?;
        tracing::debug!(room = %room, user = %user, "left room");
        Ok(())
    }

    /// Current participants without heartbeating.
    ///
    /// Writes back only when something was pruned.
    pub fn active_users(&self, room: &RoomId, now: DateTime<Utc>) -> Result<Vec<RoomUser>> {
        let now_ms = now.timestamp_millis();
        let users = self.load(room)?;
        let before = users.len();
        let active: Vec<RoomUser> = users
            .into_iter()
            .filter(|u| self.is_fresh(u, now_ms))
            .collect();

        if active.len() != before {
            tracing::debug!(room = %room, pruned = before - active.len(), "pruned stale users");
            self.save(room, &active)?;
        }
        Ok(active)
    }

    fn is_fresh(&self, user: &RoomUser, now_ms: i64) -> bool {
        let stale_ms = i64::try_from(self.stale_after.as_millis()).unwrap_or(i64::MAX);
        now_ms.saturating_sub(user.last_seen) < stale_ms
    }

    fn load(&self, room: &RoomId) -> Result<Vec<RoomUser>> {
        let key = users_key(room);
        let Some(raw) = self.store.get(&key)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&raw) {
            Ok(users) => Ok(users),
            Err(e) => {
                tracing::debug!(key, error = %e, "ignoring malformed presence list");
                Ok(Vec::new())
            }
        }
    }

    fn save(&self, room: &RoomId, users: &[RoomUser]) -> Result<()> {
        self.store
            .set(&users_key(room), &serde_json::to_string(users)?)
    }
}
