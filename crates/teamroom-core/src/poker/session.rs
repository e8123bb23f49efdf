//! A participant's view of one planning-poker room.
//!
//! The session ties the vote store and presence tracker to a single room and
//! user name, and tracks which of the two views (voting or results) is up.
//! Views only change on explicit actions.

use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::keys::USERNAME_KEY;
use super::presence::{PresenceTracker, RoomUser, DEFAULT_STALE_AFTER};
use super::room::{RoomId, RoomLink};
use super::stats::{summarize, VoteSummary};
use super::store::VoteStore;
use super::vote::{Deck, UserName, Vote, VoteValue};
use crate::error::{Result, ValidationError};
use crate::storage::KeyValueStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundView {
    Voting,
    Results,
}

/// Knobs a session needs from configuration.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub deck: Deck,
    pub stale_after: Duration,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            deck: Deck::fibonacci(),
            stale_after: DEFAULT_STALE_AFTER,
        }
    }
}

/// Whether an active participant has voted this round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteStatus {
    pub user_name: String,
    pub has_voted: bool,
    pub is_current_user: bool,
}

/// Everything needed to render the room at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSnapshot {
    pub room: RoomId,
    pub invited: bool,
    pub view: RoundView,
    pub user_name: Option<String>,
    pub users: Vec<RoomUser>,
    pub votes: Vec<Vote>,
    pub vote_status: Vec<VoteStatus>,
    pub voted_count: usize,
    pub my_vote: Option<Vote>,
    pub summary: VoteSummary,
}

pub struct PokerSession<S> {
    store: S,
    votes: VoteStore<S>,
    presence: PresenceTracker<S>,
    deck: Deck,
    link: RoomLink,
    user_name: Option<UserName>,
    selected: Option<VoteValue>,
    view: RoundView,
}

impl<S: KeyValueStore + Clone> PokerSession<S> {
    /// Open `link`, restoring the last-used user name and any vote already
    /// cast under it.
    pub fn open(store: S, link: RoomLink, settings: SessionSettings) -> Result<Self> {
        let user_name = match store.get(USERNAME_KEY)? {
            Some(raw) => UserName::new(&raw).ok(),
            None => None,
        };
        let mut session = Self {
            votes: VoteStore::new(store.clone()),
            presence: PresenceTracker::new(store.clone()).with_stale_after(settings.stale_after),
            store,
            deck: settings.deck,
            link,
            user_name,
            selected: None,
            view: RoundView::Voting,
        };
        session.selected = session.own_vote()?.map(|v| v.value);
        Ok(session)
    }

    pub fn room(&self) -> &RoomId {
        &self.link.room
    }

    pub fn link(&self) -> &RoomLink {
        &self.link
    }

    pub fn is_invited(&self) -> bool {
        self.link.invited
    }

    pub fn user_name(&self) -> Option<&UserName> {
        self.user_name.as_ref()
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn view(&self) -> RoundView {
        self.view
    }

    pub fn selected_card(&self) -> Option<VoteValue> {
        self.selected
    }

    /// Set and persist the display name.
    ///
    /// A previous, different name is dropped from the room's presence list.
    pub fn set_user_name(&mut self, raw: &str) -> Result<&UserName> {
        let name = UserName::new(raw)?;
        if let Some(old) = self.user_name.as_ref().filter(|old| **old != name) {
            self.presence.leave(&self.link.room, old)?;
        }
        self.store.set(USERNAME_KEY, name.as_str())?;
        self.selected = self.votes.get_vote(&self.link.room, &name)?.map(|v| v.value);
        Ok(self.user_name.insert(name))
    }

    /// Play a card from the deck as the current user.
    pub fn select_card(&mut self, card: &str, now: DateTime<Utc>) -> Result<Vote> {
        let user = self
            .user_name
            .as_ref()
            .ok_or(ValidationError::MissingUserName)?;
        let value = self.deck.card(card)?;
        let vote = self.votes.cast_vote(&self.link.room, user, value, now)?;
        self.selected = Some(value);
        Ok(vote)
    }

    pub fn show_results(&mut self) {
        self.view = RoundView::Results;
    }

    pub fn back_to_voting(&mut self) {
        self.view = RoundView::Voting;
    }

    /// Clear every vote in the room and return to voting.
    pub fn new_round(&mut self) -> Result<usize> {
        let removed = self.votes.reset_round(&self.link.room)?;
        self.selected = None;
        self.view = RoundView::Voting;
        Ok(removed)
    }

    /// Leave the current room for a freshly generated one.
    ///
    /// Refused when the room was entered through an invite.
    pub fn create_new_room<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<&RoomId> {
        if self.link.invited {
            return Err(ValidationError::InvitedRoom.into());
        }
        self.leave()?;
        self.link = RoomLink::generate(rng);
        self.selected = None;
        self.view = RoundView::Voting;
        tracing::info!(room = %self.link.room, "created room");
        Ok(&self.link.room)
    }

    /// Switch to another room, e.g. after following a share link.
    pub fn join(&mut self, link: RoomLink) -> Result<()> {
        if link.room != self.link.room {
            self.leave()?;
        }
        self.link = link;
        self.view = RoundView::Voting;
        self.selected = self.own_vote()?.map(|v| v.value);
        tracing::info!(room = %self.link.room, invited = self.link.invited, "joined room");
        Ok(())
    }

    /// Drop the current user from the room's presence list.
    pub fn leave(&self) -> Result<()> {
        match &self.user_name {
            Some(user) => self.presence.leave(&self.link.room, user),
            None => Ok(()),
        }
    }

    /// Heartbeat (when a user name is set), reload votes and build a snapshot.
    pub fn refresh(&self, now: DateTime<Utc>) -> Result<RoomSnapshot> {
        let room = &self.link.room;
        let users = match &self.user_name {
            Some(user) => self.presence.heartbeat(room, user, now)?,
            None => self.presence.active_users(room, now)?,
        };
        let votes = self.votes.list_votes(room)?;

        let me = self.user_name.as_ref().map(UserName::as_str);
        let vote_status: Vec<VoteStatus> = users
            .iter()
            .map(|u| VoteStatus {
                user_name: u.user_name.clone(),
                has_voted: votes.iter().any(|v| v.user_name == u.user_name),
                is_current_user: me == Some(u.user_name.as_str()),
            })
            .collect();
        let voted_count = vote_status.iter().filter(|s| s.has_voted).count();
        let my_vote = me.and_then(|name| votes.iter().find(|v| v.user_name == name).cloned());

        Ok(RoomSnapshot {
            room: room.clone(),
            invited: self.link.invited,
            view: self.view,
            user_name: me.map(str::to_string),
            summary: summarize(&votes),
            users,
            votes,
            vote_status,
            voted_count,
            my_vote,
        })
    }

    fn own_vote(&self) -> Result<Option<Vote>> {
        match &self.user_name {
            Some(user) => self.votes.get_vote(&self.link.room, user),
            None => Ok(None),
        }
    }
}
