//! Room identity: ids, share links and invite detection.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ValidationError;

const ROOM_PARAM: &str = "room";
const GENERATED_ID_LEN: usize = 7;
const MAX_ROOM_ID_LEN: usize = 32;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Opaque room identifier.
///
/// ASCII alphanumeric, at most 32 characters and never `users`, so every
/// storage key built from it belongs to exactly one room.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoomId(String);

impl RoomId {
    pub fn new(raw: &str) -> Result<Self, ValidationError> {
        let invalid = |reason: &str| ValidationError::InvalidRoomId {
            room: raw.to_string(),
            reason: reason.to_string(),
        };

        if raw.is_empty() {
            return Err(invalid("room id is empty"));
        }
        if raw.len() > MAX_ROOM_ID_LEN {
            return Err(invalid("room id is longer than 32 characters"));
        }
        if !raw.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(invalid("only letters and digits are allowed"));
        }
        if raw == "users" {
            return Err(invalid("'users' is reserved"));
        }
        Ok(Self(raw.to_string()))
    }

    /// Random 7-character base-36 id.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let id: String = (0..GENERATED_ID_LEN)
            .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
            .collect();
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for RoomId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        RoomId::new(&value)
    }
}

impl From<RoomId> for String {
    fn from(id: RoomId) -> Self {
        id.0
    }
}

/// A room plus how it was entered.
///
/// `invited` is set when the room came from a share link or an explicit
/// join; such sessions may not spawn a new room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomLink {
    pub room: RoomId,
    pub invited: bool,
}

impl RoomLink {
    /// Fresh room owned by this client.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            room: RoomId::generate(rng),
            invited: false,
        }
    }

    /// Read the `room` query parameter. `Ok(None)` when the URL carries none.
    pub fn from_url(url: &Url) -> Result<Option<Self>, ValidationError> {
        match url.query_pairs().find(|(k, _)| k == ROOM_PARAM) {
            Some((_, value)) => Ok(Some(Self {
                room: RoomId::new(&value)?,
                invited: true,
            })),
            None => Ok(None),
        }
    }

    /// Accept a share URL or a bare room id.
    pub fn resolve(input: &str) -> Result<Self, ValidationError> {
        let input = input.trim();
        if let Ok(url) = Url::parse(input) {
            return Self::from_url(&url)?.ok_or_else(|| ValidationError::InvalidValue {
                field: "room".into(),
                message: format!("link '{input}' has no ?room= parameter"),
            });
        }
        Ok(Self {
            room: RoomId::new(input)?,
            invited: true,
        })
    }

    /// `base_url` with `room=<id>` set, other query parameters kept.
    pub fn share_url(&self, base_url: &str) -> Result<Url, ValidationError> {
        let mut url = Url::parse(base_url).map_err(|e| ValidationError::InvalidValue {
            field: "share.base_url".into(),
            message: e.to_string(),
        })?;
        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(k, _)| k != ROOM_PARAM)
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        url.query_pairs_mut()
            .clear()
            .extend_pairs(kept)
            .append_pair(ROOM_PARAM, self.room.as_str());
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn room_id_rules() {
        assert!(RoomId::new("k3x9q2a").is_ok());
        assert!(RoomId::new("").is_err());
        assert!(RoomId::new("users").is_err());
        assert!(RoomId::new("a-b").is_err());
        assert!(RoomId::new("a b").is_err());
        assert!(RoomId::new(&"a".repeat(33)).is_err());
    }

    #[test]
    fn generated_ids_are_valid_base36() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let id = RoomId::generate(&mut rng);
            assert_eq!(id.as_str().len(), 7);
            assert!(id
                .as_str()
                .bytes()
                .all(|b| b.is_ascii_digit() || b.is_ascii_lowercase()));
            RoomId::new(id.as_str()).unwrap();
        }
    }

    #[test]
    fn url_with_room_is_an_invite() {
        let url = Url::parse("https://tools.example/poker/?room=abc123").unwrap();
        let link = RoomLink::from_url(&url).unwrap().unwrap();
        assert_eq!(link.room.as_str(), "abc123");
        assert!(link.invited);

        let plain = Url::parse("https://tools.example/poker/").unwrap();
        assert!(RoomLink::from_url(&plain).unwrap().is_none());

        let bad = Url::parse("https://tools.example/poker/?room=a-b").unwrap();
        assert!(RoomLink::from_url(&bad).is_err());
    }

    #[test]
    fn resolve_accepts_link_or_bare_id() {
        assert_eq!(
            RoomLink::resolve("http://localhost:5173/?room=xyz").unwrap().room.as_str(),
            "xyz"
        );
        assert_eq!(RoomLink::resolve(" xyz ").unwrap().room.as_str(), "xyz");
        assert!(RoomLink::resolve("http://localhost:5173/").is_err());
    }

    #[test]
    fn share_url_replaces_room_and_keeps_other_params() {
        let link = RoomLink {
            room: RoomId::new("new1").unwrap(),
            invited: false,
        };
        let url = link
            .share_url("https://tools.example/poker/?lang=ja&room=old")
            .unwrap();
        assert_eq!(url.as_str(), "https://tools.example/poker/?lang=ja&room=new1");
        assert!(link.share_url("nope").is_err());
    }

    #[test]
    fn link_round_trips_through_json() {
        let json = r#"{"room":"abc","invited":true}"#;
        let link: RoomLink = serde_json::from_str(json).unwrap();
        assert_eq!(serde_json::to_string(&link).unwrap(), json);
        assert!(serde_json::from_str::<RoomLink>(r#"{"room":"users","invited":false}"#).is_err());
    }
}
