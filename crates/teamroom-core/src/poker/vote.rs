//! Votes, card values and the deck.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

const MAX_USER_NAME_CHARS: usize = 64;

/// Display name of a participant: trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserName(String);

impl UserName {
    pub fn new(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::InvalidUserName("user name is empty".into()));
        }
        if trimmed.chars().count() > MAX_USER_NAME_CHARS {
            return Err(ValidationError::InvalidUserName(format!(
                "user name is longer than {MAX_USER_NAME_CHARS} characters"
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A card value: story points or "?" (unsure).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VoteValue {
    Points(f64),
    Unsure,
}

impl VoteValue {
    pub fn points(&self) -> Option<f64> {
        match self {
            VoteValue::Points(p) => Some(*p),
            VoteValue::Unsure => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, VoteValue::Points(_))
    }
}

/// Integral points print without a fractional part, like the stored JSON.
fn fmt_points(p: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if p.fract() == 0.0 && p.abs() < 1e15 {
        write!(f, "{}", p as i64)
    } else {
        write!(f, "{p}")
    }
}

impl fmt::Display for VoteValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoteValue::Points(p) => fmt_points(*p, f),
            VoteValue::Unsure => f.write_str("?"),
        }
    }
}

impl FromStr for VoteValue {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == "?" {
            return Ok(VoteValue::Unsure);
        }
        match s.parse::<f64>() {
            Ok(p) if p.is_finite() => Ok(VoteValue::Points(p)),
            _ => Err(ValidationError::InvalidValue {
                field: "card".into(),
                message: format!("'{s}' is neither a number nor '?'"),
            }),
        }
    }
}

impl Serialize for VoteValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            VoteValue::Points(p) if p.fract() == 0.0 && p.abs() < 1e15 => {
                serializer.serialize_i64(*p as i64)
            }
            VoteValue::Points(p) => serializer.serialize_f64(*p),
            VoteValue::Unsure => serializer.serialize_str("?"),
        }
    }
}

impl<'de> Deserialize<'de> for VoteValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(p) => Ok(VoteValue::Points(p)),
            Raw::Text(t) if t == "?" => Ok(VoteValue::Unsure),
            Raw::Text(t) => Err(serde::de::Error::custom(format!(
                "unexpected card value '{t}'"
            ))),
        }
    }
}

/// One participant's card for the current round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    pub user_name: String,
    pub value: VoteValue,
    /// Epoch milliseconds when the card was chosen.
    pub timestamp: i64,
}

/// The selectable cards, in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct Deck {
    cards: Vec<VoteValue>,
}

impl Deck {
    /// Fibonacci deck: `0 1 2 3 5 8 13 21 34 55 89 ?`.
    pub fn fibonacci() -> Self {
        let mut cards: Vec<VoteValue> = [0.0, 1.0, 2.0, 3.0, 5.0, 8.0, 13.0, 21.0, 34.0, 55.0, 89.0]
            .into_iter()
            .map(VoteValue::Points)
            .collect();
        cards.push(VoteValue::Unsure);
        Self { cards }
    }

    /// Build a deck from card faces. Rejects empty decks and duplicates.
    pub fn parse<T: AsRef<str>>(faces: &[T]) -> Result<Self, ValidationError> {
        if faces.is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "deck".into(),
                message: "deck is empty".into(),
            });
        }
        let mut cards = Vec::with_capacity(faces.len());
        for face in faces {
            let card: VoteValue = face.as_ref().parse()?;
            if cards.contains(&card) {
                return Err(ValidationError::InvalidValue {
                    field: "deck".into(),
                    message: format!("card '{card}' appears twice"),
                });
            }
            cards.push(card);
        }
        Ok(Self { cards })
    }

    pub fn cards(&self) -> &[VoteValue] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn contains(&self, value: &VoteValue) -> bool {
        self.cards.contains(value)
    }

    pub fn has_numeric_card(&self) -> bool {
        self.cards.iter().any(VoteValue::is_numeric)
    }

    /// Parse `input` and check that it is one of the deck's cards.
    pub fn card(&self, input: &str) -> Result<VoteValue, ValidationError> {
        let not_in_deck = || ValidationError::CardNotInDeck {
            card: input.trim().to_string(),
            deck: self.to_string(),
        };
        let value: VoteValue = input.parse().map_err(|_| not_in_deck())?;
        if self.contains(&value) {
            Ok(value)
        } else {
            Err(not_in_deck())
        }
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::fibonacci()
    }
}

impl fmt::Display for Deck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, card) in self.cards.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{card}")?;
        }
        Ok(())
    }
}
