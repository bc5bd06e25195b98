use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use super::error::ValidationError;

/// Identifier of the sentinel that stands for every card on the command line.
pub const ALL_CARDS: &str = "0";

/// Card used by mutating commands when no card was specified.
pub const DEFAULT_CARD: &str = "1";

/// Name of a single card. Never blank and never the [ALL_CARDS] sentinel.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CardId(String);

impl CardId {
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::InvalidCardId {
                id: value,
                reason: "card name can't be blank",
            });
        }
        if value == ALL_CARDS {
            return Err(ValidationError::InvalidCardId {
                id: value,
                reason: "card 0 is reserved for \"all cards\"",
            });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CardId {
    fn default() -> Self {
        Self(DEFAULT_CARD.to_owned())
    }
}

impl Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CardId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for CardId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CardId> for String {
    fn from(value: CardId) -> Self {
        value.0
    }
}

/// Which cards a reporting or clearing command works on.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selector {
    #[default]
    All,
    Single(CardId),
}

impl FromStr for Selector {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == ALL_CARDS {
            Ok(Selector::All)
        } else {
            CardId::new(s).map(Selector::Single)
        }
    }
}

impl Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Selector::All => write!(f, "all cards"),
            Selector::Single(id) => write!(f, "card {id}"),
        }
    }
}
