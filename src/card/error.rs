use thiserror::Error;

use super::{id::CardId, store::CARD_MAX};

/// Problems with the user's request. These end the invocation with a usage message but never
/// touch the stored cards.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Max number of cards ({}) exceeded", CARD_MAX)]
    CapacityExceeded,
    #[error("Card {0} does not exist")]
    CardNotFound(CardId),
    #[error("Invalid card '{id}': {reason}")]
    InvalidCardId { id: String, reason: &'static str },
    #[error("No new name given, pass it with `-m`")]
    MissingNewName,
}
