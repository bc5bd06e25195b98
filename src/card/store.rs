use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    entities::{CardEntity, Subtotal},
    error::ValidationError,
    id::CardId,
};

/// Maximum number of cards kept at the same time.
pub const CARD_MAX: usize = 10;

/// Every card of the user, keyed by name. This is exactly the document stored on the disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardStore {
    cards: BTreeMap<CardId, CardEntity>,
}

impl CardStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn exists(&self, id: &CardId) -> bool {
        self.cards.contains_key(id)
    }

    pub fn get(&self, id: &CardId) -> Option<&CardEntity> {
        self.cards.get(id)
    }

    pub fn get_mut(&mut self, id: &CardId) -> Option<&mut CardEntity> {
        self.cards.get_mut(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &CardId> {
        self.cards.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CardId, &CardEntity)> {
        self.cards.iter()
    }

    /// Fails if adding `candidate` would go over [CARD_MAX]. Existing cards always pass.
    pub fn check_capacity(&self, candidate: &CardId) -> Result<(), ValidationError> {
        if self.cards.len() >= CARD_MAX && !self.exists(candidate) {
            return Err(ValidationError::CapacityExceeded);
        }
        Ok(())
    }

    /// Returns the card, creating an empty one if needed. Capacity is the caller's concern.
    pub(crate) fn get_or_create(&mut self, id: &CardId) -> &mut CardEntity {
        self.cards.entry(id.clone()).or_default()
    }

    pub(crate) fn insert(&mut self, id: CardId, card: CardEntity) -> Option<CardEntity> {
        self.cards.insert(id, card)
    }

    pub(crate) fn remove(&mut self, id: &CardId) -> Option<CardEntity> {
        self.cards.remove(id)
    }

    pub fn subtotal(&self, id: &CardId, now: DateTime<Utc>) -> Result<Subtotal, ValidationError> {
        self.get(id)
            .map(|card| card.subtotal(now))
            .ok_or_else(|| ValidationError::CardNotFound(id.clone()))
    }
}
