use anyhow::Result;
use tracing::{debug, warn};

use super::{
    confirm::Confirm,
    error::ValidationError,
    id::{CardId, Selector},
    store::CardStore,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameOutcome {
    Renamed,
    /// A card with the new name existed and was replaced.
    Overwritten,
    /// The new name is the current one.
    Unchanged,
    Declined,
}

impl RenameOutcome {
    pub fn is_mutation(&self) -> bool {
        matches!(self, RenameOutcome::Renamed | RenameOutcome::Overwritten)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClearOutcome {
    /// Holds the cards that were removed from the store.
    Cleared(CardStore),
    /// The named card doesn't exist, so nothing was asked or removed.
    Refused(CardId),
    NothingToClear,
    Declined,
}

impl ClearOutcome {
    pub fn is_mutation(&self) -> bool {
        matches!(self, ClearOutcome::Cleared(_))
    }
}

/// Moves card `from` to the name `to`. Replacing an existing card needs confirmation.
pub fn rename(
    store: &mut CardStore,
    from: &CardId,
    to: &CardId,
    confirm: &mut impl Confirm,
) -> Result<RenameOutcome> {
    if !store.exists(from) {
        return Err(ValidationError::CardNotFound(from.clone()).into());
    }
    if from == to {
        return Ok(RenameOutcome::Unchanged);
    }

    let overwriting = store.exists(to);
    if overwriting
        && !confirm.confirm(
            &format!("A card named {to} already exists"),
            "Would you like to overwrite it?",
        )?
    {
        return Ok(RenameOutcome::Declined);
    }

    let Some(card) = store.remove(from) else {
        return Err(ValidationError::CardNotFound(from.clone()).into());
    };
    store.insert(to.clone(), card);
    debug!("Renamed card {from} to {to}, overwritten: {overwriting}");

    Ok(if overwriting {
        RenameOutcome::Overwritten
    } else {
        RenameOutcome::Renamed
    })
}

/// Removes the selected cards after a single confirmation for the whole batch.
pub fn clear(
    store: &mut CardStore,
    selector: &Selector,
    confirm: &mut impl Confirm,
) -> Result<ClearOutcome> {
    let targets: Vec<CardId> = match selector {
        Selector::All => store.ids().cloned().collect(),
        Selector::Single(id) if !store.exists(id) => {
            return Ok(ClearOutcome::Refused(id.clone()));
        }
        Selector::Single(id) => vec![id.clone()],
    };
    if targets.is_empty() {
        return Ok(ClearOutcome::NothingToClear);
    }

    if !confirm.confirm("", "Delete the selected card(s)?")? {
        return Ok(ClearOutcome::Declined);
    }

    let mut removed = CardStore::new();
    for id in targets {
        match store.remove(&id) {
            Some(card) => {
                removed.insert(id, card);
            }
            None => warn!("Card {id} disappeared before it could be cleared, skipping"),
        }
    }
    debug!("Cleared {} card(s) for {selector}", removed.len());
    Ok(ClearOutcome::Cleared(removed))
}
