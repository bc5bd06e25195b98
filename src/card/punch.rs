//! In/out transitions of a single card.
//!
//! Both operations sample the clock exactly once, after any confirmation, so every field set by
//! one call carries the same timestamp. A declined confirmation leaves the store untouched.

use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::utils::clock::Clock;

use super::{confirm::Confirm, entities::PunchState, id::CardId, store::CardStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PunchInOutcome {
    /// A new punch was started. `created` is set when the card didn't exist before.
    PunchedIn { at: DateTime<Utc>, created: bool },
    /// The card was already in and the user agreed to move the `in` time.
    Overwritten { at: DateTime<Utc> },
    Declined,
}

impl PunchInOutcome {
    pub fn is_mutation(&self) -> bool {
        !matches!(self, PunchInOutcome::Declined)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PunchOutOutcome {
    PunchedOut { at: DateTime<Utc> },
    /// The card was already out and the user agreed to move the `out` time.
    Overwritten { at: DateTime<Utc> },
    Declined,
    /// The card doesn't exist. Nothing is created.
    CardNotInitialized,
    /// The card has no punch to close.
    NoPunches,
}

impl PunchOutOutcome {
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            PunchOutOutcome::PunchedOut { .. } | PunchOutOutcome::Overwritten { .. }
        )
    }
}

/// Punches in on `id`, creating the card if it doesn't exist.
pub fn punch_in(
    store: &mut CardStore,
    id: &CardId,
    message: Option<&str>,
    confirm: &mut impl Confirm,
    clock: &impl Clock,
) -> Result<PunchInOutcome> {
    store.check_capacity(id)?;
    let message = message.map(str::to_owned);

    match store.get(id).map(|card| card.state()) {
        Some(PunchState::Open) => {
            if !confirm.confirm("An 'in' punch already exists.", "Overwrite it?")? {
                return Ok(PunchInOutcome::Declined);
            }
            let now = clock.time();
            store.get_or_create(id).restart_punch(now, message);
            debug!("Moved 'in' punch of card {id} to {now}");
            Ok(PunchInOutcome::Overwritten { at: now })
        }
        state => {
            let created = state.is_none();
            let now = clock.time();
            store.get_or_create(id).start_punch(now, message);
            debug!("Punched in card {id} at {now}, created: {created}");
            Ok(PunchInOutcome::PunchedIn { at: now, created })
        }
    }
}

/// Punches out on `id`. Unknown cards and cards without a punch are reported, not created.
pub fn punch_out(
    store: &mut CardStore,
    id: &CardId,
    message: Option<&str>,
    confirm: &mut impl Confirm,
    clock: &impl Clock,
) -> Result<PunchOutOutcome> {
    let Some(card) = store.get_mut(id) else {
        debug!("Card {id} is not initialized, not punching out");
        return Ok(PunchOutOutcome::CardNotInitialized);
    };
    let message = message.map(str::to_owned);

    let outcome = match card.state() {
        PunchState::Empty => PunchOutOutcome::NoPunches,
        PunchState::Open => {
            let now = clock.time();
            card.end_punch(now, message);
            PunchOutOutcome::PunchedOut { at: now }
        }
        PunchState::Closed => {
            if !confirm.confirm("An 'out' punch already exists.", "Overwrite it?")? {
                return Ok(PunchOutOutcome::Declined);
            }
            let now = clock.time();
            card.end_punch(now, message);
            PunchOutOutcome::Overwritten { at: now }
        }
    };
    debug!("Punch out of card {id}: {outcome:?}");
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use chrono::DateTime;

    use super::{punch_in, punch_out, PunchInOutcome, PunchOutOutcome};
    use crate::{
        card::{
            confirm::MockConfirm,
            entities::{CardEntity, CurrentPunchEntity, PunchEntity, PunchState},
            error::ValidationError,
            id::CardId,
            store::{CardStore, CARD_MAX},
        },
        utils::clock::{FixedClock, MockClock},
    };

    fn id(value: &str) -> CardId {
        value.parse().unwrap()
    }

    fn never_asked() -> MockConfirm {
        let mut confirm = MockConfirm::new();
        confirm.expect_confirm().never();
        confirm
    }

    fn answering(answer: bool) -> MockConfirm {
        let mut confirm = MockConfirm::new();
        confirm
            .expect_confirm()
            .times(1)
            .returning(move |_, _| Ok(answer));
        confirm
    }

    #[test]
    fn test_in_out_in_scenario() -> Result<()> {
        let mut store = CardStore::new();
        let card = id("1");

        let outcome = punch_in(&mut store, &card, None, &mut never_asked(), &FixedClock::at(1000))?;
        assert_eq!(
            outcome,
            PunchInOutcome::PunchedIn {
                at: DateTime::from_timestamp(1000, 0).unwrap(),
                created: true
            }
        );
        assert_eq!(
            store.get(&card).unwrap().current,
            Some(CurrentPunchEntity::open(
                DateTime::from_timestamp(1000, 0).unwrap(),
                None
            ))
        );

        punch_out(&mut store, &card, None, &mut never_asked(), &FixedClock::at(2000))?;
        assert_eq!(
            store.get(&card).unwrap().current,
            Some(CurrentPunchEntity {
                start: DateTime::from_timestamp(1000, 0).unwrap(),
                end: Some(DateTime::from_timestamp(2000, 0).unwrap()),
                message: None,
            })
        );

        let outcome = punch_in(&mut store, &card, None, &mut never_asked(), &FixedClock::at(3000))?;
        assert!(matches!(
            outcome,
            PunchInOutcome::PunchedIn { created: false, .. }
        ));
        let stored = store.get(&card).unwrap();
        assert_eq!(
            stored.history,
            vec![PunchEntity {
                start: DateTime::from_timestamp(1000, 0).unwrap(),
                end: DateTime::from_timestamp(2000, 0).unwrap(),
                message: None,
            }]
        );
        assert_eq!(
            stored.current,
            Some(CurrentPunchEntity::open(
                DateTime::from_timestamp(3000, 0).unwrap(),
                None
            ))
        );
        Ok(())
    }

    #[test]
    fn test_history_tracks_completed_pairs() -> Result<()> {
        let mut store = CardStore::new();
        let card = id("7");
        for pair in 0..5i64 {
            let base = pair * 100;
            punch_in(&mut store, &card, None, &mut never_asked(), &FixedClock::at(base))?;
            assert_eq!(store.get(&card).unwrap().history.len() as i64, pair);
            assert_eq!(store.get(&card).unwrap().state(), PunchState::Open);
            punch_out(&mut store, &card, None, &mut never_asked(), &FixedClock::at(base + 50))?;
            assert_eq!(store.get(&card).unwrap().state(), PunchState::Closed);
        }
        let stored = store.get(&card).unwrap();
        assert_eq!(stored.history.len(), 4);
        assert_eq!(
            stored.current.as_ref().and_then(|v| v.end),
            DateTime::from_timestamp(450, 0)
        );
        Ok(())
    }

    #[test]
    fn test_punch_in_twice_declined_is_noop() -> Result<()> {
        let mut store = CardStore::new();
        let card = id("1");
        punch_in(&mut store, &card, Some("a"), &mut never_asked(), &FixedClock::at(10))?;
        let before = store.clone();

        let mut clock = MockClock::new();
        clock.expect_time().never();
        let outcome = punch_in(&mut store, &card, Some("b"), &mut answering(false), &clock)?;

        assert_eq!(outcome, PunchInOutcome::Declined);
        assert!(!outcome.is_mutation());
        assert_eq!(store, before);
        Ok(())
    }

    #[test]
    fn test_punch_in_twice_confirmed_moves_in_only() -> Result<()> {
        let mut store = CardStore::new();
        let card = id("1");
        punch_in(&mut store, &card, Some("a"), &mut never_asked(), &FixedClock::at(10))?;
        punch_out(&mut store, &card, None, &mut never_asked(), &FixedClock::at(20))?;
        punch_in(&mut store, &card, None, &mut never_asked(), &FixedClock::at(30))?;

        let mut confirm = MockConfirm::new();
        confirm
            .expect_confirm()
            .withf(|context, question| {
                context == "An 'in' punch already exists." && question == "Overwrite it?"
            })
            .times(1)
            .returning(|_, _| Ok(true));
        let outcome = punch_in(&mut store, &card, None, &mut confirm, &FixedClock::at(40))?;

        assert_eq!(
            outcome,
            PunchInOutcome::Overwritten {
                at: DateTime::from_timestamp(40, 0).unwrap()
            }
        );
        let stored = store.get(&card).unwrap();
        assert_eq!(stored.history.len(), 1);
        assert_eq!(
            stored.current,
            Some(CurrentPunchEntity::open(
                DateTime::from_timestamp(40, 0).unwrap(),
                None
            ))
        );
        Ok(())
    }

    #[test]
    fn test_clock_sampled_once() -> Result<()> {
        let mut store = CardStore::new();
        let mut clock = MockClock::new();
        clock
            .expect_time()
            .times(1)
            .return_const(DateTime::from_timestamp(5, 0).unwrap());
        punch_in(&mut store, &id("1"), Some("m"), &mut never_asked(), &clock)?;
        Ok(())
    }

    #[test]
    fn test_message_replaced_on_new_punch() -> Result<()> {
        let mut store = CardStore::new();
        let card = id("1");
        punch_in(&mut store, &card, Some("first"), &mut never_asked(), &FixedClock::at(1))?;
        punch_out(&mut store, &card, None, &mut never_asked(), &FixedClock::at(2))?;
        punch_in(&mut store, &card, None, &mut never_asked(), &FixedClock::at(3))?;

        let stored = store.get(&card).unwrap();
        assert_eq!(stored.history[0].message.as_deref(), Some("first"));
        assert_eq!(stored.current.as_ref().unwrap().message, None);
        Ok(())
    }

    #[test]
    fn test_capacity_exceeded_leaves_store_alone() {
        let mut store = CardStore::new();
        for i in 1..=CARD_MAX {
            punch_in(
                &mut store,
                &id(&i.to_string()),
                None,
                &mut never_asked(),
                &FixedClock::at(1),
            )
            .unwrap();
        }
        let before = store.clone();

        let error = punch_in(&mut store, &id("11"), None, &mut never_asked(), &FixedClock::at(2))
            .unwrap_err();

        assert_eq!(
            error.downcast_ref::<ValidationError>(),
            Some(&ValidationError::CapacityExceeded)
        );
        assert_eq!(store, before);
    }

    #[test]
    fn test_punch_out_unknown_card_is_noop() -> Result<()> {
        let mut store = CardStore::new();
        let outcome = punch_out(&mut store, &id("3"), Some("x"), &mut never_asked(), &FixedClock::at(1))?;
        assert_eq!(outcome, PunchOutOutcome::CardNotInitialized);
        assert!(store.is_empty());
        Ok(())
    }

    #[test]
    fn test_punch_out_without_punches() -> Result<()> {
        let mut store = CardStore::new();
        store.insert(id("3"), CardEntity::default());
        let before = store.clone();
        let outcome = punch_out(&mut store, &id("3"), None, &mut never_asked(), &FixedClock::at(1))?;
        assert_eq!(outcome, PunchOutOutcome::NoPunches);
        assert_eq!(store, before);
        Ok(())
    }

    #[test]
    fn test_punch_out_twice() -> Result<()> {
        let mut store = CardStore::new();
        let card = id("1");
        punch_in(&mut store, &card, None, &mut never_asked(), &FixedClock::at(10))?;
        punch_out(&mut store, &card, Some("done"), &mut never_asked(), &FixedClock::at(20))?;
        let before = store.clone();

        let outcome = punch_out(&mut store, &card, None, &mut answering(false), &FixedClock::at(30))?;
        assert_eq!(outcome, PunchOutOutcome::Declined);
        assert_eq!(store, before);

        let outcome = punch_out(&mut store, &card, None, &mut answering(true), &FixedClock::at(30))?;
        assert!(outcome.is_mutation());
        let current = store.get(&card).unwrap().current.clone().unwrap();
        assert_eq!(current.end, DateTime::from_timestamp(30, 0));
        assert_eq!(current.message.as_deref(), Some("done"));
        assert!(store.get(&card).unwrap().history.is_empty());
        Ok(())
    }
}
