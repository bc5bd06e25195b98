use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A finished punch. These are kept in the card history in the order they were closed.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
pub struct PunchEntity {
    #[serde(rename = "in", with = "chrono::serde::ts_seconds")]
    pub start: DateTime<Utc>,
    #[serde(rename = "out", with = "chrono::serde::ts_seconds")]
    pub end: DateTime<Utc>,
    #[serde(rename = "msg", default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl PunchEntity {
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

/// The punch the card is working on. It always has an `in` time; once `end` is set the punch is
/// closed and gets archived into the history by the next punch in.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct CurrentPunchEntity {
    pub start: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
    pub message: Option<String>,
}

impl CurrentPunchEntity {
    pub fn open(start: DateTime<Utc>, message: Option<String>) -> Self {
        Self {
            start,
            end: None,
            message,
        }
    }

    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }

    /// Time spent on this punch so far. Open punches are measured up to `now`.
    pub fn duration(&self, now: DateTime<Utc>) -> Duration {
        self.end.unwrap_or(now) - self.start
    }

    /// Copy of this punch as a history entry, if it is closed.
    pub fn completed(&self) -> Option<PunchEntity> {
        self.end.map(|end| PunchEntity {
            start: self.start,
            end,
            message: self.message.clone(),
        })
    }
}

/// Where a card is in its in/out cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PunchState {
    /// No current punch at all.
    Empty,
    /// Punched in, not yet out.
    Open,
    /// Punched in and out, waiting to be archived.
    Closed,
}

/// A single time card as it is stored on the disk.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone, Default)]
pub struct CardEntity {
    #[serde(rename = "cur", default, with = "current_ser")]
    pub current: Option<CurrentPunchEntity>,
    #[serde(rename = "punches", default)]
    pub history: Vec<PunchEntity>,
}

impl CardEntity {
    pub fn state(&self) -> PunchState {
        match &self.current {
            None => PunchState::Empty,
            Some(current) if current.is_open() => PunchState::Open,
            Some(_) => PunchState::Closed,
        }
    }

    /// Starts a new punch. A closed current punch is copied into the history first, so the old
    /// punch and the new one never share anything.
    pub fn start_punch(&mut self, now: DateTime<Utc>, message: Option<String>) {
        if let Some(completed) = self.current.as_ref().and_then(CurrentPunchEntity::completed) {
            self.history.push(completed);
        }
        self.current = Some(CurrentPunchEntity::open(now, message));
    }

    /// Replaces the `in` time of the current punch. History is left alone.
    pub fn restart_punch(&mut self, now: DateTime<Utc>, message: Option<String>) {
        match self.current.as_mut() {
            Some(current) => {
                current.start = now;
                if message.is_some() {
                    current.message = message;
                }
            }
            None => self.current = Some(CurrentPunchEntity::open(now, message)),
        }
    }

    /// Sets (or replaces) the `out` time of the current punch. Returns false when there is no
    /// current punch to close.
    pub fn end_punch(&mut self, now: DateTime<Utc>, message: Option<String>) -> bool {
        let Some(current) = self.current.as_mut() else {
            return false;
        };
        current.end = Some(now);
        if message.is_some() {
            current.message = message;
        }
        true
    }

    /// Sum of all closed punches plus the current one, and whether the clock is running.
    pub fn subtotal(&self, now: DateTime<Utc>) -> Subtotal {
        let archived = self
            .history
            .iter()
            .map(PunchEntity::duration)
            .fold(Duration::zero(), |acc, v| acc + v);
        let current = self
            .current
            .as_ref()
            .map(|v| v.duration(now))
            .unwrap_or_else(Duration::zero);
        Subtotal {
            duration: archived + current,
            clocked_in: self.state() == PunchState::Open,
        }
    }
}

/// Accumulated time of one card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subtotal {
    pub duration: Duration,
    pub clocked_in: bool,
}

/// `cur` is stored as an object that is empty when there is no current punch. An `out` without
/// an `in` can't be represented and is rejected.
mod current_ser {
    use chrono::{DateTime, Utc};
    use serde::{de::Error, Deserialize, Deserializer, Serialize, Serializer};

    use super::CurrentPunchEntity;

    #[derive(Serialize, Deserialize, Default)]
    struct RawCurrentPunch {
        #[serde(
            rename = "in",
            default,
            with = "chrono::serde::ts_seconds_option",
            skip_serializing_if = "Option::is_none"
        )]
        start: Option<DateTime<Utc>>,
        #[serde(
            rename = "out",
            default,
            with = "chrono::serde::ts_seconds_option",
            skip_serializing_if = "Option::is_none"
        )]
        end: Option<DateTime<Utc>>,
        #[serde(rename = "msg", default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    }

    pub fn serialize<S>(current: &Option<CurrentPunchEntity>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let raw = match current {
            Some(current) => RawCurrentPunch {
                start: Some(current.start),
                end: current.end,
                message: current.message.clone(),
            },
            None => RawCurrentPunch::default(),
        };
        raw.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<CurrentPunchEntity>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match RawCurrentPunch::deserialize(deserializer)? {
            RawCurrentPunch {
                start: Some(start),
                end,
                message,
            } => Ok(Some(CurrentPunchEntity {
                start,
                end,
                message,
            })),
            RawCurrentPunch { end: Some(_), .. } => Err(D::Error::custom(
                "current punch has an 'out' time without an 'in' time",
            )),
            RawCurrentPunch { .. } => Ok(None),
        }
    }
}
