use std::io::{self, Write};

use ansi_term::Colour;
use chrono::{DateTime, Utc};

use crate::{
    card::{
        id::CardId,
        lifecycle::{ClearOutcome, RenameOutcome},
        punch::{PunchInOutcome, PunchOutOutcome},
    },
    utils::time::format_timestamp,
};

/// Tells the user what a command did. Colours are only used when `styled` is set.
pub struct Output<W> {
    writer: W,
    styled: bool,
}

impl<W: Write> Output<W> {
    pub fn new(writer: W, styled: bool) -> Self {
        Self { writer, styled }
    }

    pub fn writer(&mut self) -> &mut W {
        &mut self.writer
    }

    fn paint(&self, colour: Colour, text: String) -> String {
        if self.styled {
            colour.paint(text).to_string()
        } else {
            text
        }
    }

    fn time(&self, at: DateTime<Utc>) -> String {
        self.paint(Colour::Cyan, format_timestamp(at))
    }

    pub fn punch_in(&mut self, id: &CardId, outcome: &PunchInOutcome) -> io::Result<()> {
        match *outcome {
            PunchInOutcome::PunchedIn { at, created } => {
                if created {
                    let line = self.paint(Colour::Yellow, format!("Creating card {id}..."));
                    writeln!(self.writer, "{line}")?;
                }
                let time = self.time(at);
                writeln!(self.writer, "Punched in at: {time}")
            }
            PunchInOutcome::Overwritten { at } => {
                let time = self.time(at);
                writeln!(self.writer, "Punch overridden, now in at: {time}")
            }
            PunchInOutcome::Declined => Ok(()),
        }
    }

    pub fn punch_out(&mut self, id: &CardId, outcome: &PunchOutOutcome) -> io::Result<()> {
        match *outcome {
            PunchOutOutcome::PunchedOut { at } => {
                let time = self.time(at);
                writeln!(self.writer, "Punched out at {time}")
            }
            PunchOutOutcome::Overwritten { at } => {
                let time = self.time(at);
                writeln!(self.writer, "Punch overridden, now out at: {time}")
            }
            PunchOutOutcome::Declined => Ok(()),
            PunchOutOutcome::CardNotInitialized => {
                let line = self.paint(Colour::Yellow, format!("Card {id} is not initialized"));
                writeln!(self.writer, "{line}")?;
                writeln!(self.writer, "Not adding an out punch")
            }
            PunchOutOutcome::NoPunches => {
                let line = self.paint(
                    Colour::Yellow,
                    "Card has no punches (not even an in punch!)".into(),
                );
                writeln!(self.writer, "{line}")?;
                writeln!(self.writer, "Not adding an out punch")
            }
        }
    }

    pub fn rename(&mut self, from: &CardId, to: &CardId, outcome: &RenameOutcome) -> io::Result<()> {
        match outcome {
            RenameOutcome::Renamed => {
                writeln!(self.writer, "Renaming card...")?;
                writeln!(self.writer, "Card has been renamed {to}")
            }
            RenameOutcome::Overwritten => {
                let line = self.paint(Colour::Red, "Overwriting...".into());
                writeln!(self.writer, "{line}")?;
                writeln!(self.writer, "Card has been renamed {to}")
            }
            RenameOutcome::Unchanged => writeln!(self.writer, "Card {from} is already named {to}"),
            RenameOutcome::Declined => writeln!(self.writer, "Skipping rename..."),
        }
    }

    pub fn clear(&mut self, outcome: &ClearOutcome) -> io::Result<()> {
        match outcome {
            ClearOutcome::Cleared(removed) => {
                for id in removed.ids() {
                    let line = self.paint(Colour::Red, format!("Deleting card {id}..."));
                    writeln!(self.writer, "{line}")?;
                }
                writeln!(self.writer, "Cards have been cleared")
            }
            ClearOutcome::Refused(id) => {
                writeln!(self.writer, "Refusing to delete nonexistent card {id}")
            }
            ClearOutcome::NothingToClear => writeln!(self.writer, "There are no cards to clear"),
            ClearOutcome::Declined => Ok(()),
        }
    }
}
