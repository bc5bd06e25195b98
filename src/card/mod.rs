//!  Everything about the cards themselves lives here.
//!  The basic idea is:
//!   - [store::CardStore] holds every card, keyed by [id::CardId], and is loaded and saved as a
//!     whole for each command.
//!   - Each card has at most one current punch and a history of closed punches.
//!   - [punch] moves a card through its in/out cycle, [lifecycle] renames and clears cards and
//!     [report] prints them.
//!   - Questions to the user go through [confirm::Confirm] and time comes from
//!     [crate::utils::clock::Clock], so none of it needs a terminal or the real time.

pub mod confirm;
pub mod entities;
pub mod error;
pub mod id;
pub mod lifecycle;
pub mod punch;
pub mod report;
pub mod store;
