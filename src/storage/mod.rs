//! Storage of cards is organized through [card_storage::JsonCardStorage].
//!  - All cards live in a single pretty printed JSON document inside the application directory.
//!  - The document is replaced as a whole on every save, through a temporary file and a rename.
//!  - Cleared cards are moved into a single `.old` document next to it.
//!  - A sibling `.lock` file is locked for the duration of a command.

pub mod card_storage;
