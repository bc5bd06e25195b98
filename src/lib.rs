//! A command line time-card system. Up to ten named cards are punched in and out, and their
//! punches are kept in a JSON document so totals can be shown later.
//!

pub mod card;
pub mod cli;
pub mod storage;
pub mod utils;
