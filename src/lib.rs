//! Orientation-based image sorting with retrying moves, an undo ledger, and
//! an asynchronous progress channel.
//!
//! [`grouper::ImageGrouper`] is the entry point for interactive callers;
//! [`engine`] wires it to the command line.

pub mod channel;
pub mod classify;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod exit_codes;
pub mod fsops;
pub mod generate;
pub mod grouper;
pub mod ledger;
pub mod model;
pub mod mover;
pub mod orchestrator;
pub mod reporter;
pub mod session;
pub mod state;

#[cfg(test)]
mod test_support;

pub use error::{ClassifyError, GrouperError, MoveError};
pub use events::ProgressEvent;
pub use grouper::ImageGrouper;
pub use ledger::UndoLedger;
pub use model::{Destination, MoveRecord};
pub use mover::{RetryPolicy, SafeMover};
