//! Shipyard CLI library.
//!
//! Terminal styling and output formatting shared by the `shipyard` binary's
//! command handlers.

pub mod output;
pub mod terminal;
