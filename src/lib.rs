//! folio - terminal portfolio viewer
//!
//! Content comes from three places, in increasing order of preference:
//! the built-in fallback, the static backup document, and the live API.
//! The reconciler publishes whichever is best so far into a watch channel
//! that the TUI and the CLI read from.

pub mod backup;
pub mod client;
pub mod config;
pub mod content;
pub mod error;
pub mod fallback;
pub mod logging;
pub mod models;
pub mod reconcile;
pub mod terminal;
pub mod theme;
pub mod time_source;
pub mod transform;
pub mod ui;
