//! Commit event input schema
//!
//! This module defines the raw event shape handed over by a fetch layer (GitHub
//! API, `git log`, exported JSON) and the adapter that parses batches of them.

mod adapter;
mod commit_event;

pub use adapter::*;
pub use commit_event::*;
