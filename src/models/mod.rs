//! Data models for the election service.
//!
//! Field names serialize as camelCase to match the voting client.

mod election;
mod results;
mod vote;
mod voter;

pub use election::*;
pub use results::*;
pub use vote::*;
pub use voter::*;
