//! Prompt construction.
//!
//! Pure string templating: a target name, an ordered attribute list and a
//! language tag become one instruction for the upstream model. No state,
//! no I/O, no failure modes.

pub mod builder;
pub mod language;

pub use builder::{build, PromptBuilder};
pub use language::Language;
