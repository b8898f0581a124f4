//! State - input plumbing shared by every folder.
//!
//! - [`interaction`] - scoped interaction sources

pub mod interaction;

pub use interaction::{EventSource, Interaction, InteractionHub, InteractionKind};
