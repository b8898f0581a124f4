//! Reactive Pipeline
//!
//! Connects the stream-based folder tree to signal-based consumers.
//!
//! ```text
//! root render stream → tree signal → outline derived / redraw effect
//! ```

pub mod mount;

pub use mount::{MountHandle, create_outline_derived, mount};
