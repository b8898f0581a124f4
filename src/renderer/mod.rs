//! Renderers - turn a folder render tree into text.
//!
//! - [`outline`] - plain indented outline (logs, tests)
//! - [`ansi`] - truecolor terminal output via crossterm

pub mod ansi;
pub mod outline;

pub use ansi::{draw, paint};
pub use outline::{FolderLine, lines, outline};
