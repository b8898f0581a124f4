//! # spark-folders
//!
//! Recursively nestable "folder" components on push-based streams.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for the
//! mounted tree and its derived views.
//!
//! ## Architecture
//!
//! Each folder is an intent → model → view loop over synchronous streams. A
//! folder can add children and a child can remove itself; the removal travels
//! up one level as a `RemoveChild` and the parent drops the child from its
//! registry in the same propagation pass.
//!
//! ```text
//! clicks → intent → actions → model (registry) → view → render
//!             ▲                       │
//!             └── children's actions ─┘   (closed through a proxy stream)
//! ```
//!
//! ## Modules
//!
//! - [`stream`] - push streams, subjects, operators and the proxy stream
//! - [`engine`] - scopes, identity generators, the live-node arena
//! - [`state`] - scoped interaction sources
//! - [`theme`] - folder colors and styling
//! - [`folder`] - the component: intent, model, view, wiring
//! - [`pipeline`] - mounting a root into signals
//! - [`renderer`] - outline and terminal output

pub mod engine;
pub mod error;
pub mod folder;
pub mod pipeline;
pub mod renderer;
pub mod services;
pub mod state;
pub mod stream;
pub mod theme;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use error::FolderError;

pub use engine::{IdentityGenerator, NodeArena, RandomIds, Scope, SequentialIds};

pub use folder::{ChildRegistry, FolderHandle, FolderProps, create_folder};

pub use pipeline::{MountHandle, create_outline_derived, mount};

pub use services::Services;

pub use state::{EventSource, Interaction, InteractionHub, InteractionKind};

pub use stream::{Emission, ProxyStream, Sink, Stream, Subject, Subscription};

pub use theme::{ColorGenerator, FixedColor, FolderStyle, SeededColors};
