//! Engine - identity, namespaces and live-instance bookkeeping.
//!
//! - [`namespace`] - `Scope` paths that isolate each instance
//! - [`identity`] - identity generators
//! - [`arena`] - live instances indexed by identity

pub mod arena;
pub mod identity;
pub mod namespace;

pub use arena::{NodeArena, NodeRecord};
pub use identity::{IdentityGenerator, RandomIds, SequentialIds};
pub use namespace::Scope;
