//! Identity generation.
//!
//! The core only relies on uniqueness over the whole tree's lifetime. Two
//! generators ship with the crate:
//! - [`SequentialIds`] - `f1`, `f2`, ... (deterministic, the default)
//! - [`RandomIds`] - seeded random decimal strings

use std::cell::{Cell, RefCell};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::types::NodeId;

/// Source of fresh node identities.
pub trait IdentityGenerator {
    fn next_id(&self) -> NodeId;
}

/// Prefix plus a monotonically increasing counter.
#[derive(Debug)]
pub struct SequentialIds {
    prefix: String,
    counter: Cell<u64>,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into(), counter: Cell::new(0) }
    }

    /// Number of ids handed out so far.
    pub fn issued(&self) -> u64 {
        self.counter.get()
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new("f")
    }
}

impl IdentityGenerator for SequentialIds {
    fn next_id(&self) -> NodeId {
        let next = self.counter.get() + 1;
        self.counter.set(next);
        NodeId::new(format!("{}{}", self.prefix, next))
    }
}

/// Random sixteen-digit decimal strings from a seeded generator.
///
/// Collisions are improbable, not impossible; the arena reports one as
/// [`FolderError::IdentityCollision`](crate::FolderError::IdentityCollision).
#[derive(Debug)]
pub struct RandomIds {
    rng: RefCell<StdRng>,
}

impl RandomIds {
    pub fn seeded(seed: u64) -> Self {
        Self { rng: RefCell::new(StdRng::seed_from_u64(seed)) }
    }

    pub fn from_entropy() -> Self {
        Self { rng: RefCell::new(StdRng::from_entropy()) }
    }
}

impl IdentityGenerator for RandomIds {
    fn next_id(&self) -> NodeId {
        let value: u64 = self.rng.borrow_mut().gen_range(0..10_000_000_000_000_000);
        NodeId::new(format!("{value:016}"))
    }
}
