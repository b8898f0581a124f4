//! Services - the collaborators a folder tree is built with.
//!
//! One `Services` value is shared (behind an `Rc`) by every folder of a tree.
//! It bundles the interaction source, the identity and color generators and
//! the live-node arena.
//!
//! ```ignore
//! let hub = Rc::new(InteractionHub::new());
//! let services = Services::new(hub.clone())
//!     .with_ids(RandomIds::seeded(1))
//!     .with_colors(FixedColor(Rgba::WHITE))
//!     .into_shared();
//! ```

use std::fmt;
use std::rc::Rc;

use crate::engine::{IdentityGenerator, NodeArena, SequentialIds};
use crate::state::EventSource;
use crate::theme::{ColorGenerator, SeededColors};

pub struct Services {
    source: Rc<dyn EventSource>,
    ids: Box<dyn IdentityGenerator>,
    colors: Box<dyn ColorGenerator>,
    arena: NodeArena,
}

impl Services {
    /// Services with sequential ids (`f1`, `f2`, ...) and seeded colors.
    pub fn new(source: Rc<dyn EventSource>) -> Self {
        Self {
            source,
            ids: Box::new(SequentialIds::default()),
            colors: Box::new(SeededColors::default()),
            arena: NodeArena::new(),
        }
    }

    pub fn with_ids(mut self, ids: impl IdentityGenerator + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn with_colors(mut self, colors: impl ColorGenerator + 'static) -> Self {
        self.colors = Box::new(colors);
        self
    }

    pub fn into_shared(self) -> Rc<Self> {
        Rc::new(self)
    }

    pub fn source(&self) -> &dyn EventSource {
        self.source.as_ref()
    }

    pub fn ids(&self) -> &dyn IdentityGenerator {
        self.ids.as_ref()
    }

    pub fn colors(&self) -> &dyn ColorGenerator {
        self.colors.as_ref()
    }

    pub fn arena(&self) -> &NodeArena {
        &self.arena
    }
}

impl fmt::Debug for Services {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Services")
            .field("live_nodes", &self.arena.allocated_count())
            .finish_non_exhaustive()
    }
}
