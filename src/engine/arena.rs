//! Node Arena - bookkeeping for live folder instances.
//!
//! Tracks every live instance by identity:
//! - identity → record (scope, parent) in creation order
//! - collision detection: an identity can only be live once
//!
//! Identities are never reused, so released ids stay retired.

use std::cell::RefCell;
use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::trace;

use crate::engine::Scope;
use crate::error::FolderError;
use crate::types::NodeId;

/// What the arena knows about one live instance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeRecord {
    pub scope: Scope,
    pub parent: Option<NodeId>,
}

/// Registry of live folder instances, shared by the whole tree.
#[derive(Default)]
pub struct NodeArena {
    live: RefCell<IndexMap<NodeId, NodeRecord>>,
    retired: RefCell<HashSet<NodeId>>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Allocation
    // =========================================================================

    /// Record a new live instance.
    ///
    /// Fails if the identity is live or was used before.
    pub fn allocate(&self, id: &NodeId, scope: &Scope) -> Result<(), FolderError> {
        if self.live.borrow().contains_key(id) || self.retired.borrow().contains(id) {
            return Err(FolderError::IdentityCollision(id.clone()));
        }
        let record = NodeRecord {
            scope: scope.clone(),
            parent: scope.parent().map(|parent| parent.leaf().clone()),
        };
        self.live.borrow_mut().insert(id.clone(), record);
        trace!(node = %id, "allocated");
        Ok(())
    }

    /// Retire an instance. No-op if not live.
    pub fn release(&self, id: &NodeId) {
        let removed = self.live.borrow_mut().shift_remove(id);
        if removed.is_none() {
            return;
        }
        self.retired.borrow_mut().insert(id.clone());
        trace!(node = %id, "released");
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    pub fn is_allocated(&self, id: &NodeId) -> bool {
        self.live.borrow().contains_key(id)
    }

    pub fn allocated_count(&self) -> usize {
        self.live.borrow().len()
    }

    /// Live identities in creation order.
    pub fn allocated_ids(&self) -> Vec<NodeId> {
        self.live.borrow().keys().cloned().collect()
    }

    pub fn record(&self, id: &NodeId) -> Option<NodeRecord> {
        self.live.borrow().get(id).cloned()
    }

    /// Live instances whose parent is `id`, in creation order.
    pub fn children_of(&self, id: &NodeId) -> Vec<NodeId> {
        self.live
            .borrow()
            .iter()
            .filter(|(_, record)| record.parent.as_ref() == Some(id))
            .map(|(child, _)| child.clone())
            .collect()
    }
}
