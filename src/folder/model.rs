//! Model - the children registry of one folder.
//!
//! The registry is the fold of a folder's actions, seeded empty:
//!
//! - `AddChild` mints an identity, spawns the child and appends it
//! - `RemoveChild(x)` drops `x` (nothing happens if `x` is already gone)
//! - any other action leaves the registry alone and emits nothing
//!
//! A spawn failure or an identity already present in the registry ends the
//! fold with that error.

use indexmap::IndexMap;
use tracing::trace;

use super::component::FolderHandle;
use crate::error::FolderError;
use crate::stream::Stream;
use crate::types::{Action, ActionKind, NodeId, RenderNode};

// =============================================================================
// Spawning
// =============================================================================

/// How the model creates children.
pub trait ChildSpawner {
    /// Fresh identity for the next child.
    fn mint(&self) -> NodeId;

    /// Build the child with identity `id`.
    fn spawn(&self, id: &NodeId) -> Result<FolderHandle, FolderError>;
}

// =============================================================================
// ChildRegistry
// =============================================================================

/// Direct children of a folder in creation order.
#[derive(Clone, Debug, Default)]
pub struct ChildRegistry {
    entries: IndexMap<NodeId, FolderHandle>,
}

impl ChildRegistry {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn get(&self, id: &NodeId) -> Option<&FolderHandle> {
        self.entries.get(id)
    }

    pub fn ids(&self) -> Vec<NodeId> {
        self.entries.keys().cloned().collect()
    }

    pub fn handles(&self) -> impl Iterator<Item = &FolderHandle> {
        self.entries.values()
    }

    pub fn action_streams(&self) -> Vec<Stream<Action>> {
        self.entries.values().map(FolderHandle::actions).collect()
    }

    pub fn render_streams(&self) -> Vec<Stream<RenderNode>> {
        self.entries.values().map(FolderHandle::render).collect()
    }

    pub(crate) fn insert(&mut self, handle: FolderHandle) {
        self.entries.insert(handle.id().clone(), handle);
    }

    pub(crate) fn remove(&mut self, id: &NodeId) -> Option<FolderHandle> {
        self.entries.shift_remove(id)
    }
}

// =============================================================================
// Fold
// =============================================================================

/// Registry snapshots, one per registry-changing action. Remembered, seeded
/// with the empty registry.
pub fn model<S>(actions: &Stream<Action>, spawner: S) -> Stream<ChildRegistry>
where
    S: ChildSpawner + 'static,
{
    actions
        .filter(|action| action.kind.touches_registry())
        .try_fold(ChildRegistry::default(), move |registry, action| apply(&spawner, registry, action))
}

fn apply(
    spawner: &impl ChildSpawner,
    mut registry: ChildRegistry,
    action: Action,
) -> Result<ChildRegistry, FolderError> {
    match action.kind {
        ActionKind::AddChild => {
            let id = spawner.mint();
            if registry.contains(&id) {
                return Err(FolderError::IdentityCollision(id));
            }
            let child = spawner.spawn(&id)?;
            registry.insert(child);
        }
        ActionKind::RemoveChild => {
            if registry.remove(&action.origin).is_none() {
                trace!(child = %action.origin, "remove of absent child ignored");
            }
        }
        ActionKind::RemoveSelf => {}
    }
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    use crate::engine::{IdentityGenerator, Scope, SequentialIds};
    use crate::folder::{FolderProps, create_folder};
    use crate::services::Services;
    use crate::state::InteractionHub;
    use crate::stream::Subject;
    use crate::stream::testing::Recorder;

    /// Spawns real folders under a fixed parent scope.
    struct TestSpawner {
        services: Rc<Services>,
        ids: SequentialIds,
        parent: Scope,
    }

    impl TestSpawner {
        fn new() -> Self {
            let services = Services::new(Rc::new(InteractionHub::new())).into_shared();
            Self {
                services,
                ids: SequentialIds::new("c"),
                parent: Scope::root(&NodeId::from("root")),
            }
        }
    }

    impl ChildSpawner for TestSpawner {
        fn mint(&self) -> NodeId {
            self.ids.next_id()
        }

        fn spawn(&self, id: &NodeId) -> Result<FolderHandle, FolderError> {
            create_folder(&self.services, Some(&self.parent), FolderProps::child(id.clone()))
        }
    }

    /// Always mints the same identity.
    struct StuckSpawner(TestSpawner);

    impl ChildSpawner for StuckSpawner {
        fn mint(&self) -> NodeId {
            NodeId::from("same")
        }

        fn spawn(&self, id: &NodeId) -> Result<FolderHandle, FolderError> {
            self.0.spawn(id)
        }
    }

    fn sizes(recorder: &Recorder<ChildRegistry>) -> Vec<usize> {
        recorder.values().iter().map(ChildRegistry::len).collect()
    }

    #[test]
    fn test_seed_is_empty_registry() {
        let actions: Subject<Action> = Subject::new();
        let registry = model(&actions.stream(), TestSpawner::new());
        let recorder = Recorder::attach(&registry);

        assert_eq!(sizes(&recorder), vec![0]);
    }

    #[test]
    fn test_add_and_remove() {
        let actions: Subject<Action> = Subject::new();
        let parent = NodeId::from("root");
        let registry = model(&actions.stream(), TestSpawner::new());
        let recorder = Recorder::attach(&registry);

        actions.next(Action::add_child(parent.clone()));
        actions.next(Action::add_child(parent.clone()));
        actions.next(Action::remove_child(NodeId::from("c1")));

        assert_eq!(sizes(&recorder), vec![0, 1, 2, 1]);
        let latest = registry.last().unwrap();
        assert_eq!(latest.ids(), vec![NodeId::from("c2")]);
    }

    #[test]
    fn test_duplicate_remove_is_noop() {
        let actions: Subject<Action> = Subject::new();
        let registry = model(&actions.stream(), TestSpawner::new());
        let recorder = Recorder::attach(&registry);

        actions.next(Action::add_child(NodeId::from("root")));
        actions.next(Action::remove_child(NodeId::from("c1")));
        actions.next(Action::remove_child(NodeId::from("c1")));

        assert_eq!(sizes(&recorder), vec![0, 1, 0, 0], "second remove changes nothing");
        assert!(!registry.is_ended());
    }

    #[test]
    fn test_remove_self_emits_nothing() {
        let actions: Subject<Action> = Subject::new();
        let registry = model(&actions.stream(), TestSpawner::new());
        let recorder = Recorder::attach(&registry);

        actions.next(Action::remove_self(NodeId::from("root")));
        assert_eq!(sizes(&recorder), vec![0]);
    }

    #[test]
    fn test_identity_collision_ends_fold() {
        let actions: Subject<Action> = Subject::new();
        let registry = model(&actions.stream(), StuckSpawner(TestSpawner::new()));
        let recorder = Recorder::attach(&registry);

        actions.next(Action::add_child(NodeId::from("root")));
        actions.next(Action::add_child(NodeId::from("root")));

        assert_eq!(sizes(&recorder), vec![0, 1]);
        assert!(
            matches!(
                recorder.log.borrow().last(),
                Some(crate::stream::Emission::Error(FolderError::IdentityCollision(_)))
            ),
            "collision ends the fold with an error"
        );
    }
}
