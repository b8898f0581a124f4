//! Folder component - wiring intent, model and view into one instance.
//!
//! # Construction
//!
//! A folder's action stream depends on the action streams of its children,
//! and the children only exist once the folder has processed its own
//! actions. The loop is closed with a [`ProxyStream`]: the intent listens to
//! the proxy, and once the model is built the proxy imitates the merged
//! actions of the current children.
//!
//! ```text
//!   add/remove clicks ──┐
//!                       ├─► intent ─► actions ─► model ─► registry ─┬─► view ─► render
//!   proxy ──────────────┘                                           │
//!     ▲                                                             │
//!     └──── merge(children's actions), gated by own removal ◄───────┘
//! ```
//!
//! # Lifecycle
//!
//! `Active → Removed`, once. A folder is kept hot by its own lifecycle
//! watcher. It ends when it emits its own `RemoveSelf`, when it is disposed,
//! or when its model fails; a disposed or failed folder emits a `RemoveSelf`
//! first so its parent lets go of it.
//!
//! Teardown is owned by a `spark_signals` effect scope per folder. Stopping
//! the scope disposes the children still in the registry, then gives back
//! the folder's interaction channels and its identity.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use spark_signals::{effect_scope, on_scope_dispose};
use tracing::{debug, error};

use super::intent::intent;
use super::model::{ChildRegistry, ChildSpawner, model};
use super::view::{ADD, REMOVE, ViewProps, project};
use crate::engine::Scope;
use crate::error::FolderError;
use crate::services::Services;
use crate::stream::{Cleanup, Emission, ProxyStream, Stream, Subject, Subscription};
use crate::types::{Action, ActionKind, NodeId, NodeState, RenderNode, Rgba};

// =============================================================================
// Props
// =============================================================================

/// Construction parameters of one folder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FolderProps {
    pub id: NodeId,
    /// Whether the folder shows a "Remove me" control.
    pub removable: bool,
}

impl FolderProps {
    /// A top-level folder. Cannot remove itself.
    pub fn root(id: impl Into<NodeId>) -> Self {
        Self { id: id.into(), removable: false }
    }

    /// A nested folder.
    pub fn child(id: impl Into<NodeId>) -> Self {
        Self { id: id.into(), removable: true }
    }
}

impl Default for FolderProps {
    fn default() -> Self {
        Self::root("root")
    }
}

// =============================================================================
// Lifecycle
// =============================================================================

struct Lifecycle {
    id: NodeId,
    scope: Scope,
    removable: bool,
    state: Cell<NodeState>,
    latest: RefCell<ChildRegistry>,
    kill: Subject<()>,
    retire: Subject<()>,
    /// Stops the folder's effect scope, which runs its teardown.
    stop: RefCell<Option<Cleanup>>,
    watch: RefCell<Option<Subscription>>,
}

impl Lifecycle {
    fn observe(&self, emission: Emission<ChildRegistry>) {
        match emission {
            Emission::Next(registry) => {
                let previous = self.latest.replace(registry);
                drop(previous);
            }
            Emission::Error(err) => {
                error!(node = %self.id, scope = %self.scope, %err, "folder failed");
                // Leave the parent's registry the normal way, then go down.
                self.retire.next(());
                self.terminate();
            }
            Emission::Complete => self.terminate(),
        }
    }

    fn terminate(&self) {
        if self.state.replace(NodeState::Removed) == NodeState::Removed {
            return;
        }
        self.kill.next(());

        let stop = self.stop.borrow_mut().take();
        if let Some(stop) = stop {
            stop();
        }
        debug!(node = %self.id, scope = %self.scope, "folder removed");

        let watch = self.watch.borrow_mut().take();
        drop(watch);
    }

    /// Registered with the folder's effect scope.
    fn release(&self, services: &Services) {
        let orphans = std::mem::take(&mut *self.latest.borrow_mut());
        for child in orphans.handles() {
            child.discard();
        }
        drop(orphans);

        services.source().release(&self.scope);
        services.arena().release(&self.id);
    }
}

// =============================================================================
// FolderHandle
// =============================================================================

/// What a folder exposes to whoever created it.
#[derive(Clone)]
pub struct FolderHandle {
    id: NodeId,
    render: Stream<RenderNode>,
    actions: Stream<Action>,
    lifecycle: Rc<Lifecycle>,
}

impl FolderHandle {
    pub fn id(&self) -> &NodeId {
        &self.id
    }

    /// Latest render tree of this folder and everything below it. Remembered.
    pub fn render(&self) -> Stream<RenderNode> {
        self.render.clone()
    }

    /// Every action of this folder, including children's removals retagged
    /// as `RemoveChild`. Ends right after the folder's own `RemoveSelf`.
    pub fn actions(&self) -> Stream<Action> {
        self.actions.clone()
    }

    pub fn scope(&self) -> &Scope {
        &self.lifecycle.scope
    }

    pub fn state(&self) -> NodeState {
        self.lifecycle.state.get()
    }

    pub fn is_removed(&self) -> bool {
        self.state() == NodeState::Removed
    }

    /// Current registry snapshot. Empty once removed.
    pub fn children(&self) -> ChildRegistry {
        self.lifecycle.latest.borrow().clone()
    }

    pub fn child_ids(&self) -> Vec<NodeId> {
        self.lifecycle.latest.borrow().ids()
    }

    pub fn child(&self, id: &NodeId) -> Option<FolderHandle> {
        self.lifecycle.latest.borrow().get(id).cloned()
    }

    /// Tear the folder and its subtree down without a "remove" interaction.
    ///
    /// A nested folder first emits its own `RemoveSelf`, so its parent drops
    /// it exactly as if "Remove me" had been clicked.
    pub fn dispose(&self) {
        if self.is_removed() {
            return;
        }
        if self.lifecycle.removable {
            self.lifecycle.retire.next(());
        }
        self.discard();
    }

    /// End the folder without telling its parent. Only for folders whose
    /// parent has already let go of them.
    pub(crate) fn discard(&self) {
        if !self.is_removed() {
            self.lifecycle.kill.next(());
        }
    }
}

impl fmt::Debug for FolderHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FolderHandle")
            .field("id", &self.id)
            .field("scope", &self.lifecycle.scope.to_string())
            .field("state", &self.state())
            .field("children", &self.lifecycle.latest.borrow().len())
            .finish()
    }
}

// =============================================================================
// Construction
// =============================================================================

struct FolderSpawner {
    services: Rc<Services>,
    scope: Scope,
}

impl ChildSpawner for FolderSpawner {
    fn mint(&self) -> NodeId {
        self.services.ids().next_id()
    }

    fn spawn(&self, id: &NodeId) -> Result<FolderHandle, FolderError> {
        create_folder(&self.services, Some(&self.scope), FolderProps::child(id.clone()))
    }
}

/// Streams of one folder before its lifecycle is attached.
struct Wiring {
    actions: Stream<Action>,
    children: Stream<ChildRegistry>,
    render: Stream<RenderNode>,
    kill: Subject<()>,
    retire: Subject<()>,
    color: Rgba,
}

fn wire(services: &Rc<Services>, id: &NodeId, scope: &Scope, removable: bool) -> Result<Wiring, FolderError> {
    let add = services.source().select(scope, ADD)?;
    let retire: Subject<()> = Subject::new();
    let remove = if removable {
        let clicks = services.source().select(scope, REMOVE)?;
        Stream::merge(vec![clicks.map_to(()), retire.stream()])
    } else {
        retire.stream()
    };

    let proxy: ProxyStream<Action> = ProxyStream::new();
    let kill: Subject<()> = Subject::new();

    let own_id = id.clone();
    let actions = intent(id, &add, &remove, &proxy.stream())
        .end_after(move |action| action.is_removal_of(&own_id))
        .end_when(&kill.stream());

    let spawner = FolderSpawner { services: Rc::clone(services), scope: scope.clone() };
    let children = model(&actions, spawner);

    let removed = actions.filter(|action| action.kind == ActionKind::RemoveSelf).take(1);
    let child_actions = children
        .map(|registry| Stream::merge(registry.action_streams()))
        .flatten();
    proxy.imitate(&child_actions.end_when(&removed))?;

    let color = services.colors().next_color();
    let render = project(&children, ViewProps { scope: scope.clone(), removable, color });

    Ok(Wiring { actions, children, render, kill, retire, color })
}

/// Build one folder under `parent` (or as a root when `None`).
///
/// Fails if the identity is already taken or the event source refuses the
/// folder's controls. Nothing is left registered on failure; an identity
/// that failed after allocation stays retired.
pub fn create_folder(
    services: &Rc<Services>,
    parent: Option<&Scope>,
    props: FolderProps,
) -> Result<FolderHandle, FolderError> {
    let id = props.id;
    let scope = match parent {
        Some(parent) => parent.child(&id),
        None => Scope::root(&id),
    };

    services.arena().allocate(&id, &scope)?;
    let Wiring { actions, children, render, kill, retire, color } =
        wire(services, &id, &scope, props.removable).inspect_err(|_| {
            services.source().release(&scope);
            services.arena().release(&id);
        })?;

    let lifecycle = Rc::new(Lifecycle {
        id: id.clone(),
        scope,
        removable: props.removable,
        state: Cell::new(NodeState::Active),
        latest: RefCell::new(ChildRegistry::default()),
        kill,
        retire,
        stop: RefCell::new(None),
        watch: RefCell::new(None),
    });

    let fx = effect_scope(false);
    let owner = Rc::downgrade(&lifecycle);
    let shared = Rc::clone(services);
    fx.run(move || {
        on_scope_dispose(move || {
            if let Some(lifecycle) = owner.upgrade() {
                lifecycle.release(&shared);
            }
        });
    });
    *lifecycle.stop.borrow_mut() = Some(Box::new(move || fx.stop()));

    let watcher = Rc::clone(&lifecycle);
    let watch = children.subscribe(move |emission| watcher.observe(emission));
    if lifecycle.state.get() == NodeState::Active {
        *lifecycle.watch.borrow_mut() = Some(watch);
    }

    debug!(node = %id, scope = %lifecycle.scope, color = %color.to_hex(), "folder created");
    Ok(FolderHandle { id, render, actions, lifecycle })
}
