//! Mount API - root folder lifecycle and the reactive tree signal.
//!
//! `mount` creates the root folder and pipes its render stream into a
//! `spark_signals::Signal`, so anything built on signals (deriveds, effects,
//! the terminal redraw in the demo) follows the tree without touching
//! streams.
//!
//! # Example
//!
//! ```ignore
//! use spark_folders::pipeline::{mount, create_outline_derived};
//!
//! let handle = mount(&services, FolderProps::root("root"))?;
//! let outline = create_outline_derived(handle.tree_signal());
//!
//! hub.click(handle.root().scope(), "add");
//! println!("{}", outline.get());
//!
//! handle.unmount();
//! ```

use std::fmt;
use std::rc::Rc;

use spark_signals::{Derived, Signal, derived, signal};
use tracing::{debug, error};

use crate::error::FolderError;
use crate::folder::{FolderHandle, FolderProps, create_folder};
use crate::renderer::outline;
use crate::services::Services;
use crate::stream::{Emission, Subscription};
use crate::types::RenderNode;

// =============================================================================
// Mount Handle
// =============================================================================

/// Handle returned by [`mount`]. Dropping it disposes the whole tree.
pub struct MountHandle {
    root: FolderHandle,
    tree: Signal<Option<RenderNode>>,
    subscription: Option<Subscription>,
}

impl MountHandle {
    pub fn root(&self) -> &FolderHandle {
        &self.root
    }

    /// Latest render tree. `None` once unmounted.
    pub fn tree(&self) -> Option<RenderNode> {
        self.tree.get()
    }

    /// The signal holding the latest render tree.
    pub fn tree_signal(&self) -> Signal<Option<RenderNode>> {
        self.tree.clone()
    }

    pub fn is_mounted(&self) -> bool {
        self.subscription.is_some()
    }

    /// Stop rendering and dispose the root with its subtree.
    pub fn unmount(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        let Some(subscription) = self.subscription.take() else { return };
        drop(subscription);
        self.root.dispose();
        self.tree.set(None);
        debug!(root = %self.root.id(), "unmounted");
    }
}

impl Drop for MountHandle {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl fmt::Debug for MountHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MountHandle")
            .field("root", &self.root)
            .field("mounted", &self.is_mounted())
            .finish()
    }
}

// =============================================================================
// Mount Function
// =============================================================================

/// Create the root folder and start rendering it.
///
/// The returned handle's tree signal is set synchronously, before `mount`
/// returns, and again after every change anywhere in the tree.
pub fn mount(services: &Rc<Services>, props: FolderProps) -> Result<MountHandle, FolderError> {
    let root = create_folder(services, None, props)?;
    let tree = signal(None::<RenderNode>);

    let target = tree.clone();
    let root_id = root.id().clone();
    let subscription = root.render().subscribe(move |emission| match emission {
        Emission::Next(rendered) => {
            target.set(Some(rendered));
        }
        Emission::Error(err) => error!(root = %root_id, %err, "render stream failed"),
        Emission::Complete => debug!(root = %root_id, "render stream completed"),
    });

    debug!(root = %root.id(), "mounted");
    Ok(MountHandle { root, tree, subscription: Some(subscription) })
}

/// Derived plain-text outline of the mounted tree. Empty when nothing is
/// mounted.
pub fn create_outline_derived(
    tree: Signal<Option<RenderNode>>,
) -> Derived<String> {
    derived(move || tree.get().as_ref().map(outline::outline).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::folder::view::ADD;
    use crate::state::InteractionHub;

    fn setup() -> (Rc<InteractionHub>, Rc<Services>) {
        let hub = Rc::new(InteractionHub::new());
        let services = Services::new(hub.clone()).into_shared();
        (hub, services)
    }

    #[test]
    fn test_mount_sets_tree_immediately() {
        let (_hub, services) = setup();
        let handle = mount(&services, FolderProps::default()).unwrap();

        let tree = handle.tree().expect("tree rendered on mount");
        assert_eq!(tree.text_content(), "Add Folder");
    }

    #[test]
    fn test_outline_derived_follows_clicks() {
        let (hub, services) = setup();
        let handle = mount(&services, FolderProps::default()).unwrap();
        let outline = create_outline_derived(handle.tree_signal());

        assert_eq!(outline.get().lines().count(), 1);
        hub.click(handle.root().scope(), ADD);
        assert_eq!(outline.get().lines().count(), 2, "derived recomputes on tree change");
        assert!(outline.get().contains("root/f1"));
    }

    #[test]
    fn test_unmount_disposes_tree() {
        let (hub, services) = setup();
        let handle = mount(&services, FolderProps::default()).unwrap();
        hub.click(handle.root().scope(), ADD);
        let root = handle.root().clone();
        let signal = handle.tree_signal();

        handle.unmount();

        assert!(root.is_removed());
        assert_eq!(services.arena().allocated_count(), 0);
        assert_eq!(signal.get(), None);
    }
}
