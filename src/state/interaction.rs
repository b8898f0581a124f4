//! Interaction sources.
//!
//! Folders never talk to an input device directly. They ask an
//! [`EventSource`] for the stream of interactions on one of their controls,
//! addressed by the folder's [`Scope`] plus a local selector. Two folders
//! asking for `"add"` under different scopes get unrelated streams.
//!
//! [`InteractionHub`] is the in-memory source: the application (or a test)
//! pushes clicks into it with [`InteractionHub::click`].
//!
//! ```ignore
//! let hub = InteractionHub::new();
//! let adds = hub.select(&scope, "add")?;
//! let _sub = adds.subscribe(|e| println!("{e:?}"));
//! hub.click(&scope, "add");
//! ```

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use tracing::{debug, trace};

use crate::engine::Scope;
use crate::error::FolderError;
use crate::stream::{Stream, Subject};

// =============================================================================
// Types
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InteractionKind {
    Click,
}

/// One user interaction on a scoped control.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Interaction {
    pub scope: Scope,
    pub selector: String,
    pub kind: InteractionKind,
}

/// Provider of scoped interaction streams.
pub trait EventSource {
    /// Stream of interactions on `selector` inside `scope`.
    fn select(&self, scope: &Scope, selector: &str) -> Result<Stream<Interaction>, FolderError>;

    /// Called once when the folder owning `scope` is gone.
    fn release(&self, _scope: &Scope) {}
}

// =============================================================================
// InteractionHub
// =============================================================================

type ChannelKey = (Scope, String);

/// In-memory [`EventSource`] with one channel per scoped control.
#[derive(Default)]
pub struct InteractionHub {
    channels: RefCell<HashMap<ChannelKey, Subject<Interaction>>>,
    closed: Cell<bool>,
}

impl InteractionHub {
    pub fn new() -> Self {
        Self::default()
    }

    fn channel(&self, scope: &Scope, selector: &str) -> Subject<Interaction> {
        self.channels
            .borrow_mut()
            .entry((scope.clone(), selector.to_string()))
            .or_default()
            .clone()
    }

    /// Dispatch a click. Returns how many listeners it reached.
    pub fn click(&self, scope: &Scope, selector: &str) -> usize {
        // Clone out so listeners may select or release while we dispatch.
        let subject = self.channels.borrow().get(&(scope.clone(), selector.to_string())).cloned();
        let Some(subject) = subject else {
            trace!(scope = %scope, selector, "click on unknown control");
            return 0;
        };
        let reached = subject.listener_count();
        subject.next(Interaction {
            scope: scope.clone(),
            selector: selector.to_string(),
            kind: InteractionKind::Click,
        });
        reached
    }

    /// Listeners attached to one control.
    pub fn listener_count(&self, scope: &Scope, selector: &str) -> usize {
        self.channels
            .borrow()
            .get(&(scope.clone(), selector.to_string()))
            .map_or(0, Subject::listener_count)
    }

    /// Listeners attached anywhere under `scope`, including nested scopes.
    pub fn listeners_under(&self, scope: &Scope) -> usize {
        self.channels
            .borrow()
            .iter()
            .filter(|((owner, _), _)| scope.encloses(owner))
            .map(|(_, subject)| subject.listener_count())
            .sum()
    }

    pub fn channel_count(&self) -> usize {
        self.channels.borrow().len()
    }

    /// Refuse further selections. Existing streams keep working.
    pub fn close(&self) {
        self.closed.set(true);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.get()
    }
}

impl EventSource for InteractionHub {
    fn select(&self, scope: &Scope, selector: &str) -> Result<Stream<Interaction>, FolderError> {
        if self.closed.get() {
            return Err(FolderError::SourceUnavailable { scope: scope.to_string() });
        }
        Ok(self.channel(scope, selector).stream())
    }

    fn release(&self, scope: &Scope) {
        let before = self.channels.borrow().len();
        self.channels.borrow_mut().retain(|(owner, _), _| owner != scope);
        debug!(scope = %scope, released = before - self.channels.borrow().len(), "channels released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::Emission;
    use crate::types::NodeId;
    use std::rc::Rc;

    fn scope(path: &str) -> Scope {
        Scope::parse(path).unwrap()
    }

    #[test]
    fn test_select_and_click() {
        let hub = InteractionHub::new();
        let root = scope("root");
        let clicks = Rc::new(Cell::new(0));

        let counted = Rc::clone(&clicks);
        let _sub = hub.select(&root, "add").unwrap().subscribe(move |emission| {
            if let Emission::Next(interaction) = emission {
                assert_eq!(interaction.kind, InteractionKind::Click);
                counted.set(counted.get() + 1);
            }
        });

        assert_eq!(hub.click(&root, "add"), 1);
        assert_eq!(hub.click(&root, "remove"), 0, "unknown control reaches nobody");
        assert_eq!(clicks.get(), 1);
    }

    #[test]
    fn test_scopes_are_isolated() {
        let hub = InteractionHub::new();
        let a = scope("root/f1");
        let b = scope("root/f2");
        let hits = Rc::new(Cell::new(0));

        let counted = Rc::clone(&hits);
        let _sub = hub.select(&a, "add").unwrap().subscribe(move |_| counted.set(counted.get() + 1));
        let _other = hub.select(&b, "add").unwrap().subscribe(|_| {});

        hub.click(&b, "add");
        assert_eq!(hits.get(), 0, "sibling click does not leak");
        hub.click(&a, "add");
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_listeners_under_counts_nested_scopes() {
        let hub = InteractionHub::new();
        let root = scope("root");
        let child = root.child(&NodeId::from("f1"));

        let _a = hub.select(&root, "add").unwrap().subscribe(|_| {});
        let _b = hub.select(&child, "add").unwrap().subscribe(|_| {});

        assert_eq!(hub.listeners_under(&root), 2);
        assert_eq!(hub.listeners_under(&child), 1);
    }

    #[test]
    fn test_closed_hub_refuses_selection() {
        let hub = InteractionHub::new();
        hub.close();
        assert_eq!(
            hub.select(&scope("root"), "add").map(|_| ()),
            Err(FolderError::SourceUnavailable { scope: "root".into() })
        );
        assert!(hub.is_closed());
    }

    #[test]
    fn test_release_drops_scope_channels() {
        let hub = InteractionHub::new();
        let a = scope("root/f1");
        let _ = hub.select(&a, "add").unwrap();
        let _ = hub.select(&a, "remove").unwrap();
        let _ = hub.select(&scope("root"), "add").unwrap();
        assert_eq!(hub.channel_count(), 3);

        hub.release(&a);
        assert_eq!(hub.channel_count(), 1);
    }
}
