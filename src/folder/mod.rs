//! Folder - the recursively nestable component.
//!
//! A folder is split the usual way:
//!
//! - [`intent`] - clicks and child actions in, [`Action`](crate::Action)s out
//! - [`model`] - actions folded into the registry of direct children
//! - [`view`] - registry and child trees projected into a render tree
//! - [`component`] - the wiring, including the child-action feedback loop
//!
//! # Example
//!
//! ```ignore
//! let hub = Rc::new(InteractionHub::new());
//! let services = Services::new(hub.clone()).into_shared();
//! let root = create_folder(&services, None, FolderProps::root("root"))?;
//!
//! hub.click(root.scope(), view::ADD);
//! assert_eq!(root.child_ids(), vec![NodeId::from("f1")]);
//! ```

pub mod component;
pub mod intent;
pub mod model;
pub mod view;

pub use component::{FolderHandle, FolderProps, create_folder};
pub use intent::intent;
pub use model::{ChildRegistry, ChildSpawner, model};
pub use view::{ViewProps, project, view};
