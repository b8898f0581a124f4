//! View - render tree for one folder.
//!
//! ```text
//! div (scope, style)
//! ├── button .add        "Add Folder"
//! ├── button .remove     "Remove me"      (removable folders only)
//! └── div
//!     ├── div key=f1 ── <f1's tree>
//!     └── div key=f4 ── <f4's tree>
//! ```

use crate::engine::Scope;
use crate::stream::Stream;
use crate::theme::FolderStyle;
use crate::types::{NodeId, RenderNode, Rgba};

use super::model::ChildRegistry;

/// Local selector of the add control.
pub const ADD: &str = "add";
/// Local selector of the remove control.
pub const REMOVE: &str = "remove";

pub const ADD_LABEL: &str = "Add Folder";
pub const REMOVE_LABEL: &str = "Remove me";

/// Everything the view needs besides the children.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewProps {
    pub scope: Scope,
    pub removable: bool,
    pub color: Rgba,
}

/// Project one folder. `children` are `(id, rendered child)` in registry order.
pub fn view(props: &ViewProps, children: Vec<(NodeId, RenderNode)>) -> RenderNode {
    let mut folder = RenderNode::element("div")
        .scoped(props.scope.clone())
        .styled(FolderStyle::new(props.color))
        .child(button(&props.scope, ADD, ADD_LABEL));

    if props.removable {
        folder = folder.child(button(&props.scope, REMOVE, REMOVE_LABEL));
    }

    let list = children
        .into_iter()
        .map(|(id, tree)| RenderNode::element("div").keyed(id).child(tree).build())
        .collect();

    folder.child(RenderNode::element("div").children(list).build()).build()
}

fn button(scope: &Scope, selector: &str, label: &str) -> RenderNode {
    RenderNode::element("button")
        .scoped(scope.clone())
        .selector(selector)
        .child(RenderNode::text(label))
        .build()
}

/// Render stream of a folder: re-projected on every registry snapshot and
/// whenever a child's tree changes. Remembered.
pub fn project(children: &Stream<ChildRegistry>, props: ViewProps) -> Stream<RenderNode> {
    children
        .map(move |registry| {
            let ids = registry.ids();
            let props = props.clone();
            Stream::combine(registry.render_streams())
                .map(move |trees| view(&props, ids.iter().cloned().zip(trees).collect()))
        })
        .flatten()
        .remember()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(removable: bool) -> ViewProps {
        ViewProps {
            scope: Scope::root(&NodeId::from("root")),
            removable,
            color: Rgba::rgb(10, 20, 30),
        }
    }

    #[test]
    fn test_root_has_no_remove_button() {
        let tree = view(&props(false), Vec::new());
        let controls: Vec<String> = tree.controls().into_iter().map(|(_, s)| s).collect();
        assert_eq!(controls, vec![ADD.to_string()]);
        assert_eq!(tree.text_content(), "Add Folder");
    }

    #[test]
    fn test_removable_folder_has_both_buttons() {
        let tree = view(&props(true), Vec::new());
        let controls: Vec<String> = tree.controls().into_iter().map(|(_, s)| s).collect();
        assert_eq!(controls, vec![ADD.to_string(), REMOVE.to_string()]);
    }

    #[test]
    fn test_children_keyed_in_order() {
        let children = vec![
            (NodeId::from("f1"), RenderNode::text("one")),
            (NodeId::from("f4"), RenderNode::text("four")),
        ];
        let tree = view(&props(false), children);
        let element = tree.as_element().unwrap();

        let keys: Vec<&NodeId> = element.nested().into_iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec![&NodeId::from("f1"), &NodeId::from("f4")]);
        assert_eq!(element.style.as_ref().map(|s| s.background), Some(Rgba::rgb(10, 20, 30)));
    }
}
