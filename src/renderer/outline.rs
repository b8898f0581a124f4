//! Plain-text outline of a folder tree.
//!
//! One line per folder, indented by depth:
//!
//! ```text
//! root #5a1f3c [Add Folder]
//!   root/f1 #0b77e2 [Add Folder] [Remove me]
//!     root/f1/f2 #e2c40b [Add Folder] [Remove me]
//! ```

use std::fmt::Write;

use crate::types::{Element, RenderNode};

const INDENT: &str = "  ";

/// One folder line, before formatting.
#[derive(Clone, Debug, PartialEq)]
pub struct FolderLine<'a> {
    pub depth: usize,
    pub folder: &'a Element,
    pub labels: Vec<String>,
}

impl FolderLine<'_> {
    /// `scope #rrggbb [label] ...` without indentation.
    pub fn caption(&self) -> String {
        let mut caption = self
            .folder
            .scope
            .as_ref()
            .map_or_else(|| "?".to_string(), ToString::to_string);
        if let Some(style) = &self.folder.style {
            let _ = write!(caption, " {}", style.background_hex());
        }
        for label in &self.labels {
            let _ = write!(caption, " [{label}]");
        }
        caption
    }
}

/// Folder lines in document order.
pub fn lines(tree: &RenderNode) -> Vec<FolderLine<'_>> {
    let mut out = Vec::new();
    if let Some(folder) = tree.as_element() {
        collect(folder, 0, &mut out);
    }
    out
}

fn collect<'a>(folder: &'a Element, depth: usize, out: &mut Vec<FolderLine<'a>>) {
    let labels = folder
        .children
        .iter()
        .filter_map(RenderNode::as_element)
        .filter(|child| child.selector.is_some())
        .map(|button| button.children.iter().map(RenderNode::text_content).collect::<String>())
        .collect();
    out.push(FolderLine { depth, folder, labels });

    for (_, nested) in folder.nested() {
        if let Some(element) = nested.as_element() {
            collect(element, depth + 1, out);
        }
    }
}

/// The whole tree as indented text, one folder per line.
pub fn outline(tree: &RenderNode) -> String {
    let mut text = String::new();
    for line in lines(tree) {
        let _ = writeln!(text, "{}{}", INDENT.repeat(line.depth), line.caption());
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Scope;
    use crate::folder::{ViewProps, view};
    use crate::types::{NodeId, Rgba};

    #[test]
    fn test_outline_nested() {
        let root_scope = Scope::root(&NodeId::from("root"));
        let child_scope = root_scope.child(&NodeId::from("f1"));

        let child = view(
            &ViewProps { scope: child_scope, removable: true, color: Rgba::rgb(0, 0, 0xff) },
            Vec::new(),
        );
        let root = view(
            &ViewProps { scope: root_scope, removable: false, color: Rgba::rgb(0xff, 0, 0) },
            vec![(NodeId::from("f1"), child)],
        );

        assert_eq!(
            outline(&root),
            "root #ff0000 [Add Folder]\n  root/f1 #0000ff [Add Folder] [Remove me]\n"
        );
    }

    #[test]
    fn test_outline_of_text_is_empty() {
        assert_eq!(outline(&RenderNode::text("loose")), "");
    }
}
