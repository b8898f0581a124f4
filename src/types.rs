//! Core types shared across the folder tree.
//!
//! - [`NodeId`] - opaque node identity
//! - [`Action`] / [`ActionKind`] - signals flowing through intent and model
//! - [`NodeState`] - per-node lifecycle state
//! - [`Rgba`] - presentation color
//! - [`RenderNode`] / [`Element`] - render tree produced by the view

use std::fmt;

use crate::engine::Scope;
use crate::theme::FolderStyle;

// =============================================================================
// Identity
// =============================================================================

/// Opaque, process-unique identity of one folder instance.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

// =============================================================================
// Actions
// =============================================================================

/// What an action asks the receiving node to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// Spawn a new child under the origin node.
    AddChild,
    /// Drop the child named by `origin` from the registry.
    RemoveChild,
    /// The origin node asks to be removed from its parent.
    RemoveSelf,
}

impl ActionKind {
    /// Whether the registry fold reacts to this kind.
    pub fn touches_registry(self) -> bool {
        matches!(self, Self::AddChild | Self::RemoveChild)
    }
}

/// A tagged, single-use signal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Action {
    pub origin: NodeId,
    pub kind: ActionKind,
}

impl Action {
    pub fn add_child(origin: NodeId) -> Self {
        Self { origin, kind: ActionKind::AddChild }
    }

    pub fn remove_self(origin: NodeId) -> Self {
        Self { origin, kind: ActionKind::RemoveSelf }
    }

    pub fn remove_child(origin: NodeId) -> Self {
        Self { origin, kind: ActionKind::RemoveChild }
    }

    /// Retag a child's `RemoveSelf` as seen one level up.
    ///
    /// The origin stays the child's id so the parent removes the right entry.
    pub fn retagged(self) -> Self {
        match self.kind {
            ActionKind::RemoveSelf => Self::remove_child(self.origin),
            _ => self,
        }
    }

    /// True when this is `origin`'s own removal request.
    pub fn is_removal_of(&self, origin: &NodeId) -> bool {
        self.kind == ActionKind::RemoveSelf && &self.origin == origin
    }
}

// =============================================================================
// Lifecycle
// =============================================================================

/// Lifecycle state of a folder instance. `Removed` is terminal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NodeState {
    #[default]
    Active,
    Removed,
}

// =============================================================================
// Color
// =============================================================================

/// RGBA color with 8-bit channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque RGB color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Unpack a `0xRRGGBB` value. Bits above 24 are ignored.
    pub const fn from_packed(packed: u32) -> Self {
        Self::rgb(
            ((packed >> 16) & 0xff) as u8,
            ((packed >> 8) & 0xff) as u8,
            (packed & 0xff) as u8,
        )
    }

    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// `#rrggbb`, always six digits.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Perceived brightness in 0..=255 (Rec. 601 weights).
    pub fn luminance(&self) -> u8 {
        let weighted = 299 * self.r as u32 + 587 * self.g as u32 + 114 * self.b as u32;
        (weighted / 1000) as u8
    }
}

// =============================================================================
// Render tree
// =============================================================================

/// One element of the render tree.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Element {
    pub tag: String,
    /// Identity key for list entries.
    pub key: Option<NodeId>,
    /// Owning folder scope (set on folder boxes and their controls).
    pub scope: Option<Scope>,
    /// Local selector of an interactive control (`"add"`, `"remove"`).
    pub selector: Option<String>,
    pub style: Option<FolderStyle>,
    pub children: Vec<RenderNode>,
}

/// Output of the view projector.
#[derive(Clone, Debug, PartialEq)]
pub enum RenderNode {
    Element(Element),
    Text(String),
}

impl RenderNode {
    pub fn element(tag: impl Into<String>) -> Element {
        Element { tag: tag.into(), ..Default::default() }
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self::Text(content.into())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            Self::Text(_) => None,
        }
    }

    /// Concatenated text content of this subtree.
    pub fn text_content(&self) -> String {
        match self {
            Self::Text(content) => content.clone(),
            Self::Element(element) => element.children.iter().map(Self::text_content).collect(),
        }
    }

    /// Every interactive control in this subtree as `(scope, selector)`,
    /// in document order.
    pub fn controls(&self) -> Vec<(Scope, String)> {
        let mut found = Vec::new();
        collect_controls(self, &mut found);
        found
    }
}

fn collect_controls(node: &RenderNode, found: &mut Vec<(Scope, String)>) {
    let RenderNode::Element(element) = node else { return };
    if let (Some(scope), Some(selector)) = (&element.scope, &element.selector) {
        found.push((scope.clone(), selector.clone()));
    }
    for child in &element.children {
        collect_controls(child, found);
    }
}

impl Element {
    pub fn keyed(mut self, key: NodeId) -> Self {
        self.key = Some(key);
        self
    }

    pub fn scoped(mut self, scope: Scope) -> Self {
        self.scope = Some(scope);
        self
    }

    pub fn selector(mut self, selector: impl Into<String>) -> Self {
        self.selector = Some(selector.into());
        self
    }

    pub fn styled(mut self, style: FolderStyle) -> Self {
        self.style = Some(style);
        self
    }

    pub fn child(mut self, child: RenderNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: Vec<RenderNode>) -> Self {
        self.children = children;
        self
    }

    pub fn build(self) -> RenderNode {
        RenderNode::Element(self)
    }

    /// Nested folder outputs listed under this folder box, as
    /// `(key, child render)` in list order.
    pub fn nested(&self) -> Vec<(&NodeId, &RenderNode)> {
        self.children
            .iter()
            .filter_map(RenderNode::as_element)
            .flat_map(|list| list.children.iter())
            .filter_map(RenderNode::as_element)
            .filter_map(|entry| {
                let key = entry.key.as_ref()?;
                let tree = entry.children.first()?;
                Some((key, tree))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retagged_only_touches_remove_self() {
        let child = NodeId::from("f2");

        let retagged = Action::remove_self(child.clone()).retagged();
        assert_eq!(retagged, Action::remove_child(child.clone()));

        let add = Action::add_child(child.clone());
        assert_eq!(add.clone().retagged(), add, "non-removal actions pass through");
    }

    #[test]
    fn test_is_removal_of() {
        let me = NodeId::from("f1");
        let other = NodeId::from("f2");

        assert!(Action::remove_self(me.clone()).is_removal_of(&me));
        assert!(!Action::remove_self(other).is_removal_of(&me));
        assert!(!Action::remove_child(me.clone()).is_removal_of(&me));
    }

    #[test]
    fn test_hex_is_zero_padded() {
        assert_eq!(Rgba::from_packed(0x00_0a_0b).to_hex(), "#000a0b");
        assert_eq!(Rgba::from_packed(0xff_ff_ff).to_hex(), "#ffffff");
        assert_eq!(Rgba::from_packed(0).to_hex(), "#000000");
    }

    #[test]
    fn test_luminance_extremes() {
        assert_eq!(Rgba::BLACK.luminance(), 0);
        assert_eq!(Rgba::WHITE.luminance(), 255);
    }

    #[test]
    fn test_text_content_concatenates() {
        let tree = RenderNode::element("div")
            .child(RenderNode::text("Add "))
            .child(RenderNode::element("span").child(RenderNode::text("Folder")).build())
            .build();
        assert_eq!(tree.text_content(), "Add Folder");
    }
}
