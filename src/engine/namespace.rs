//! Scopes - per-instance namespaces.
//!
//! Every folder lives under a [`Scope`]: the path of identities from the root
//! down to itself. Local control names ("add", "remove") are the same in every
//! folder; the scope is what keeps one folder's controls from answering for a
//! sibling's or an ancestor's.

use std::fmt;

use crate::types::NodeId;

const SEPARATOR: char = '/';

/// Path of node identities from the root to one folder. Never empty.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Scope {
    segments: Vec<NodeId>,
}

impl Scope {
    /// Scope of a top-level folder.
    pub fn root(id: &NodeId) -> Self {
        Self { segments: vec![id.clone()] }
    }

    /// Scope of a child folder nested directly under this one.
    pub fn child(&self, id: &NodeId) -> Self {
        let mut segments = self.segments.clone();
        segments.push(id.clone());
        Self { segments }
    }

    /// Parse `"root/f1/f4"`. Returns `None` for empty input or empty segments.
    pub fn parse(path: &str) -> Option<Self> {
        let segments: Vec<NodeId> = path
            .split(SEPARATOR)
            .map(|segment| {
                let segment = segment.trim();
                (!segment.is_empty()).then(|| NodeId::from(segment))
            })
            .collect::<Option<_>>()?;
        (!segments.is_empty()).then_some(Self { segments })
    }

    /// Identity of the folder this scope belongs to.
    pub fn leaf(&self) -> &NodeId {
        &self.segments[self.segments.len() - 1]
    }

    pub fn parent(&self) -> Option<Scope> {
        (self.segments.len() > 1).then(|| Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// True if `other` is this scope or lies underneath it.
    pub fn encloses(&self, other: &Scope) -> bool {
        other.segments.starts_with(&self.segments)
    }

    pub fn segments(&self) -> &[NodeId] {
        &self.segments
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, segment) in self.segments.iter().enumerate() {
            if index > 0 {
                write!(f, "{SEPARATOR}")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_scopes_nest() {
        let root = Scope::root(&NodeId::from("root"));
        let child = root.child(&NodeId::from("f1"));
        let grandchild = child.child(&NodeId::from("f2"));

        assert_eq!(grandchild.to_string(), "root/f1/f2");
        assert_eq!(grandchild.leaf(), &NodeId::from("f2"));
        assert_eq!(grandchild.segments().len(), 3);
        assert_eq!(grandchild.parent(), Some(child.clone()));
        assert_eq!(root.parent(), None);
    }

    #[test]
    fn test_siblings_do_not_enclose_each_other() {
        let root = Scope::root(&NodeId::from("root"));
        let a = root.child(&NodeId::from("f1"));
        let b = root.child(&NodeId::from("f2"));

        assert!(root.encloses(&a));
        assert!(a.encloses(&a));
        assert!(!a.encloses(&b));
        assert!(!a.encloses(&root));
        assert!(!b.encloses(&a));
    }

    #[test]
    fn test_parse_round_trips_display() {
        let scope = Scope::parse("root/f1/f9").unwrap();
        assert_eq!(scope.to_string(), "root/f1/f9");
        assert_eq!(Scope::parse(""), None);
        assert_eq!(Scope::parse("root//f1"), None);
    }
}
