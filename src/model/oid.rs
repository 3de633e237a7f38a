//! OID (Object Identifier) representation.

use core::fmt;
use itertools::Itertools;

/// A numeric OID, e.g. `1.3.6.1.2.1`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Oid {
    arcs: Vec<u32>,
}

impl Oid {
    /// Create an OID from a vector of arcs.
    #[must_use]
    pub fn new(arcs: Vec<u32>) -> Self {
        Self { arcs }
    }

    /// Parse an OID from dotted notation. Returns `None` on any
    /// non-numeric segment; the empty string is the empty OID.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        if s.is_empty() {
            return Some(Self::default());
        }
        s.split('.')
            .map(|seg| seg.parse::<u32>().ok())
            .collect::<Option<Vec<_>>>()
            .map(Self::new)
    }

    /// Render as dotted notation.
    #[must_use]
    pub fn to_dotted(&self) -> String {
        self.arcs.iter().join(".")
    }

    /// The parent OID (all arcs but the last), if any.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        match self.arcs.split_last() {
            Some((_, rest)) if !rest.is_empty() => Some(Self::new(rest.to_vec())),
            _ => None,
        }
    }

    /// The last arc, if any.
    #[must_use]
    pub fn last_arc(&self) -> Option<u32> {
        self.arcs.last().copied()
    }

    /// Append an arc, producing a child OID.
    #[must_use]
    pub fn child(&self, arc: u32) -> Self {
        let mut arcs = Vec::with_capacity(self.arcs.len() + 1);
        arcs.extend_from_slice(&self.arcs);
        arcs.push(arc);
        Self::new(arcs)
    }

    /// True when `self` is a (not necessarily strict) dotted prefix of `other`.
    #[must_use]
    pub fn is_prefix_of(&self, other: &Self) -> bool {
        other.arcs.starts_with(&self.arcs)
    }

    /// True when `self` is exactly one segment shorter than `child` and a
    /// prefix of it. This is the parent/child relation of the tree.
    #[must_use]
    pub fn is_parent_of(&self, child: &Self) -> bool {
        child.arcs.len() == self.arcs.len() + 1 && self.is_prefix_of(child)
    }

    /// Number of arcs.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.arcs.len()
    }

    /// Check if the OID has no arcs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }

    /// The arcs as a slice.
    #[must_use]
    pub fn arcs(&self) -> &[u32] {
        &self.arcs
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_dotted())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let oid = Oid::parse("1.3.6.1").unwrap();
        assert_eq!(oid.arcs(), &[1, 3, 6, 1]);
    }

    #[test]
    fn test_parse_empty() {
        assert!(Oid::parse("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_invalid() {
        assert!(Oid::parse("1.3.x.1").is_none());
        assert!(Oid::parse("1..3").is_none());
    }

    #[test]
    fn test_to_dotted() {
        let oid = Oid::new(vec![1, 3, 6, 1, 2, 1]);
        assert_eq!(oid.to_dotted(), "1.3.6.1.2.1");
    }

    #[test]
    fn test_parent() {
        let oid = Oid::parse("1.3.6.1").unwrap();
        assert_eq!(oid.parent().unwrap().to_dotted(), "1.3.6");
        assert!(Oid::new(vec![1]).parent().is_none());
    }

    #[test]
    fn test_child() {
        let oid = Oid::parse("1.3.6.1").unwrap();
        assert_eq!(oid.child(2).to_dotted(), "1.3.6.1.2");
    }

    #[test]
    fn test_prefix_relations() {
        let parent = Oid::parse("1.3.6").unwrap();
        let node = Oid::parse("1.3.6.1").unwrap();
        let deep = Oid::parse("1.3.6.1.2").unwrap();

        assert!(parent.is_prefix_of(&node));
        assert!(parent.is_prefix_of(&deep));
        assert!(parent.is_parent_of(&node));
        assert!(!parent.is_parent_of(&deep));
        assert!(!node.is_parent_of(&parent));
    }

    #[test]
    fn test_display() {
        let oid = Oid::parse("1.3.6.1").unwrap();
        assert_eq!(format!("{oid}"), "1.3.6.1");
    }
}
