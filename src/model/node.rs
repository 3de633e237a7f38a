//! Registry tree node and leaf catalogue types.

use super::ids::NodeId;
use super::oid::Oid;
use super::record::{Access, ObjectRecord, Status, SyntaxKind};

/// A node in the object tree.
///
/// Wraps one [`ObjectRecord`] plus the relationships resolved during merge.
/// Links are arena ids, never owning pointers; the registry owns every node.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TreeNode {
    /// The record this node was built from.
    pub record: ObjectRecord,
    /// Resolved parent link. `None` until the parent's module merges.
    pub parent: Option<NodeId>,
    /// Resolved child links, in attachment order. No duplicates.
    pub children: Vec<NodeId>,
}

impl TreeNode {
    /// Wrap a record in an unattached node.
    #[must_use]
    pub fn new(record: ObjectRecord) -> Self {
        Self {
            record,
            parent: None,
            children: Vec::new(),
        }
    }

    /// The object name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.record.name
    }

    /// The object OID.
    #[must_use]
    pub fn oid(&self) -> &Oid {
        &self.record.oid
    }

    /// Check if this node has no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Attach a child link, ignoring a repeat of an already-linked id.
    pub fn add_child(&mut self, child: NodeId) {
        if !self.children.contains(&child) {
            self.children.push(child);
        }
    }
}

/// One field of a table's row index.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndexField {
    /// Referenced column name.
    pub name: String,
    /// Type carried from the referenced column's syntax, when resolvable.
    pub ty: Option<String>,
    /// True only for a final index field marked variable-length.
    pub implied: bool,
}

impl IndexField {
    /// Create a new index field.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: Option<String>, implied: bool) -> Self {
        Self {
            name: name.into(),
            ty,
            implied,
        }
    }
}

/// A terminal object in the flattened catalogue.
///
/// Either a scalar or a table column; columns additionally carry their
/// owning entry's resolved index fields.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LeafNode {
    /// Object name.
    pub name: String,
    /// Object OID.
    pub oid: Oid,
    /// Scalar or TableColumn.
    pub syntax_kind: SyntaxKind,
    /// Textual syntax, carried from the record.
    pub syntax: Option<String>,
    /// Defining module.
    pub module_name: String,
    /// DESCRIPTION text.
    pub description: Option<String>,
    /// MAX-ACCESS level.
    pub access: Access,
    /// STATUS value.
    pub status: Status,
    /// Ancestor names from root to this leaf, inclusive.
    pub path: Vec<String>,
    /// Owning table entry, for columns.
    pub entry_name: Option<String>,
    /// The owning entry's resolved index fields; empty for scalars and
    /// for columns whose entry resolved nothing.
    pub index_fields: Vec<IndexField>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_node_is_detached_leaf() {
        let record = ObjectRecord::new(
            Oid::parse("1.3.6.1").unwrap(),
            "internet",
            "SNMPv2-SMI",
            SyntaxKind::Other,
        );
        let node = TreeNode::new(record);

        assert!(node.parent.is_none());
        assert!(node.is_leaf());
        assert_eq!(node.name(), "internet");
    }

    #[test]
    fn test_add_child_deduplicates() {
        let record = ObjectRecord::new(
            Oid::parse("1.3.6.1").unwrap(),
            "internet",
            "SNMPv2-SMI",
            SyntaxKind::Other,
        );
        let mut node = TreeNode::new(record);
        let child = NodeId::from_raw(7).unwrap();

        node.add_child(child);
        node.add_child(child);
        assert_eq!(node.children, vec![child]);
    }

    #[test]
    fn test_index_field_new() {
        let field = IndexField::new("ifIndex", Some("InterfaceIndex".into()), false);
        assert_eq!(field.name, "ifIndex");
        assert_eq!(field.ty.as_deref(), Some("InterfaceIndex"));
        assert!(!field.implied);
    }
}
