//! Leaf catalogue extraction.
//!
//! Walks a built registry once and produces the flattened set of terminal
//! objects (scalars and table columns with no children), each annotated
//! with its root-to-leaf path and, for columns, the owning entry's resolved
//! index fields:
//!
//! ```text
//! Registry → extract() → (Vec<LeafNode>, Diagnostics)
//! ```
//!
//! Entry indexing comes from the raw INDEX clause when present, or is
//! inherited from an AUGMENTS target. Targets defined later in the walk
//! (or in a later module) are handled by retrying deferred entries until a
//! pass makes no progress. Output order is the pre-order walk, so repeated
//! extraction over an unchanged registry is byte-for-byte identical.

mod index;

use std::collections::BTreeMap;

use tracing::debug;

use crate::diag::{Diagnostic, Diagnostics};
use crate::model::{IndexField, LeafNode, SyntaxKind, TreeNode};
use crate::registry::Registry;
use index::parse_index_clause;

/// Extract the leaf catalogue from a built registry.
#[must_use]
pub fn extract(registry: &Registry) -> (Vec<LeafNode>, Diagnostics) {
    let mut diagnostics = Diagnostics::new();
    let entry_indexes = resolve_entry_indexes(registry, &mut diagnostics);

    let mut leaves = Vec::new();
    for node in registry.dfs() {
        if !node.record.syntax_kind.is_leaf_kind() || !node.is_leaf() {
            continue;
        }
        leaves.push(build_leaf(registry, node, &entry_indexes));
    }

    debug!(
        leaves = leaves.len(),
        entries = entry_indexes.len(),
        advisories = diagnostics.len(),
        "leaf extraction"
    );

    (leaves, diagnostics)
}

/// Resolve every reachable table entry's index fields.
///
/// INDEX-bearing entries resolve immediately; AUGMENTS entries wait for
/// their target and are retried pass by pass. Entries whose target never
/// resolves, and entries with no index source at all, end with an empty
/// field list and an advisory.
fn resolve_entry_indexes<'a>(
    registry: &'a Registry,
    diagnostics: &mut Diagnostics,
) -> BTreeMap<String, Vec<IndexField>> {
    let mut resolved: BTreeMap<String, Vec<IndexField>> = BTreeMap::new();
    let mut deferred: Vec<&'a TreeNode> = Vec::new();

    for entry in registry
        .dfs()
        .filter(|n| n.record.syntax_kind == SyntaxKind::TableEntry)
    {
        if let Some(clause) = entry.record.raw_index_clause.as_deref() {
            let fields = resolve_clause(registry, entry.name(), clause, diagnostics);
            resolved.insert(entry.name().to_owned(), fields);
        } else if entry.record.augments_target.is_some() {
            deferred.push(entry);
        } else {
            diagnostics.push(Diagnostic::MissingIndexDefinition {
                entry: entry.name().to_owned(),
            });
            resolved.insert(entry.name().to_owned(), Vec::new());
        }
    }

    // Retry AUGMENTS entries until a full pass resolves nothing new.
    while !deferred.is_empty() {
        let before = deferred.len();
        let mut still_deferred = Vec::new();

        for entry in deferred {
            let target = entry
                .record
                .augments_target
                .as_deref()
                .expect("deferred entries carry an AUGMENTS target");
            match resolved.get(target) {
                Some(fields) => {
                    let fields = fields.clone();
                    resolved.insert(entry.name().to_owned(), fields);
                }
                None => still_deferred.push(entry),
            }
        }

        if still_deferred.len() == before {
            // Stalled: the remaining targets will never resolve.
            for entry in still_deferred {
                diagnostics.push(Diagnostic::UnresolvedIndexField {
                    entry: entry.name().to_owned(),
                    field: entry.record.augments_target.clone().unwrap_or_default(),
                });
                resolved.insert(entry.name().to_owned(), Vec::new());
            }
            break;
        }
        deferred = still_deferred;
    }

    resolved
}

/// Resolve one raw INDEX clause against the registry.
fn resolve_clause(
    registry: &Registry,
    entry: &str,
    clause: &str,
    diagnostics: &mut Diagnostics,
) -> Vec<IndexField> {
    let mut fields = Vec::new();
    for reference in parse_index_clause(clause) {
        match registry.get_by_name(&reference.name) {
            Some(column) => fields.push(IndexField::new(
                reference.name,
                column.record.syntax.clone(),
                reference.implied,
            )),
            None => diagnostics.push(Diagnostic::UnresolvedIndexField {
                entry: entry.to_owned(),
                field: reference.name,
            }),
        }
    }
    fields
}

/// Assemble one leaf from a terminal node.
fn build_leaf(
    registry: &Registry,
    node: &TreeNode,
    entry_indexes: &BTreeMap<String, Vec<IndexField>>,
) -> LeafNode {
    let entry_name = node
        .parent
        .and_then(|id| registry.get(id))
        .filter(|parent| parent.record.syntax_kind == SyntaxKind::TableEntry)
        .map(|parent| parent.name().to_owned());

    let index_fields = match (&entry_name, node.record.syntax_kind) {
        (Some(entry), SyntaxKind::TableColumn) => {
            entry_indexes.get(entry).cloned().unwrap_or_default()
        }
        _ => Vec::new(),
    };

    LeafNode {
        name: node.record.name.clone(),
        oid: node.record.oid.clone(),
        syntax_kind: node.record.syntax_kind,
        syntax: node.record.syntax.clone(),
        module_name: node.record.module_name.clone(),
        description: node.record.description.clone(),
        access: node.record.access,
        status: node.record.status,
        path: registry.path(node.name()),
        entry_name,
        index_fields,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diag::DiagnosticKind;
    use crate::model::{Access, ObjectRecord, Oid};

    fn record(name: &str, oid: &str, parent: Option<&str>, kind: SyntaxKind) -> ObjectRecord {
        let mut record = ObjectRecord::new(Oid::parse(oid).unwrap(), name, "TEST-MIB", kind);
        if let Some(parent) = parent {
            record = record.with_parent(parent);
        }
        record
    }

    /// ifTable-shaped fixture: mib-2 → ifTable → ifEntry → { ifIndex, ifDescr }
    /// plus a scalar sibling of the table.
    fn if_mib_records() -> Vec<ObjectRecord> {
        vec![
            record("mib-2", "1.3.6.1.2.1", None, SyntaxKind::Other),
            record("ifNumber", "1.3.6.1.2.1.2", Some("mib-2"), SyntaxKind::Scalar)
                .with_syntax("Integer32"),
            record("ifTable", "1.3.6.1.2.1.3", Some("mib-2"), SyntaxKind::Table),
            record("ifEntry", "1.3.6.1.2.1.3.1", Some("ifTable"), SyntaxKind::TableEntry)
                .with_index_clause("INDEX { ifIndex }"),
            record(
                "ifIndex",
                "1.3.6.1.2.1.3.1.1",
                Some("ifEntry"),
                SyntaxKind::TableColumn,
            )
            .with_syntax("InterfaceIndex")
            .with_access(Access::ReadOnly),
            record(
                "ifDescr",
                "1.3.6.1.2.1.3.1.2",
                Some("ifEntry"),
                SyntaxKind::TableColumn,
            )
            .with_syntax("DisplayString"),
        ]
    }

    #[test]
    fn test_classification() {
        let (registry, _) = Registry::build(&if_mib_records());
        let (leaves, diags) = extract(&registry);

        let names: Vec<_> = leaves.iter().map(|l| l.name.as_str()).collect();
        // Tables, entries, and internal nodes are never leaves.
        assert_eq!(names, vec!["ifNumber", "ifIndex", "ifDescr"]);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_column_carries_entry_index_and_path() {
        let (registry, _) = Registry::build(&if_mib_records());
        let (leaves, _) = extract(&registry);

        let if_descr = leaves.iter().find(|l| l.name == "ifDescr").unwrap();
        assert_eq!(if_descr.entry_name.as_deref(), Some("ifEntry"));
        assert_eq!(
            if_descr.index_fields,
            vec![IndexField::new("ifIndex", Some("InterfaceIndex".into()), false)]
        );
        assert_eq!(
            if_descr.path,
            vec!["mib-2", "ifTable", "ifEntry", "ifDescr"]
        );
    }

    #[test]
    fn test_scalar_has_no_index_fields() {
        let (registry, _) = Registry::build(&if_mib_records());
        let (leaves, _) = extract(&registry);

        let if_number = leaves.iter().find(|l| l.name == "ifNumber").unwrap();
        assert!(if_number.index_fields.is_empty());
        assert!(if_number.entry_name.is_none());
        assert_eq!(if_number.path, vec!["mib-2", "ifNumber"]);
    }

    #[test]
    fn test_index_order_follows_clause_not_declaration() {
        let (registry, _) = Registry::build(&[
            record("root", "1", None, SyntaxKind::Other),
            record("tbl", "1.1", Some("root"), SyntaxKind::Table),
            record("tblEntry", "1.1.1", Some("tbl"), SyntaxKind::TableEntry)
                .with_index_clause("{ idx1, idx2 }"),
            // Declared in the opposite order of the clause.
            record("idx2", "1.1.1.1", Some("tblEntry"), SyntaxKind::TableColumn)
                .with_syntax("Integer32"),
            record("idx1", "1.1.1.2", Some("tblEntry"), SyntaxKind::TableColumn)
                .with_syntax("OCTET STRING"),
        ]);
        let (leaves, _) = extract(&registry);

        let column = leaves.iter().find(|l| l.name == "idx2").unwrap();
        let names: Vec<_> = column.index_fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["idx1", "idx2"]);
    }

    #[test]
    fn test_implied_flag_survives_resolution() {
        let (registry, _) = Registry::build(&[
            record("root", "1", None, SyntaxKind::Other),
            record("tbl", "1.1", Some("root"), SyntaxKind::Table),
            record("tblEntry", "1.1.1", Some("tbl"), SyntaxKind::TableEntry)
                .with_index_clause("INDEX { fixed, IMPLIED variable }"),
            record("fixed", "1.1.1.1", Some("tblEntry"), SyntaxKind::TableColumn)
                .with_syntax("Integer32"),
            record("variable", "1.1.1.2", Some("tblEntry"), SyntaxKind::TableColumn)
                .with_syntax("OCTET STRING"),
        ]);
        let (leaves, _) = extract(&registry);

        let column = leaves.iter().find(|l| l.name == "fixed").unwrap();
        assert_eq!(column.index_fields.len(), 2);
        assert!(!column.index_fields[0].implied);
        assert!(column.index_fields[1].implied);
    }

    #[test]
    fn test_unresolved_index_field_dropped() {
        let (registry, _) = Registry::build(&[
            record("root", "1", None, SyntaxKind::Other),
            record("tbl", "1.1", Some("root"), SyntaxKind::Table),
            record("tblEntry", "1.1.1", Some("tbl"), SyntaxKind::TableEntry)
                .with_index_clause("{ ghostIndex, realIndex }"),
            record("realIndex", "1.1.1.1", Some("tblEntry"), SyntaxKind::TableColumn)
                .with_syntax("Integer32"),
        ]);
        let (leaves, diags) = extract(&registry);

        assert_eq!(diags.count_of(DiagnosticKind::UnresolvedIndexField), 1);
        let column = leaves.iter().find(|l| l.name == "realIndex").unwrap();
        // The ghost field is dropped; the entry still yields its leaves.
        let names: Vec<_> = column.index_fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["realIndex"]);
    }

    #[test]
    fn test_missing_index_definition() {
        let (registry, _) = Registry::build(&[
            record("root", "1", None, SyntaxKind::Other),
            record("tbl", "1.1", Some("root"), SyntaxKind::Table),
            record("tblEntry", "1.1.1", Some("tbl"), SyntaxKind::TableEntry),
            record("col", "1.1.1.1", Some("tblEntry"), SyntaxKind::TableColumn),
        ]);
        let (leaves, diags) = extract(&registry);

        assert_eq!(diags.count_of(DiagnosticKind::MissingIndexDefinition), 1);
        let column = leaves.iter().find(|l| l.name == "col").unwrap();
        assert!(column.index_fields.is_empty());
    }

    #[test]
    fn test_augments_inherits_fields_verbatim() {
        // The augmenting table appears before its target in the walk, so
        // resolution must defer and retry.
        let (registry, _) = Registry::build(&[
            record("root", "1", None, SyntaxKind::Other),
            record("auxTable", "1.1", Some("root"), SyntaxKind::Table),
            record("auxEntry", "1.1.1", Some("auxTable"), SyntaxKind::TableEntry)
                .with_augments("baseEntry"),
            record("auxValue", "1.1.1.1", Some("auxEntry"), SyntaxKind::TableColumn)
                .with_syntax("Counter64"),
            record("baseTable", "1.2", Some("root"), SyntaxKind::Table),
            record("baseEntry", "1.2.1", Some("baseTable"), SyntaxKind::TableEntry)
                .with_index_clause("INDEX { baseName, IMPLIED baseKey }"),
            record("baseName", "1.2.1.1", Some("baseEntry"), SyntaxKind::TableColumn)
                .with_syntax("DisplayString"),
            record("baseKey", "1.2.1.2", Some("baseEntry"), SyntaxKind::TableColumn)
                .with_syntax("OCTET STRING"),
        ]);
        let (leaves, diags) = extract(&registry);
        assert!(diags.is_empty());

        let aux = leaves.iter().find(|l| l.name == "auxValue").unwrap();
        let names: Vec<_> = aux.index_fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["baseName", "baseKey"]);
        assert!(aux.index_fields[1].implied);
    }

    #[test]
    fn test_augments_chain_resolves_transitively() {
        let (registry, _) = Registry::build(&[
            record("root", "1", None, SyntaxKind::Other),
            record("aTable", "1.1", Some("root"), SyntaxKind::Table),
            record("aEntry", "1.1.1", Some("aTable"), SyntaxKind::TableEntry)
                .with_augments("bEntry"),
            record("aCol", "1.1.1.1", Some("aEntry"), SyntaxKind::TableColumn),
            record("bTable", "1.2", Some("root"), SyntaxKind::Table),
            record("bEntry", "1.2.1", Some("bTable"), SyntaxKind::TableEntry)
                .with_augments("cEntry"),
            record("bCol", "1.2.1.1", Some("bEntry"), SyntaxKind::TableColumn),
            record("cTable", "1.3", Some("root"), SyntaxKind::Table),
            record("cEntry", "1.3.1", Some("cTable"), SyntaxKind::TableEntry)
                .with_index_clause("{ cIndex }"),
            record("cIndex", "1.3.1.1", Some("cEntry"), SyntaxKind::TableColumn)
                .with_syntax("Integer32"),
        ]);
        let (leaves, diags) = extract(&registry);
        assert!(diags.is_empty());

        let a_col = leaves.iter().find(|l| l.name == "aCol").unwrap();
        let names: Vec<_> = a_col.index_fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["cIndex"]);
    }

    #[test]
    fn test_augments_target_never_resolves() {
        let (registry, _) = Registry::build(&[
            record("root", "1", None, SyntaxKind::Other),
            record("tbl", "1.1", Some("root"), SyntaxKind::Table),
            record("tblEntry", "1.1.1", Some("tbl"), SyntaxKind::TableEntry)
                .with_augments("phantomEntry"),
            record("col", "1.1.1.1", Some("tblEntry"), SyntaxKind::TableColumn),
        ]);
        let (leaves, diags) = extract(&registry);

        assert_eq!(diags.count_of(DiagnosticKind::UnresolvedIndexField), 1);
        let column = leaves.iter().find(|l| l.name == "col").unwrap();
        assert!(column.index_fields.is_empty());
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let (registry, _) = Registry::build(&if_mib_records());
        let (first, first_diags) = extract(&registry);
        let (second, second_diags) = extract(&registry);

        assert_eq!(first, second);
        assert_eq!(first_diags, second_diags);
    }
}
