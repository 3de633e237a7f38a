//! Compiler-facing record types.
//!
//! These are the immutable inputs handed over by the external SMI compiler:
//! one [`ModuleRecord`] per compiled module, each carrying a flat list of
//! [`ObjectRecord`]s. The registry consumes them; nothing here is mutated
//! after construction.

use super::oid::Oid;

/// Structural classification of an object definition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SyntaxKind {
    /// Standalone, non-repeating managed value.
    Scalar,
    /// SEQUENCE OF container for conceptual rows.
    Table,
    /// One conceptual row; owner of INDEX/AUGMENTS.
    TableEntry,
    /// One field within a row.
    TableColumn,
    /// Identity, group, compliance, or other non-data node.
    #[default]
    Other,
}

impl SyntaxKind {
    /// Kinds that may appear in the leaf catalogue.
    #[must_use]
    pub fn is_leaf_kind(&self) -> bool {
        matches!(self, Self::Scalar | Self::TableColumn)
    }

    /// String form for downstream consumers.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scalar => "scalar",
            Self::Table => "table",
            Self::TableEntry => "table-entry",
            Self::TableColumn => "table-column",
            Self::Other => "other",
        }
    }
}

/// MAX-ACCESS level, carried through unmodified.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Access {
    /// read-only
    ReadOnly,
    /// read-write
    ReadWrite,
    /// read-create
    ReadCreate,
    /// not-accessible
    NotAccessible,
    /// accessible-for-notify
    AccessibleForNotify,
    /// write-only (SMIv1)
    WriteOnly,
    /// No access clause in the source definition.
    #[default]
    Unspecified,
}

/// STATUS value, carried through unmodified.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Status {
    /// current
    Current,
    /// deprecated
    Deprecated,
    /// obsolete
    Obsolete,
    /// No status clause in the source definition.
    #[default]
    Unspecified,
}

/// One object definition as emitted by the external compiler.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectRecord {
    /// Numeric identifier of the object.
    pub oid: Oid,
    /// Object name; unique within a successfully merged registry.
    pub name: String,
    /// Declared parent name. `None` or empty marks a root candidate.
    pub parent_name: Option<String>,
    /// Structural classification.
    pub syntax_kind: SyntaxKind,
    /// Textual SYNTAX, e.g. `"Integer32"` or `"OCTET STRING (SIZE(0..255))"`.
    /// This is the source of index-field types.
    pub syntax: Option<String>,
    /// Raw INDEX clause text; present only on table entries.
    pub raw_index_clause: Option<String>,
    /// AUGMENTS target entry name; present only on table entries.
    pub augments_target: Option<String>,
    /// DESCRIPTION text.
    pub description: Option<String>,
    /// MAX-ACCESS level.
    pub access: Access,
    /// STATUS value.
    pub status: Status,
    /// Name of the defining module.
    pub module_name: String,
}

impl ObjectRecord {
    /// Create a record with the required fields; optional metadata is
    /// filled in with the `with_*` builders.
    #[must_use]
    pub fn new(
        oid: Oid,
        name: impl Into<String>,
        module_name: impl Into<String>,
        syntax_kind: SyntaxKind,
    ) -> Self {
        Self {
            oid,
            name: name.into(),
            parent_name: None,
            syntax_kind,
            syntax: None,
            raw_index_clause: None,
            augments_target: None,
            description: None,
            access: Access::default(),
            status: Status::default(),
            module_name: module_name.into(),
        }
    }

    /// Set the declared parent name.
    #[must_use]
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent_name = Some(parent.into());
        self
    }

    /// Set the textual SYNTAX.
    #[must_use]
    pub fn with_syntax(mut self, syntax: impl Into<String>) -> Self {
        self.syntax = Some(syntax.into());
        self
    }

    /// Set the raw INDEX clause.
    #[must_use]
    pub fn with_index_clause(mut self, clause: impl Into<String>) -> Self {
        self.raw_index_clause = Some(clause.into());
        self
    }

    /// Set the AUGMENTS target.
    #[must_use]
    pub fn with_augments(mut self, target: impl Into<String>) -> Self {
        self.augments_target = Some(target.into());
        self
    }

    /// Set the DESCRIPTION text.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the access level.
    #[must_use]
    pub fn with_access(mut self, access: Access) -> Self {
        self.access = access;
        self
    }

    /// Set the status.
    #[must_use]
    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    /// True when no usable parent name is declared.
    #[must_use]
    pub fn is_root_candidate(&self) -> bool {
        self.parent_name.as_deref().map_or(true, str::is_empty)
    }
}

/// One compiled module: name, provenance, imports, and object records.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModuleRecord {
    /// Module name; unique per processing batch.
    pub name: String,
    /// Where the module text came from (file path, upload id, ...).
    pub source_path: String,
    /// Imported module names. Duplicates allowed, order irrelevant.
    pub imports: Vec<String>,
    /// Object records in source order.
    pub objects: Vec<ObjectRecord>,
}

impl ModuleRecord {
    /// Create an empty module record.
    #[must_use]
    pub fn new(name: impl Into<String>, source_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source_path: source_path.into(),
            imports: Vec::new(),
            objects: Vec::new(),
        }
    }

    /// Set the import list.
    #[must_use]
    pub fn with_imports<I, S>(mut self, imports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.imports = imports.into_iter().map(Into::into).collect();
        self
    }

    /// Set the object records.
    #[must_use]
    pub fn with_objects(mut self, objects: Vec<ObjectRecord>) -> Self {
        self.objects = objects;
        self
    }
}
