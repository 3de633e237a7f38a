//! Diagnostics and the fatal error type.
//!
//! Almost every failure mode in this crate is advisory: it is recorded in a
//! [`Diagnostics`] collection and returned beside the successful result, and
//! the caller decides whether to escalate. The single hard failure is a
//! circular import graph under strict resolution, surfaced as
//! [`ResolveError::CircularDependency`].

use core::fmt;
use thiserror::Error;

/// Discriminant for [`Diagnostic`] variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DiagnosticKind {
    /// Cycle in the import graph (advisory in lenient mode).
    CircularDependency,
    /// Import target absent from the batch.
    MissingDependency,
    /// Name collision during merge; first writer kept.
    DuplicateNode,
    /// Table index references an unknown column.
    UnresolvedIndexField,
    /// Table entry declares neither INDEX nor AUGMENTS.
    MissingIndexDefinition,
    /// Declared parent never materialized.
    OrphanedNode,
}

/// A single advisory condition.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Diagnostic {
    /// Modules forming an import cycle. `path` is a closed walk: the first
    /// module imports the second, and the last imports the first.
    CircularDependency {
        /// Modules on the cycle, in import order.
        path: Vec<String>,
    },
    /// A module imports something the batch does not contain.
    MissingDependency {
        /// Importing module.
        module: String,
        /// Absent import target.
        import: String,
    },
    /// A later record collided with an established name and was rejected.
    DuplicateNode {
        /// Colliding object name.
        name: String,
        /// Module whose definition was kept.
        kept_module: String,
        /// Module whose definition was rejected.
        rejected_module: String,
    },
    /// An index field could not be resolved and was dropped.
    UnresolvedIndexField {
        /// Table entry owning the index.
        entry: String,
        /// Unresolvable referenced name.
        field: String,
    },
    /// A table entry has no index source at all.
    MissingIndexDefinition {
        /// The entry lacking INDEX and AUGMENTS.
        entry: String,
    },
    /// A node whose declared parent never arrived; excluded from traversal
    /// but still retrievable by direct lookup.
    OrphanedNode {
        /// The orphaned object name.
        name: String,
        /// The parent name that never materialized.
        parent_name: String,
    },
}

impl Diagnostic {
    /// The variant discriminant.
    #[must_use]
    pub fn kind(&self) -> DiagnosticKind {
        match self {
            Self::CircularDependency { .. } => DiagnosticKind::CircularDependency,
            Self::MissingDependency { .. } => DiagnosticKind::MissingDependency,
            Self::DuplicateNode { .. } => DiagnosticKind::DuplicateNode,
            Self::UnresolvedIndexField { .. } => DiagnosticKind::UnresolvedIndexField,
            Self::MissingIndexDefinition { .. } => DiagnosticKind::MissingIndexDefinition,
            Self::OrphanedNode { .. } => DiagnosticKind::OrphanedNode,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CircularDependency { path } => {
                write!(f, "circular dependency: {}", path.join(" -> "))
            }
            Self::MissingDependency { module, import } => {
                write!(f, "module '{module}' imports absent module '{import}'")
            }
            Self::DuplicateNode {
                name,
                kept_module,
                rejected_module,
            } => write!(
                f,
                "duplicate node '{name}': kept definition from '{kept_module}', \
                 rejected definition from '{rejected_module}'"
            ),
            Self::UnresolvedIndexField { entry, field } => {
                write!(f, "entry '{entry}' index references unknown object '{field}'")
            }
            Self::MissingIndexDefinition { entry } => {
                write!(f, "entry '{entry}' declares neither INDEX nor AUGMENTS")
            }
            Self::OrphanedNode { name, parent_name } => {
                write!(f, "node '{name}' references parent '{parent_name}' which never materialized")
            }
        }
    }
}

/// Ordered collection of advisories gathered by an operation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an advisory.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    /// Absorb another collection, preserving order.
    pub fn absorb(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    /// Check if no advisories were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of advisories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Number of advisories of a given kind.
    #[must_use]
    pub fn count_of(&self, kind: DiagnosticKind) -> usize {
        self.entries.iter().filter(|d| d.kind() == kind).count()
    }

    /// Iterate advisories in recording order.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Extend<Diagnostic> for Diagnostics {
    fn extend<T: IntoIterator<Item = Diagnostic>>(&mut self, iter: T) {
        self.entries.extend(iter);
    }
}

/// Fatal resolution failure.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// Import cycle under strict resolution.
    #[error("circular dependency: {}", .path.join(" -> "))]
    CircularDependency {
        /// Modules on the cycle, in import order.
        path: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_collection() {
        let diags = Diagnostics::new();
        assert!(diags.is_empty());
        assert_eq!(diags.len(), 0);
    }

    #[test]
    fn test_count_of() {
        let mut diags = Diagnostics::new();
        diags.push(Diagnostic::MissingDependency {
            module: "A".into(),
            import: "X".into(),
        });
        diags.push(Diagnostic::MissingDependency {
            module: "B".into(),
            import: "X".into(),
        });
        diags.push(Diagnostic::MissingIndexDefinition { entry: "fooEntry".into() });

        assert_eq!(diags.len(), 3);
        assert_eq!(diags.count_of(DiagnosticKind::MissingDependency), 2);
        assert_eq!(diags.count_of(DiagnosticKind::MissingIndexDefinition), 1);
        assert_eq!(diags.count_of(DiagnosticKind::DuplicateNode), 0);
    }

    #[test]
    fn test_absorb_preserves_order() {
        let mut first = Diagnostics::new();
        first.push(Diagnostic::MissingIndexDefinition { entry: "a".into() });
        let mut second = Diagnostics::new();
        second.push(Diagnostic::MissingIndexDefinition { entry: "b".into() });

        first.absorb(second);
        let entries: Vec<_> = first.iter().collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(
            entries[0],
            &Diagnostic::MissingIndexDefinition { entry: "a".into() }
        );
    }

    #[test]
    fn test_resolve_error_display() {
        let err = ResolveError::CircularDependency {
            path: vec!["M1".into(), "M2".into(), "M3".into()],
        };
        assert_eq!(err.to_string(), "circular dependency: M1 -> M2 -> M3");
    }
}
