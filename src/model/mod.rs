//! Shared data model.
//!
//! The model sits on both sides of the pipeline:
//!
//! ```text
//! ModuleRecord/ObjectRecord → Resolver → Registry(TreeNode) → LeafNode
//! ```
//!
//! Record types are the immutable inputs produced by the external SMI
//! compiler. [`TreeNode`] is the registry's arena unit: nodes are stored
//! by value in one indexed collection and linked by [`NodeId`], so
//! parent/child references can never form ownership cycles.

mod ids;
mod node;
mod oid;
mod record;

pub use ids::NodeId;
pub use node::{IndexField, LeafNode, TreeNode};
pub use oid::Oid;
pub use record::{Access, ModuleRecord, ObjectRecord, Status, SyntaxKind};
