//! A mutable 2-d tree: a binary space partition of the plane with alternating x and y splits.

#![warn(missing_docs)]

mod builder;
mod index;
mod node;
mod r#trait;
mod traversal;

pub use builder::TwoDTreeBuilder;
pub use index::TwoDTree;
pub use node::Node;
pub use r#trait::TwoDTreeIndex;
pub use traversal::{NodeRef, Points};
