#![doc = include_str!("../README.md")]

mod error;
pub mod geometry;
pub mod twodtree;
mod r#type;

pub use error::{Result, TwoDTreeError};
pub use geometry::{Point, Rect};
pub use r#type::IndexableNum;
