//! Core types shared by the grid, search and orchestration layers.
//!
//! - [`GridCoord`]: Integer cell coordinate, compared by value
//! - [`Node`]: One grid cell with its blocked flag and shared search state
//! - [`NodeIndex`]: Arena index used for parent links and owner references

mod node;
mod point;

pub use node::{INFINITE_COST, Node, NodeIndex};
pub use point::GridCoord;
