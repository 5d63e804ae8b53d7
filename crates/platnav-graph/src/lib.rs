//! Navigation graphs for side-scrolling agents.
//!
//! A [`NavGraph`] turns a snapshot of walkable tile cells into an arena of
//! [`GraphNode`]s, one per cell, linked to their up/down/left/right
//! neighbours. It answers two queries:
//!
//! - **Nearest node** to a world position ([`NavGraph::nearest_node`])
//! - **Shortest path** between two nodes with A\* ([`PathSearch::find_path`],
//!   or the one-shot [`NavGraph::find_path`])
//!
//! # Liveness
//!
//! Nodes are addressed by [`NodeId`], which carries the generation of the
//! build that produced it. [`NavGraph::rebuild`] starts a new generation;
//! every older id then resolves to `None` and every query that receives one
//! degrades to "unavailable" (no node, empty path).

mod astar;
mod graph;
mod node;
mod search;

pub use graph::NavGraph;
pub use node::{GraphNode, NodeId};
pub use search::PathSearch;
