use std::fmt;

use platnav_core::{Point, Vec2};

/// Identifier of a [`GraphNode`] inside one generation of a
/// [`NavGraph`](crate::NavGraph).
///
/// The generation stamp makes ids from a previous build (or from another
/// graph) detectably stale: the graph resolves them to `None`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId {
    pub(crate) generation: u32,
    pub(crate) index: u32,
}

impl NodeId {
    /// Arena slot of the node.
    #[inline]
    pub fn index(self) -> usize {
        self.index as usize
    }

    /// Generation of the graph that issued this id.
    #[inline]
    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}@{}", self.index, self.generation)
    }
}

/// A vertex of the navigation graph: the center of one walkable cell.
///
/// Adjacency is stored as ids into the owning graph's arena and is kept
/// symmetric by the graph; nodes never own each other.
#[derive(Debug, Clone)]
pub struct GraphNode {
    pub(crate) id: NodeId,
    pub(crate) cell: Point,
    pub(crate) position: Vec2,
    pub(crate) neighbors: Vec<NodeId>,
}

impl GraphNode {
    pub(crate) fn new(id: NodeId, cell: Point, position: Vec2) -> Self {
        Self {
            id,
            cell,
            position,
            neighbors: Vec::with_capacity(4),
        }
    }

    /// Id of this node in the graph that built it.
    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Grid cell this node was created from.
    #[inline]
    pub fn cell(&self) -> Point {
        self.cell
    }

    /// World-space center of the cell.
    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Adjacent nodes, in connection order.
    #[inline]
    pub fn neighbors(&self) -> &[NodeId] {
        &self.neighbors
    }

    /// Whether `other` is linked to this node.
    #[inline]
    pub fn is_neighbor(&self, other: NodeId) -> bool {
        self.neighbors.contains(&other)
    }
}

impl fmt::Display for GraphNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NavPoint_{}_{}", self.cell.x, self.cell.y)
    }
}
