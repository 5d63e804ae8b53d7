use std::cmp::Ordering;
use std::collections::BinaryHeap;

// ---------------------------------------------------------------------------
// Internal per-node search state
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub(crate) struct SearchNode {
    pub(crate) g: f32,
    pub(crate) parent: usize,
    pub(crate) generation: u32,
    pub(crate) closed: bool,
}

impl Default for SearchNode {
    fn default() -> Self {
        Self {
            g: f32::INFINITY,
            parent: usize::MAX,
            generation: 0,
            closed: false,
        }
    }
}

/// Frontier entry, ordered for `BinaryHeap` so that the smallest `f` pops
/// first and equal `f` pops in insertion order.
#[derive(Clone, Copy, Debug)]
pub(crate) struct NodeRef {
    pub(crate) idx: usize,
    pub(crate) f: f32,
    pub(crate) seq: u64,
}

impl Ord for NodeRef {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed on both keys: BinaryHeap is a max-heap.
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for NodeRef {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for NodeRef {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for NodeRef {}

// ---------------------------------------------------------------------------
// PathSearch
// ---------------------------------------------------------------------------

/// Reusable scratch space for A* queries over a
/// [`NavGraph`](crate::NavGraph).
///
/// Per-node costs and predecessors live in a flat array indexed by node
/// slot. Each query bumps a generation counter instead of clearing the
/// array, so repeated queries allocate nothing once the array has grown to
/// the graph's size.
#[derive(Default)]
pub struct PathSearch {
    pub(crate) nodes: Vec<SearchNode>,
    pub(crate) generation: u32,
    pub(crate) open: BinaryHeap<NodeRef>,
    pub(crate) seq: u64,
    pub(crate) expanded: usize,
}

impl PathSearch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes expanded (popped and closed) by the last query.
    pub fn last_expanded(&self) -> usize {
        self.expanded
    }

    /// Size the node array for a graph of `len` nodes and start a new
    /// search generation.
    pub(crate) fn begin(&mut self, len: usize) -> u32 {
        if self.nodes.len() < len {
            self.nodes.resize(len, SearchNode::default());
        }
        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            // Wrapped: old stamps could collide, start clean.
            self.nodes.fill(SearchNode::default());
            self.generation = 1;
        }
        self.open.clear();
        self.seq = 0;
        self.expanded = 0;
        self.generation
    }

    pub(crate) fn push(&mut self, idx: usize, f: f32) {
        let seq = self.seq;
        self.seq += 1;
        self.open.push(NodeRef { idx, f, seq });
    }
}
