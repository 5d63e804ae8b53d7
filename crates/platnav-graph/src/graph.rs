//! The navigation graph: one node per walkable cell, 4-directional edges.

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicU32, Ordering};

use platnav_core::{GridLayout, Point, Vec2, WalkableSource};

use crate::node::{GraphNode, NodeId};
use crate::search::PathSearch;

// Generation 0 is reserved for graphs that were never built.
static NEXT_GENERATION: AtomicU32 = AtomicU32::new(1);

fn next_generation() -> u32 {
    loop {
        let generation = NEXT_GENERATION.fetch_add(1, Ordering::Relaxed);
        if generation != 0 {
            return generation;
        }
    }
}

/// Arena-backed navigation graph built from a snapshot of walkable cells.
///
/// Every node corresponds to exactly one grid cell and every edge joins two
/// cells that differ by one step along a single axis. The graph is only ever
/// rebuilt wholesale; each build gets a fresh generation, so [`NodeId`]s
/// handed out before a rebuild stop resolving.
#[derive(Debug, Clone, Default)]
pub struct NavGraph {
    layout: GridLayout,
    generation: u32,
    pub(crate) nodes: Vec<GraphNode>,
    cells: HashMap<Point, NodeId>,
}

impl NavGraph {
    /// An empty graph with the given layout. All queries report
    /// "unavailable" until [`rebuild`](Self::rebuild) is called.
    pub fn new(layout: impl Into<GridLayout>) -> Self {
        Self {
            layout: layout.into(),
            ..Self::default()
        }
    }

    /// Build a graph from `cells`. Duplicate cells are ignored.
    pub fn build(cells: impl IntoIterator<Item = Point>, layout: impl Into<GridLayout>) -> Self {
        let mut graph = Self::new(layout);
        graph.rebuild(cells);
        graph
    }

    /// Build a graph from a terrain collaborator's walkable snapshot.
    pub fn from_source<S>(source: &S, layout: impl Into<GridLayout>) -> Self
    where
        S: WalkableSource + ?Sized,
    {
        Self::build(source.walkable_cells(), layout)
    }

    /// Discard every node and edge and build again from `cells`, keeping the
    /// layout.
    ///
    /// Nodes are created in row-major cell order regardless of the order of
    /// `cells`, so two builds from the same set have the same topology and
    /// the same node order.
    pub fn rebuild(&mut self, cells: impl IntoIterator<Item = Point>) {
        self.generation = next_generation();
        self.nodes.clear();
        self.cells.clear();

        let cells: BTreeSet<Point> = cells.into_iter().collect();
        for cell in cells {
            let Ok(index) = u32::try_from(self.nodes.len()) else {
                log::warn!("navigation graph is full, dropping remaining cells");
                break;
            };
            let id = NodeId {
                generation: self.generation,
                index,
            };
            let position = self.layout.cell_center(cell);
            self.nodes.push(GraphNode::new(id, cell, position));
            self.cells.insert(cell, id);
        }

        if self.nodes.is_empty() {
            log::warn!("no navigation nodes generated");
            return;
        }

        for i in 0..self.nodes.len() {
            let (id, cell) = (self.nodes[i].id, self.nodes[i].cell);
            for dir in Point::CARDINALS {
                if let Some(&other) = self.cells.get(&(cell + dir)) {
                    self.connect(id, other);
                }
            }
        }

        log::info!(
            "generated {} navigation nodes, {} edges (generation {})",
            self.nodes.len(),
            self.edge_count(),
            self.generation
        );
    }

    /// Link `a` and `b` in both directions.
    ///
    /// Returns `false` without changing anything when the pair is already
    /// linked, when `a == b`, or when either id is stale.
    pub(crate) fn connect(&mut self, a: NodeId, b: NodeId) -> bool {
        if a == b || !self.is_live(a) || !self.is_live(b) {
            return false;
        }
        if self.nodes[a.index()].is_neighbor(b) {
            return false;
        }
        self.nodes[a.index()].neighbors.push(b);
        if !self.nodes[b.index()].is_neighbor(a) {
            self.nodes[b.index()].neighbors.push(a);
        }
        true
    }

    /// Cell-to-world mapping used for node positions.
    #[inline]
    pub fn layout(&self) -> GridLayout {
        self.layout
    }

    /// Stamp of the current build; 0 if the graph was never built.
    #[inline]
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Number of live nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `id` was issued by the current build of this graph.
    #[inline]
    pub fn is_live(&self, id: NodeId) -> bool {
        id.generation == self.generation && id.index() < self.nodes.len()
    }

    /// Resolve `id`, or `None` if it is stale.
    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&GraphNode> {
        if self.is_live(id) {
            Some(&self.nodes[id.index()])
        } else {
            None
        }
    }

    /// World position of `id`, or `None` if it is stale.
    #[inline]
    pub fn position(&self, id: NodeId) -> Option<Vec2> {
        self.node(id).map(GraphNode::position)
    }

    /// The node built from `cell`, if that cell was walkable.
    pub fn node_at_cell(&self, cell: Point) -> Option<NodeId> {
        self.cells.get(&cell).copied()
    }

    /// Live nodes in arena order.
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> + '_ {
        self.nodes.iter()
    }

    /// Every undirected edge once, as a pair of node positions.
    pub fn edges(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        self.nodes.iter().flat_map(move |node| {
            node.neighbors
                .iter()
                .filter(move |n| n.index > node.id.index)
                .filter_map(move |&n| self.position(n))
                .map(move |p| (node.position, p))
        })
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.neighbors.len()).sum::<usize>() / 2
    }

    /// The node closest (Euclidean) to `pos`.
    ///
    /// Ties go to the node that comes first in arena order. Returns `None`
    /// when the graph has no nodes or `pos` is not finite.
    pub fn nearest_node(&self, pos: Vec2) -> Option<NodeId> {
        if !pos.is_finite() {
            return None;
        }
        let mut best: Option<(NodeId, f32)> = None;
        for node in &self.nodes {
            let d = node.position.distance_squared(pos);
            match best {
                Some((_, best_d)) if d >= best_d => {}
                _ => best = Some((node.id, d)),
            }
        }
        if best.is_none() {
            log::debug!("nearest_node: navigation graph is empty");
        }
        best.map(|(id, _)| id)
    }

    /// Shortest path from `start` to `goal`, both inclusive.
    ///
    /// Allocates a fresh [`PathSearch`]; callers that search repeatedly
    /// should keep their own and call [`PathSearch::find_path`].
    pub fn find_path(&self, start: NodeId, goal: NodeId) -> Vec<NodeId> {
        PathSearch::new().find_path(self, start, goal)
    }

    /// Summed edge length along `path`.
    ///
    /// Returns `None` if any id is stale or two consecutive nodes are not
    /// adjacent.
    pub fn path_length(&self, path: &[NodeId]) -> Option<f32> {
        if let Some(&first) = path.first() {
            self.node(first)?;
        }
        let mut total = 0.0;
        for pair in path.windows(2) {
            let a = self.node(pair[0])?;
            let b = self.node(pair[1])?;
            if !a.is_neighbor(b.id) {
                return None;
            }
            total += a.position.distance(b.position);
        }
        Some(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(pts: &[(i32, i32)]) -> Vec<Point> {
        pts.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    fn layout16() -> GridLayout {
        GridLayout::new(Vec2::new(16.0, 16.0))
    }

    #[test]
    fn one_node_per_cell_at_cell_center() {
        let g = NavGraph::build(cells(&[(0, 0), (1, 0), (5, 5)]), layout16());
        assert_eq!(g.len(), 3);
        let id = g.node_at_cell(Point::new(5, 5)).unwrap();
        assert_eq!(g.position(id), Some(Vec2::new(88.0, 88.0)));
        assert_eq!(g.node(id).unwrap().cell(), Point::new(5, 5));
        assert_eq!(g.node(id).unwrap().to_string(), "NavPoint_5_5");
    }

    #[test]
    fn duplicate_cells_are_ignored() {
        let g = NavGraph::build(cells(&[(0, 0), (0, 0), (1, 0)]), layout16());
        assert_eq!(g.len(), 2);
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn adjacency_is_symmetric() {
        let g = NavGraph::build(
            cells(&[(0, 0), (1, 0), (2, 0), (1, 1), (1, 2), (3, 3), (4, 3)]),
            layout16(),
        );
        for node in g.nodes() {
            for &n in node.neighbors() {
                let other = g.node(n).unwrap();
                assert!(other.is_neighbor(node.id()), "{node} -> {other}");
            }
        }
    }

    #[test]
    fn edges_join_only_cardinal_neighbors() {
        let g = NavGraph::build(cells(&[(0, 0), (1, 1), (1, 0), (3, 0)]), layout16());
        for node in g.nodes() {
            for &n in node.neighbors() {
                assert!(node.cell().is_cardinal_neighbor(g.node(n).unwrap().cell()));
            }
        }
        // (0,0)-(1,0) and (1,0)-(1,1); the diagonal and (3,0) stay unlinked.
        assert_eq!(g.edge_count(), 2);
        let isolated = g.node_at_cell(Point::new(3, 0)).unwrap();
        assert!(g.node(isolated).unwrap().neighbors().is_empty());
    }

    #[test]
    fn no_self_loops_or_duplicate_edges() {
        let mut g = NavGraph::build(cells(&[(0, 0), (1, 0)]), layout16());
        let a = g.node_at_cell(Point::new(0, 0)).unwrap();
        let b = g.node_at_cell(Point::new(1, 0)).unwrap();
        assert!(!g.connect(a, a));
        assert!(!g.connect(a, b));
        assert!(!g.connect(b, a));
        assert_eq!(g.node(a).unwrap().neighbors(), &[b]);
        assert_eq!(g.node(b).unwrap().neighbors(), &[a]);
    }

    #[test]
    fn nearest_node_picks_closest_cell() {
        let g = NavGraph::build(cells(&[(0, 0), (1, 0), (5, 5)]), layout16());
        let id = g.nearest_node(Vec2::new(1.0, 1.0)).unwrap();
        assert_eq!(g.node(id).unwrap().cell(), Point::new(0, 0));
        let id = g.nearest_node(Vec2::new(70.0, 90.0)).unwrap();
        assert_eq!(g.node(id).unwrap().cell(), Point::new(5, 5));
    }

    #[test]
    fn nearest_node_ties_go_to_first_node() {
        let g = NavGraph::build(cells(&[(1, 0), (0, 0)]), layout16());
        // Exactly between (0,0) and (1,0): row-major order puts (0,0) first.
        let id = g.nearest_node(Vec2::new(16.0, 8.0)).unwrap();
        assert_eq!(g.node(id).unwrap().cell(), Point::new(0, 0));
    }

    #[test]
    fn empty_graph_reports_unavailable() {
        let g = NavGraph::build(Vec::new(), layout16());
        assert!(g.is_empty());
        assert_eq!(g.nearest_node(Vec2::ZERO), None);

        let never_built = NavGraph::default();
        assert_eq!(never_built.generation(), 0);
        assert_eq!(never_built.nearest_node(Vec2::new(3.0, 4.0)), None);
    }

    #[test]
    fn nearest_node_rejects_non_finite_queries() {
        let g = NavGraph::build(cells(&[(0, 0)]), layout16());
        assert_eq!(g.nearest_node(Vec2::new(f32::NAN, 0.0)), None);
        assert_eq!(g.nearest_node(Vec2::new(f32::INFINITY, 0.0)), None);
    }

    #[test]
    fn rebuild_invalidates_old_ids() {
        let mut g = NavGraph::build(cells(&[(0, 0), (1, 0)]), layout16());
        let old = g.node_at_cell(Point::new(0, 0)).unwrap();
        let old_generation = g.generation();
        g.rebuild(cells(&[(0, 0), (1, 0)]));
        assert_ne!(g.generation(), old_generation);
        assert!(!g.is_live(old));
        assert!(g.node(old).is_none());
        assert_eq!(g.position(old), None);
        let new = g.node_at_cell(Point::new(0, 0)).unwrap();
        assert!(g.is_live(new));
        assert_eq!(new.index(), old.index());
    }

    #[test]
    fn rebuild_discards_previous_cells_and_edges() {
        let mut g = NavGraph::build(cells(&[(0, 0), (1, 0), (2, 0), (0, 1), (0, 2)]), layout16());
        assert_eq!(g.len(), 5);
        assert_eq!(g.edge_count(), 4);
        g.rebuild(cells(&[(5, 5), (6, 5)]));
        assert_eq!(g.len(), 2);
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.edges().count(), 1);
        assert_eq!(g.node_at_cell(Point::new(0, 0)), None);
        assert_eq!(g.node_at_cell(Point::new(2, 0)), None);
        let a = g.node_at_cell(Point::new(5, 5)).unwrap();
        let b = g.node_at_cell(Point::new(6, 5)).unwrap();
        assert_eq!(g.node(a).unwrap().neighbors(), &[b]);
        assert_eq!(g.nearest_node(Vec2::ZERO), Some(a));
    }

    #[test]
    fn ids_from_another_graph_are_stale() {
        let a = NavGraph::build(cells(&[(0, 0)]), layout16());
        let b = NavGraph::build(cells(&[(0, 0)]), layout16());
        let id = a.node_at_cell(Point::ZERO).unwrap();
        assert!(a.is_live(id));
        assert!(!b.is_live(id));
    }

    #[test]
    fn rebuild_is_idempotent() {
        let input = cells(&[(2, 2), (0, 0), (1, 0), (1, 1), (1, 2), (7, 7)]);
        let a = NavGraph::build(input.clone(), layout16());
        let mut reversed = input;
        reversed.reverse();
        let b = NavGraph::build(reversed, layout16());
        assert_eq!(a.len(), b.len());
        assert_eq!(a.edge_count(), b.edge_count());
        let neighbor_cells = |g: &NavGraph, node: &GraphNode| -> Vec<Point> {
            node.neighbors().iter().map(|&n| g.node(n).unwrap().cell()).collect()
        };
        for (na, nb) in a.nodes().zip(b.nodes()) {
            assert_eq!(na.cell(), nb.cell());
            assert_eq!(neighbor_cells(&a, na), neighbor_cells(&b, nb));
        }
    }

    #[test]
    fn edges_enumerate_each_link_once() {
        let g = NavGraph::build(cells(&[(0, 0), (1, 0), (0, 1), (1, 1)]), layout16());
        let edges: Vec<_> = g.edges().collect();
        assert_eq!(edges.len(), 4);
        assert_eq!(g.edge_count(), 4);
        assert!(edges.contains(&(Vec2::new(8.0, 8.0), Vec2::new(24.0, 8.0))));
    }

    #[test]
    fn path_length_checks_adjacency_and_liveness() {
        let g = NavGraph::build(cells(&[(0, 0), (1, 0), (2, 0)]), layout16());
        let a = g.node_at_cell(Point::new(0, 0)).unwrap();
        let b = g.node_at_cell(Point::new(1, 0)).unwrap();
        let c = g.node_at_cell(Point::new(2, 0)).unwrap();
        assert_eq!(g.path_length(&[a, b, c]), Some(32.0));
        assert_eq!(g.path_length(&[a, c]), None);
        assert_eq!(g.path_length(&[a]), Some(0.0));
        assert_eq!(g.path_length(&[]), Some(0.0));

        let other = NavGraph::build(cells(&[(0, 0)]), layout16());
        let stale = other.node_at_cell(Point::ZERO).unwrap();
        assert_eq!(g.path_length(&[stale]), None);
    }

    #[test]
    fn from_source_uses_walkable_snapshot() {
        use platnav_core::{TileLayer, WalkableRule};
        let layer = TileLayer::parse("....\n#..#\n####").unwrap();
        let g = NavGraph::from_source(&layer, GridLayout::default());
        assert_eq!(g.len(), 6);
        let surface = NavGraph::from_source(
            &layer.walkable(WalkableRule::Surface { clearance: 1 }),
            GridLayout::default(),
        );
        // (0,0), (3,0) over the pillars and (1,1), (2,1) over the floor.
        assert_eq!(surface.len(), 4);
        assert_eq!(surface.edge_count(), 1);
    }
}
