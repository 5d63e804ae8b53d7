use crate::graph::NavGraph;
use crate::node::NodeId;
use crate::search::PathSearch;

impl PathSearch {
    /// Compute the shortest path from `start` to `goal` using A*.
    ///
    /// Edge cost is the Euclidean distance between node positions and the
    /// heuristic is the straight-line distance to `goal`. Edges only join
    /// grid-adjacent cells, so the heuristic is consistent and a node is
    /// never expanded twice.
    ///
    /// Returns the full path (both endpoints included), `[start]` when
    /// `start == goal`, or an empty path when either id is stale or `goal`
    /// is unreachable.
    pub fn find_path(&mut self, graph: &NavGraph, start: NodeId, goal: NodeId) -> Vec<NodeId> {
        self.expanded = 0;
        let (Some(start_node), Some(goal_node)) = (graph.node(start), graph.node(goal)) else {
            return Vec::new();
        };
        if start == goal {
            return vec![start];
        }

        let cur_gen = self.begin(graph.len());
        let goal_pos = goal_node.position();
        let start_idx = start.index();
        let goal_idx = goal.index();

        {
            let node = &mut self.nodes[start_idx];
            node.g = 0.0;
            node.parent = usize::MAX;
            node.generation = cur_gen;
            node.closed = false;
        }
        self.push(start_idx, start_node.position().distance(goal_pos));

        let found = 'search: loop {
            let Some(current) = self.open.pop() else {
                break 'search false;
            };
            let ci = current.idx;

            // Skip entries superseded by a cheaper push.
            if self.nodes[ci].closed {
                continue;
            }

            // Only a popped goal is final; a cheaper route may still be queued.
            if ci == goal_idx {
                break 'search true;
            }

            self.nodes[ci].closed = true;
            self.expanded += 1;
            let current_g = self.nodes[ci].g;
            let current_node = &graph.nodes[ci];

            for &nid in current_node.neighbors() {
                let Some(neighbor) = graph.node(nid) else {
                    continue;
                };
                let ni = nid.index();
                let tentative_g =
                    current_g + current_node.position().distance(neighbor.position());

                let n = &mut self.nodes[ni];
                if n.generation == cur_gen {
                    if n.closed || tentative_g >= n.g {
                        continue;
                    }
                } else {
                    n.generation = cur_gen;
                    n.closed = false;
                }
                n.g = tentative_g;
                n.parent = ci;

                let f = tentative_g + neighbor.position().distance(goal_pos);
                self.push(ni, f);
            }
        };

        if !found {
            log::debug!(
                "no path found from {} to {}",
                start_node.cell(),
                goal_node.cell()
            );
            return Vec::new();
        }

        let mut path = Vec::new();
        let mut ci = goal_idx;
        while ci != usize::MAX {
            path.push(graph.nodes[ci].id());
            ci = self.nodes[ci].parent;
        }
        path.reverse();
        path
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeSet, BinaryHeap, HashSet};

    use platnav_core::{GridLayout, Point, Vec2};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    fn layout16() -> GridLayout {
        GridLayout::new(Vec2::new(16.0, 16.0))
    }

    fn graph(pts: &[(i32, i32)]) -> NavGraph {
        NavGraph::build(pts.iter().map(|&(x, y)| Point::new(x, y)), layout16())
    }

    fn at(g: &NavGraph, x: i32, y: i32) -> NodeId {
        g.node_at_cell(Point::new(x, y)).unwrap()
    }

    fn cells_of(g: &NavGraph, path: &[NodeId]) -> Vec<Point> {
        path.iter().map(|&id| g.node(id).unwrap().cell()).collect()
    }

    /// Plain Dijkstra over the same graph, as a cost oracle.
    fn reference_cost(g: &NavGraph, start: NodeId, goal: NodeId) -> Option<f32> {
        #[derive(PartialEq)]
        struct Entry(f32, usize);
        impl Eq for Entry {}
        impl PartialOrd for Entry {
            fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
                Some(self.cmp(other))
            }
        }
        impl Ord for Entry {
            fn cmp(&self, other: &Self) -> std::cmp::Ordering {
                other.0.total_cmp(&self.0)
            }
        }

        let mut dist = vec![f32::INFINITY; g.len()];
        let mut heap = BinaryHeap::new();
        dist[start.index()] = 0.0;
        heap.push(Entry(0.0, start.index()));
        while let Some(Entry(d, i)) = heap.pop() {
            if i == goal.index() {
                return Some(d);
            }
            if d > dist[i] {
                continue;
            }
            let node = g.nodes().nth(i).unwrap();
            for &n in node.neighbors() {
                let nd = d + node.position().distance(g.position(n).unwrap());
                if nd < dist[n.index()] {
                    dist[n.index()] = nd;
                    heap.push(Entry(nd, n.index()));
                }
            }
        }
        None
    }

    #[test]
    fn straight_line_path() {
        let g = graph(&[(0, 0), (1, 0), (2, 0)]);
        let path = g.find_path(at(&g, 0, 0), at(&g, 2, 0));
        assert_eq!(
            cells_of(&g, &path),
            vec![Point::new(0, 0), Point::new(1, 0), Point::new(2, 0)]
        );
        assert_eq!(g.path_length(&path), Some(32.0));
    }

    #[test]
    fn disconnected_cells_have_no_path() {
        let g = graph(&[(0, 0), (5, 5)]);
        assert!(g.find_path(at(&g, 0, 0), at(&g, 5, 5)).is_empty());
    }

    #[test]
    fn trivial_path_is_the_node_itself() {
        let g = graph(&[(0, 0), (1, 0), (2, 0), (2, 1), (9, 9)]);
        for node in g.nodes() {
            assert_eq!(g.find_path(node.id(), node.id()), vec![node.id()]);
        }
    }

    #[test]
    fn stale_endpoints_give_empty_path() {
        let mut g = graph(&[(0, 0), (1, 0)]);
        let a = at(&g, 0, 0);
        let b = at(&g, 1, 0);
        g.rebuild([Point::new(0, 0), Point::new(1, 0)]);
        assert!(g.find_path(a, b).is_empty());
        assert!(g.find_path(a, a).is_empty());
        let fresh = at(&g, 1, 0);
        assert!(g.find_path(a, fresh).is_empty());
    }

    #[test]
    fn path_goes_around_a_wall() {
        // ....
        // .##.
        // ....   start (0,1) -> goal (3,1)
        let mut pts = Vec::new();
        for y in 0..3 {
            for x in 0..4 {
                if !(y == 1 && (x == 1 || x == 2)) {
                    pts.push((x, y));
                }
            }
        }
        let g = graph(&pts);
        let path = g.find_path(at(&g, 0, 1), at(&g, 3, 1));
        assert_eq!(path.len(), 6);
        assert_eq!(g.path_length(&path), Some(80.0));
        let cells = cells_of(&g, &path);
        assert!(cells.iter().all(|c| c.y != 1 || c.x == 0 || c.x == 3));
    }

    #[test]
    fn pops_goal_before_declaring_success() {
        // Goal is enqueued early through a long corridor, but the short way
        // must win.
        let g = graph(&[(0, 0), (1, 0), (2, 0), (0, 1), (0, 2), (1, 2), (2, 2), (2, 1)]);
        let path = g.find_path(at(&g, 1, 0), at(&g, 2, 1));
        assert_eq!(g.path_length(&path), Some(32.0));
    }

    #[test]
    fn nodes_are_expanded_at_most_once() {
        let mut pts = Vec::new();
        for y in 0..10 {
            for x in 0..10 {
                pts.push((x, y));
            }
        }
        let g = graph(&pts);
        let mut search = PathSearch::new();
        let path = search.find_path(&g, at(&g, 0, 0), at(&g, 9, 9));
        assert_eq!(path.len(), 19);
        assert!(search.last_expanded() <= g.len());
    }

    #[test]
    fn search_scratch_is_reusable_across_graphs() {
        let small = graph(&[(0, 0), (1, 0)]);
        let big = graph(&[(0, 0), (1, 0), (2, 0), (3, 0), (3, 1)]);
        let mut search = PathSearch::new();
        assert_eq!(search.find_path(&big, at(&big, 0, 0), at(&big, 3, 1)).len(), 5);
        assert_eq!(search.find_path(&small, at(&small, 1, 0), at(&small, 0, 0)).len(), 2);
        assert_eq!(search.find_path(&big, at(&big, 3, 1), at(&big, 0, 0)).len(), 5);
    }

    #[test]
    fn search_trace_is_deterministic() {
        let mut pts = Vec::new();
        for y in 0..6 {
            for x in 0..6 {
                pts.push((x, y));
            }
        }
        let g = graph(&pts);
        let first = g.find_path(at(&g, 0, 0), at(&g, 5, 5));
        for _ in 0..5 {
            assert_eq!(g.find_path(at(&g, 0, 0), at(&g, 5, 5)), first);
        }
    }

    #[test]
    fn random_graphs_match_reference_costs() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut search = PathSearch::new();
        for _ in 0..30 {
            let mut cells = BTreeSet::new();
            for y in 0..12 {
                for x in 0..12 {
                    if rng.random_bool(0.65) {
                        cells.insert(Point::new(x, y));
                    }
                }
            }
            let g = NavGraph::build(cells.iter().copied(), layout16());
            if g.len() < 2 {
                continue;
            }
            let ids: Vec<NodeId> = g.nodes().map(|n| n.id()).collect();
            for _ in 0..10 {
                let a = ids[rng.random_range(0..ids.len())];
                let b = ids[rng.random_range(0..ids.len())];
                let path = search.find_path(&g, a, b);
                match reference_cost(&g, a, b) {
                    Some(cost) => {
                        assert_eq!(path.first(), Some(&a));
                        assert_eq!(path.last(), Some(&b));
                        let len = g.path_length(&path).unwrap();
                        assert!((len - cost).abs() < 1e-3, "{len} vs {cost}");
                        let unique: HashSet<_> = path.iter().collect();
                        assert_eq!(unique.len(), path.len());
                    }
                    None => assert!(path.is_empty()),
                }
            }
        }
    }

    #[test]
    fn random_graphs_are_symmetric() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..20 {
            let cells: Vec<Point> = (0..80)
                .map(|_| Point::new(rng.random_range(0..10), rng.random_range(0..10)))
                .collect();
            let g = NavGraph::build(cells, layout16());
            for node in g.nodes() {
                assert!(!node.is_neighbor(node.id()));
                let unique: HashSet<_> = node.neighbors().iter().collect();
                assert_eq!(unique.len(), node.neighbors().len());
                for &n in node.neighbors() {
                    assert!(g.node(n).unwrap().is_neighbor(node.id()));
                }
            }
        }
    }
}
