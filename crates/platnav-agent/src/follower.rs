//! Path follower for side-scrolling agents.
//!
//! Each tick the follower (re)plans a route over a [`NavGraph`] toward a
//! target, steers horizontally toward the current waypoint and decides
//! whether to jump.

use platnav_core::Vec2;
use platnav_graph::{NavGraph, NodeId, PathSearch};

use crate::command::{AgentState, LocomotionCommand};
use crate::config::FollowerConfig;
use crate::probe::GroundProbe;

/// Outcome of the last [`PathFollower::tick`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FollowState {
    /// No target this tick, or never ticked.
    Idle,
    /// Target beyond the detection range.
    OutOfRange,
    /// No usable path: empty graph, unreachable target, or already there.
    NoPath,
    /// Steering toward a waypoint.
    Following,
}

/// Per-agent path-following state.
///
/// The path is a list of [`NodeId`]s into the graph passed to
/// [`tick`](Self::tick). It is replaced wholesale on every replan and
/// dropped as soon as the graph is rebuilt.
pub struct PathFollower {
    config: FollowerConfig,
    path: Vec<NodeId>,
    /// Index of the current waypoint; `path.len()` once every waypoint is
    /// reached.
    cursor: usize,
    replan_timer: f32,
    facing: f32,
    state: FollowState,
    search: PathSearch,
    searches: u64,
}

impl PathFollower {
    /// Create a follower. The first in-range tick replans immediately.
    pub fn new(config: FollowerConfig) -> Self {
        Self {
            config,
            path: Vec::new(),
            cursor: 0,
            replan_timer: 0.0,
            facing: 1.0,
            state: FollowState::Idle,
            search: PathSearch::new(),
            searches: 0,
        }
    }

    pub fn config(&self) -> &FollowerConfig {
        &self.config
    }

    /// Current path, including waypoints already reached.
    pub fn path(&self) -> &[NodeId] {
        &self.path
    }

    /// Index of the current waypoint in [`path`](Self::path).
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// `1.0` facing right, `-1.0` facing left.
    pub fn facing(&self) -> f32 {
        self.facing
    }

    pub fn state(&self) -> FollowState {
        self.state
    }

    /// Number of A* searches run so far.
    pub fn searches(&self) -> u64 {
        self.searches
    }

    /// Seconds until the next timed replan.
    pub fn replan_timer(&self) -> f32 {
        self.replan_timer
    }

    /// Every waypoint has been reached, or there is no path at all.
    ///
    /// An exhausted follower replans on its next in-range tick without
    /// waiting for the timer.
    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.path.len()
    }

    /// Position of the current waypoint, or `None` if the path is exhausted,
    /// empty, or from another generation of `graph`.
    pub fn current_waypoint(&self, graph: &NavGraph) -> Option<Vec2> {
        let id = *self.path.get(self.cursor)?;
        graph.position(id)
    }

    /// Drop the current path; the agent stands still until the next replan.
    pub fn clear_path(&mut self) {
        self.path = Vec::new();
        self.cursor = 0;
    }

    /// Make the next tick replan regardless of the timer.
    pub fn force_replan(&mut self) {
        self.replan_timer = 0.0;
    }

    /// Advance one fixed step and return this tick's command.
    ///
    /// A replan, when due, completes before the waypoint is read, so the
    /// command always comes from the newest path.
    pub fn tick<P>(
        &mut self,
        graph: &NavGraph,
        agent: AgentState,
        target: Option<Vec2>,
        dt: f32,
        probe: &P,
    ) -> LocomotionCommand
    where
        P: GroundProbe + ?Sized,
    {
        let Some(target) = target else {
            self.state = FollowState::Idle;
            return LocomotionCommand::IDLE;
        };

        // Cheap gate; does not count against the replan timer.
        if agent.position.distance(target) > self.config.detection_range {
            self.state = FollowState::OutOfRange;
            return LocomotionCommand::IDLE;
        }

        self.drop_stale_path(graph);

        self.replan_timer -= dt;
        if self.replan_timer <= 0.0 || self.is_exhausted() {
            self.replan(graph, agent.position, target);
            self.replan_timer = self.config.replan_interval;
        }

        let Some(waypoint) = self.current_waypoint(graph) else {
            self.state = FollowState::NoPath;
            return LocomotionCommand::IDLE;
        };
        self.state = FollowState::Following;

        let command = self.steer(agent, waypoint, probe);
        if agent.position.distance(waypoint) < self.config.waypoint_distance {
            self.cursor += 1;
        }
        command
    }

    fn drop_stale_path(&mut self, graph: &NavGraph) {
        let Some(&first) = self.path.first() else {
            return;
        };
        if !graph.is_live(first) {
            log::debug!(
                "path from generation {} is stale (graph is at {}), replanning",
                first.generation(),
                graph.generation()
            );
            self.clear_path();
            self.force_replan();
        }
    }

    fn replan(&mut self, graph: &NavGraph, from: Vec2, to: Vec2) {
        let start = graph.nearest_node(from);
        let goal = graph.nearest_node(to);
        self.path = match (start, goal) {
            (Some(start), Some(goal)) if start != goal => {
                self.searches += 1;
                self.search.find_path(graph, start, goal)
            }
            _ => Vec::new(),
        };
        self.cursor = 0;
        log::debug!(
            "replanned: {} waypoints (generation {})",
            self.path.len(),
            graph.generation()
        );
    }

    fn steer<P>(&mut self, agent: AgentState, waypoint: Vec2, probe: &P) -> LocomotionCommand
    where
        P: GroundProbe + ?Sized,
    {
        let direction = (waypoint - agent.position).normalized();
        if direction.x.abs() > self.config.facing_threshold {
            self.facing = direction.x.signum();
        }

        let jump = agent.grounded
            && (direction.y < self.config.jump_threshold
                || !probe.ground_ahead(agent.position, Vec2::new(self.facing, 0.0)));

        LocomotionCommand {
            velocity_x: direction.x * self.config.speed,
            jump,
        }
    }
}
