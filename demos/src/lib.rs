//! Shared chase simulation used by the demo binaries.
//!
//! A follower chases a target that hops around a small side-scrolling
//! level. The physics is minimal: the agent is a point with
//! a body height of one cell, falls under gravity, and stops against ground
//! tiles.

use std::error::Error;
use std::fs;
use std::path::Path;

use platnav_agent::{
    AgentState, FollowState, FollowerConfig, LocomotionCommand, PathFollower, TileProbe,
};
use platnav_core::{GridLayout, Point, TileLayer, Vec2, WalkableRule};
use platnav_graph::NavGraph;
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

pub const LEVEL: &str = "\
........................
........................
........................
..............####......
........................
..........####..........
........................
......####..............
........................
########################";

/// Fastest fall speed, pixels per second.
const MAX_FALL: f32 = 600.0;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Demo settings, read from an optional JSON file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub follower: FollowerConfig,
    /// Downward acceleration, pixels per second squared.
    pub gravity: f32,
    /// Initial upward speed of a jump, pixels per second.
    pub jump_velocity: f32,
    /// Cells above the ground that become navigation nodes.
    pub clearance: i32,
    /// Simulation length in fixed steps.
    pub ticks: u32,
    /// Fixed step, seconds.
    pub dt: f32,
    /// The target hops to a new cell this often, in ticks.
    pub retarget_ticks: u32,
    pub seed: u64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            follower: FollowerConfig::default(),
            gravity: 900.0,
            jump_velocity: 300.0,
            clearance: 3,
            ticks: 1200,
            dt: 1.0 / 60.0,
            retarget_ticks: 240,
            seed: 1,
        }
    }
}

impl DemoConfig {
    /// Read a config from a JSON file; missing fields keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let text = fs::read_to_string(path)?;
        let cfg: DemoConfig = serde_json::from_str(&text)?;
        cfg.follower.validate()?;
        Ok(cfg)
    }
}

// ---------------------------------------------------------------------------
// Physics
// ---------------------------------------------------------------------------

/// The level plus the constants the integrator needs.
pub struct World {
    pub layer: TileLayer,
    pub layout: GridLayout,
    pub gravity: f32,
    pub jump_velocity: f32,
}

impl World {
    pub fn new(layer: TileLayer, cfg: &DemoConfig) -> Self {
        Self {
            layer,
            layout: GridLayout::default(),
            gravity: cfg.gravity,
            jump_velocity: cfg.jump_velocity,
        }
    }

    fn half_height(&self) -> f32 {
        self.layout.cell_size.y * 0.5
    }

    /// A body centered on `center` overlaps ground at its head or feet.
    pub fn blocked(&self, center: Vec2) -> bool {
        // Keep feet and head strictly inside the body's cell.
        let half = self.half_height() - 0.1;
        let feet = self.layout.world_to_cell(center + Vec2::new(0.0, half));
        let head = self.layout.world_to_cell(center - Vec2::new(0.0, half));
        self.layer.is_solid(feet) || self.layer.is_solid(head)
    }
}

/// A falling point with velocity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    pub position: Vec2,
    pub velocity: Vec2,
    pub grounded: bool,
}

impl Body {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            grounded: false,
        }
    }

    pub fn state(&self) -> AgentState {
        AgentState {
            position: self.position,
            grounded: self.grounded,
        }
    }

    /// Apply `cmd` and integrate one step.
    pub fn step(&mut self, world: &World, cmd: LocomotionCommand, dt: f32) {
        self.velocity.x = cmd.velocity_x;
        if cmd.jump && self.grounded {
            self.velocity.y = -world.jump_velocity;
        }
        self.velocity.y = (self.velocity.y + world.gravity * dt).min(MAX_FALL);

        let next = self.position + Vec2::new(self.velocity.x * dt, 0.0);
        if world.blocked(next) {
            self.velocity.x = 0.0;
        } else {
            self.position = next;
        }

        let next = self.position + Vec2::new(0.0, self.velocity.y * dt);
        if !world.blocked(next) {
            self.position = next;
        } else {
            if self.velocity.y > 0.0 {
                // Land on top of the tile under the feet.
                let feet = next + Vec2::new(0.0, world.half_height());
                let top = world.layout.cell_origin(world.layout.world_to_cell(feet)).y;
                self.position.y = top - world.half_height();
            }
            self.velocity.y = 0.0;
        }

        self.grounded = world.blocked(self.position + Vec2::new(0.0, 1.0));
    }
}

// ---------------------------------------------------------------------------
// Target
// ---------------------------------------------------------------------------

/// A target that teleports between walkable cells.
pub struct HoppingTarget {
    rng: StdRng,
    cells: Vec<Point>,
    position: Option<Vec2>,
}

impl HoppingTarget {
    pub fn new(seed: u64, cells: Vec<Point>) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            cells,
            position: None,
        }
    }

    /// Current position, `None` before the first hop or with no cells.
    pub fn position(&self) -> Option<Vec2> {
        self.position
    }

    pub fn hop(&mut self, layout: &GridLayout) -> Option<Vec2> {
        if self.cells.is_empty() {
            return None;
        }
        let cell = self.cells[self.rng.random_range(0..self.cells.len())];
        self.position = Some(layout.cell_center(cell));
        self.position
    }
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

/// What happened during a [`Chase::run`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChaseSummary {
    pub ticks: u32,
    pub catches: u32,
    pub searches: u64,
    pub following_ticks: u32,
}

/// A follower chasing a [`HoppingTarget`] through a [`World`].
pub struct Chase {
    pub world: World,
    pub graph: NavGraph,
    pub body: Body,
    pub follower: PathFollower,
    pub target: HoppingTarget,
    cfg: DemoConfig,
}

impl Chase {
    pub fn new(level: &str, cfg: DemoConfig) -> Result<Self, Box<dyn Error>> {
        cfg.follower.validate()?;
        let layer = TileLayer::parse(level)?;
        let world = World::new(layer, &cfg);
        let rule = WalkableRule::Surface {
            clearance: cfg.clearance,
        };
        let graph = NavGraph::from_source(&world.layer.walkable(rule), world.layout);
        log::info!(
            "level {}x{}: {} nodes, {} edges",
            world.layer.size().x,
            world.layer.size().y,
            graph.len(),
            graph.edge_count()
        );

        let cells: Vec<Point> = graph.nodes().map(|n| n.cell()).collect();
        let start = cells
            .first()
            .map(|&c| world.layout.cell_center(c))
            .ok_or("level has no walkable cells")?;
        let target = HoppingTarget::new(cfg.seed, cells);

        Ok(Self {
            body: Body::new(start),
            follower: PathFollower::new(cfg.follower.clone()),
            world,
            graph,
            target,
            cfg,
        })
    }

    /// Advance one fixed step.
    pub fn step(&mut self, tick: u32) -> FollowState {
        if tick % self.cfg.retarget_ticks.max(1) == 0 {
            if let Some(p) = self.target.hop(&self.world.layout) {
                log::debug!("tick {tick}: target hops to {p}");
            }
        }
        let probe = TileProbe::new(&self.world.layer, self.world.layout);
        let cmd = self.follower.tick(
            &self.graph,
            self.body.state(),
            self.target.position(),
            self.cfg.dt,
            &probe,
        );
        self.body.step(&self.world, cmd, self.cfg.dt);
        self.follower.state()
    }

    fn caught(&self) -> bool {
        let reach = self.cfg.follower.waypoint_distance;
        self.target
            .position()
            .is_some_and(|t| t.distance(self.body.position) < reach)
    }

    pub fn run(&mut self) -> ChaseSummary {
        let mut summary = ChaseSummary::default();
        let mut was_caught = false;
        for tick in 0..self.cfg.ticks {
            if self.step(tick) == FollowState::Following {
                summary.following_ticks += 1;
            }
            let caught = self.caught();
            if caught && !was_caught {
                summary.catches += 1;
                log::info!("tick {tick}: caught target at {}", self.body.position);
            }
            was_caught = caught;
            summary.ticks += 1;
        }
        summary.searches = self.follower.searches();
        summary
    }
}
