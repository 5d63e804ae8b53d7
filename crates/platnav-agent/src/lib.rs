//! Path following for side-scrolling agents.
//!
//! A [`PathFollower`] owns one agent's path over a
//! [`NavGraph`](platnav_graph::NavGraph). Call [`PathFollower::tick`] once per
//! fixed physics step with the agent's position, its grounded flag and the
//! target; it returns a [`LocomotionCommand`] for the physics layer to apply.
//!
//! ```
//! use platnav_agent::{AgentState, FollowerConfig, PathFollower};
//! use platnav_core::{GridLayout, Point, Vec2};
//! use platnav_graph::NavGraph;
//!
//! let layout = GridLayout::default();
//! let graph = NavGraph::build((0..8).map(|x| Point::new(x, 0)), layout);
//! let mut follower = PathFollower::new(FollowerConfig::default());
//! let ground = |_: Vec2, _: Vec2| true;
//!
//! let agent = AgentState::grounded(layout.cell_center(Point::new(0, 0)));
//! let target = layout.cell_center(Point::new(6, 0));
//! follower.tick(&graph, agent, Some(target), 1.0 / 60.0, &ground);
//! let cmd = follower.tick(&graph, agent, Some(target), 1.0 / 60.0, &ground);
//! assert!(cmd.velocity_x > 0.0);
//! ```

mod command;
pub mod config;
mod follower;
pub mod probe;

pub use command::{AgentState, LocomotionCommand};
pub use config::{ConfigError, FollowerConfig};
pub use follower::{FollowState, PathFollower};
pub use probe::{DEFAULT_PROBE_DEPTH, DEFAULT_PROBE_FORWARD, GroundProbe, TileProbe};
