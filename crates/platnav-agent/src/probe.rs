//! Forward ground probes.
//!
//! The follower asks a [`GroundProbe`] whether there is supporting ground a
//! short distance ahead before deciding to jump a gap. Any ray- or
//! shape-cast that answers the boolean question will do; [`TileProbe`]
//! answers it from a [`TileLayer`].

use platnav_core::{GridLayout, Point, TileLayer, Vec2};

/// Default forward reach of a [`TileProbe`], in pixels.
pub const DEFAULT_PROBE_FORWARD: f32 = 24.0;
/// Default downward reach of a [`TileProbe`], in pixels.
pub const DEFAULT_PROBE_DEPTH: f32 = 24.0;

/// Answers "is there ground a short way ahead of `from` along `direction`".
pub trait GroundProbe {
    fn ground_ahead(&self, from: Vec2, direction: Vec2) -> bool;
}

impl<F> GroundProbe for F
where
    F: Fn(Vec2, Vec2) -> bool,
{
    fn ground_ahead(&self, from: Vec2, direction: Vec2) -> bool {
        self(from, direction)
    }
}

/// A [`GroundProbe`] that casts a vertical segment through a [`TileLayer`].
///
/// The segment starts `forward` pixels ahead of the agent along the
/// horizontal component of the probe direction and extends `depth` pixels
/// down. Any ground tile it touches counts as support.
#[derive(Debug, Clone, Copy)]
pub struct TileProbe<'a> {
    layer: &'a TileLayer,
    layout: GridLayout,
    forward: f32,
    depth: f32,
}

impl<'a> TileProbe<'a> {
    pub fn new(layer: &'a TileLayer, layout: GridLayout) -> Self {
        Self {
            layer,
            layout,
            forward: DEFAULT_PROBE_FORWARD,
            depth: DEFAULT_PROBE_DEPTH,
        }
    }

    /// Override the forward and downward reach, in pixels.
    pub fn with_reach(self, forward: f32, depth: f32) -> Self {
        Self {
            forward,
            depth,
            ..self
        }
    }
}

impl GroundProbe for TileProbe<'_> {
    fn ground_ahead(&self, from: Vec2, direction: Vec2) -> bool {
        let ahead = Vec2::new(direction.x.signum() * self.forward, 0.0);
        let ahead = if direction.x == 0.0 { Vec2::ZERO } else { ahead };
        let top = self.layout.world_to_cell(from + ahead);
        let bottom = self.layout.world_to_cell(from + ahead + Vec2::new(0.0, self.depth));
        (top.y..=bottom.y).any(|y| self.layer.is_solid(Point::new(top.x, y)))
    }
}
