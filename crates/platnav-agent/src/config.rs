//! Tuning for [`PathFollower`](crate::PathFollower).

use thiserror::Error;

/// Configuration for path following.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct FollowerConfig {
    /// Horizontal speed in pixels per second.
    pub speed: f32,
    /// Minimum time between replans, in seconds.
    pub replan_interval: f32,
    /// Targets farther than this (pixels) are ignored.
    pub detection_range: f32,
    /// A waypoint closer than this (pixels) counts as reached.
    pub waypoint_distance: f32,
    /// Jump when the unit direction to the waypoint has `y` below this
    /// (negative is up).
    pub jump_threshold: f32,
    /// Facing only flips when `|direction.x|` exceeds this.
    pub facing_threshold: f32,
}

impl Default for FollowerConfig {
    fn default() -> Self {
        Self {
            speed: 120.0,
            replan_interval: 0.3,
            detection_range: 400.0,
            waypoint_distance: 8.0,
            jump_threshold: -0.3,
            facing_threshold: 0.1,
        }
    }
}

/// A [`FollowerConfig`] field outside its valid range.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{field} must be {expected}, got {value}")]
pub struct ConfigError {
    pub field: &'static str,
    pub expected: &'static str,
    pub value: f32,
}

fn check(
    field: &'static str,
    expected: &'static str,
    value: f32,
    ok: bool,
) -> Result<(), ConfigError> {
    if ok {
        Ok(())
    } else {
        Err(ConfigError {
            field,
            expected,
            value,
        })
    }
}

impl FollowerConfig {
    /// Reject values the follower cannot work with.
    ///
    /// NaN fails every check.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check(
            "speed",
            "positive and finite",
            self.speed,
            self.speed > 0.0 && self.speed.is_finite(),
        )?;
        check(
            "replan_interval",
            "positive and finite",
            self.replan_interval,
            self.replan_interval > 0.0 && self.replan_interval.is_finite(),
        )?;
        check(
            "detection_range",
            "non-negative",
            self.detection_range,
            self.detection_range >= 0.0,
        )?;
        check(
            "waypoint_distance",
            "non-negative and finite",
            self.waypoint_distance,
            self.waypoint_distance >= 0.0 && self.waypoint_distance.is_finite(),
        )?;
        check(
            "jump_threshold",
            "within [-1, 0]",
            self.jump_threshold,
            (-1.0..=0.0).contains(&self.jump_threshold),
        )?;
        check(
            "facing_threshold",
            "within [0, 1)",
            self.facing_threshold,
            (0.0..1.0).contains(&self.facing_threshold),
        )
    }
}
