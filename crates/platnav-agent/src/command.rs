use platnav_core::Vec2;

/// What the follower wants the physics integrator to do this tick.
///
/// Gravity, jump impulse and collision response are the integrator's job;
/// the follower only picks a horizontal velocity and whether to jump.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocomotionCommand {
    /// Desired horizontal velocity, pixels per second.
    pub velocity_x: f32,
    /// Start a jump now.
    pub jump: bool,
}

impl LocomotionCommand {
    /// Stand still, no jump.
    pub const IDLE: Self = Self {
        velocity_x: 0.0,
        jump: false,
    };

    #[inline]
    pub fn is_idle(&self) -> bool {
        *self == Self::IDLE
    }
}

/// Per-tick agent input.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AgentState {
    pub position: Vec2,
    /// Whether the agent is standing on something this tick.
    pub grounded: bool,
}

impl AgentState {
    pub fn grounded(position: Vec2) -> Self {
        Self {
            position,
            grounded: true,
        }
    }

    pub fn airborne(position: Vec2) -> Self {
        Self {
            position,
            grounded: false,
        }
    }
}
