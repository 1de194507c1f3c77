use nalgebra::{clamp, UnitQuaternion};

use super::{BehaviourContext, BehaviourError, BehaviourState, ModularBehaviour, UpdatePhase};

pub const MAX_PITCH: f32 = 89.0;

/// Mouse look. Yaw turns the whole player, pitch is kept for cameras to read.
pub struct LookBehaviour {
    state: BehaviourState,
    sensitivity: f32,
    yaw: f32,
    pitch: f32,
}

impl LookBehaviour {
    pub const fn new(sensitivity: f32) -> Self {
        LookBehaviour {
            state: BehaviourState::new(true),
            sensitivity,
            yaw: 0.0,
            pitch: 0.0,
        }
    }

    /// Degrees, always in [0, 360)
    pub const fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Degrees, clamped to [-89, 89]
    pub const fn pitch(&self) -> f32 {
        self.pitch
    }

    fn turn(&mut self, (dx, dy): (f32, f32)) {
        self.yaw = (self.yaw - dx * self.sensitivity).rem_euclid(360.0);
        self.pitch = clamp(self.pitch - dy * self.sensitivity, -MAX_PITCH, MAX_PITCH);
    }
}

impl ModularBehaviour for LookBehaviour {
    fn state(&self) -> &BehaviourState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut BehaviourState {
        &mut self.state
    }

    fn init(&mut self, ctx: &mut BehaviourContext<'_>) -> Result<(), BehaviourError> {
        // start from wherever the player is already facing
        if let Some(t) = ctx.transform.as_deref() {
            let f = t.forward();
            self.yaw = (-f.x).atan2(-f.z).to_degrees().rem_euclid(360.0);
        }
        Ok(())
    }

    fn process(
        &mut self,
        phase: UpdatePhase,
        ctx: &mut BehaviourContext<'_>,
    ) -> Result<(), BehaviourError> {
        if !self.state.enabled() {
            return Ok(());
        }

        match phase {
            UpdatePhase::Update => {
                if let Some(input) = ctx.input.filter(|i| i.is_active()) {
                    self.turn(input.mouse_diff());
                }
            }
            UpdatePhase::LateUpdate => {
                let transform = ctx
                    .transform
                    .as_deref_mut()
                    .ok_or(BehaviourError::MissingDependency("transform"))?;
                // roll, pitch, yaw is actually x,y,z
                transform.rot = UnitQuaternion::from_euler_angles(0.0, self.yaw.to_radians(), 0.0);
            }
            UpdatePhase::FixedUpdate => {}
        }

        Ok(())
    }
}
