use bitflags::bitflags;
use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};
use winit::keyboard::KeyCode;

use super::{BehaviourContext, BehaviourError, BehaviourState, ModularBehaviour, UpdatePhase};
use crate::ecs::utils::input::InputSurface;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    pub struct MovementIntent: u8 {
        const FORWARD = 1;
        const BACKWARD = 1 << 1;
        const LEFT = 1 << 2;
        const RIGHT = 1 << 3;
    }
}

impl MovementIntent {
    pub fn from_input(input: &InputSurface) -> Self {
        let mut intent = MovementIntent::empty();
        intent.set(MovementIntent::FORWARD, input.key_held(KeyCode::KeyW));
        intent.set(MovementIntent::BACKWARD, input.key_held(KeyCode::KeyS));
        intent.set(MovementIntent::LEFT, input.key_held(KeyCode::KeyA));
        intent.set(MovementIntent::RIGHT, input.key_held(KeyCode::KeyD));
        intent
    }

    /*
    Local space direction, right handed with -z forward like Transform.
    Opposite keys cancel out.
    */
    pub fn direction(self) -> Vector3<f32> {
        let mut dir = Vector3::zeros();
        if self.contains(MovementIntent::FORWARD) {
            dir.z -= 1.0;
        }
        if self.contains(MovementIntent::BACKWARD) {
            dir.z += 1.0;
        }
        if self.contains(MovementIntent::LEFT) {
            dir.x -= 1.0;
        }
        if self.contains(MovementIntent::RIGHT) {
            dir.x += 1.0;
        }
        dir
    }
}

/// Reads WASD on update and drives the player's body on the fixed step.
/// Vertical velocity is left to physics.
pub struct MovementBehaviour {
    state: BehaviourState,
    speed: f32,
    intent: MovementIntent,
}

impl MovementBehaviour {
    pub const fn new(speed: f32) -> Self {
        MovementBehaviour {
            state: BehaviourState::new(true),
            speed,
            intent: MovementIntent::empty(),
        }
    }

    pub const fn speed(&self) -> f32 {
        self.speed
    }

    pub const fn intent(&self) -> MovementIntent {
        self.intent
    }

    fn apply(&self, ctx: &mut BehaviourContext<'_>) -> Result<(), BehaviourError> {
        let rotation = ctx
            .transform
            .as_deref()
            .map_or_else(UnitQuaternion::identity, |t| t.rot);
        let body = ctx
            .rigid_body
            .as_deref_mut()
            .ok_or(BehaviourError::MissingDependency("rigid body"))?;

        let mut planar = rotation * self.intent.direction();
        planar.y = 0.0;
        let planar = planar.try_normalize(f32::EPSILON).unwrap_or_else(Vector3::zeros) * self.speed;

        let vertical = body.linvel().y;
        body.set_linvel(Vector3::new(planar.x, vertical, planar.z), true);
        Ok(())
    }
}

impl ModularBehaviour for MovementBehaviour {
    fn state(&self) -> &BehaviourState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut BehaviourState {
        &mut self.state
    }

    fn init(&mut self, ctx: &mut BehaviourContext<'_>) -> Result<(), BehaviourError> {
        if ctx.rigid_body.is_none() {
            return Err(BehaviourError::MissingDependency("rigid body"));
        }
        self.intent = MovementIntent::empty();
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
                self.intent = ctx
                    .input
                    .filter(|i| i.is_active())
                    .map(MovementIntent::from_input)
                    .unwrap_or_default();
                Ok(())
            }
            UpdatePhase::FixedUpdate => self.apply(ctx),
            UpdatePhase::LateUpdate => Ok(()),
        }
    }
}
