use rapier3d::prelude::RigidBody;
use serde::{Deserialize, Serialize};
use specs::Entity;
use thiserror::Error;

use crate::ecs::{components::general::Transform, utils::input::InputSurface};

pub mod look;
pub mod movement;
pub mod registry;

pub use registry::{BehaviourRef, BehaviourRegistry, DispatchReport, GateReport};

/// One of the three points in a simulation tick where behaviours get to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpdatePhase {
    Update,
    FixedUpdate,
    /// Runs after every transform for the frame has been written
    LateUpdate,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BehaviourError {
    #[error("behaviour is owned by {current:?} and cannot be rebound to {requested:?}")]
    AlreadyOwned { current: Entity, requested: Entity },
    #[error("behaviour needs a {0} but the player does not provide one")]
    MissingDependency(&'static str),
    #[error("{0}")]
    Failed(String),
}

/// Bookkeeping every behaviour carries, mirrors what the gate reads and writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BehaviourState {
    local_only: bool,
    enabled: bool,
    owner: Option<Entity>,
}

impl BehaviourState {
    pub const fn new(local_only: bool) -> Self {
        BehaviourState {
            local_only,
            enabled: true,
            owner: None,
        }
    }

    pub const fn local_only(&self) -> bool {
        self.local_only
    }

    pub const fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub const fn owner(&self) -> Option<Entity> {
        self.owner
    }

    /*
    The owner is written once. Binding to the same player again is accepted,
    any other player is refused and the current owner is kept.
    */
    pub fn bind(&mut self, owner: Entity) -> Result<(), BehaviourError> {
        match self.owner {
            Some(current) if current != owner => Err(BehaviourError::AlreadyOwned {
                current,
                requested: owner,
            }),
            _ => {
                self.owner = Some(owner);
                Ok(())
            }
        }
    }
}

impl Default for BehaviourState {
    fn default() -> Self {
        BehaviourState::new(false)
    }
}

/// What a behaviour can reach on its player while it runs.
///
/// Every reference is optional since a player is not required to carry all of
/// them, behaviours report a [`BehaviourError::MissingDependency`] when they
/// need something that is absent.
pub struct BehaviourContext<'a> {
    pub player: Entity,
    pub is_local_player: bool,
    pub delta_time: f32,
    pub transform: Option<&'a mut Transform>,
    pub input: Option<&'a InputSurface>,
    pub rigid_body: Option<&'a mut RigidBody>,
}

impl<'a> BehaviourContext<'a> {
    pub const fn new(player: Entity, is_local_player: bool) -> Self {
        BehaviourContext {
            player,
            is_local_player,
            delta_time: 0.0,
            transform: None,
            input: None,
            rigid_body: None,
        }
    }
}

/// A unit of gameplay logic plugged into a [`ModularPlayer`](crate::ecs::components::player::ModularPlayer).
///
/// `process` is called for every phase regardless of [`enabled`](ModularBehaviour::enabled),
/// implementations are expected to check it themselves.
pub trait ModularBehaviour: Send + 'static {
    fn state(&self) -> &BehaviourState;

    fn state_mut(&mut self) -> &mut BehaviourState;

    /// Called at most once, when the player starts and the gate selects this behaviour.
    fn init(&mut self, _ctx: &mut BehaviourContext<'_>) -> Result<(), BehaviourError> {
        Ok(())
    }

    fn process(
        &mut self,
        phase: UpdatePhase,
        ctx: &mut BehaviourContext<'_>,
    ) -> Result<(), BehaviourError>;

    fn local_only(&self) -> bool {
        self.state().local_only()
    }

    fn enabled(&self) -> bool {
        self.state().enabled()
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.state_mut().set_enabled(enabled);
    }

    fn owner(&self) -> Option<Entity> {
        self.state().owner()
    }
}
