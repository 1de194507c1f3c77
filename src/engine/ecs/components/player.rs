use std::{ops::Deref, sync::Arc};

use parking_lot::Mutex;
use rapier3d::prelude::RigidBodyHandle;
use specs::{storage::MaskedStorage, Component, Entity, HashMapStorage, Storage};
use thiserror::Error;

use crate::{
    behaviour::{BehaviourRef, BehaviourRegistry, GateReport, ModularBehaviour},
    ecs::components::general::Transform,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlayerError {
    #[error("player {0:?} has no RigidBodyComponent")]
    MissingRigidBody(Entity),
    #[error("rigid body {handle:?} of player {entity:?} is not in the physics set")]
    RigidBodyNotInSet {
        entity: Entity,
        handle: RigidBodyHandle,
    },
    #[error("could not attach component to {entity:?}: {reason}")]
    Attach { entity: Entity, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartWarning {
    DefaultColliderAdded,
    NoInputSurface,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StartReport {
    pub is_local_player: bool,
    pub gate: GateReport,
    pub warnings: Vec<StartWarning>,
}

/// A behaviour living on its own entity, picked up by
/// [`attach_player`](crate::ecs::utils::objects::attach_player).
#[derive(Component, Debug, Clone)]
#[storage(HashMapStorage)]
pub struct BehaviourComponent(pub BehaviourRef);

impl BehaviourComponent {
    pub fn new<T: ModularBehaviour>(behaviour: T) -> Self {
        BehaviourComponent(BehaviourRef::new(behaviour))
    }
}

/// Networked player owning a set of modular behaviours.
///
/// Started once by the `PlayerStart` system, after which its behaviours are
/// dispatched on every phase. `input` and `collider` point at the entities
/// carrying the input surface and the collider, which may be the player
/// itself.
#[derive(Component, Debug, Default)]
#[storage(HashMapStorage)]
pub struct ModularPlayer {
    entity: Option<Entity>,
    input: Option<Entity>,
    collider: Option<Entity>,
    rigid_body: Option<RigidBodyHandle>,
    behaviours: BehaviourRegistry,
    start_report: Option<StartReport>,
    start_failure: Option<PlayerError>,
}

impl ModularPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input(mut self, input: Entity) -> Self {
        self.input = Some(input);
        self
    }

    pub fn with_collider(mut self, collider: Entity) -> Self {
        self.collider = Some(collider);
        self
    }

    pub fn with_behaviour(mut self, behaviour: &BehaviourRef) -> Self {
        self.behaviours.register(behaviour);
        self
    }

    pub const fn entity(&self) -> Option<Entity> {
        self.entity
    }

    pub const fn input(&self) -> Option<Entity> {
        self.input
    }

    pub const fn collider(&self) -> Option<Entity> {
        self.collider
    }

    /// Cached when the player starts
    pub const fn rigid_body(&self) -> Option<RigidBodyHandle> {
        self.rigid_body
    }

    pub fn transform<'s, D>(&self, transforms: &'s Storage<'_, Transform, D>) -> Option<&'s Transform>
    where
        D: Deref<Target = MaskedStorage<Transform>>,
    {
        self.entity.and_then(|e| transforms.get(e))
    }

    pub const fn behaviours(&self) -> &BehaviourRegistry {
        &self.behaviours
    }

    pub fn register(&mut self, behaviour: &BehaviourRef) -> bool {
        self.behaviours.register(behaviour)
    }

    pub fn deregister(&mut self, behaviour: &BehaviourRef) -> bool {
        self.behaviours.deregister(behaviour)
    }

    pub fn find<T: ModularBehaviour>(&self) -> Option<Arc<Mutex<T>>> {
        self.behaviours.find::<T>()
    }

    pub const fn started(&self) -> bool {
        self.start_report.is_some()
    }

    pub fn is_local_player(&self) -> bool {
        self.start_report.as_ref().is_some_and(|r| r.is_local_player)
    }

    pub const fn start_report(&self) -> Option<&StartReport> {
        self.start_report.as_ref()
    }

    /// Set when start gave up, such a player is never retried nor dispatched.
    pub const fn start_failure(&self) -> Option<&PlayerError> {
        self.start_failure.as_ref()
    }

    pub(crate) fn bind_entity(&mut self, entity: Entity) {
        self.entity = Some(entity);
    }

    pub(crate) fn set_input(&mut self, input: Option<Entity>) {
        self.input = input;
    }

    pub(crate) fn set_collider(&mut self, collider: Option<Entity>) {
        self.collider = collider;
    }

    pub(crate) fn set_rigid_body(&mut self, handle: RigidBodyHandle) {
        self.rigid_body = Some(handle);
    }

    pub(crate) fn finish_start(&mut self, report: StartReport) {
        self.start_report = Some(report);
    }

    pub(crate) fn fail_start(&mut self, failure: PlayerError) {
        self.start_failure = Some(failure);
    }
}
