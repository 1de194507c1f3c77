use log::{debug, error, trace, warn};
use rapier3d::prelude::ColliderBuilder;
use specs::{Entities, Entity, Join, Read, ReadStorage, System, Write, WriteStorage};

use crate::{
    behaviour::{BehaviourContext, UpdatePhase},
    ecs::{
        components::{
            general::Transform,
            network::NetworkReplicated,
            physics::{ColliderComponent, RigidBodyComponent},
            player::{ModularPlayer, PlayerError, StartReport, StartWarning},
        },
        resources::{network::LocalClient, physics::PhysicsData, DeltaTime},
        utils::input::InputSurface,
    },
};

pub const DEFAULT_COLLIDER_HALF_EXTENT: f32 = 0.5;

/// Starts every player that has not been started yet.
///
/// Locks the body's rotation, makes sure there is a collider, hands the
/// input surface to the local player only and runs the ownership gate over
/// the behaviours.
pub struct PlayerStart;

impl<'a> System<'a> for PlayerStart {
    type SystemData = (
        Entities<'a>,
        Write<'a, PhysicsData>,
        Read<'a, LocalClient>,
        Read<'a, DeltaTime>,
        ReadStorage<'a, NetworkReplicated>,
        ReadStorage<'a, RigidBodyComponent>,
        WriteStorage<'a, ColliderComponent>,
        WriteStorage<'a, InputSurface>,
        WriteStorage<'a, Transform>,
        WriteStorage<'a, ModularPlayer>,
    );

    fn run(
        &mut self,
        (
            entities,
            mut physics_data,
            local_client,
            delta_time,
            network_replicated,
            rigid_bodies,
            mut colliders,
            mut inputs,
            mut transforms,
            mut players,
        ): Self::SystemData,
    ) {
        for (entity, player) in (&entities, &mut players).join() {
            if player.started() || player.start_failure().is_some() {
                continue;
            }

            let is_local_player = local_client.controls(network_replicated.get(entity));
            let mut warnings = vec![];

            // Body and collider first, behaviours may rely on both in init
            let handle = match rigid_bodies.get(entity) {
                Some(rb) => rb.handle,
                None => {
                    let failure = PlayerError::MissingRigidBody(entity);
                    error!("Cannot start player: {}", failure);
                    player.fail_start(failure);
                    continue;
                }
            };
            match physics_data.rigid_body_set.get_mut(handle) {
                Some(body) => body.lock_rotations(true, true),
                None => {
                    let failure = PlayerError::RigidBodyNotInSet { entity, handle };
                    error!("Cannot start player: {}", failure);
                    player.fail_start(failure);
                    continue;
                }
            }
            player.bind_entity(entity);
            player.set_rigid_body(handle);

            let collider = player
                .collider()
                .filter(|e| colliders.contains(*e))
                .or_else(|| colliders.contains(entity).then_some(entity));
            player.set_collider(collider);

            if collider.is_none() {
                let half = DEFAULT_COLLIDER_HALF_EXTENT;
                let default_collider = ColliderComponent::new(
                    ColliderBuilder::cuboid(half, half, half).build(),
                    Some(&handle),
                    &mut physics_data,
                );
                match colliders.insert(entity, default_collider) {
                    Ok(_) => {
                        warn!(
                            "No collider attached to player {:?}, adding standard box collider... Is this intended?",
                            entity
                        );
                        player.set_collider(Some(entity));
                        warnings.push(StartWarning::DefaultColliderAdded);
                    }
                    Err(e) => error!("Failed to add default collider to {:?}: {}", entity, e),
                }
            }

            let input = match player.input() {
                Some(e) => inputs.get_mut(e),
                None => None,
            };
            match input {
                Some(input) => input.set_active(is_local_player),
                None => {
                    warn!("Player {:?} has no input surface", entity);
                    warnings.push(StartWarning::NoInputSurface);
                }
            }

            let mut ctx = BehaviourContext {
                player: entity,
                is_local_player,
                delta_time: delta_time.0,
                transform: transforms.get_mut(entity),
                input: player.input().and_then(|e| inputs.get(e)),
                rigid_body: physics_data.rigid_body_set.get_mut(handle),
            };
            let gate = player.behaviours().activate(is_local_player, &mut ctx);

            debug!(
                "Started player {:?} (local: {}), initialized {:?}, disabled {:?}",
                entity, is_local_player, gate.initialized, gate.disabled
            );

            player.finish_start(StartReport {
                is_local_player,
                gate,
                warnings,
            });
        }
    }
}

/// Forwards one phase to the behaviours of every started player.
pub struct BehaviourDispatch {
    phase: UpdatePhase,
}

impl BehaviourDispatch {
    pub const fn new(phase: UpdatePhase) -> Self {
        BehaviourDispatch { phase }
    }

    pub const fn phase(&self) -> UpdatePhase {
        self.phase
    }
}

impl<'a> System<'a> for BehaviourDispatch {
    type SystemData = (
        Entities<'a>,
        Read<'a, DeltaTime>,
        Write<'a, PhysicsData>,
        ReadStorage<'a, InputSurface>,
        WriteStorage<'a, Transform>,
        ReadStorage<'a, ModularPlayer>,
    );

    fn run(
        &mut self,
        (entities, delta_time, mut physics_data, inputs, mut transforms, players): Self::SystemData,
    ) {
        for (entity, player, transform) in (&entities, &players, (&mut transforms).maybe()).join() {
            if !player.started() {
                trace!("Skipping {:?} for {:?}, not started", self.phase, entity);
                continue;
            }

            let mut ctx = context(entity, player, delta_time.0, transform, &inputs, &mut physics_data);
            player.behaviours().dispatch(self.phase, &mut ctx);
        }
    }
}

fn context<'a>(
    entity: Entity,
    player: &ModularPlayer,
    delta_time: f32,
    transform: Option<&'a mut Transform>,
    inputs: &'a ReadStorage<'_, InputSurface>,
    physics_data: &'a mut PhysicsData,
) -> BehaviourContext<'a> {
    BehaviourContext {
        player: entity,
        is_local_player: player.is_local_player(),
        delta_time,
        transform,
        input: player.input().and_then(|e| inputs.get(e)),
        rigid_body: player
            .rigid_body()
            .and_then(|h| physics_data.rigid_body_set.get_mut(h)),
    }
}
