use log::info;
use nalgebra::Vector3;
use rapier3d::prelude::{Collider, ColliderBuilder, RigidBody, RigidBodyBuilder, RigidBodyType};
use specs::{Builder, Entity, World, WorldExt};
use uuid::Uuid;

use crate::ecs::{
    components::{
        general::{Children, Transform},
        network::NetworkReplicated,
        physics::{ColliderComponent, RigidBodyComponent},
        player::{BehaviourComponent, ModularPlayer, PlayerError},
    },
    resources::physics::PhysicsData,
    utils::{hierarchy::subtree, input::InputSurface},
};

pub struct PlayerSpawnDesc {
    pub position: Vector3<f32>,
    pub owner_id: Uuid,
    /// Attached to the player's body. Without one the player gets a default box on start.
    pub collider: Option<Collider>,
    pub with_input: bool,
    /// Each one is spawned as a child entity of the player
    pub behaviours: Vec<BehaviourComponent>,
}

impl Default for PlayerSpawnDesc {
    fn default() -> Self {
        PlayerSpawnDesc {
            position: Vector3::zeros(),
            owner_id: Uuid::nil(),
            collider: Some(ColliderBuilder::capsule_y(0.9, 0.4).friction(0.7).build()),
            with_input: true,
            behaviours: vec![],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnedPlayer {
    pub player: Entity,
    pub input: Option<Entity>,
    pub behaviours: Vec<Entity>,
}

/// Rotations are left free here, the player locks them itself on start.
pub fn player_rigid_body(position: Vector3<f32>) -> RigidBody {
    RigidBodyBuilder::new(RigidBodyType::Dynamic)
        .ccd_enabled(true)
        .can_sleep(false)
        .translation(position)
        .build()
}

pub fn create_ground(world: &mut World, half_extents: Vector3<f32>) -> Entity {
    ensure_physics(world);

    let (rigid_body, collider) = {
        let mut physics_data = world.write_resource::<PhysicsData>();
        let rigid_body = RigidBodyComponent::new(
            RigidBodyBuilder::new(RigidBodyType::Fixed)
                .translation(Vector3::new(0.0, -half_extents.y, 0.0))
                .build(),
            &mut physics_data,
        );
        let collider = ColliderComponent::new(
            ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z).build(),
            Some(&rigid_body.handle),
            &mut physics_data,
        );
        (rigid_body, collider)
    };

    world
        .create_entity()
        .with(Transform::default())
        .with(rigid_body)
        .with(collider)
        .build()
}

pub fn spawn_player(world: &mut World, desc: PlayerSpawnDesc) -> Result<SpawnedPlayer, PlayerError> {
    ensure_physics(world);

    let (rigid_body, collider) = {
        let mut physics_data = world.write_resource::<PhysicsData>();
        let rigid_body = RigidBodyComponent::new(player_rigid_body(desc.position), &mut physics_data);
        let collider = desc
            .collider
            .map(|c| ColliderComponent::new(c, Some(&rigid_body.handle), &mut physics_data));
        (rigid_body, collider)
    };

    let input = desc
        .with_input
        .then(|| world.create_entity().with(InputSurface::new()).build());

    let behaviours: Vec<Entity> = desc
        .behaviours
        .into_iter()
        .map(|b| world.create_entity().with(b).build())
        .collect();

    let mut children = Children::default();
    input.iter().chain(&behaviours).for_each(|e| children.push(*e));

    let mut builder = world
        .create_entity()
        .with(Transform::at(desc.position))
        .with(rigid_body)
        .with(NetworkReplicated::new(desc.owner_id))
        .with(children);
    if let Some(c) = collider {
        builder = builder.with(c);
    }
    let player = builder.build();

    attach_player(world, player)?;

    Ok(SpawnedPlayer {
        player,
        input,
        behaviours,
    })
}

/*
Wires up a freshly attached player from what is already on the entity:
its own collider, every behaviour in its subtree (only if none are
registered yet) and the first input surface in its subtree.
References that are already set are left alone.
*/
pub fn attach_player(world: &World, entity: Entity) -> Result<(), PlayerError> {
    let mut players = world.write_storage::<ModularPlayer>();
    let player = players
        .entry(entity)
        .map_err(|e| PlayerError::Attach {
            entity,
            reason: e.to_string(),
        })?
        .or_insert_with(ModularPlayer::new);
    player.bind_entity(entity);

    let children = world.read_storage::<Children>();
    let colliders = world.read_storage::<ColliderComponent>();
    let behaviours = world.read_storage::<BehaviourComponent>();
    let inputs = world.read_storage::<InputSurface>();
    let tree = subtree(entity, &children);

    if player.collider().is_none() && colliders.contains(entity) {
        player.set_collider(Some(entity));
        info!("Added attached collider of {:?}", entity);
    }

    if player.behaviours().is_empty() {
        for e in &tree {
            if let Some(b) = behaviours.get(*e) {
                if player.register(&b.0) {
                    info!("Added attached {} from {:?} to {:?}", b.0.name(), e, entity);
                }
            }
        }
    }

    if player.input().is_none() {
        if let Some(input) = tree.iter().copied().find(|e| inputs.contains(*e)) {
            player.set_input(Some(input));
            info!("Added attached input surface {:?} to {:?}", input, entity);
        }
    }

    Ok(())
}

fn ensure_physics(world: &mut World) {
    if !world.has_value::<PhysicsData>() {
        world.insert(PhysicsData::default());
    }
}
