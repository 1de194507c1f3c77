mod common;

use common::{engine_without_physics, PhaseLog, Probe};
use engine::{
    behaviour::BehaviourRef,
    ecs::{
        components::{
            general::Children,
            physics::{ColliderComponent, RigidBodyComponent},
            player::{BehaviourComponent, ModularPlayer, PlayerError},
        },
        resources::physics::PhysicsData,
        utils::{
            input::InputSurface,
            objects::{attach_player, player_rigid_body},
        },
    },
};
use nalgebra::Vector3;
use rapier3d::prelude::ColliderBuilder;
use specs::{Builder, WorldExt};

#[test]
fn adopts_collider_behaviours_and_input_from_subtree() {
    let mut engine = engine_without_physics();
    let log = PhaseLog::default();
    let world = &mut engine.ecs.world;

    let (rigid_body, collider) = {
        let mut physics = world.write_resource::<PhysicsData>();
        let rb = RigidBodyComponent::new(player_rigid_body(Vector3::zeros()), &mut physics);
        let c = ColliderComponent::new(ColliderBuilder::ball(0.5).build(), Some(&rb.handle), &mut physics);
        (rb, c)
    };

    let nested = world
        .create_entity()
        .with(BehaviourComponent::new(Probe::new("nested", true, &log)))
        .build();
    let first_input = world.create_entity().with(InputSurface::new()).build();
    let holder = world
        .create_entity()
        .with(BehaviourComponent::new(Probe::new("holder", true, &log)))
        .with(Children(vec![nested]))
        .build();
    let second_input = world.create_entity().with(InputSurface::new()).build();
    let direct = world
        .create_entity()
        .with(BehaviourComponent::new(Probe::new("direct", true, &log)))
        .build();

    let player = world
        .create_entity()
        .with(rigid_body)
        .with(collider)
        .with(Children(vec![holder, first_input, second_input, direct]))
        .build();

    attach_player(world, player).unwrap();

    let players = world.read_storage::<ModularPlayer>();
    let p = players.get(player).unwrap();
    assert_eq!(p.collider(), Some(player));
    assert_eq!(p.input(), Some(first_input));
    assert_eq!(p.entity(), Some(player));

    let labels: Vec<&str> = p
        .behaviours()
        .iter()
        .map(|b| b.downcast::<Probe>().unwrap().lock().label)
        .collect();
    assert_eq!(labels, vec!["holder", "nested", "direct"]);
}

#[test]
fn keeps_what_is_already_assigned() {
    let mut engine = engine_without_physics();
    let log = PhaseLog::default();
    let world = &mut engine.ecs.world;

    let assigned = BehaviourRef::new(Probe::new("assigned", true, &log));
    let own_input = world.create_entity().with(InputSurface::new()).build();
    let child = world
        .create_entity()
        .with(BehaviourComponent::new(Probe::new("child", true, &log)))
        .with(InputSurface::new())
        .build();

    let player = world
        .create_entity()
        .with(Children(vec![child]))
        .with(
            ModularPlayer::new()
                .with_input(own_input)
                .with_behaviour(&assigned),
        )
        .build();

    attach_player(world, player).unwrap();

    let players = world.read_storage::<ModularPlayer>();
    let p = players.get(player).unwrap();
    assert_eq!(p.input(), Some(own_input));
    assert_eq!(p.behaviours().len(), 1);
    assert!(p.behaviours().contains(&assigned));
    assert_eq!(p.collider(), None);
}

#[test]
fn attaching_twice_does_not_duplicate() {
    let mut engine = engine_without_physics();
    let log = PhaseLog::default();
    let world = &mut engine.ecs.world;

    let child = world
        .create_entity()
        .with(BehaviourComponent::new(Probe::new("child", true, &log)))
        .build();
    let player = world.create_entity().with(Children(vec![child])).build();

    attach_player(world, player).unwrap();
    attach_player(world, player).unwrap();

    let players = world.read_storage::<ModularPlayer>();
    assert_eq!(players.get(player).unwrap().behaviours().len(), 1);
}

#[test]
fn attaching_a_dead_entity_fails() {
    let mut engine = engine_without_physics();
    let world = &mut engine.ecs.world;

    let gone = world.create_entity().build();
    world.delete_entity(gone).unwrap();
    world.maintain();

    assert!(matches!(
        attach_player(world, gone),
        Err(PlayerError::Attach { entity, .. }) if entity == gone
    ));
}
