mod common;

use std::sync::Arc;

use common::{engine_without_physics, PhaseLog, Probe};
use engine::{
    behaviour::{BehaviourRef, ModularBehaviour},
    ecs::{
        components::{
            general::Transform,
            physics::{ColliderComponent, RigidBodyComponent},
            player::{BehaviourComponent, ModularPlayer, PlayerError, StartWarning},
        },
        resources::physics::PhysicsData,
        utils::{
            input::InputSurface,
            objects::{spawn_player, PlayerSpawnDesc},
        },
    },
    ModularEngine,
};
use parking_lot::Mutex;
use rapier3d::prelude::LockedAxes;
use rstest::{fixture, rstest};
use specs::{Builder, Join, WorldExt};
use uuid::Uuid;

struct Scene {
    engine: ModularEngine<'static>,
    player: specs::Entity,
    input: specs::Entity,
    local_only: Arc<Mutex<Probe>>,
    shared: Arc<Mutex<Probe>>,
}

fn scene(is_local: bool, collider: bool) -> Scene {
    let mut engine = engine_without_physics();
    let me = Uuid::new_v4();
    engine.set_local_client(Some(me));

    let log = PhaseLog::default();
    let local_only = Arc::new(Mutex::new(Probe::new("local_only", true, &log)));
    let shared = Arc::new(Mutex::new(Probe::new("shared", false, &log)));

    let mut desc = PlayerSpawnDesc {
        owner_id: if is_local { me } else { Uuid::new_v4() },
        behaviours: vec![
            BehaviourComponent(BehaviourRef::from_shared(local_only.clone())),
            BehaviourComponent(BehaviourRef::from_shared(shared.clone())),
        ],
        ..Default::default()
    };
    if !collider {
        desc.collider = None;
    }

    let spawned = spawn_player(&mut engine.ecs.world, desc).unwrap();
    Scene {
        engine,
        player: spawned.player,
        input: spawned.input.unwrap(),
        local_only,
        shared,
    }
}

#[fixture]
fn local_scene() -> Scene {
    scene(true, true)
}

#[fixture]
fn remote_scene() -> Scene {
    scene(false, true)
}

#[rstest]
fn local_player_initializes_local_only_behaviours(local_scene: Scene) {
    let mut s = local_scene;
    s.engine.start_players();

    assert_eq!(s.local_only.lock().inits, 1);
    assert!(s.local_only.lock().enabled());
    assert_eq!(s.local_only.lock().owner(), Some(s.player));

    assert_eq!(s.shared.lock().inits, 0);
    assert!(!s.shared.lock().enabled());

    let players = s.engine.ecs.world.read_storage::<ModularPlayer>();
    let player = players.get(s.player).unwrap();
    assert!(player.is_local_player());
    let report = player.start_report().unwrap();
    assert_eq!(report.gate.initialized, vec!["Probe"]);
    assert_eq!(report.gate.disabled, vec!["Probe"]);
    assert!(report.warnings.is_empty());

    let inputs = s.engine.ecs.world.read_storage::<InputSurface>();
    assert!(inputs.get(s.input).unwrap().is_active());
}

#[rstest]
fn remote_player_disables_everything(remote_scene: Scene) {
    let mut s = remote_scene;
    s.engine.start_players();

    for b in [&s.local_only, &s.shared] {
        assert_eq!(b.lock().inits, 0);
        assert!(!b.lock().enabled());
        assert_eq!(b.lock().owner(), None);
    }

    let players = s.engine.ecs.world.read_storage::<ModularPlayer>();
    assert!(!players.get(s.player).unwrap().is_local_player());

    let inputs = s.engine.ecs.world.read_storage::<InputSurface>();
    assert!(!inputs.get(s.input).unwrap().is_active());
}

#[rstest]
#[case::local(true)]
#[case::remote(false)]
fn start_runs_once(#[case] is_local: bool) {
    let mut s = scene(is_local, true);
    for _ in 0..5 {
        s.engine.tick(0.25);
    }

    let expected = u32::from(is_local);
    assert_eq!(s.local_only.lock().inits, expected);
    assert_eq!(s.shared.lock().inits, 0);
}

#[rstest]
fn rotation_is_locked_on_start(local_scene: Scene) {
    let mut s = local_scene;
    s.engine.start_players();

    let world = &s.engine.ecs.world;
    let handle = world.read_storage::<RigidBodyComponent>().get(s.player).unwrap().handle;
    let physics = world.read_resource::<PhysicsData>();
    let body = physics.rigid_body_set.get(handle).unwrap();
    assert!(body.locked_axes().contains(LockedAxes::ROTATION_LOCKED));

    let players = world.read_storage::<ModularPlayer>();
    assert_eq!(players.get(s.player).unwrap().rigid_body(), Some(handle));
}

#[rstest]
fn missing_collider_gets_a_default_box() {
    let mut s = scene(true, false);
    assert!(s.engine.ecs.world.read_storage::<ColliderComponent>().get(s.player).is_none());

    s.engine.start_players();

    let world = &s.engine.ecs.world;
    let colliders = world.read_storage::<ColliderComponent>();
    let collider = colliders.get(s.player).expect("default collider added");
    let physics = world.read_resource::<PhysicsData>();
    assert!(physics.collider_set.get(collider.handle()).unwrap().shape().as_cuboid().is_some());
    assert_eq!(physics.collider_set.len(), 1);

    let players = world.read_storage::<ModularPlayer>();
    let player = players.get(s.player).unwrap();
    assert_eq!(player.collider(), Some(s.player));
    assert_eq!(
        player.start_report().unwrap().warnings,
        vec![StartWarning::DefaultColliderAdded]
    );
}

#[rstest]
fn existing_collider_is_kept(local_scene: Scene) {
    let mut s = local_scene;
    s.engine.start_players();

    let world = &s.engine.ecs.world;
    let physics = world.read_resource::<PhysicsData>();
    assert_eq!(physics.collider_set.len(), 1);
    let collider = world.read_storage::<ColliderComponent>().get(s.player).copied().unwrap();
    assert!(physics.collider_set.get(collider.handle()).unwrap().shape().as_capsule().is_some());
}

#[test]
fn player_without_body_fails_once() {
    let mut engine = engine_without_physics();
    let log = PhaseLog::default();
    let probe = Arc::new(Mutex::new(Probe::new("probe", true, &log)));

    let player = engine
        .ecs
        .world
        .create_entity()
        .with(Transform::default())
        .with(ModularPlayer::new().with_behaviour(&BehaviourRef::from_shared(probe.clone())))
        .build();

    engine.tick(1.0);
    engine.tick(1.0);

    let players = engine.ecs.world.read_storage::<ModularPlayer>();
    let p = players.get(player).unwrap();
    assert!(!p.started());
    assert_eq!(p.start_failure(), Some(&PlayerError::MissingRigidBody(player)));
    assert_eq!(probe.lock().inits, 0);
    assert!(log.lock().is_empty());
}

#[test]
fn transform_accessor_reads_player_entity() {
    let mut s = scene(true, true);
    s.engine.start_players();

    let world = &s.engine.ecs.world;
    let players = world.read_storage::<ModularPlayer>();
    let transforms = world.read_storage::<Transform>();
    let (player, _) = (&players, &transforms).join().next().unwrap();
    assert_eq!(player.entity(), Some(s.player));
    assert!(player.transform(&transforms).is_some());
}
