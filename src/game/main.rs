use anyhow::{anyhow, Result};
use argh::FromArgs;
use engine::{
    behaviour::{look::LookBehaviour, movement::MovementBehaviour},
    ecs::{
        components::{general::Transform, player::{BehaviourComponent, ModularPlayer}},
        utils::{
            input::InputSurface,
            objects::{create_ground, spawn_player, PlayerSpawnDesc},
        },
    },
    EngineSettings, ModularEngine,
};
use log::info;
use nalgebra::Vector3;
use specs::WorldExt;
use uuid::Uuid;
use winit::{
    event::ElementState,
    keyboard::{KeyCode, PhysicalKey},
};

#[derive(FromArgs)]
/// Runs a headless modular player simulation.
struct Args {
    /// simulate a remote replica instead of the locally controlled player
    #[argh(switch)]
    remote: bool,

    /// number of frames to simulate
    #[argh(option, default = "120")]
    frames: u32,

    /// seconds per frame
    #[argh(option, default = "1.0 / 60.0")]
    frame_dt: f32,

    /// movement speed of the player in units per second
    #[argh(option, default = "4.0")]
    speed: f32,
}

fn main() -> Result<()> {
    let args: Args = argh::from_env();

    let mut engine = ModularEngine::new(EngineSettings::default());

    let local_id = Uuid::new_v4();
    engine.set_local_client(Some(local_id));
    let owner_id = if args.remote { Uuid::new_v4() } else { local_id };

    let world = &mut engine.ecs.world;
    create_ground(world, Vector3::new(50.0, 0.5, 50.0));

    let spawned = spawn_player(
        world,
        PlayerSpawnDesc {
            position: Vector3::new(0.0, 1.5, 0.0),
            owner_id,
            behaviours: vec![
                BehaviourComponent::new(MovementBehaviour::new(args.speed)),
                BehaviourComponent::new(LookBehaviour::new(0.1)),
            ],
            ..Default::default()
        },
    )?;
    let input_entity = spawned
        .input
        .ok_or_else(|| anyhow!("player was spawned without an input surface"))?;

    for frame in 0..args.frames {
        if frame == 1 {
            let mut inputs = engine.ecs.world.write_storage::<InputSurface>();
            if let Some(input) = inputs.get_mut(input_entity) {
                input.handle_key(PhysicalKey::Code(KeyCode::KeyW), ElementState::Pressed);
                input.handle_mouse_motion((-300.0, 0.0));
            }
        }

        engine.tick(args.frame_dt);
    }

    let players = engine.ecs.world.read_storage::<ModularPlayer>();
    let transforms = engine.ecs.world.read_storage::<Transform>();
    let player = players
        .get(spawned.player)
        .ok_or_else(|| anyhow!("player {:?} disappeared", spawned.player))?;

    if let Some(report) = player.start_report() {
        info!(
            "Player local: {}, initialized {:?}, disabled {:?}",
            report.is_local_player, report.gate.initialized, report.gate.disabled
        );
    }
    if let Some(t) = player.transform(&transforms) {
        info!("Player ended at {:?} facing {:?} after {} frames", t.pos, t.forward(), engine.frame());
    }

    Ok(())
}
