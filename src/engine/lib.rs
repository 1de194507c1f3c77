#![deny(
    nonstandard_style,
    //warnings,
    rust_2018_idioms,
    //unused,
    future_incompatible,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo
)]

pub mod behaviour;
pub mod ecs;

use ecs::resources::{network::LocalClient, DeltaTime, FrameCount};
use ecs::systems::physics::Physics;
use ecs::systems::player::{BehaviourDispatch, PlayerStart};
use ecs::utils::input::InputSurface;
use ecs::ECS;
use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};
use specs::{Dispatcher, DispatcherBuilder, Join, WorldExt};
use uuid::Uuid;

use behaviour::UpdatePhase;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Without physics the fixed update only runs behaviours
    pub use_physics: bool,
    /// Seconds per fixed update
    pub fixed_timestep: f32,
    /// Upper bound of fixed updates per tick, leftover time is dropped
    pub max_fixed_steps: u32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            use_physics: true,
            fixed_timestep: 1.0 / 50.0,
            max_fixed_steps: 8,
        }
    }
}

pub struct ModularEngine<'a> {
    pub ecs: ECS,
    settings: EngineSettings,

    start_dispatcher: Dispatcher<'a, 'a>,
    fixed_dispatcher: Dispatcher<'a, 'a>,
    update_dispatcher: Dispatcher<'a, 'a>,
    late_dispatcher: Dispatcher<'a, 'a>,

    accumulator: f32,
}

impl<'a> ModularEngine<'a> {
    pub fn new(settings: EngineSettings) -> Self {
        match pretty_env_logger::try_init() {
            Ok(_) => {}
            Err(e) => trace!(
                "Failed to init pretty_env_logger, probably already initialized: {:?}",
                e
            ),
        }

        let settings = if settings.fixed_timestep > 0.0 && settings.max_fixed_steps > 0 {
            settings
        } else {
            warn!("Invalid fixed update settings {:?}, using defaults", settings);
            EngineSettings {
                use_physics: settings.use_physics,
                ..EngineSettings::default()
            }
        };

        let mut ecs = ECS::new();

        // Behaviours are single threaded, everything touching them is thread local
        // and runs in the order it was added
        let mut start_dispatcher = DispatcherBuilder::new()
            .with_thread_local(PlayerStart)
            .build();

        let mut fixed_builder = DispatcherBuilder::new()
            .with_thread_local(BehaviourDispatch::new(UpdatePhase::FixedUpdate));
        if settings.use_physics {
            fixed_builder.add_thread_local(Physics::default());
        }
        let mut fixed_dispatcher = fixed_builder.build();

        let mut update_dispatcher = DispatcherBuilder::new()
            .with_thread_local(BehaviourDispatch::new(UpdatePhase::Update))
            .build();

        let mut late_dispatcher = DispatcherBuilder::new()
            .with_thread_local(BehaviourDispatch::new(UpdatePhase::LateUpdate))
            .build();

        for dispatcher in [
            &mut start_dispatcher,
            &mut fixed_dispatcher,
            &mut update_dispatcher,
            &mut late_dispatcher,
        ] {
            dispatcher.setup(&mut ecs.world);
        }

        return Self {
            ecs,
            settings,
            start_dispatcher,
            fixed_dispatcher,
            update_dispatcher,
            late_dispatcher,
            accumulator: 0.0,
        };
    }

    pub const fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Set by the networking layer once it knows who we are
    pub fn set_local_client(&mut self, client_id: Option<Uuid>) {
        self.ecs.world.insert(LocalClient { client_id });
    }

    pub fn frame(&self) -> u64 {
        self.ecs.world.read_resource::<FrameCount>().0
    }

    /*
    One frame: start new players, catch up on fixed updates, then update
    and late update. Every input surface is stepped at the end, so pressed,
    released and mouse motion fed in before a tick are seen by exactly that
    tick. Returns how many fixed updates ran.
    */
    pub fn tick(&mut self, frame_dt: f32) -> u32 {
        let world = &mut self.ecs.world;
        let fixed = self.settings.fixed_timestep;

        self.start_dispatcher.dispatch(world);
        world.maintain();

        self.accumulator += frame_dt.max(0.0);
        world.insert(DeltaTime(fixed));

        let mut steps = 0;
        while self.accumulator >= fixed && steps < self.settings.max_fixed_steps {
            self.fixed_dispatcher.dispatch(world);
            self.accumulator -= fixed;
            steps += 1;
        }

        if self.accumulator >= fixed {
            debug!(
                "Fixed update fell behind, dropping {:.4}s",
                self.accumulator - self.accumulator % fixed
            );
            self.accumulator %= fixed;
        }

        world.insert(DeltaTime(frame_dt));
        self.update_dispatcher.dispatch(world);
        self.late_dispatcher.dispatch(world);
        world.maintain();

        // per frame input is consumed, events fed before the next tick show up in it
        for input in (&mut world.write_storage::<InputSurface>()).join() {
            input.step();
        }

        world.write_resource::<FrameCount>().0 += 1;
        steps
    }

    /// Runs a single phase outside the normal tick order.
    pub fn dispatch_phase(&mut self, phase: UpdatePhase) {
        let world = &mut self.ecs.world;
        match phase {
            UpdatePhase::Update => self.update_dispatcher.dispatch(world),
            UpdatePhase::FixedUpdate => self.fixed_dispatcher.dispatch(world),
            UpdatePhase::LateUpdate => self.late_dispatcher.dispatch(world),
        }
    }

    /// Starts any players added since the last tick without running a frame.
    pub fn start_players(&mut self) {
        self.start_dispatcher.dispatch(&mut self.ecs.world);
        self.ecs.world.maintain();
    }
}
