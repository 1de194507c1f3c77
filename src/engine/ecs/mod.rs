use specs::{World, WorldExt};

use self::{
    components::{
        general::{Children, Transform},
        network::NetworkReplicated,
        physics::{ColliderComponent, RigidBodyComponent},
        player::{BehaviourComponent, ModularPlayer},
    },
    resources::{network::LocalClient, physics::PhysicsData, DeltaTime, FrameCount},
    utils::input::InputSurface,
};

pub mod components;
pub mod resources;
pub mod systems;
pub mod utils;

pub struct ECS {
    pub world: World,
}

impl ECS {
    pub fn new() -> Self {
        let mut world = World::new();
        ECS::register_components(&mut world);
        ECS::insert_resources(&mut world);
        Self { world }
    }

    fn register_components(world: &mut World) {
        world.register::<Transform>();
        world.register::<Children>();
        world.register::<RigidBodyComponent>();
        world.register::<ColliderComponent>();
        world.register::<NetworkReplicated>();
        world.register::<InputSurface>();
        world.register::<ModularPlayer>();
        world.register::<BehaviourComponent>();
    }

    fn insert_resources(world: &mut World) {
        world.insert(PhysicsData::default());
        world.insert(LocalClient::default());
        world.insert(DeltaTime::default());
        world.insert(FrameCount::default());
    }
}

impl Default for ECS {
    fn default() -> Self {
        Self::new()
    }
}
