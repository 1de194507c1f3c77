use specs::{Join, Read, ReadStorage, System, Write, WriteStorage};

use crate::ecs::{
    components::{general::Transform, physics::RigidBodyComponent},
    resources::{physics::PhysicsData, DeltaTime},
    utils::debug::DebugEventHandler,
};

/// Steps the physics world by `DeltaTime` and copies body positions back into
/// their transforms. Runs with the fixed update.
#[derive(Default)]
pub struct Physics {
    events: DebugEventHandler,
}

impl<'a> System<'a> for Physics {
    type SystemData = (
        Write<'a, PhysicsData>,
        Read<'a, DeltaTime>,
        ReadStorage<'a, RigidBodyComponent>,
        WriteStorage<'a, Transform>,
    );

    fn run(&mut self, (mut physics_data, delta_time, rigid_body, mut transform): Self::SystemData) {
        if delta_time.0 <= 0.0 {
            return;
        }

        physics_data.step(delta_time.0, &self.events);

        // rotation stays with the transform, player bodies have theirs locked
        for (r, t) in (&rigid_body, &mut transform).join() {
            if let Some(pos) = r.translation(&physics_data) {
                t.pos = pos;
            }
        }
    }
}
