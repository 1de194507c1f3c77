use log::error;
use nalgebra::Vector3;
use rapier3d::prelude::{Collider, ColliderHandle, RigidBody, RigidBodyHandle};
use specs::{Component, VecStorage};

use crate::ecs::resources::physics::PhysicsData;

#[derive(Component, Default, Debug, Clone, Copy, PartialEq, Eq)]
#[storage(VecStorage)]
pub struct RigidBodyComponent {
    pub handle: RigidBodyHandle,
}

impl RigidBodyComponent {
    pub fn new(rigid_body: RigidBody, physics_data: &mut PhysicsData) -> Self {
        let handle = physics_data.rigid_body_set.insert(rigid_body);
        RigidBodyComponent { handle }
    }

    /// None when the body was removed from the physics set
    pub fn translation(&self, physics_data: &PhysicsData) -> Option<Vector3<f32>> {
        match physics_data.rigid_body_set.get(self.handle) {
            Some(v) => Some(*v.translation()),
            None => {
                error!("Could not find rigid body with handle: {:?}", self.handle);
                None
            }
        }
    }
}

#[derive(Component, Default, Debug, Clone, Copy, PartialEq, Eq)]
#[storage(VecStorage)]
pub struct ColliderComponent {
    handle: ColliderHandle,
}

impl ColliderComponent {
    pub fn new(
        collider: Collider,
        parent_handle: Option<&RigidBodyHandle>,
        physics_data: &mut PhysicsData,
    ) -> Self {
        let handle = match parent_handle {
            Some(v) => physics_data.collider_set.insert_with_parent(
                collider,
                *v,
                &mut physics_data.rigid_body_set,
            ),
            None => physics_data.collider_set.insert(collider),
        };
        ColliderComponent { handle }
    }

    pub const fn handle(&self) -> ColliderHandle {
        self.handle
    }
}
