use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};
use specs::{Component, Entity, HashMapStorage, VecStorage};

#[derive(Component, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[storage(VecStorage)]
pub struct Transform {
    /*
    Coordinate system is right handed, -z forward, y up, x right
    */
    pub pos: Vector3<f32>,
    pub rot: UnitQuaternion<f32>,
    pub scale: Vector3<f32>,
}

impl Transform {
    pub fn at(pos: Vector3<f32>) -> Self {
        Transform {
            pos,
            ..Default::default()
        }
    }

    pub fn forward(&self) -> Vector3<f32> {
        self.rot * Vector3::new(0.0, 0.0, -1.0)
    }

    pub fn up(&self) -> Vector3<f32> {
        self.rot * Vector3::new(0.0, 1.0, 0.0)
    }

    pub fn right(&self) -> Vector3<f32> {
        self.rot * Vector3::new(1.0, 0.0, 0.0)
    }
}

impl Default for Transform {
    fn default() -> Self {
        let default_vec = Vector3::default();
        let default_quat = UnitQuaternion::identity();
        let default_scale = Vector3::new(1.0, 1.0, 1.0);
        Transform { pos: default_vec, rot: default_quat, scale: default_scale }
    }
}

/// Direct descendants of an entity, in the order they were attached.
#[derive(Component, Debug, Clone, Default, PartialEq, Eq)]
#[storage(HashMapStorage)]
pub struct Children(pub Vec<Entity>);

impl Children {
    pub fn push(&mut self, child: Entity) {
        if !self.0.contains(&child) {
            self.0.push(child);
        }
    }
}
