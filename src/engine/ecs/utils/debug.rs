use log::trace;
use rapier3d::prelude::{
    ColliderSet, CollisionEvent, ContactPair, EventHandler, Real, RigidBodySet,
};

/// Logs rapier events, only colliders with `ActiveEvents` set produce any.
#[derive(Default)]
pub struct DebugEventHandler;

impl EventHandler for DebugEventHandler {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        trace!(
            "Collision event: started?: {:?}, stopped?: {:?}, removed?: {:?}",
            event.started(),
            event.stopped(),
            event.removed()
        );
    }

    fn handle_contact_force_event(
        &self,
        dt: Real,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        contact_pair: &ContactPair,
        total_force_magnitude: Real,
    ) {
        trace!(
            "Contact force event between {:?} and {:?}: dt: {:?}, total force magnitude: {:?}",
            contact_pair.collider1,
            contact_pair.collider2,
            dt,
            total_force_magnitude
        );
    }
}
