use specs::{Entity, ReadStorage};

use crate::ecs::components::general::Children;

/// `root` followed by all of its descendants, depth first in attach order.
/// Entities reachable twice are only listed once.
pub fn subtree(root: Entity, children: &ReadStorage<'_, Children>) -> Vec<Entity> {
    let mut visited = vec![];
    let mut stack = vec![root];

    while let Some(entity) = stack.pop() {
        if visited.contains(&entity) {
            continue;
        }
        visited.push(entity);

        if let Some(c) = children.get(entity) {
            stack.extend(c.0.iter().rev().copied());
        }
    }

    visited
}

#[cfg(test)]
mod tests {
    use specs::{Builder, World, WorldExt};

    use super::*;

    #[test]
    fn preorder_in_attach_order() {
        let mut world = World::new();
        world.register::<Children>();

        let grandchild = world.create_entity().build();
        let first = world.create_entity().with(Children(vec![grandchild])).build();
        let second = world.create_entity().build();
        let root = world.create_entity().with(Children(vec![first, second])).build();

        let order = subtree(root, &world.read_storage::<Children>());
        assert_eq!(order, vec![root, first, grandchild, second]);
    }

    #[test]
    fn cycles_terminate() {
        let mut world = World::new();
        world.register::<Children>();

        let a = world.create_entity().build();
        let b = world.create_entity().with(Children(vec![a])).build();
        world
            .write_storage::<Children>()
            .insert(a, Children(vec![b]))
            .unwrap();

        assert_eq!(subtree(a, &world.read_storage::<Children>()), vec![a, b]);
    }
}
