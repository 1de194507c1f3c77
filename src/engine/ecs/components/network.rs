use serde::{Deserialize, Serialize};
use specs::{Component, HashMapStorage};
use uuid::Uuid;

/// Marks an entity as replicated by the networking layer.
/// `owner_id` is the client that controls it.
#[derive(Component, Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[storage(HashMapStorage)]
pub struct NetworkReplicated {
    pub net_id: Uuid,
    pub owner_id: Uuid,
}

impl NetworkReplicated {
    pub fn new(owner_id: Uuid) -> Self {
        NetworkReplicated {
            net_id: Uuid::new_v4(),
            owner_id,
        }
    }
}
