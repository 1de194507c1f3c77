use uuid::Uuid;

use crate::ecs::components::network::NetworkReplicated;

/// Identity of this process on the network, written by whatever networking
/// layer is running. `None` until the server assigned us an id, and on
/// dedicated servers.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalClient {
    pub client_id: Option<Uuid>,
}

impl LocalClient {
    pub const fn new(client_id: Uuid) -> Self {
        LocalClient {
            client_id: Some(client_id),
        }
    }

    /// True when `replicated` is controlled from this process.
    /// Entities that are not replicated are never locally controlled.
    pub fn controls(&self, replicated: Option<&NetworkReplicated>) -> bool {
        match (self.client_id, replicated) {
            (Some(id), Some(r)) => !id.is_nil() && r.owner_id == id,
            _ => false,
        }
    }
}
