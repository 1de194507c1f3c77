use std::{
    any::{type_name, Any, TypeId},
    fmt,
    sync::Arc,
};

use log::{error, trace, warn};
use parking_lot::{Mutex, MutexGuard};

use super::{BehaviourContext, BehaviourError, ModularBehaviour, UpdatePhase};

/// Shared handle to a behaviour.
///
/// Two handles are the same behaviour when they point at the same allocation,
/// cloning a handle never creates a new behaviour.
#[derive(Clone)]
pub struct BehaviourRef {
    behaviour: Arc<Mutex<dyn ModularBehaviour>>,
    // same allocation as `behaviour`, kept for downcasting back to the concrete type
    typed: Arc<dyn Any + Send + Sync>,
    type_id: TypeId,
    name: &'static str,
}

impl BehaviourRef {
    pub fn new<T: ModularBehaviour>(behaviour: T) -> Self {
        Self::from_shared(Arc::new(Mutex::new(behaviour)))
    }

    pub fn from_shared<T: ModularBehaviour>(shared: Arc<Mutex<T>>) -> Self {
        let typed: Arc<dyn Any + Send + Sync> = shared.clone();
        let name = type_name::<T>();
        BehaviourRef {
            behaviour: shared,
            typed,
            type_id: TypeId::of::<T>(),
            name: name.rsplit("::").next().unwrap_or(name),
        }
    }

    pub fn lock(&self) -> MutexGuard<'_, dyn ModularBehaviour> {
        self.behaviour.lock()
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub fn is<T: ModularBehaviour>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    pub fn downcast<T: ModularBehaviour>(&self) -> Option<Arc<Mutex<T>>> {
        Arc::clone(&self.typed).downcast::<Mutex<T>>().ok()
    }

    pub fn same_as(&self, other: &BehaviourRef) -> bool {
        Arc::as_ptr(&self.behaviour).cast::<()>() == Arc::as_ptr(&other.behaviour).cast::<()>()
    }
}

impl fmt::Debug for BehaviourRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BehaviourRef")
            .field("name", &self.name)
            .field("ptr", &Arc::as_ptr(&self.behaviour).cast::<()>())
            .finish()
    }
}

impl<T: ModularBehaviour> From<Arc<Mutex<T>>> for BehaviourRef {
    fn from(shared: Arc<Mutex<T>>) -> Self {
        BehaviourRef::from_shared(shared)
    }
}

/// Outcome of running the ownership gate over a registry.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct GateReport {
    pub initialized: Vec<&'static str>,
    pub disabled: Vec<&'static str>,
    pub failed: Vec<(&'static str, BehaviourError)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DispatchReport {
    pub phase: UpdatePhase,
    pub processed: usize,
    pub failed: Vec<(&'static str, BehaviourError)>,
}

/// Ordered set of behaviours, membership by handle identity.
#[derive(Debug, Default, Clone)]
pub struct BehaviourRegistry {
    behaviours: Vec<BehaviourRef>,
}

impl BehaviourRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.behaviours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.behaviours.is_empty()
    }

    pub fn contains(&self, behaviour: &BehaviourRef) -> bool {
        self.behaviours.iter().any(|b| b.same_as(behaviour))
    }

    pub fn iter(&self) -> impl Iterator<Item = &BehaviourRef> {
        self.behaviours.iter()
    }

    /// Returns false if the behaviour was already registered.
    pub fn register(&mut self, behaviour: &BehaviourRef) -> bool {
        if self.contains(behaviour) {
            return false;
        }

        self.behaviours.push(behaviour.clone());
        true
    }

    /// Returns false if the behaviour was not registered.
    pub fn deregister(&mut self, behaviour: &BehaviourRef) -> bool {
        match self.behaviours.iter().position(|b| b.same_as(behaviour)) {
            Some(index) => {
                self.behaviours.remove(index);
                true
            }
            None => false,
        }
    }

    /// First registered behaviour whose concrete type is exactly `T`.
    pub fn find<T: ModularBehaviour>(&self) -> Option<Arc<Mutex<T>>> {
        self.behaviours
            .iter()
            .find(|b| b.is::<T>())
            .and_then(BehaviourRef::downcast::<T>)
    }

    /*
    Only behaviours that are local only AND running on the locally controlled
    instance get initialized, everything else is disabled and never initialized.
    A behaviour that fails to init is disabled as well. Behaviours bound to
    another player are reported as failed and left untouched.
    */
    pub fn activate(&self, is_local_player: bool, ctx: &mut BehaviourContext<'_>) -> GateReport {
        let mut report = GateReport::default();

        for entry in &self.behaviours {
            let mut behaviour = entry.lock();

            // belongs to another player, its state is not ours to change
            if let Some(current) = behaviour.owner().filter(|o| *o != ctx.player) {
                let e = BehaviourError::AlreadyOwned {
                    current,
                    requested: ctx.player,
                };
                warn!("Skipping behaviour {} on {:?}: {}", entry.name(), ctx.player, e);
                report.failed.push((entry.name(), e));
                continue;
            }

            if !(behaviour.local_only() && is_local_player) {
                behaviour.set_enabled(false);
                report.disabled.push(entry.name());
                continue;
            }

            let result = behaviour
                .state_mut()
                .bind(ctx.player)
                .and_then(|()| behaviour.init(ctx));

            match result {
                Ok(()) => report.initialized.push(entry.name()),
                Err(e) => {
                    error!("Failed to init behaviour {} on {:?}: {}", entry.name(), ctx.player, e);
                    behaviour.set_enabled(false);
                    report.failed.push((entry.name(), e));
                }
            }
        }

        report
    }

    /// Calls `process` on every behaviour in registration order.
    /// A failing behaviour is logged and does not stop the rest.
    pub fn dispatch(&self, phase: UpdatePhase, ctx: &mut BehaviourContext<'_>) -> DispatchReport {
        let mut report = DispatchReport {
            phase,
            processed: 0,
            failed: vec![],
        };

        for entry in &self.behaviours {
            trace!("{:?} -> {}", phase, entry.name());
            if let Err(e) = entry.lock().process(phase, ctx) {
                error!(
                    "Behaviour {} failed during {:?} on {:?}: {}",
                    entry.name(),
                    phase,
                    ctx.player,
                    e
                );
                report.failed.push((entry.name(), e));
            }
            report.processed += 1;
        }

        report
    }
}
