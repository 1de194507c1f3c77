#![allow(dead_code)]

use std::sync::Arc;

use engine::{
    behaviour::{BehaviourContext, BehaviourError, BehaviourState, ModularBehaviour, UpdatePhase},
    EngineSettings, ModularEngine,
};
use parking_lot::Mutex;

pub type PhaseLog = Arc<Mutex<Vec<(&'static str, UpdatePhase)>>>;

/// Records every call it gets into a shared log.
pub struct Probe {
    state: BehaviourState,
    pub label: &'static str,
    pub inits: u32,
    log: PhaseLog,
}

impl Probe {
    pub fn new(label: &'static str, local_only: bool, log: &PhaseLog) -> Self {
        Probe {
            state: BehaviourState::new(local_only),
            label,
            inits: 0,
            log: log.clone(),
        }
    }
}

impl ModularBehaviour for Probe {
    fn state(&self) -> &BehaviourState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut BehaviourState {
        &mut self.state
    }

    fn init(&mut self, _ctx: &mut BehaviourContext<'_>) -> Result<(), BehaviourError> {
        self.inits += 1;
        Ok(())
    }

    fn process(
        &mut self,
        phase: UpdatePhase,
        _ctx: &mut BehaviourContext<'_>,
    ) -> Result<(), BehaviourError> {
        self.log.lock().push((self.label, phase));
        Ok(())
    }
}

/// Second concrete type for lookup tests.
pub struct OtherProbe {
    state: BehaviourState,
}

impl OtherProbe {
    pub fn new() -> Self {
        OtherProbe {
            state: BehaviourState::new(true),
        }
    }
}

impl ModularBehaviour for OtherProbe {
    fn state(&self) -> &BehaviourState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut BehaviourState {
        &mut self.state
    }

    fn process(
        &mut self,
        _phase: UpdatePhase,
        _ctx: &mut BehaviourContext<'_>,
    ) -> Result<(), BehaviourError> {
        Ok(())
    }
}

pub fn engine_without_physics() -> ModularEngine<'static> {
    ModularEngine::new(EngineSettings {
        use_physics: false,
        fixed_timestep: 0.5,
        max_fixed_steps: 4,
    })
}
