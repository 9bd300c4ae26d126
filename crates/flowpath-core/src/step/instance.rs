//! Instancia viva de un step dentro de un run.

use std::fmt;

use uuid::Uuid;

use super::{AnyStep, FlowStep, PresentationHint};
use crate::args::Args;
use crate::engine::RunHandle;

/// Referencia no propietaria de una instancia hacia su run.
///
/// Es un token `Copy` (id del run + número de activación) que el orquestador
/// resuelve contra su registro. Cuando el run avanza, retrocede o termina, la
/// activación deja de ser la vigente y el handle queda inerte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StepHandle {
    pub(crate) run_id: Uuid,
    pub(crate) activation: u64,
}

impl StepHandle {
    pub fn run(&self) -> RunHandle {
        RunHandle { id: self.run_id }
    }

    pub fn activation(&self) -> u64 {
        self.activation
    }
}

pub struct StepInstance {
    pub(crate) handle: StepHandle,
    pub(crate) node_index: usize,
    pub(crate) name: &'static str,
    pub(crate) hint: PresentationHint,
    pub(crate) input: Args,
    pub(crate) inner: Box<dyn AnyStep>,
}

impl StepInstance {
    pub fn handle(&self) -> StepHandle {
        self.handle
    }

    pub fn node_index(&self) -> usize {
        self.node_index
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn hint(&self) -> &PresentationHint {
        &self.hint
    }

    /// Envelope con el que se construyó la instancia.
    pub fn input(&self) -> &Args {
        &self.input
    }

    pub fn is<S: FlowStep>(&self) -> bool {
        self.inner.as_any().is::<S>()
    }

    pub fn downcast_ref<S: FlowStep>(&self) -> Option<&S> {
        self.inner.as_any().downcast_ref::<S>()
    }

    pub fn downcast_mut<S: FlowStep>(&mut self) -> Option<&mut S> {
        self.inner.as_any_mut().downcast_mut::<S>()
    }
}

impl fmt::Debug for StepInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepInstance")
         .field("handle", &self.handle)
         .field("node_index", &self.node_index)
         .field("name", &self.name)
         .field("hint", &self.hint)
         .field("input", &self.input)
         .finish()
    }
}
