//! Estado vivo de un run: posición, instancia activa, envelopes ofrecidos y
//! callbacks.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::args::{Args, ArgsMismatch};
use crate::errors::DefinitionError;
use crate::flow::{FlowNode, Workflow};
use crate::step::{AnyStep, PresentationHint, StepHandle, StepInstance};

/// Estados de un run.
///
/// Transiciones válidas:
/// - `NotLaunched` -> `Active` (o directamente `Completed` si ningún nodo
///   acepta)
/// - `Active` -> `Completed` | `Abandoned` | `Faulted`
///
/// Los estados terminales no admiten más transiciones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunState {
    NotLaunched,
    Active,
    Completed,
    Abandoned,
    /// Terminado por un error de definición.
    Faulted,
}

impl RunState {
    pub fn is_terminal(self) -> bool {
        matches!(self, RunState::Completed | RunState::Abandoned | RunState::Faulted)
    }
}

/// Identificador de un run en el registro del orquestador.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunHandle {
    pub(crate) id: Uuid,
}

impl RunHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }
}

/// Resultado final de un run terminado.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    Completed(Args),
    Abandoned(String),
    Faulted(DefinitionError),
}

/// Efecto observable de una operación del orquestador.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Un nodo quedó activo con una instancia nueva.
    Activated { node_index: usize },
    /// No quedaban nodos que aceptaran: el run terminó.
    Completed,
    /// `backup` sin nodo previo que acepte: posición sin cambios.
    Stayed,
    Abandoned,
    /// La llamada vino de un `StepHandle` que ya no es el vigente.
    Ignored,
}

/// Origen de una operación: el dueño del run o la instancia activa.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Caller {
    Run(RunHandle),
    Step(StepHandle),
}

impl From<RunHandle> for Caller {
    fn from(handle: RunHandle) -> Self {
        Caller::Run(handle)
    }
}

impl From<StepHandle> for Caller {
    fn from(handle: StepHandle) -> Self {
        Caller::Step(handle)
    }
}

pub type CompletionCallback = Box<dyn FnOnce(Args)>;
pub type AbandonCallback = Box<dyn FnOnce(String)>;

/// Nodo elegido por un recorrido, con la instancia ya construida.
pub(crate) struct Candidate {
    pub index: usize,
    pub step: Box<dyn AnyStep>,
    pub args: Args,
}

/// Resultado de recorrer nodos en una dirección.
pub(crate) struct Scan {
    /// Nodos evaluados que no participan, en orden de evaluación.
    pub skipped: Vec<(usize, &'static str)>,
    pub outcome: Result<Option<Candidate>, DefinitionError>,
}

pub(crate) struct WorkflowRun {
    pub id: Uuid,
    pub workflow: Arc<Workflow>,
    pub state: RunState,
    pub current: Option<StepInstance>,
    /// Envelope ofrecido a cada nodo evaluado (para re-evaluar en `backup`).
    pub offered: Vec<Option<Args>>,
    pub last_args: Args,
    pub activations: u64,
    pub outcome: Option<RunOutcome>,
    pub on_complete: Option<CompletionCallback>,
    pub on_abandon: Option<AbandonCallback>,
    pub completion_delivered: bool,
    pub abandon_delivered: bool,
}

impl WorkflowRun {
    pub fn new(workflow: Arc<Workflow>) -> Self {
        let offered = vec![None; workflow.len()];
        Self { id: Uuid::new_v4(),
               workflow,
               state: RunState::NotLaunched,
               current: None,
               offered,
               last_args: Args::None,
               activations: 0,
               outcome: None,
               on_complete: None,
               on_abandon: None,
               completion_delivered: false,
               abandon_delivered: false }
    }

    pub fn position(&self) -> Option<usize> {
        self.current.as_ref().map(|c| c.node_index)
    }

    /// `true` si `handle` identifica a la instancia activa.
    pub fn is_current(&self, handle: StepHandle) -> bool {
        self.state == RunState::Active && self.current.as_ref().map(|c| c.handle) == Some(handle)
    }

    /// Compara lo que entrega el step activo con la salida que declara.
    ///
    /// `()` exige "sin argumentos", `Args` deja pasar cualquier envelope y
    /// el resto exige un valor de exactamente ese tipo.
    pub fn check_output(&self, args: &Args) -> Result<(), DefinitionError> {
        let Some(current) = &self.current else {
            return Ok(());
        };
        let Some(node) = self.workflow.get(current.node_index) else {
            return Ok(());
        };
        let declared = node.output_tag();
        let accepted = if declared.is::<Args>() {
            true
        } else if declared.is::<()>() {
            args.is_none()
        } else {
            args.type_tag() == Some(declared)
        };
        if accepted {
            return Ok(());
        }
        Err(DefinitionError::OutputMismatch { node_index: current.node_index,
                                              step: node.name().to_string(),
                                              declared: declared.name().to_string(),
                                              found: args.type_tag()
                                                         .map(|t| t.name().to_string())
                                                         .unwrap_or_else(|| "no output".to_string()) })
    }

    /// Recorre hacia adelante desde `from` ofreciendo `args` a cada nodo, en
    /// orden, hasta que uno acepte.
    pub fn scan_forward(&mut self, from: usize, args: &Args) -> Scan {
        let workflow = Arc::clone(&self.workflow);
        let mut skipped = Vec::new();
        for (index, node) in workflow.iter().enumerate().skip(from) {
            self.offered[index] = Some(args.clone());
            match node.resolve(args) {
                Ok(Some(step)) => {
                    let candidate = Candidate { index, step, args: args.clone() };
                    return Scan { skipped, outcome: Ok(Some(candidate)) };
                }
                Ok(None) => skipped.push((index, node.name())),
                Err(mismatch) => return Scan { skipped, outcome: Err(type_mismatch(index, node, mismatch)) },
            }
        }
        Scan { skipped, outcome: Ok(None) }
    }

    /// Recorre hacia atrás desde el nodo anterior a `before`, re-evaluando
    /// cada nodo con el envelope que se le ofreció en el recorrido previo.
    pub fn scan_backward(&self, before: usize) -> Scan {
        let mut skipped = Vec::new();
        for index in (0..before).rev() {
            let (Some(node), Some(Some(args))) = (self.workflow.get(index), self.offered.get(index)) else {
                continue;
            };
            match node.resolve(args) {
                Ok(Some(step)) => {
                    let candidate = Candidate { index, step, args: args.clone() };
                    return Scan { skipped, outcome: Ok(Some(candidate)) };
                }
                Ok(None) => skipped.push((index, node.name())),
                Err(mismatch) => return Scan { skipped, outcome: Err(type_mismatch(index, node, mismatch)) },
            }
        }
        Scan { skipped, outcome: Ok(None) }
    }

    /// Reemplaza la instancia activa (la anterior se descarta).
    pub fn activate(&mut self, candidate: Candidate) -> (StepHandle, &'static str, PresentationHint) {
        self.activations += 1;
        let handle = StepHandle { run_id: self.id,
                                  activation: self.activations };
        let (name, hint) = match self.workflow.get(candidate.index) {
            Some(node) => (node.name(), node.hint().clone()),
            None => ("?", PresentationHint::Default),
        };
        self.last_args = candidate.args.clone();
        self.current = Some(StepInstance { handle,
                                           node_index: candidate.index,
                                           name,
                                           hint: hint.clone(),
                                           input: candidate.args,
                                           inner: candidate.step });
        (handle, name, hint)
    }

    /// Pasa a un estado terminal liberando instancias y envelopes.
    pub fn finish(&mut self, state: RunState, outcome: RunOutcome) {
        self.state = state;
        self.outcome = Some(outcome);
        self.current = None;
        self.offered.iter_mut().for_each(|slot| *slot = None);
    }
}

fn type_mismatch(index: usize, node: &FlowNode, mismatch: ArgsMismatch) -> DefinitionError {
    DefinitionError::TypeMismatch { node_index: index,
                                    step: node.name().to_string(),
                                    expected: mismatch.expected.name().to_string(),
                                    found: mismatch.found
                                                   .map(|t| t.name().to_string())
                                                   .unwrap_or_else(|| "no arguments".to_string()) }
}
