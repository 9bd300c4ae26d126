//! Orquestador de runs.
//!
//! Mantiene un registro de runs (`RunHandle` -> estado vivo) y aplica las
//! transiciones `proceed`, `backup` y `abandon`. Cada transición deja eventos
//! en el `EventStore` configurado.

use std::collections::VecDeque;
use std::sync::Arc;

use indexmap::IndexMap;
use log::{debug, error, info, warn};
use uuid::Uuid;

use super::run::{Candidate, RunOutcome, RunState, Scan, WorkflowRun};
use super::{Caller, RunHandle, Transition};
use crate::args::Args;
use crate::config::EngineConfig;
use crate::errors::{DefinitionError, WorkflowError};
use crate::event::{EventStore, InMemoryEventStore, RunEvent, RunEventKind};
use crate::flow::Workflow;
use crate::step::StepInstance;

/// Motor de navegación de workflows.
///
/// Un mismo orquestador puede llevar varios runs a la vez; cada uno es
/// independiente y se identifica por su `RunHandle`.
pub struct Orchestrator<E = InMemoryEventStore>
    where E: EventStore
{
    event_store: E,
    config: EngineConfig,
    runs: IndexMap<Uuid, WorkflowRun>,
    /// Runs terminados, del más antiguo al más reciente.
    finished: VecDeque<Uuid>,
}

impl Orchestrator<InMemoryEventStore> {
    /// Orquestador con store en memoria y configuración por defecto.
    pub fn new() -> Self {
        Self::with_store(InMemoryEventStore::default(), EngineConfig::default())
    }

    /// Igual que `new` pero leyendo `FLOWPATH_*` del entorno.
    pub fn from_env() -> Self {
        Self::with_store(InMemoryEventStore::default(), EngineConfig::from_env())
    }
}

impl Default for Orchestrator<InMemoryEventStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Orchestrator<E> where E: EventStore
{
    pub fn with_store(event_store: E, config: EngineConfig) -> Self {
        Self { event_store,
               config,
               runs: IndexMap::new(),
               finished: VecDeque::new() }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn event_store(&self) -> &E {
        &self.event_store
    }

    pub fn events(&self, run: RunHandle) -> Vec<RunEvent> {
        self.event_store.list(run.id)
    }

    /// Secuencia compacta de códigos de evento (ver `RunEventKind::code`).
    pub fn event_codes(&self, run: RunHandle) -> Vec<&'static str> {
        self.events(run).iter().map(|e| e.kind.code()).collect()
    }

    // ------------------------------------------------------------------
    // Ciclo de vida
    // ------------------------------------------------------------------

    /// Registra un run sin lanzarlo, para poder adjuntar callbacks antes.
    ///
    /// La retención sólo expulsa runs terminados: un run que se queda en
    /// `NotLaunched` o `Active` sigue en el registro hasta `release` (o
    /// `abandon`, si está activo).
    pub fn prepare(&mut self, workflow: Arc<Workflow>) -> RunHandle {
        let run = WorkflowRun::new(workflow);
        let handle = RunHandle { id: run.id };
        debug!("run {} prepared with {} nodes", run.id, run.workflow.len());
        self.runs.insert(run.id, run);
        handle
    }

    /// Lanza un run preparado: recorre desde el primer nodo con `args`.
    pub fn start(&mut self, run: RunHandle, args: Args) -> Result<Transition, WorkflowError> {
        let entry = self.runs.get_mut(&run.id).ok_or(WorkflowError::UnknownRun(run.id))?;
        if entry.state != RunState::NotLaunched {
            return Err(WorkflowError::InvalidState { run_id: run.id,
                                                     state: entry.state });
        }
        entry.state = RunState::Active;
        entry.last_args = args.clone();
        let kind = RunEventKind::RunLaunched { definition_hash: entry.workflow.definition_hash(),
                                               node_count: entry.workflow.len(),
                                               args: args.summary() };
        info!("run {} launched ({} nodes, {args:?})", run.id, entry.workflow.len());
        self.record(run.id, kind);
        self.advance(run.id, 0, args)
    }

    /// `prepare` + `start`.
    ///
    /// Si el lanzamiento falla por un error de definición sólo se devuelve el
    /// error; para consultar el run `Faulted` y sus eventos hay que usar
    /// `prepare` + `start`.
    pub fn launch(&mut self, workflow: Arc<Workflow>, args: Args) -> Result<RunHandle, WorkflowError> {
        let run = self.prepare(workflow);
        self.start(run, args)?;
        Ok(run)
    }

    // ------------------------------------------------------------------
    // Transiciones
    // ------------------------------------------------------------------

    /// Avanza desde el nodo activo ofreciendo `output` a los nodos
    /// siguientes. `()` se ofrece como "sin argumentos".
    ///
    /// `output` debe coincidir con la salida declarada por el step activo;
    /// si no, el run queda `Faulted` con `DefinitionError::OutputMismatch`.
    pub fn proceed<O>(&mut self, caller: impl Into<Caller>, output: O) -> Result<Transition, WorkflowError>
        where O: Send + Sync + 'static
    {
        let Some(run_id) = self.resolve_caller(caller.into(), "proceed")? else {
            return Ok(Transition::Ignored);
        };
        let args = Args::from_output(output);
        let entry = self.runs.get(&run_id).ok_or(WorkflowError::UnknownRun(run_id))?;
        if let Err(err) = entry.check_output(&args) {
            return Err(self.fault(run_id, err));
        }
        let from = entry.position().map_or(0, |p| p + 1);
        self.advance(run_id, from, args)
    }

    /// Vuelve al nodo previo más cercano que siga aceptando el envelope que
    /// se le ofreció. Sin candidato, el run se queda donde está.
    pub fn backup(&mut self, caller: impl Into<Caller>) -> Result<Transition, WorkflowError> {
        let Some(run_id) = self.resolve_caller(caller.into(), "backup")? else {
            return Ok(Transition::Ignored);
        };
        let Some(entry) = self.runs.get(&run_id) else {
            return Err(WorkflowError::UnknownRun(run_id));
        };
        let Some(from) = entry.position() else {
            return Ok(Transition::Stayed);
        };
        let Scan { skipped, outcome } = entry.scan_backward(from);
        self.record_skips(run_id, skipped);
        match outcome {
            Ok(Some(candidate)) => {
                let to = candidate.index;
                debug!("run {run_id} backing up from node {from} to node {to}");
                self.record(run_id, RunEventKind::BackedUp { from, to });
                Ok(self.activate(run_id, candidate))
            }
            Ok(None) => {
                debug!("run {run_id} has no earlier node to back up to; staying at {from}");
                Ok(Transition::Stayed)
            }
            Err(err) => Err(self.fault(run_id, err)),
        }
    }

    /// Termina el run sin completar. El callback de completado no se invoca.
    pub fn abandon(&mut self, caller: impl Into<Caller>, reason: impl Into<String>) -> Result<Transition, WorkflowError> {
        let Some(run_id) = self.resolve_caller(caller.into(), "abandon")? else {
            return Ok(Transition::Ignored);
        };
        let reason = reason.into();
        let callback = match self.runs.get_mut(&run_id) {
            Some(entry) => {
                entry.finish(RunState::Abandoned, RunOutcome::Abandoned(reason.clone()));
                entry.on_complete = None;
                let callback = entry.on_abandon.take();
                entry.abandon_delivered = callback.is_some();
                callback
            }
            None => return Err(WorkflowError::UnknownRun(run_id)),
        };
        info!("run {run_id} abandoned: {reason}");
        self.record(run_id, RunEventKind::RunAbandoned { reason: reason.clone() });
        self.retire(run_id);
        if let Some(callback) = callback {
            callback(reason);
        }
        Ok(Transition::Abandoned)
    }

    // ------------------------------------------------------------------
    // Callbacks
    // ------------------------------------------------------------------

    /// Registra el callback de completado. Si el run ya completó y el
    /// callback aún no se entregó, se invoca de inmediato. Se entrega como
    /// mucho una vez por run.
    pub fn on_complete(&mut self, run: RunHandle, callback: impl FnOnce(Args) + 'static) -> Result<(), WorkflowError> {
        let entry = self.runs.get_mut(&run.id).ok_or(WorkflowError::UnknownRun(run.id))?;
        match entry.state {
            RunState::NotLaunched | RunState::Active => entry.on_complete = Some(Box::new(callback)),
            RunState::Completed if !entry.completion_delivered => {
                entry.completion_delivered = true;
                if let Some(RunOutcome::Completed(args)) = entry.outcome.clone() {
                    callback(args);
                }
            }
            state => debug!("run {} is {state:?}; completion callback dropped", run.id),
        }
        Ok(())
    }

    /// Registra el callback de abandono, con las mismas reglas que
    /// `on_complete`.
    pub fn on_abandon(&mut self, run: RunHandle, callback: impl FnOnce(String) + 'static) -> Result<(), WorkflowError> {
        let entry = self.runs.get_mut(&run.id).ok_or(WorkflowError::UnknownRun(run.id))?;
        match entry.state {
            RunState::NotLaunched | RunState::Active => entry.on_abandon = Some(Box::new(callback)),
            RunState::Abandoned if !entry.abandon_delivered => {
                entry.abandon_delivered = true;
                if let Some(RunOutcome::Abandoned(reason)) = entry.outcome.clone() {
                    callback(reason);
                }
            }
            state => debug!("run {} is {state:?}; abandon callback dropped", run.id),
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Consultas
    // ------------------------------------------------------------------

    pub fn state(&self, run: RunHandle) -> Option<RunState> {
        self.runs.get(&run.id).map(|r| r.state)
    }

    /// Índice del nodo activo (`None` si el run no está activo).
    pub fn position(&self, run: RunHandle) -> Option<usize> {
        self.runs.get(&run.id).and_then(|r| r.position())
    }

    pub fn current(&self, run: RunHandle) -> Option<&StepInstance> {
        self.runs.get(&run.id).and_then(|r| r.current.as_ref())
    }

    pub fn current_mut(&mut self, run: RunHandle) -> Option<&mut StepInstance> {
        self.runs.get_mut(&run.id).and_then(|r| r.current.as_mut())
    }

    /// Último envelope con el que se activó un nodo (o el de lanzamiento).
    pub fn last_args(&self, run: RunHandle) -> Option<&Args> {
        self.runs.get(&run.id).map(|r| &r.last_args)
    }

    pub fn outcome(&self, run: RunHandle) -> Option<&RunOutcome> {
        self.runs.get(&run.id).and_then(|r| r.outcome.as_ref())
    }

    pub fn workflow(&self, run: RunHandle) -> Option<&Arc<Workflow>> {
        self.runs.get(&run.id).map(|r| &r.workflow)
    }

    /// Runs activos, en orden de registro.
    pub fn active_runs(&self) -> impl Iterator<Item = RunHandle> + '_ {
        self.runs
            .values()
            .filter(|r| r.state == RunState::Active)
            .map(|r| RunHandle { id: r.id })
    }

    /// Cantidad de runs en el registro, en cualquier estado.
    pub fn tracked_runs(&self) -> usize {
        self.runs.len()
    }

    /// Quita un run del registro. Los eventos permanecen en el store.
    pub fn release(&mut self, run: RunHandle) -> bool {
        self.finished.retain(|id| *id != run.id);
        self.runs.shift_remove(&run.id).is_some()
    }

    // ------------------------------------------------------------------
    // Internos
    // ------------------------------------------------------------------

    /// Resuelve quién llama. `Ok(None)` = handle de step obsoleto (se ignora).
    fn resolve_caller(&self, caller: Caller, op: &str) -> Result<Option<Uuid>, WorkflowError> {
        match caller {
            Caller::Run(handle) => {
                let entry = self.runs.get(&handle.id).ok_or(WorkflowError::UnknownRun(handle.id))?;
                if entry.state != RunState::Active {
                    return Err(WorkflowError::InvalidState { run_id: handle.id,
                                                             state: entry.state });
                }
                Ok(Some(handle.id))
            }
            Caller::Step(handle) => match self.runs.get(&handle.run_id) {
                Some(entry) if entry.is_current(handle) => Ok(Some(handle.run_id)),
                _ => {
                    warn!("ignoring {op} from stale step handle (run {}, activation {})",
                          handle.run_id,
                          handle.activation);
                    Ok(None)
                }
            },
        }
    }

    /// Recorre hacia adelante desde `from` y aplica el resultado.
    fn advance(&mut self, run_id: Uuid, from: usize, args: Args) -> Result<Transition, WorkflowError> {
        let entry = self.runs.get_mut(&run_id).ok_or(WorkflowError::UnknownRun(run_id))?;
        let Scan { skipped, outcome } = entry.scan_forward(from, &args);
        self.record_skips(run_id, skipped);
        match outcome {
            Ok(Some(candidate)) => Ok(self.activate(run_id, candidate)),
            Ok(None) => Ok(self.complete(run_id, args)),
            Err(err) => Err(self.fault(run_id, err)),
        }
    }

    fn activate(&mut self, run_id: Uuid, candidate: Candidate) -> Transition {
        let node_index = candidate.index;
        let args = candidate.args.summary();
        let Some(entry) = self.runs.get_mut(&run_id) else {
            return Transition::Ignored;
        };
        let (handle, name, hint) = entry.activate(candidate);
        debug!("run {run_id} activated {name} at node {node_index} (activation {})",
               handle.activation);
        self.record(run_id,
                    RunEventKind::StepActivated { node_index,
                                                  step: name.to_string(),
                                                  activation: handle.activation,
                                                  args,
                                                  hint });
        Transition::Activated { node_index }
    }

    fn complete(&mut self, run_id: Uuid, args: Args) -> Transition {
        let callback = match self.runs.get_mut(&run_id) {
            Some(entry) => {
                entry.finish(RunState::Completed, RunOutcome::Completed(args.clone()));
                entry.on_abandon = None;
                let callback = entry.on_complete.take();
                entry.completion_delivered = callback.is_some();
                callback
            }
            None => return Transition::Ignored,
        };
        info!("run {run_id} completed with {args:?}");
        self.record(run_id, RunEventKind::RunCompleted { args: args.summary() });
        self.retire(run_id);
        if let Some(callback) = callback {
            callback(args);
        }
        Transition::Completed
    }

    /// Termina el run por error de definición. Ningún callback se invoca.
    fn fault(&mut self, run_id: Uuid, err: DefinitionError) -> WorkflowError {
        if let Some(entry) = self.runs.get_mut(&run_id) {
            entry.finish(RunState::Faulted, RunOutcome::Faulted(err.clone()));
            entry.on_complete = None;
            entry.on_abandon = None;
        }
        error!("run {run_id} faulted: {err}");
        self.record(run_id, RunEventKind::RunFaulted { error: err.clone() });
        self.retire(run_id);
        WorkflowError::Definition(err)
    }

    fn record_skips(&mut self, run_id: Uuid, skipped: Vec<(usize, &'static str)>) {
        for (node_index, name) in skipped {
            debug!("run {run_id} skipped {name} at node {node_index}");
            self.record(run_id,
                        RunEventKind::StepSkipped { node_index,
                                                    step: name.to_string() });
        }
    }

    fn record(&mut self, run_id: Uuid, kind: RunEventKind) {
        if self.config.record_events {
            self.event_store.append_kind(run_id, kind);
        }
    }

    /// Marca el run como terminado y descarta los más antiguos si se supera
    /// `retain_finished`.
    fn retire(&mut self, run_id: Uuid) {
        self.finished.push_back(run_id);
        while self.finished.len() > self.config.retain_finished {
            if let Some(oldest) = self.finished.pop_front() {
                self.runs.shift_remove(&oldest);
                debug!("run {oldest} evicted from registry");
            }
        }
    }
}
