//! Tipos de evento de un run y estructura `RunEvent`.
//!
//! Rol en el flujo:
//! - Cada transición del `Orchestrator` emite eventos a un `EventStore`
//!   append-only.
//! - Permiten verificar qué nodos se lanzaron, con qué tipo de argumento y en
//!   qué orden, sin acceder a las instancias vivas.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::args::ArgsSummary;
use crate::errors::DefinitionError;
use crate::step::PresentationHint;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RunEventKind {
    /// Primer evento de un run: fija la forma del workflow lanzado.
    RunLaunched {
        definition_hash: String,
        node_count: usize,
        args: ArgsSummary,
    },
    /// Un nodo fue evaluado y no participa (predicado o `should_load`).
    StepSkipped { node_index: usize, step: String },
    /// Un nodo pasó a ser el activo con una instancia nueva.
    StepActivated {
        node_index: usize,
        step: String,
        activation: u64,
        args: ArgsSummary,
        hint: PresentationHint,
    },
    /// El run retrocedió de `from` a `to`.
    BackedUp { from: usize, to: usize },
    /// Cierre normal; `args` es la salida final entregada al callback.
    RunCompleted { args: ArgsSummary },
    RunAbandoned { reason: String },
    /// Error de definición: el run queda terminado sin callbacks.
    RunFaulted { error: DefinitionError },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunEvent {
    pub seq: u64, // asignado por EventStore (orden append)
    pub run_id: Uuid,
    pub kind: RunEventKind,
    pub ts: DateTime<Utc>,
}

impl RunEventKind {
    /// Variante compacta (una letra) útil para comparar secuencias en tests.
    pub fn code(&self) -> &'static str {
        match self {
            RunEventKind::RunLaunched { .. } => "L",
            RunEventKind::StepSkipped { .. } => "K",
            RunEventKind::StepActivated { .. } => "A",
            RunEventKind::BackedUp { .. } => "B",
            RunEventKind::RunCompleted { .. } => "C",
            RunEventKind::RunAbandoned { .. } => "X",
            RunEventKind::RunFaulted { .. } => "F",
        }
    }
}
