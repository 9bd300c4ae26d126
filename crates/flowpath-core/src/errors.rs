//! Errores del core.
//!
//! Dos clases bien separadas:
//! - `DefinitionError`: el workflow está mal definido (error de programador).
//!   Se reporta de inmediato y el run queda `Faulted`; nunca se reintenta.
//! - El resto de variantes de `WorkflowError` describen usos inválidos de la
//!   API (run inexistente, run ya terminado).
//!
//! Los casos límite del recorrido (nadie acepta al lanzar, backup en el
//! primer nodo, proceed tras el último) no son errores: se devuelven como
//! `Transition`.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::engine::RunState;

#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum DefinitionError {
    #[error("step {step} (node {node_index}) expects {expected} but was handed {found}")]
    TypeMismatch { node_index: usize, step: String, expected: String, found: String },
    #[error("step {step} (node {node_index}) declares output {declared} but proceeded with {found}")]
    OutputMismatch { node_index: usize, step: String, declared: String, found: String },
    #[error("step {step} provides no empty constructor")]
    MissingEmptyConstructor { step: String },
}

#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum WorkflowError {
    #[error("invalid workflow definition: {0}")] Definition(#[from] DefinitionError),
    #[error("unknown run {0}")] UnknownRun(Uuid),
    #[error("run {run_id} does not accept this operation in state {state:?}")] InvalidState { run_id: Uuid, state: RunState },
}

impl WorkflowError {
    /// `true` para errores de definición (fatales).
    pub fn is_programmer_error(&self) -> bool {
        matches!(self, WorkflowError::Definition(_))
    }
}
