//! Definiciones relacionadas a Steps.
//!
//! Un Step es una pantalla intercambiable del workflow. Este módulo define:
//! - `FlowStep`: contrato tipado que implementan los proveedores de steps.
//! - `StepFactory` / `AnyStep`: envoltorio con borrado de tipo que permite
//!   guardar steps heterogéneos en una misma colección.
//! - `StepInstance` y `StepHandle`: la instancia viva y su referencia débil al
//!   run.
//! - `PresentationHint`: metadato opaco de presentación.

pub mod definition;
pub mod erased;
mod instance;
mod presentation;

pub use definition::FlowStep;
pub use erased::{AnyStep, StepFactory};
pub use instance::{StepHandle, StepInstance};
pub use presentation::PresentationHint;
