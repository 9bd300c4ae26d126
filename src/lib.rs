//! flowpath
//!
//! Fachada del workspace:
//! - Re-exporta `flowpath_core` (workflows, orquestador, eventos).
//! - Expone `demo`, un workflow de pedido de comida que usa el binario
//!   `flowpath-demo` y los tests de integración.

pub mod demo;

pub use flowpath_core::*;
