//! Constantes del motor core.
//!
//! `ENGINE_VERSION` entra en el `definition_hash` de cada workflow: un cambio
//! incompatible en la semántica de recorrido debe incrementarla para que los
//! hashes registrados en eventos anteriores no se confundan con los nuevos.

/// Versión lógica del orquestador.
pub const ENGINE_VERSION: &str = "W1.0";

/// Cantidad de runs terminados que se conservan por defecto para consultas.
pub const DEFAULT_RETAIN_FINISHED: usize = 64;
