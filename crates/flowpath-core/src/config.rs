//! Configuración del orquestador desde variables de entorno.
//! Usa prefijo `FLOWPATH_`; un `.env` presente se carga una sola vez.

use std::env;

use dotenvy::dotenv;
use once_cell::sync::Lazy;

use crate::constants::DEFAULT_RETAIN_FINISHED;

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv(); // ignora error si no existe .env
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Si es `false`, el orquestador no agrega eventos al `EventStore`.
    pub record_events: bool,
    /// Runs terminados que se conservan antes de descartar el más antiguo.
    pub retain_finished: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { record_events: true,
               retain_finished: DEFAULT_RETAIN_FINISHED }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        Lazy::force(&DOTENV_LOADED);
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Igual que `from_env` pero con una fuente arbitraria (tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let record_events = lookup("FLOWPATH_RECORD_EVENTS").and_then(|v| parse_bool(&v))
                                                            .unwrap_or(defaults.record_events);
        let retain_finished = lookup("FLOWPATH_RETAIN_FINISHED").and_then(|v| v.trim().parse().ok())
                                                                .unwrap_or(defaults.retain_finished);
        Self { record_events, retain_finished }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Forzar carga temprana de .env desde aplicaciones externas si se desea.
pub fn init_dotenv() {
    Lazy::force(&DOTENV_LOADED);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn missing_or_invalid_values_fall_back_to_defaults() {
        let cfg = EngineConfig::from_lookup(|_| None);
        assert_eq!(cfg, EngineConfig::default());

        let vars: HashMap<&str, &str> = [("FLOWPATH_RECORD_EVENTS", "maybe"), ("FLOWPATH_RETAIN_FINISHED", "-3")].into();
        let cfg = EngineConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(cfg, EngineConfig::default());
    }

    #[test]
    fn values_are_parsed() {
        let vars: HashMap<&str, &str> = [("FLOWPATH_RECORD_EVENTS", " OFF "), ("FLOWPATH_RETAIN_FINISHED", "3")].into();
        let cfg = EngineConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert!(!cfg.record_events);
        assert_eq!(cfg.retain_finished, 3);
    }
}
