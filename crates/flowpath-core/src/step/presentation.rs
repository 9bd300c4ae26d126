use serde::{Deserialize, Serialize};

/// Pista de presentación asociada a un nodo.
///
/// El core no la interpreta: se almacena en el nodo, se copia a la instancia
/// activa y se reporta en los eventos para que la capa de UI decida.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresentationHint {
    #[default]
    Default,
    Modal,
    Navigation,
    Custom(String),
}
