use std::any::Any;

/// Contrato que implementa cada step (pantalla) de un workflow.
///
/// Un step declara el tipo de entrada que espera y el tipo de salida que
/// entregará al siguiente nodo. Para la entrada existen dos tipos especiales:
/// `()` (no recibe argumentos: acepta cualquier envelope y lo descarta) y
/// `Args` (acepta cualquier envelope, incluido `Args::None`, sin convertir).
pub trait FlowStep: Any {
    /// Tipo de entrada esperado.
    type Input: Clone + 'static;
    /// Tipo que el step entrega al hacer `proceed`. `()` equivale a "sin salida".
    type Output: Send + Sync + 'static;

    /// Construye la instancia para una pasada del workflow.
    fn create(input: Self::Input) -> Self
        where Self: Sized;

    /// Decide si el step participa en el run. Se evalúa sobre la instancia ya
    /// construida con su entrada.
    fn should_load(&self) -> bool {
        true
    }

    /// Constructor vacío opcional, usado fuera del camino normal de
    /// instanciación (p.ej. introspección). Los steps con entrada `()` o
    /// `Args` no necesitan sobrescribirlo.
    fn empty() -> Option<Self>
        where Self: Sized
    {
        None
    }

    /// Nombre amigable; por defecto el nombre del tipo sin ruta de módulo.
    fn name() -> &'static str
        where Self: Sized
    {
        short_type_name(std::any::type_name::<Self>())
    }
}

/// Recorta `a::b::Tipo<c::D>` a `Tipo<c::D>`.
pub(crate) fn short_type_name(full: &'static str) -> &'static str {
    let head = full.split('<').next().unwrap_or(full);
    match head.rfind("::") {
        Some(idx) => &full[idx + 2..],
        None => full,
    }
}
