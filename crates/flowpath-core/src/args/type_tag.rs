//! Identificadores de tipo explícitos usados en el hand-off entre steps.
//!
//! Un `TypeTag` combina el `TypeId` (identidad real, usada para comparar) con
//! el nombre legible del tipo (sólo diagnóstico: logs, errores, eventos).

use std::any::TypeId;
use std::fmt;

use super::Args;

#[derive(Clone, Copy)]
pub struct TypeTag {
    id: TypeId,
    name: &'static str,
}

impl TypeTag {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self { id: TypeId::of::<T>(),
               name: std::any::type_name::<T>() }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// `true` si el tag corresponde exactamente a `T`.
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for TypeTag {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeTag {}

impl fmt::Debug for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeTag({})", self.name)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Clasificación de la entrada que declara un step.
///
/// - `Nothing`: el step declara `()` (no recibe argumentos); acepta cualquier
///   envelope y lo ignora.
/// - `Any`: el step declara `Args` ("optional any"); recibe el envelope tal
///   cual, incluido `Args::None`.
/// - `Typed`: cualquier otro tipo; exige `Args::Value` con ese tipo exacto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Nothing,
    Any,
    Typed(TypeTag),
}

impl InputKind {
    pub fn of<T: 'static>() -> Self {
        let tag = TypeTag::of::<T>();
        if tag.is::<()>() {
            InputKind::Nothing
        } else if tag.is::<Args>() {
            InputKind::Any
        } else {
            InputKind::Typed(tag)
        }
    }

    /// Nombre estable para hashing y mensajes.
    pub fn describe(&self) -> &'static str {
        match self {
            InputKind::Nothing => "()",
            InputKind::Any => "Args",
            InputKind::Typed(tag) => tag.name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_kind_classifies_unit_args_and_concrete_types() {
        assert_eq!(InputKind::of::<()>(), InputKind::Nothing);
        assert_eq!(InputKind::of::<Args>(), InputKind::Any);
        assert_eq!(InputKind::of::<String>(), InputKind::Typed(TypeTag::of::<String>()));
        assert_ne!(InputKind::of::<String>(), InputKind::of::<i32>());
    }

    #[test]
    fn tags_compare_by_identity_not_name() {
        assert_eq!(TypeTag::of::<u8>(), TypeTag::of::<u8>());
        assert_ne!(TypeTag::of::<u8>(), TypeTag::of::<u16>());
        assert!(TypeTag::of::<Vec<String>>().name().contains("Vec"));
    }
}
