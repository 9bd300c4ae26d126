//! Envelope de argumentos intercambiado entre steps.
//!
//! `Args` es una unión etiquetada: `None` (sin argumentos) o `Value` (payload
//! tipado y borrado). El payload se comparte mediante `Arc`, de modo que el
//! run puede conservar el envelope ofrecido a cada nodo (necesario para
//! `backup`) sin clonar el valor subyacente.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{InputKind, TypeTag};

#[derive(Clone)]
pub struct Payload {
    value: Arc<dyn Any + Send + Sync>,
    tag: TypeTag,
}

impl Payload {
    pub fn type_tag(&self) -> TypeTag {
        self.tag
    }
}

#[derive(Clone, Default)]
pub enum Args {
    #[default]
    None,
    Value(Payload),
}

/// Fallo del chequeo de tipo en el hand-off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgsMismatch {
    pub expected: TypeTag,
    /// `None` cuando el envelope no traía argumentos.
    pub found: Option<TypeTag>,
}

impl Args {
    pub fn none() -> Self {
        Args::None
    }

    /// Envuelve la salida de un step.
    ///
    /// `()` se traduce a `Args::None` y un `Args` se pasa tal cual (no se
    /// anida), cualquier otro valor queda como `Args::Value`.
    pub fn from_output<T: Any + Send + Sync>(value: T) -> Self {
        let tag = TypeTag::of::<T>();
        if tag.is::<()>() {
            return Args::None;
        }
        if tag.is::<Args>() {
            let boxed: Box<dyn Any> = Box::new(value);
            return boxed.downcast::<Args>().map(|args| *args).unwrap_or_default();
        }
        Args::Value(Payload { value: Arc::new(value),
                              tag })
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Args::None)
    }

    pub fn type_tag(&self) -> Option<TypeTag> {
        match self {
            Args::None => None,
            Args::Value(payload) => Some(payload.tag),
        }
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Args::None => None,
            Args::Value(payload) => payload.value.downcast_ref::<T>(),
        }
    }

    /// Único punto de conversión hacia el tipo de entrada declarado.
    ///
    /// `()` y `Args` se resuelven comparando `TypeId` una sola vez, sin
    /// sondear el payload; sólo los tipos concretos inspeccionan el valor.
    pub fn cast<T: Clone + 'static>(&self) -> Result<T, ArgsMismatch> {
        match InputKind::of::<T>() {
            InputKind::Nothing => reify::<T, ()>(()).ok_or_else(|| self.mismatch::<T>()),
            InputKind::Any => reify::<T, Args>(self.clone()).ok_or_else(|| self.mismatch::<T>()),
            InputKind::Typed(_) => self.downcast_ref::<T>()
                                       .cloned()
                                       .ok_or_else(|| self.mismatch::<T>()),
        }
    }

    fn mismatch<T: 'static>(&self) -> ArgsMismatch {
        ArgsMismatch { expected: TypeTag::of::<T>(),
                       found: self.type_tag() }
    }

    pub fn summary(&self) -> ArgsSummary {
        match self {
            Args::None => ArgsSummary::None,
            Args::Value(payload) => ArgsSummary::Value { type_name: payload.tag.name().to_string() },
        }
    }
}

fn reify<T: 'static, U: 'static>(value: U) -> Option<T> {
    let boxed: Box<dyn Any> = Box::new(value);
    boxed.downcast::<T>().ok().map(|v| *v)
}

impl fmt::Debug for Args {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Args::None => f.write_str("Args::None"),
            Args::Value(payload) => write!(f, "Args::Value({})", payload.tag.name()),
        }
    }
}

/// Representación serializable de un envelope (sólo el tipo, nunca el valor).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArgsSummary {
    None,
    Value { type_name: String },
}

impl ArgsSummary {
    pub fn type_name(&self) -> Option<&str> {
        match self {
            ArgsSummary::None => None,
            ArgsSummary::Value { type_name } => Some(type_name.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_output_becomes_none_and_args_are_not_nested() {
        assert!(Args::from_output(()).is_none());
        let inner = Args::from_output(7_u32);
        let outer = Args::from_output(inner);
        assert_eq!(outer.downcast_ref::<u32>(), Some(&7));
        assert!(Args::from_output(Args::none()).is_none());
    }

    #[test]
    fn cast_to_concrete_type_checks_payload() {
        let args = Args::from_output(String::from("str"));
        assert_eq!(args.cast::<String>().expect("same type"), "str");

        let err = args.cast::<i32>().unwrap_err();
        assert!(err.expected.is::<i32>());
        assert_eq!(err.found, Some(TypeTag::of::<String>()));

        let err = Args::none().cast::<String>().unwrap_err();
        assert_eq!(err.found, None);
    }

    #[test]
    fn unit_input_accepts_anything() {
        assert!(Args::from_output(10.23_f64).cast::<()>().is_ok());
        assert!(Args::none().cast::<()>().is_ok());
    }

    #[test]
    fn any_input_receives_envelope_verbatim() {
        let received = Args::from_output("str").cast::<Args>().expect("any accepts value");
        assert_eq!(received.downcast_ref::<&str>(), Some(&"str"));
        let received = Args::none().cast::<Args>().expect("any accepts none");
        assert!(received.is_none());
    }

    #[test]
    fn summary_keeps_only_type_name() {
        assert_eq!(Args::none().summary(), ArgsSummary::None);
        let summary = Args::from_output(1_i64).summary();
        assert_eq!(summary.type_name(), Some("i64"));
    }
}
