//! Nodo del workflow: un step declarado más sus metadatos.

use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

use crate::args::{Args, ArgsMismatch, InputKind, TypeTag};
use crate::errors::DefinitionError;
use crate::step::{AnyStep, FlowStep, PresentationHint, StepFactory};

/// Predicado de inclusión evaluado sobre el envelope ya validado.
pub type LoadPredicate = Arc<dyn Fn(&Args) -> bool + Send + Sync>;

#[derive(Clone)]
pub struct FlowNode {
    id: Uuid,
    factory: StepFactory,
    predicate: Option<LoadPredicate>,
    hint: PresentationHint,
}

impl FlowNode {
    pub fn of<S: FlowStep>() -> Self {
        Self { id: Uuid::new_v4(),
               factory: StepFactory::of::<S>(),
               predicate: None,
               hint: PresentationHint::Default }
    }

    /// Nodo con predicado de inclusión tipado sobre la entrada del step.
    ///
    /// El predicado se combina (AND) con `FlowStep::should_load` de la
    /// instancia.
    pub fn when<S, F>(predicate: F) -> Self
        where S: FlowStep,
              F: Fn(&S::Input) -> bool + Send + Sync + 'static
    {
        let mut node = Self::of::<S>();
        node.predicate = Some(Arc::new(move |args: &Args| {
                                  args.cast::<S::Input>()
                                      .map(|input| predicate(&input))
                                      .unwrap_or(false)
                              }));
        node
    }

    pub fn presented(mut self, hint: PresentationHint) -> Self {
        self.hint = hint;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn factory(&self) -> &StepFactory {
        &self.factory
    }

    pub fn name(&self) -> &'static str {
        self.factory.name()
    }

    pub fn input_kind(&self) -> InputKind {
        self.factory.input_kind()
    }

    pub fn output_tag(&self) -> TypeTag {
        self.factory.output_tag()
    }

    pub fn hint(&self) -> &PresentationHint {
        &self.hint
    }

    pub fn has_predicate(&self) -> bool {
        self.predicate.is_some()
    }

    /// Construye una instancia sin evaluar predicados.
    pub fn instantiate(&self, args: &Args) -> Result<Box<dyn AnyStep>, ArgsMismatch> {
        self.factory.instantiate(args)
    }

    /// Chequeo de tipo primero; luego predicado del nodo y `should_load`.
    /// Devuelve la instancia sólo si el nodo participa.
    pub fn resolve(&self, args: &Args) -> Result<Option<Box<dyn AnyStep>>, ArgsMismatch> {
        let step = self.factory.instantiate(args)?;
        if let Some(predicate) = &self.predicate {
            if !predicate(args) {
                return Ok(None);
            }
        }
        Ok(step.should_load().then_some(step))
    }

    pub fn should_load(&self, args: &Args) -> Result<bool, ArgsMismatch> {
        Ok(self.resolve(args)?.is_some())
    }

    /// Construcción por defecto (fuera del camino de `instantiate`).
    pub fn instantiate_empty(&self) -> Result<Box<dyn AnyStep>, DefinitionError> {
        self.factory
            .instantiate_empty()
            .ok_or_else(|| DefinitionError::MissingEmptyConstructor { step: self.name().to_string() })
    }
}

impl fmt::Debug for FlowNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlowNode")
         .field("id", &self.id)
         .field("step", &self.factory.name())
         .field("input", &self.factory.input_kind())
         .field("output", &self.factory.output_tag())
         .field("predicate", &self.predicate.is_some())
         .field("hint", &self.hint)
         .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Name(String);

    impl FlowStep for Name {
        type Input = String;
        type Output = String;

        fn create(input: String) -> Self {
            Self(input)
        }
    }

    struct Onboarding {
        seen: bool,
    }

    impl FlowStep for Onboarding {
        type Input = bool;
        type Output = ();

        fn create(input: bool) -> Self {
            Self { seen: input }
        }

        fn should_load(&self) -> bool {
            !self.seen
        }

        fn empty() -> Option<Self> {
            Some(Self { seen: false })
        }
    }

    #[test]
    fn node_predicate_and_step_should_load_are_combined() {
        let node = FlowNode::when::<Name, _>(|name: &String| name.starts_with('a'));
        assert!(node.has_predicate());
        assert!(node.should_load(&Args::from_output(String::from("ana"))).expect("typed"));
        assert!(!node.should_load(&Args::from_output(String::from("bob"))).expect("typed"));

        let node = FlowNode::of::<Onboarding>();
        assert!(node.should_load(&Args::from_output(false)).expect("typed"));
        assert!(!node.should_load(&Args::from_output(true)).expect("typed"));
    }

    #[test]
    fn type_check_happens_before_predicate() {
        let node = FlowNode::when::<Name, _>(|_| false);
        let err = node.should_load(&Args::from_output(1_u32)).unwrap_err();
        assert!(err.expected.is::<String>());
    }

    #[test]
    fn empty_construction_without_constructor_is_a_definition_error() {
        let err = FlowNode::of::<Name>().instantiate_empty().err().expect("no empty ctor");
        assert_eq!(err, DefinitionError::MissingEmptyConstructor { step: "Name".into() });
        assert!(FlowNode::of::<Onboarding>().instantiate_empty().is_ok());
    }

    #[test]
    fn hint_is_stored_verbatim() {
        let node = FlowNode::of::<Name>().presented(PresentationHint::Custom("sheet".into()));
        assert_eq!(node.hint(), &PresentationHint::Custom("sheet".into()));
        assert!(node.output_tag().is::<String>());
    }
}
