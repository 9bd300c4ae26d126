//! Envoltorio con borrado de tipo para steps heterogéneos.
//!
//! `StepFactory` guarda, por cada tipo de step, funciones monomorfizadas
//! (`fn` pointers) y los `TypeTag` de entrada/salida. El orquestador sólo ve
//! esta estructura uniforme; la única comprobación de tipo en runtime ocurre
//! dentro de `instantiate`, al convertir el envelope con `Args::cast`.

use std::any::Any;
use std::fmt;

use super::FlowStep;
use crate::args::{Args, ArgsMismatch, InputKind, TypeTag};

/// Vista uniforme de una instancia de step viva.
pub trait AnyStep: Any {
    fn should_load(&self) -> bool;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<S: FlowStep> AnyStep for S {
    fn should_load(&self) -> bool {
        FlowStep::should_load(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[derive(Clone, Copy)]
pub struct StepFactory {
    step: TypeTag,
    name: &'static str,
    input: InputKind,
    output: TypeTag,
    build: fn(&Args) -> Result<Box<dyn AnyStep>, ArgsMismatch>,
    empty: fn() -> Option<Box<dyn AnyStep>>,
}

impl StepFactory {
    pub fn of<S: FlowStep>() -> Self {
        Self { step: TypeTag::of::<S>(),
               name: S::name(),
               input: InputKind::of::<S::Input>(),
               output: TypeTag::of::<S::Output>(),
               build: build_step::<S>,
               empty: empty_step::<S> }
    }

    pub fn step_tag(&self) -> TypeTag {
        self.step
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn input_kind(&self) -> InputKind {
        self.input
    }

    pub fn output_tag(&self) -> TypeTag {
        self.output
    }

    /// Construye una instancia nueva a partir del envelope.
    pub fn instantiate(&self, args: &Args) -> Result<Box<dyn AnyStep>, ArgsMismatch> {
        (self.build)(args)
    }

    /// Construcción sin argumentos; `None` si el step no la soporta.
    pub fn instantiate_empty(&self) -> Option<Box<dyn AnyStep>> {
        (self.empty)()
    }
}

impl fmt::Debug for StepFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepFactory")
         .field("step", &self.name)
         .field("input", &self.input)
         .field("output", &self.output)
         .finish()
    }
}

fn build_step<S: FlowStep>(args: &Args) -> Result<Box<dyn AnyStep>, ArgsMismatch> {
    let input = args.cast::<S::Input>()?;
    Ok(Box::new(S::create(input)))
}

fn empty_step<S: FlowStep>() -> Option<Box<dyn AnyStep>> {
    if let Some(step) = S::empty() {
        return Some(Box::new(step));
    }
    match InputKind::of::<S::Input>() {
        InputKind::Nothing | InputKind::Any => build_step::<S>(&Args::None).ok(),
        InputKind::Typed(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Greeting {
        text: String,
    }

    impl FlowStep for Greeting {
        type Input = String;
        type Output = usize;

        fn create(input: String) -> Self {
            Self { text: input }
        }

        fn should_load(&self) -> bool {
            !self.text.is_empty()
        }
    }

    struct Anything {
        received: Args,
    }

    impl FlowStep for Anything {
        type Input = Args;
        type Output = ();

        fn create(input: Args) -> Self {
            Self { received: input }
        }
    }

    #[test]
    fn factory_exposes_type_metadata() {
        let factory = StepFactory::of::<Greeting>();
        assert_eq!(factory.name(), "Greeting");
        assert_eq!(factory.input_kind(), InputKind::Typed(TypeTag::of::<String>()));
        assert!(factory.output_tag().is::<usize>());
    }

    #[test]
    fn instantiate_casts_and_evaluates_should_load() {
        let factory = StepFactory::of::<Greeting>();
        let step = factory.instantiate(&Args::from_output(String::from("hola"))).expect("typed input");
        assert!(step.should_load());
        let greeting = step.as_any().downcast_ref::<Greeting>().expect("concrete type");
        assert_eq!(greeting.text, "hola");

        let step = factory.instantiate(&Args::from_output(String::new())).expect("typed input");
        assert!(!step.should_load());
    }

    #[test]
    fn instantiate_rejects_mismatched_payload() {
        let factory = StepFactory::of::<Greeting>();
        let err = factory.instantiate(&Args::from_output(10.23_f64)).err().expect("mismatch");
        assert!(err.expected.is::<String>());
        assert!(err.found.map(|t| t.is::<f64>()).unwrap_or(false));
    }

    #[test]
    fn optional_any_input_terminates_for_every_envelope() {
        let factory = StepFactory::of::<Anything>();
        for args in [Args::none(), Args::from_output("str"), Args::from_output(Args::from_output(1_u8))] {
            let step = factory.instantiate(&args).expect("any accepts everything");
            assert!(step.should_load());
            let anything = step.as_any().downcast_ref::<Anything>().expect("concrete type");
            assert_eq!(anything.received.type_tag(), args.type_tag());
        }
    }

    #[test]
    fn empty_construction_requires_untyped_input_or_override() {
        assert!(StepFactory::of::<Anything>().instantiate_empty().is_some());
        assert!(StepFactory::of::<Greeting>().instantiate_empty().is_none());
    }
}
