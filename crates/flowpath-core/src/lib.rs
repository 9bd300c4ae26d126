//! flowpath-core: orquestación declarativa de workflows de navegación.
//!
//! Un `Workflow` es una lista ordenada de `FlowNode`s. El `Orchestrator`
//! lanza runs sobre esa lista, ofrece a cada nodo la salida del anterior y
//! salta los nodos que no participan.
pub mod args;
pub mod config;
pub mod constants;
pub mod engine;
pub mod errors;
pub mod event;
pub mod flow;
pub mod hashing;
pub mod step;

pub use args::{Args, ArgsSummary, InputKind, TypeTag};
pub use config::EngineConfig;
pub use engine::{Caller, Orchestrator, RunHandle, RunOutcome, RunState, Transition};
pub use errors::{DefinitionError, WorkflowError};
pub use event::{EventStore, InMemoryEventStore, RunEvent, RunEventKind};
pub use flow::{FlowNode, Workflow, WorkflowBuilder};
pub use step::{FlowStep, PresentationHint, StepHandle, StepInstance};

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Ticket(u32);

    struct Issue;
    impl FlowStep for Issue {
        type Input = ();
        type Output = Ticket;
        fn create(_: ()) -> Self {
            Issue
        }
    }

    struct Redeem(Ticket);
    impl FlowStep for Redeem {
        type Input = Ticket;
        type Output = ();
        fn create(input: Ticket) -> Self {
            Redeem(input)
        }
    }

    #[test]
    fn output_of_one_step_is_the_input_of_the_next() {
        let wf = Workflow::starting_with::<Issue>().then::<Redeem>().build_shared();
        let mut orchestrator = Orchestrator::new();
        let run = orchestrator.launch(wf, Args::none()).expect("launch");
        assert_eq!(orchestrator.position(run), Some(0));

        let transition = orchestrator.proceed(run, Ticket(7)).expect("proceed");
        assert_eq!(transition, Transition::Activated { node_index: 1 });
        let redeem = orchestrator.current(run).and_then(|c| c.downcast_ref::<Redeem>()).expect("redeem active");
        assert_eq!(redeem.0, Ticket(7));

        assert_eq!(orchestrator.proceed(run, ()).expect("finish"), Transition::Completed);
        assert_eq!(orchestrator.state(run), Some(RunState::Completed));
        assert_eq!(orchestrator.event_codes(run), vec!["L", "A", "A", "C"]);
    }
}
