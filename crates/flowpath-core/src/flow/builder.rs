//! Builder declarativo de workflows.
//!
//! La inclusión condicional (`then_if`, `then_either`) se resuelve aquí, una
//! sola vez, antes de finalizar la colección: el nodo existe o no existe en el
//! `Workflow` resultante; no se vuelve a evaluar durante el recorrido.
//!
//! ```ignore
//! let wf = Workflow::starting_with::<Locations>()
//!     .then::<PickupOrDelivery>()
//!     .then_if(has_menu, |b| b.then::<MenuSelection>())
//!     .then_presented::<Review>(PresentationHint::Modal)
//!     .build();
//! ```

use std::sync::Arc;

use super::{FlowNode, Workflow};
use crate::step::{FlowStep, PresentationHint};

#[derive(Default, Debug)]
pub struct WorkflowBuilder {
    nodes: Vec<FlowNode>,
}

impl WorkflowBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then<S: FlowStep>(self) -> Self {
        self.then_node(FlowNode::of::<S>())
    }

    pub fn then_presented<S: FlowStep>(self, hint: PresentationHint) -> Self {
        self.then_node(FlowNode::of::<S>().presented(hint))
    }

    /// Añade `S` con un predicado de inclusión sobre su entrada.
    pub fn then_when<S, F>(self, predicate: F) -> Self
        where S: FlowStep,
              F: Fn(&S::Input) -> bool + Send + Sync + 'static
    {
        self.then_node(FlowNode::when::<S, F>(predicate))
    }

    pub fn then_node(mut self, node: FlowNode) -> Self {
        self.nodes.push(node);
        self
    }

    /// Incluye lo que agregue `include` sólo si `condition` es verdadera.
    pub fn then_if(self, condition: bool, include: impl FnOnce(Self) -> Self) -> Self {
        if condition {
            include(self)
        } else {
            self
        }
    }

    /// Incluye exactamente uno de los dos nodos.
    pub fn then_either(self, condition: bool, when_true: FlowNode, when_false: FlowNode) -> Self {
        self.then_node(if condition { when_true } else { when_false })
    }

    /// Inserta en orden todos los nodos de otro workflow (grupo).
    pub fn then_group(mut self, group: Workflow) -> Self {
        self.nodes.extend(group);
        self
    }

    pub fn build(self) -> Workflow {
        self.nodes.into_iter().collect()
    }

    pub fn build_shared(self) -> Arc<Workflow> {
        Arc::new(self.build())
    }
}
