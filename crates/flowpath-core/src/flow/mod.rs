//! Definición del workflow: nodos, colección ordenada y builder.

mod builder;
mod node;
mod workflow;

pub use builder::WorkflowBuilder;
pub use node::{FlowNode, LoadPredicate};
pub use workflow::Workflow;
