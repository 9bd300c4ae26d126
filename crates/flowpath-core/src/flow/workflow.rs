//! Colección ordenada de nodos (un camino lineal).
//!
//! El orden de la colección es el orden de recorrido. Se permiten steps
//! repetidos. Una colección vacía es válida: el run completa al lanzarse.
//! Una vez lanzado un run, el orquestador comparte la colección vía `Arc`,
//! por lo que las mutaciones posteriores sólo afectan a lanzamientos nuevos.

use serde_json::json;

use super::{FlowNode, WorkflowBuilder};
use crate::constants::ENGINE_VERSION;
use crate::hashing::hash_value;
use crate::step::FlowStep;

#[derive(Clone, Default, Debug)]
pub struct Workflow {
    nodes: Vec<FlowNode>,
}

impl Workflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> WorkflowBuilder {
        WorkflowBuilder::new()
    }

    /// Atajo: builder cuyo primer nodo es `S`.
    pub fn starting_with<S: FlowStep>() -> WorkflowBuilder {
        WorkflowBuilder::new().then::<S>()
    }

    pub fn append(&mut self, node: FlowNode) {
        self.nodes.push(node);
    }

    pub fn remove_all(&mut self) {
        self.nodes.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FlowNode> {
        self.nodes.iter()
    }

    pub fn first(&self) -> Option<&FlowNode> {
        self.nodes.first()
    }

    pub fn last(&self) -> Option<&FlowNode> {
        self.nodes.last()
    }

    pub fn get(&self, index: usize) -> Option<&FlowNode> {
        self.nodes.get(index)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Hash estable de la forma del workflow: nombre del step, tipos de
    /// entrada/salida y pista de presentación de cada nodo, en orden. Dos
    /// workflows con la misma forma producen el mismo hash aunque sus nodos
    /// tengan ids distintos.
    pub fn definition_hash(&self) -> String {
        let nodes: Vec<serde_json::Value> = self.nodes
                                                .iter()
                                                .map(|n| {
                                                    json!({
                                                        "step": n.factory().step_tag().name(),
                                                        "input": n.input_kind().describe(),
                                                        "output": n.output_tag().name(),
                                                        "hint": n.hint(),
                                                        "conditional": n.has_predicate(),
                                                    })
                                                })
                                                .collect();
        hash_value(&json!({ "engine_version": ENGINE_VERSION, "nodes": nodes }))
    }
}

impl<'a> IntoIterator for &'a Workflow {
    type Item = &'a FlowNode;
    type IntoIter = std::slice::Iter<'a, FlowNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

impl FromIterator<FlowNode> for Workflow {
    fn from_iter<I: IntoIterator<Item = FlowNode>>(iter: I) -> Self {
        Self { nodes: iter.into_iter().collect() }
    }
}

impl Extend<FlowNode> for Workflow {
    fn extend<I: IntoIterator<Item = FlowNode>>(&mut self, iter: I) {
        self.nodes.extend(iter);
    }
}

impl IntoIterator for Workflow {
    type Item = FlowNode;
    type IntoIter = std::vec::IntoIter<FlowNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::PresentationHint;

    struct A;
    impl FlowStep for A {
        type Input = ();
        type Output = ();
        fn create(_: ()) -> Self {
            A
        }
    }

    struct B;
    impl FlowStep for B {
        type Input = ();
        type Output = ();
        fn create(_: ()) -> Self {
            B
        }
    }

    #[test]
    fn empty_collection_is_valid() {
        let wf = Workflow::new();
        assert!(wf.is_empty());
        assert!(wf.first().is_none());
        assert!(wf.last().is_none());
    }

    #[test]
    fn append_keeps_order_and_remove_all_clears() {
        let mut wf = Workflow::new();
        wf.append(FlowNode::of::<A>());
        wf.append(FlowNode::of::<B>());
        wf.append(FlowNode::of::<A>());
        let names: Vec<&str> = wf.iter().map(|n| n.name()).collect();
        assert_eq!(names, vec!["A", "B", "A"]);
        assert_eq!(wf.first().map(|n| n.name()), Some("A"));
        assert_eq!(wf.last().map(|n| n.name()), Some("A"));

        wf.remove_all();
        assert!(wf.is_empty());
    }

    #[test]
    fn definition_hash_depends_on_shape_only() {
        let one = Workflow::starting_with::<A>().then::<B>().build();
        let two = Workflow::starting_with::<A>().then::<B>().build();
        let swapped = Workflow::starting_with::<B>().then::<A>().build();
        let modal = Workflow::starting_with::<A>().then_presented::<B>(PresentationHint::Modal).build();

        assert_eq!(one.definition_hash(), two.definition_hash());
        assert_ne!(one.definition_hash(), swapped.definition_hash());
        assert_ne!(one.definition_hash(), modal.definition_hash());
    }
}
