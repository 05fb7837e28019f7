//! Dependency-ordered linearization of the operator DAG.

use crate::operand::Operand;
use crate::operator::OperatorNode;
use std::collections::HashSet;
use std::rc::Rc;

/// Pointer identity of an operator node, for the finalized-set membership test.
fn node_key(node: &Rc<dyn OperatorNode>) -> *const () {
    Rc::as_ptr(node) as *const ()
}

/// Topologically sort the operators reachable from `roots`.
///
/// Returns a sequence in which every operator appears after all operators
/// producing its inputs, and each reachable operator appears exactly once.
/// Traversal among independent producers follows `inputs()` order, so the
/// result is deterministic for a fixed construction order.
///
/// Implemented as an iterative depth-first traversal with an explicit stack
/// to tolerate arbitrarily deep graphs. The top of the stack is inspected
/// without popping: a node whose producers are not all finalized is deferred
/// behind them; a node revisited after finalization is simply popped, since
/// operands fan out to multiple consumers.
///
/// The operator graph is acyclic by construction (the public API only hands
/// out operands for already-constructed operators), and this function assumes
/// it; a cycle would prevent termination. Error-sentinel roots carry no
/// producer and are skipped.
pub fn topological_sort(roots: &[Operand]) -> Vec<Rc<dyn OperatorNode>> {
    let mut nodes_to_do: Vec<Rc<dyn OperatorNode>> = Vec::new();
    let mut nodes_done: HashSet<*const ()> = HashSet::new();
    let mut result: Vec<Rc<dyn OperatorNode>> = Vec::new();

    for root in roots {
        if let Operand::Value(data) = root {
            nodes_to_do.push(data.producer().clone());
        }
    }

    while let Some(node) = nodes_to_do.last().cloned() {
        if nodes_done.contains(&node_key(&node)) {
            nodes_to_do.pop();
            continue;
        }

        // Unfinalized producers are pushed in reverse input order, so the
        // first input ends up on top of the stack and siblings are emitted
        // in inputs() order.
        let mut can_add = true;
        for dep in node.inputs().iter().rev() {
            if let Operand::Value(data) = dep {
                if !nodes_done.contains(&node_key(data.producer())) {
                    can_add = false;
                    nodes_to_do.push(data.producer().clone());
                }
            }
        }

        if can_add {
            nodes_done.insert(node_key(&node));
            result.push(node);
            nodes_to_do.pop();
        }
    }

    result
}
