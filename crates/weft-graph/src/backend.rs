//! Backend seams: the traits a concrete graph backend implements.

use crate::operand::Operand;
use crate::operator::OperatorNode;
use crate::Result;

/// Factory for backend-specific graph instances.
///
/// The core never instantiates backend state itself; finalize asks the
/// [`crate::context::Context`] for a fresh graph through this trait.
pub trait Backend {
    /// The compiled, executable artifact this backend produces.
    type Compiled;

    /// The in-progress graph representation.
    type Graph: BackendGraph<Compiled = Self::Compiled>;

    /// Create an empty backend graph.
    fn create_graph(&self) -> Result<Self::Graph>;
}

/// A backend graph under construction.
///
/// Finalize drives this in a fixed order: `add_operator` per operator in
/// dependency order, `add_output` per named output, `finish`, then `compile`.
/// Each step may be expensive and backend-specific; the core does not retry
/// failures, and drops the graph on the first error.
///
/// Backends receive operators as trait objects: dispatch on
/// [`OperatorNode::kind`], then downcast via [`OperatorNode::as_any`] to the
/// concrete operator type for its options.
pub trait BackendGraph {
    /// The compiled artifact `compile` produces.
    type Compiled;

    /// Append one operator node. All of its input-producing operators have
    /// already been added.
    fn add_operator(&mut self, op: &dyn OperatorNode) -> Result<()>;

    /// Register a named graph output.
    fn add_output(&mut self, name: &str, operand: &Operand) -> Result<()>;

    /// Seal the graph structure; no further nodes or outputs may be added.
    fn finish(&mut self) -> Result<()>;

    /// Compile the sealed graph into an executable artifact.
    fn compile(self) -> Result<Self::Compiled>;
}
