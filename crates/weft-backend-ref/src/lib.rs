//! Reference backend: records finalized graphs instead of executing them.
//!
//! Useful for tests and for inspecting what a builder session produced. The
//! backend receives operators in dependency order, keeps one record per node
//! and per named output, and "compiles" into an immutable [`CompiledGraph`]
//! snapshot. It also enforces the build-sequence contract (no additions after
//! `finish`, no `compile` before it), so core-side ordering bugs fail loudly
//! here.

use weft_graph::ops::Input;
use weft_graph::{Backend, BackendGraph, Error, OpKind, Operand, OperatorNode, Result};

/// Backend handing out [`RefGraph`] instances.
#[derive(Debug, Default)]
pub struct RefBackend;

impl Backend for RefBackend {
    type Compiled = CompiledGraph;
    type Graph = RefGraph;

    fn create_graph(&self) -> Result<RefGraph> {
        Ok(RefGraph::default())
    }
}

/// One operator as the backend saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRecord {
    /// Operator kind.
    pub kind: OpKind,

    /// Number of input operands, including option-supplied ones.
    pub input_count: usize,

    /// The declared name, for graph-input nodes.
    pub label: Option<String>,
}

/// One named graph output.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputRecord {
    /// User-chosen output name.
    pub name: String,

    /// Element type of the output operand.
    pub dtype: weft_graph::DataType,

    /// Rank of the output operand.
    pub rank: usize,
}

/// Graph under construction.
#[derive(Debug, Default)]
pub struct RefGraph {
    nodes: Vec<NodeRecord>,
    outputs: Vec<OutputRecord>,
    finished: bool,
}

impl BackendGraph for RefGraph {
    type Compiled = CompiledGraph;

    fn add_operator(&mut self, op: &dyn OperatorNode) -> Result<()> {
        if self.finished {
            return Err(Error::Backend(
                "cannot add an operator to a finished graph".to_string(),
            ));
        }
        let label = op
            .as_any()
            .downcast_ref::<Input>()
            .map(|input| input.name().to_string());
        tracing::debug!(kind = %op.kind(), "recording operator");
        self.nodes.push(NodeRecord {
            kind: op.kind(),
            input_count: op.inputs().len(),
            label,
        });
        Ok(())
    }

    fn add_output(&mut self, name: &str, operand: &Operand) -> Result<()> {
        if self.finished {
            return Err(Error::Backend(
                "cannot add an output to a finished graph".to_string(),
            ));
        }
        if self.outputs.iter().any(|output| output.name == name) {
            return Err(Error::Backend(format!(
                "duplicate output name {name:?}"
            )));
        }
        let (Some(dtype), Some(rank)) = (operand.dtype(), operand.rank()) else {
            return Err(Error::Backend(format!(
                "output {name:?} is an error operand"
            )));
        };
        self.outputs.push(OutputRecord {
            name: name.to_string(),
            dtype,
            rank,
        });
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if self.finished {
            return Err(Error::Backend("graph is already finished".to_string()));
        }
        self.finished = true;
        Ok(())
    }

    fn compile(self) -> Result<CompiledGraph> {
        if !self.finished {
            return Err(Error::Backend(
                "cannot compile an unfinished graph".to_string(),
            ));
        }
        tracing::debug!(
            num_nodes = self.nodes.len(),
            num_outputs = self.outputs.len(),
            "compiling recorded graph"
        );
        Ok(CompiledGraph {
            nodes: self.nodes,
            outputs: self.outputs,
        })
    }
}

/// Immutable snapshot of a finalized graph.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledGraph {
    /// Operator records in dependency order.
    pub nodes: Vec<NodeRecord>,

    /// Output records in registration order.
    pub outputs: Vec<OutputRecord>,
}

impl CompiledGraph {
    /// Operator kinds in dependency order.
    pub fn node_kinds(&self) -> Vec<OpKind> {
        self.nodes.iter().map(|node| node.kind).collect()
    }

    /// Output names in registration order.
    pub fn output_names(&self) -> Vec<&str> {
        self.outputs.iter().map(|o| o.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_graph::ops::{Binary, BinaryOpType};
    use weft_graph::{Context, DataType, GraphBuilder, OperandDescriptor};

    fn make_input(builder: &GraphBuilder<RefBackend>, name: &str) -> Operand {
        builder.input(name, &OperandDescriptor::new(DataType::F32, vec![2, 2]))
    }

    #[test]
    fn test_records_input_labels() {
        let builder = GraphBuilder::new(Context::new(RefBackend));
        let a = make_input(&builder, "a");

        let backend = RefBackend;
        let mut graph = backend.create_graph().unwrap();
        graph.add_operator(a.producer().unwrap().as_ref()).unwrap();

        let add = Binary::new(BinaryOpType::Add, a.clone(), a.clone());
        graph.add_operator(&add).unwrap();

        graph.finish().unwrap();
        let compiled = graph.compile().unwrap();

        assert_eq!(compiled.nodes[0].label.as_deref(), Some("a"));
        assert_eq!(compiled.nodes[1].label, None);
        assert_eq!(compiled.nodes[1].input_count, 2);
    }

    #[test]
    fn test_rejects_additions_after_finish() {
        let backend = RefBackend;
        let mut graph = backend.create_graph().unwrap();
        graph.finish().unwrap();

        let builder = GraphBuilder::new(Context::new(RefBackend));
        let a = make_input(&builder, "a");
        assert!(graph.add_operator(a.producer().unwrap().as_ref()).is_err());
        assert!(graph.add_output("out", &a).is_err());
        assert!(graph.finish().is_err());
    }

    #[test]
    fn test_rejects_compile_before_finish() {
        let backend = RefBackend;
        let graph = backend.create_graph().unwrap();
        assert!(graph.compile().is_err());
    }

    #[test]
    fn test_rejects_duplicate_output_names() {
        let builder = GraphBuilder::new(Context::new(RefBackend));
        let a = make_input(&builder, "a");

        let backend = RefBackend;
        let mut graph = backend.create_graph().unwrap();
        graph.add_output("out", &a).unwrap();
        assert!(graph.add_output("out", &a).is_err());
    }

    #[test]
    fn test_rejects_error_operand_outputs() {
        let backend = RefBackend;
        let mut graph = backend.create_graph().unwrap();
        assert!(graph.add_output("out", &Operand::Error).is_err());
    }
}
