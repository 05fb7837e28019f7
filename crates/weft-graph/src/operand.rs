//! Operand handles: immutable, shared references to operator outputs.

use crate::operator::{OperatorNode, OutputDesc};
use crate::types::DataType;
use indexmap::IndexMap;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identifier of one graph-building session.
///
/// Operands record the session that created them so a builder can reject
/// operands from a different builder during base validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SessionId(u64);

impl SessionId {
    pub(crate) fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// Shared data of a successfully constructed operand.
pub struct OperandData {
    producer: Rc<dyn OperatorNode>,
    output_index: usize,
    dtype: DataType,
    rank: usize,
    session: SessionId,
}

impl OperandData {
    /// The operator producing this operand.
    pub fn producer(&self) -> &Rc<dyn OperatorNode> {
        &self.producer
    }

    /// Index of this operand among the producer's outputs.
    pub fn output_index(&self) -> usize {
        self.output_index
    }

    /// Element type.
    pub fn dtype(&self) -> DataType {
        self.dtype
    }

    /// Number of dimensions.
    pub fn rank(&self) -> usize {
        self.rank
    }

    pub(crate) fn session(&self) -> SessionId {
        self.session
    }
}

impl Drop for OperandData {
    fn drop(&mut self) {
        // The default recursive drop nests one stack frame per operator in
        // the producer chain and overflows on deep graphs. Detach inputs
        // into an explicit worklist first, so each individual drop stays
        // shallow. Shared nodes (Rc::get_mut fails) are left alone; their
        // own teardown runs this same unwind when the last handle goes.
        let mut queue = match Rc::get_mut(&mut self.producer) {
            Some(node) => node.take_inputs(),
            None => return,
        };
        while let Some(operand) = queue.pop() {
            if let Operand::Value(mut data) = operand {
                if let Some(inner) = Rc::get_mut(&mut data) {
                    if let Some(node) = Rc::get_mut(&mut inner.producer) {
                        queue.extend(node.take_inputs());
                    }
                }
            }
        }
    }
}

/// Handle to a tensor value produced by exactly one operator in the graph.
///
/// A cheap-to-clone tagged handle: either a value backed by shared node data,
/// or an error sentinel produced by a failed construction. The sentinel
/// carries no payload; it exists so client code can keep chaining builder
/// calls without per-step checks, deferring error reporting to
/// [`crate::builder::GraphBuilder::build`].
#[derive(Clone)]
pub enum Operand {
    /// A successfully constructed operand.
    Value(Rc<OperandData>),

    /// Error sentinel from a failed construction.
    Error,
}

impl Operand {
    pub(crate) fn new(
        producer: Rc<dyn OperatorNode>,
        output_index: usize,
        desc: OutputDesc,
        session: SessionId,
    ) -> Self {
        Operand::Value(Rc::new(OperandData {
            producer,
            output_index,
            dtype: desc.dtype,
            rank: desc.rank,
            session,
        }))
    }

    /// Whether this operand is an error sentinel.
    pub fn is_error(&self) -> bool {
        matches!(self, Operand::Error)
    }

    /// Element type, if this operand is not an error sentinel.
    pub fn dtype(&self) -> Option<DataType> {
        match self {
            Operand::Value(data) => Some(data.dtype),
            Operand::Error => None,
        }
    }

    /// Rank, if this operand is not an error sentinel.
    pub fn rank(&self) -> Option<usize> {
        match self {
            Operand::Value(data) => Some(data.rank),
            Operand::Error => None,
        }
    }

    /// The producing operator, if this operand is not an error sentinel.
    pub fn producer(&self) -> Option<&Rc<dyn OperatorNode>> {
        match self {
            Operand::Value(data) => Some(&data.producer),
            Operand::Error => None,
        }
    }

    pub(crate) fn session(&self) -> Option<SessionId> {
        match self {
            Operand::Value(data) => Some(data.session),
            Operand::Error => None,
        }
    }
}

impl fmt::Debug for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Value(data) => f
                .debug_struct("Operand")
                .field("kind", &data.producer.kind())
                .field("output_index", &data.output_index)
                .field("dtype", &data.dtype)
                .field("rank", &data.rank)
                .finish(),
            Operand::Error => write!(f, "Operand::Error"),
        }
    }
}

/// Ordered group of operands produced by one multi-output operator.
///
/// Same value/error tagging as [`Operand`]; a failed construction of the
/// producing operator yields `OperandArray::Error`.
#[derive(Debug, Clone)]
pub enum OperandArray {
    /// Outputs of a successfully constructed multi-output operator.
    Value(Vec<Operand>),

    /// Error sentinel from a failed construction.
    Error,
}

impl OperandArray {
    /// Whether this collection is an error sentinel.
    pub fn is_error(&self) -> bool {
        matches!(self, OperandArray::Error)
    }

    /// Number of operands; zero for the error sentinel.
    pub fn len(&self) -> usize {
        match self {
            OperandArray::Value(operands) => operands.len(),
            OperandArray::Error => 0,
        }
    }

    /// Whether the collection holds no operands.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Operand at `index`, if present.
    pub fn get(&self, index: usize) -> Option<&Operand> {
        match self {
            OperandArray::Value(operands) => operands.get(index),
            OperandArray::Error => None,
        }
    }

    /// Iterate over the operands.
    pub fn iter(&self) -> impl Iterator<Item = &Operand> {
        match self {
            OperandArray::Value(operands) => operands.iter(),
            OperandArray::Error => [].iter(),
        }
    }
}

/// User-chosen mapping from output names to final operands.
///
/// Names are unique; setting an existing name replaces its operand.
/// Iteration follows insertion order, which is the order outputs are
/// registered with the backend.
#[derive(Debug, Default)]
pub struct NamedOperands {
    records: IndexMap<String, Operand>,
}

impl NamedOperands {
    /// Create an empty output set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `operand`, replacing any previous binding.
    pub fn set(&mut self, name: impl Into<String>, operand: &Operand) {
        self.records.insert(name.into(), operand.clone());
    }

    /// Look up an operand by name.
    pub fn get(&self, name: &str) -> Option<&Operand> {
        self.records.get(name)
    }

    /// Number of named outputs.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the output set is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over `(name, operand)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Operand)> {
        self.records.iter().map(|(name, op)| (name.as_str(), op))
    }
}
