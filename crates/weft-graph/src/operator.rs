//! Operator traits shared by every concrete operator kind.

use crate::operand::Operand;
use crate::types::DataType;
use crate::{Error, Result};
use std::any::Any;
use std::fmt;

/// Discriminant for every supported operator kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    Input,
    Constant,
    Add,
    Sub,
    Mul,
    Div,
    Max,
    Min,
    Pow,
    MatMul,
    Conv2d,
    AveragePool2d,
    MaxPool2d,
    ReduceMean,
    Relu,
    Sigmoid,
    Tanh,
    HardSwish,
    Softmax,
    LeakyRelu,
    Clamp,
    BatchNorm,
    InstanceNorm,
    Resample,
    Reshape,
    Transpose,
    Squeeze,
    Split,
    Concat,
    Pad,
    Gemm,
}

impl OpKind {
    /// Human-readable operator name.
    pub fn name(&self) -> &'static str {
        match self {
            OpKind::Input => "Input",
            OpKind::Constant => "Constant",
            OpKind::Add => "Add",
            OpKind::Sub => "Sub",
            OpKind::Mul => "Mul",
            OpKind::Div => "Div",
            OpKind::Max => "Max",
            OpKind::Min => "Min",
            OpKind::Pow => "Pow",
            OpKind::MatMul => "MatMul",
            OpKind::Conv2d => "Conv2d",
            OpKind::AveragePool2d => "AveragePool2d",
            OpKind::MaxPool2d => "MaxPool2d",
            OpKind::ReduceMean => "ReduceMean",
            OpKind::Relu => "Relu",
            OpKind::Sigmoid => "Sigmoid",
            OpKind::Tanh => "Tanh",
            OpKind::HardSwish => "HardSwish",
            OpKind::Softmax => "Softmax",
            OpKind::LeakyRelu => "LeakyRelu",
            OpKind::Clamp => "Clamp",
            OpKind::BatchNorm => "BatchNorm",
            OpKind::InstanceNorm => "InstanceNorm",
            OpKind::Resample => "Resample",
            OpKind::Reshape => "Reshape",
            OpKind::Transpose => "Transpose",
            OpKind::Squeeze => "Squeeze",
            OpKind::Split => "Split",
            OpKind::Concat => "Concat",
            OpKind::Pad => "Pad",
            OpKind::Gemm => "Gemm",
        }
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Finalized element type and rank of one operator output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputDesc {
    /// Element type.
    pub dtype: DataType,

    /// Number of dimensions.
    pub rank: usize,
}

/// A node representing one computation in the graph.
///
/// Implemented by every concrete operator kind. Nodes are structural
/// bookkeeping only: inputs are fixed at construction, outputs are finalized
/// by validation, and no computation happens until a backend executes the
/// compiled graph. Backends dispatch on [`OperatorNode::kind`] and downcast
/// through [`OperatorNode::as_any`] for kind-specific attributes.
pub trait OperatorNode {
    /// Which operator kind this node is.
    fn kind(&self) -> OpKind;

    /// Ordered input operands.
    fn inputs(&self) -> &[Operand];

    /// Number of output operands (1 for all kinds except split).
    fn output_count(&self) -> usize {
        1
    }

    /// Remove and return the input operands, leaving error sentinels behind.
    ///
    /// Called during operand teardown so deep graphs unwind through an
    /// explicit worklist instead of nested drops. Kinds that hold operands
    /// must override this; the default covers the zero-input kinds.
    fn take_inputs(&mut self) -> Vec<Operand> {
        Vec::new()
    }

    /// Downcast seam for backends.
    fn as_any(&self) -> &dyn Any;
}

/// Kind-specific validation, run exactly once per operator at construction
/// time, before the operator is reachable from any operand.
///
/// Base validation (no error inputs, all inputs from the same session) is the
/// builder's job and has already succeeded when this runs. On success the
/// returned descriptors finalize the output operands' type and rank; on
/// failure nothing of the operator escapes, so no partial state is observable.
pub trait Validate {
    /// Check this operator and compute its output descriptors.
    fn validate(&self) -> Result<Vec<OutputDesc>>;
}

/// Replace every input with an error sentinel, returning the originals.
/// Shared body for [`OperatorNode::take_inputs`] overrides.
pub(crate) fn take_all(inputs: &mut [Operand]) -> Vec<Operand> {
    inputs
        .iter_mut()
        .map(|input| std::mem::replace(input, Operand::Error))
        .collect()
}

/// Default type/rank propagation: output attributes equal those of input 0.
pub(crate) fn passthrough(inputs: &[Operand]) -> Result<Vec<OutputDesc>> {
    Ok(vec![input_desc(inputs, 0)?])
}

/// Descriptor of the input at `index`, failing on absent or error operands.
pub(crate) fn input_desc(inputs: &[Operand], index: usize) -> Result<OutputDesc> {
    match inputs.get(index) {
        Some(Operand::Value(data)) => Ok(OutputDesc {
            dtype: data.dtype(),
            rank: data.rank(),
        }),
        _ => Err(Error::Validation(format!(
            "input operand {} is missing or invalid",
            index
        ))),
    }
}
