//! Single-input activation operators.

use crate::operand::Operand;
use crate::operator::{input_desc, passthrough, take_all, OpKind, OperatorNode, OutputDesc, Validate};
use crate::{Error, Result};
use std::any::Any;

/// Which activation a [`Unary`] node applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOpType {
    Relu,
    Sigmoid,
    Tanh,
    HardSwish,
    Softmax,
}

impl UnaryOpType {
    fn kind(self) -> OpKind {
        match self {
            UnaryOpType::Relu => OpKind::Relu,
            UnaryOpType::Sigmoid => OpKind::Sigmoid,
            UnaryOpType::Tanh => OpKind::Tanh,
            UnaryOpType::HardSwish => OpKind::HardSwish,
            UnaryOpType::Softmax => OpKind::Softmax,
        }
    }
}

/// A single-input activation. Output type and rank equal the input's.
///
/// Softmax additionally requires its input to have rank exactly 2.
#[derive(Debug)]
pub struct Unary {
    op_type: UnaryOpType,
    inputs: [Operand; 1],
}

impl Unary {
    pub fn new(op_type: UnaryOpType, input: Operand) -> Self {
        Self {
            op_type,
            inputs: [input],
        }
    }

    pub fn op_type(&self) -> UnaryOpType {
        self.op_type
    }
}

impl Validate for Unary {
    fn validate(&self) -> Result<Vec<OutputDesc>> {
        if self.op_type == UnaryOpType::Softmax {
            let input = input_desc(&self.inputs, 0)?;
            if input.rank != 2 {
                return Err(Error::Validation(format!(
                    "Softmax input must have rank 2, got {}",
                    input.rank
                )));
            }
        }
        passthrough(&self.inputs)
    }
}

impl OperatorNode for Unary {
    fn kind(&self) -> OpKind {
        self.op_type.kind()
    }

    fn inputs(&self) -> &[Operand] {
        &self.inputs
    }

    fn take_inputs(&mut self) -> Vec<Operand> {
        take_all(&mut self.inputs)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operand::test_support::operand;
    use crate::types::DataType;

    #[test]
    fn test_relu_passes_attributes_through() {
        let relu = Unary::new(UnaryOpType::Relu, operand(DataType::F16, 4));
        let descs = relu.validate().unwrap();
        assert_eq!(descs[0].dtype, DataType::F16);
        assert_eq!(descs[0].rank, 4);
    }

    #[test]
    fn test_softmax_requires_rank_two() {
        for rank in [0, 1, 3, 4] {
            let softmax = Unary::new(UnaryOpType::Softmax, operand(DataType::F32, rank));
            assert!(softmax.validate().is_err(), "rank {} should fail", rank);
        }

        let softmax = Unary::new(UnaryOpType::Softmax, operand(DataType::F32, 2));
        assert_eq!(softmax.validate().unwrap()[0].rank, 2);
    }
}
