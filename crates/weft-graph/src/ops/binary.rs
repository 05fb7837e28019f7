//! Elementwise binary operators and matrix multiplication.

use crate::operand::Operand;
use crate::operator::{input_desc, take_all, OpKind, OperatorNode, OutputDesc, Validate};
use crate::{Error, Result};
use std::any::Any;

/// Which two-input operation a [`Binary`] node performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOpType {
    Add,
    Sub,
    Mul,
    Div,
    Max,
    Min,
    Pow,
    MatMul,
}

impl BinaryOpType {
    fn kind(self) -> OpKind {
        match self {
            BinaryOpType::Add => OpKind::Add,
            BinaryOpType::Sub => OpKind::Sub,
            BinaryOpType::Mul => OpKind::Mul,
            BinaryOpType::Div => OpKind::Div,
            BinaryOpType::Max => OpKind::Max,
            BinaryOpType::Min => OpKind::Min,
            BinaryOpType::Pow => OpKind::Pow,
            BinaryOpType::MatMul => OpKind::MatMul,
        }
    }
}

/// A two-input operator: elementwise arithmetic with numpy-style
/// broadcasting, or matrix multiplication.
///
/// The output rank is the broadcast rank, `max(rank a, rank b)`.
#[derive(Debug)]
pub struct Binary {
    op_type: BinaryOpType,
    inputs: [Operand; 2],
}

impl Binary {
    pub fn new(op_type: BinaryOpType, a: Operand, b: Operand) -> Self {
        Self {
            op_type,
            inputs: [a, b],
        }
    }

    pub fn op_type(&self) -> BinaryOpType {
        self.op_type
    }
}

impl Validate for Binary {
    fn validate(&self) -> Result<Vec<OutputDesc>> {
        let a = input_desc(&self.inputs, 0)?;
        let b = input_desc(&self.inputs, 1)?;

        if a.dtype != b.dtype {
            return Err(Error::Validation(format!(
                "{} input types differ: {:?} vs {:?}",
                self.kind(),
                a.dtype,
                b.dtype
            )));
        }

        if self.op_type == BinaryOpType::MatMul && (a.rank < 1 || b.rank < 1) {
            return Err(Error::Validation(
                "MatMul inputs must have rank at least 1".to_string(),
            ));
        }

        Ok(vec![OutputDesc {
            dtype: a.dtype,
            rank: a.rank.max(b.rank),
        }])
    }
}

impl OperatorNode for Binary {
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
    fn test_broadcast_rank_is_max_of_inputs() {
        let add = Binary::new(
            BinaryOpType::Add,
            operand(DataType::F32, 1),
            operand(DataType::F32, 3),
        );
        let descs = add.validate().unwrap();
        assert_eq!(descs[0].rank, 3);
        assert_eq!(descs[0].dtype, DataType::F32);
    }

    #[test]
    fn test_mismatched_types_fail() {
        let mul = Binary::new(
            BinaryOpType::Mul,
            operand(DataType::F32, 2),
            operand(DataType::I32, 2),
        );
        assert!(mul.validate().is_err());
    }

    #[test]
    fn test_matmul_rejects_scalar_input() {
        let matmul = Binary::new(
            BinaryOpType::MatMul,
            operand(DataType::F32, 0),
            operand(DataType::F32, 2),
        );
        assert!(matmul.validate().is_err());
    }

    #[test]
    fn test_matmul_of_matrices() {
        let matmul = Binary::new(
            BinaryOpType::MatMul,
            operand(DataType::F32, 2),
            operand(DataType::F32, 2),
        );
        assert_eq!(matmul.validate().unwrap()[0].rank, 2);
        assert_eq!(matmul.kind(), OpKind::MatMul);
    }
}
