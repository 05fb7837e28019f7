//! General matrix multiplication operator.

use crate::operand::Operand;
use crate::operator::{input_desc, take_all, OpKind, OperatorNode, OutputDesc, Validate};
use crate::types::GemmOptions;
use crate::{Error, Result};
use std::any::Any;

/// `alpha * A * B + beta * C` over rank-2 operands.
///
/// The optional `C` operand from the options joins the input list for
/// dependency ordering, like batch-norm's scale and bias.
#[derive(Debug)]
pub struct Gemm {
    inputs: Vec<Operand>,
    options: GemmOptions,
}

impl Gemm {
    pub fn new(a: Operand, b: Operand, options: GemmOptions) -> Self {
        let mut inputs = vec![a, b];
        if let Some(c) = &options.c {
            inputs.push(c.clone());
        }
        Self { inputs, options }
    }

    pub fn options(&self) -> &GemmOptions {
        &self.options
    }
}

impl Validate for Gemm {
    fn validate(&self) -> Result<Vec<OutputDesc>> {
        let a = input_desc(&self.inputs, 0)?;
        let b = input_desc(&self.inputs, 1)?;

        if a.rank != 2 || b.rank != 2 {
            return Err(Error::Validation(format!(
                "Gemm inputs must have rank 2, got {} and {}",
                a.rank, b.rank
            )));
        }
        if a.dtype != b.dtype {
            return Err(Error::Validation(format!(
                "Gemm input types differ: {:?} vs {:?}",
                a.dtype, b.dtype
            )));
        }
        if self.inputs.len() > 2 {
            let c = input_desc(&self.inputs, 2)?;
            if c.rank > 2 {
                return Err(Error::Validation(format!(
                    "Gemm C operand must have rank at most 2, got {}",
                    c.rank
                )));
            }
        }

        Ok(vec![OutputDesc {
            dtype: a.dtype,
            rank: 2,
        }])
    }
}

impl OperatorNode for Gemm {
    fn kind(&self) -> OpKind {
        OpKind::Gemm
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
    fn test_gemm_requires_matrices() {
        let gemm = Gemm::new(
            operand(DataType::F32, 2),
            operand(DataType::F32, 2),
            GemmOptions::default(),
        );
        assert_eq!(gemm.validate().unwrap()[0].rank, 2);

        let bad = Gemm::new(
            operand(DataType::F32, 3),
            operand(DataType::F32, 2),
            GemmOptions::default(),
        );
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_gemm_c_joins_inputs_and_is_checked() {
        let options = GemmOptions {
            c: Some(operand(DataType::F32, 1)),
            ..GemmOptions::default()
        };
        let gemm = Gemm::new(operand(DataType::F32, 2), operand(DataType::F32, 2), options);
        assert_eq!(gemm.inputs().len(), 3);
        assert!(gemm.validate().is_ok());

        let options = GemmOptions {
            c: Some(operand(DataType::F32, 3)),
            ..GemmOptions::default()
        };
        let gemm = Gemm::new(operand(DataType::F32, 2), operand(DataType::F32, 2), options);
        assert!(gemm.validate().is_err());
    }
}
