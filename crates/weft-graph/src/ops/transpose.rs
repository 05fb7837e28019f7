//! Transpose operator.

use crate::operand::Operand;
use crate::operator::{input_desc, take_all, OpKind, OperatorNode, OutputDesc, Validate};
use crate::types::TransposeOptions;
use crate::{Error, Result};
use std::any::Any;

/// Permutes the dimensions of an operand; rank is unchanged.
#[derive(Debug)]
pub struct Transpose {
    inputs: [Operand; 1],
    options: TransposeOptions,
}

impl Transpose {
    pub fn new(input: Operand, options: TransposeOptions) -> Self {
        Self {
            inputs: [input],
            options,
        }
    }

    pub fn options(&self) -> &TransposeOptions {
        &self.options
    }
}

impl Validate for Transpose {
    fn validate(&self) -> Result<Vec<OutputDesc>> {
        let input = input_desc(&self.inputs, 0)?;

        if let Some(permutation) = &self.options.permutation {
            if permutation.len() != input.rank {
                return Err(Error::Validation(format!(
                    "Transpose permutation has {} entries for rank {}",
                    permutation.len(),
                    input.rank
                )));
            }
            let mut seen = vec![false; input.rank];
            for &axis in permutation {
                let axis = axis as usize;
                if axis >= input.rank || seen[axis] {
                    return Err(Error::Validation(format!(
                        "Transpose permutation {:?} is not a permutation of 0..{}",
                        permutation, input.rank
                    )));
                }
                seen[axis] = true;
            }
        }

        Ok(vec![OutputDesc {
            dtype: input.dtype,
            rank: input.rank,
        }])
    }
}

impl OperatorNode for Transpose {
    fn kind(&self) -> OpKind {
        OpKind::Transpose
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
