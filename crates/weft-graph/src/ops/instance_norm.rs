//! Instance normalization operator.

use crate::operand::Operand;
use crate::operator::{input_desc, take_all, OpKind, OperatorNode, OutputDesc, Validate};
use crate::types::InstanceNormOptions;
use crate::{Error, Result};
use std::any::Any;

/// Instance normalization of an NCHW input; mean and variance are computed
/// per instance at execution time, so only scale/bias are graph operands.
#[derive(Debug)]
pub struct InstanceNorm {
    inputs: Vec<Operand>,
    options: InstanceNormOptions,
}

impl InstanceNorm {
    pub fn new(input: Operand, options: InstanceNormOptions) -> Self {
        let mut inputs = vec![input];
        if let Some(scale) = &options.scale {
            inputs.push(scale.clone());
        }
        if let Some(bias) = &options.bias {
            inputs.push(bias.clone());
        }
        Self { inputs, options }
    }

    pub fn options(&self) -> &InstanceNormOptions {
        &self.options
    }
}

impl Validate for InstanceNorm {
    fn validate(&self) -> Result<Vec<OutputDesc>> {
        let input = input_desc(&self.inputs, 0)?;
        if input.rank != 4 {
            return Err(Error::Validation(format!(
                "InstanceNorm input must have rank 4, got {}",
                input.rank
            )));
        }
        for index in 1..self.inputs.len() {
            let stat = input_desc(&self.inputs, index)?;
            if stat.rank != 1 {
                return Err(Error::Validation(format!(
                    "InstanceNorm per-channel operand {} must have rank 1, got {}",
                    index, stat.rank
                )));
            }
        }
        Ok(vec![OutputDesc {
            dtype: input.dtype,
            rank: 4,
        }])
    }
}

impl OperatorNode for InstanceNorm {
    fn kind(&self) -> OpKind {
        OpKind::InstanceNorm
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
