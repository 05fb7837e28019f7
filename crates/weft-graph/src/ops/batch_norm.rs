//! Batch normalization operator.

use crate::operand::Operand;
use crate::operator::{input_desc, take_all, OpKind, OperatorNode, OutputDesc, Validate};
use crate::types::BatchNormOptions;
use crate::{Error, Result};
use std::any::Any;

/// Batch normalization of an NCHW input against precomputed mean and
/// variance.
///
/// The optional scale and bias operands from the options are appended to the
/// input list so dependency ordering and poisoning see them. Like conv2d,
/// a clamp activation in the options is rewritten by the builder into an
/// explicit clamp node.
#[derive(Debug)]
pub struct BatchNorm {
    inputs: Vec<Operand>,
    options: BatchNormOptions,
}

impl BatchNorm {
    pub fn new(input: Operand, mean: Operand, variance: Operand, options: BatchNormOptions) -> Self {
        let mut inputs = vec![input, mean, variance];
        if let Some(scale) = &options.scale {
            inputs.push(scale.clone());
        }
        if let Some(bias) = &options.bias {
            inputs.push(bias.clone());
        }
        Self { inputs, options }
    }

    pub fn options(&self) -> &BatchNormOptions {
        &self.options
    }
}

impl Validate for BatchNorm {
    fn validate(&self) -> Result<Vec<OutputDesc>> {
        let input = input_desc(&self.inputs, 0)?;
        if input.rank != 4 {
            return Err(Error::Validation(format!(
                "BatchNorm input must have rank 4, got {}",
                input.rank
            )));
        }
        if self.options.axis as usize >= input.rank {
            return Err(Error::Validation(format!(
                "BatchNorm axis {} is out of bounds for rank {}",
                self.options.axis, input.rank
            )));
        }

        // mean, variance, and the optional scale/bias are all per-channel.
        for index in 1..self.inputs.len() {
            let stat = input_desc(&self.inputs, index)?;
            if stat.rank != 1 {
                return Err(Error::Validation(format!(
                    "BatchNorm per-channel operand {} must have rank 1, got {}",
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

impl OperatorNode for BatchNorm {
    fn kind(&self) -> OpKind {
        OpKind::BatchNorm
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
