//! Resampling operator.

use crate::operand::Operand;
use crate::operator::{input_desc, take_all, OpKind, OperatorNode, OutputDesc, Validate};
use crate::types::ResampleOptions;
use crate::{Error, Result};
use std::any::Any;

/// Spatial resampling of a rank-4 input by scales or explicit sizes.
#[derive(Debug)]
pub struct Resample {
    inputs: [Operand; 1],
    options: ResampleOptions,
}

impl Resample {
    pub fn new(input: Operand, options: ResampleOptions) -> Self {
        Self {
            inputs: [input],
            options,
        }
    }

    pub fn options(&self) -> &ResampleOptions {
        &self.options
    }
}

impl Validate for Resample {
    fn validate(&self) -> Result<Vec<OutputDesc>> {
        let input = input_desc(&self.inputs, 0)?;
        if input.rank != 4 {
            return Err(Error::Validation(format!(
                "Resample input must have rank 4, got {}",
                input.rank
            )));
        }
        if let Some(scales) = self.options.scales {
            if scales.iter().any(|&s| s <= 0.0) {
                return Err(Error::Validation(
                    "Resample scales must be positive".to_string(),
                ));
            }
        }
        if let Some(sizes) = self.options.sizes {
            if sizes.contains(&0) {
                return Err(Error::Validation(
                    "Resample sizes must be non-zero".to_string(),
                ));
            }
        }
        Ok(vec![OutputDesc {
            dtype: input.dtype,
            rank: 4,
        }])
    }
}

impl OperatorNode for Resample {
    fn kind(&self) -> OpKind {
        OpKind::Resample
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
