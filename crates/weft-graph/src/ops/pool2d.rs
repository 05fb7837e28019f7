//! 2D pooling operators.

use crate::operand::Operand;
use crate::operator::{input_desc, take_all, OpKind, OperatorNode, OutputDesc, Validate};
use crate::types::Pool2dOptions;
use crate::{Error, Result};
use std::any::Any;

/// Which reduction a [`Pool2d`] window applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pool2dType {
    Average,
    Max,
}

/// 2D pooling over an NCHW input. Output rank stays 4.
#[derive(Debug)]
pub struct Pool2d {
    pool_type: Pool2dType,
    inputs: [Operand; 1],
    options: Pool2dOptions,
}

impl Pool2d {
    pub fn new(pool_type: Pool2dType, input: Operand, options: Pool2dOptions) -> Self {
        Self {
            pool_type,
            inputs: [input],
            options,
        }
    }

    pub fn pool_type(&self) -> Pool2dType {
        self.pool_type
    }

    pub fn options(&self) -> &Pool2dOptions {
        &self.options
    }
}

impl Validate for Pool2d {
    fn validate(&self) -> Result<Vec<OutputDesc>> {
        let input = input_desc(&self.inputs, 0)?;
        if input.rank != 4 {
            return Err(Error::Validation(format!(
                "{} input must have rank 4, got {}",
                self.kind(),
                input.rank
            )));
        }
        if let Some(window) = self.options.window_dimensions {
            if window.contains(&0) {
                return Err(Error::Validation(
                    "pooling window dimensions must be non-zero".to_string(),
                ));
            }
        }
        Ok(vec![OutputDesc {
            dtype: input.dtype,
            rank: 4,
        }])
    }
}

impl OperatorNode for Pool2d {
    fn kind(&self) -> OpKind {
        match self.pool_type {
            Pool2dType::Average => OpKind::AveragePool2d,
            Pool2dType::Max => OpKind::MaxPool2d,
        }
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
