//! Reduction operators.

use crate::operand::Operand;
use crate::operator::{input_desc, take_all, OpKind, OperatorNode, OutputDesc, Validate};
use crate::types::ReduceOptions;
use crate::{Error, Result};
use std::any::Any;
use std::collections::HashSet;

/// Mean reduction over a set of axes.
///
/// A rank-changing operator: without `keep_dimensions` the output rank drops
/// by the number of reduced axes (all of them when `axes` is absent).
#[derive(Debug)]
pub struct ReduceMean {
    inputs: [Operand; 1],
    options: ReduceOptions,
}

impl ReduceMean {
    pub fn new(input: Operand, options: ReduceOptions) -> Self {
        Self {
            inputs: [input],
            options,
        }
    }

    pub fn options(&self) -> &ReduceOptions {
        &self.options
    }
}

impl Validate for ReduceMean {
    fn validate(&self) -> Result<Vec<OutputDesc>> {
        let input = input_desc(&self.inputs, 0)?;

        let reduced = match &self.options.axes {
            Some(axes) => {
                let mut seen = HashSet::new();
                for &axis in axes {
                    if axis as usize >= input.rank {
                        return Err(Error::Validation(format!(
                            "ReduceMean axis {} is out of bounds for rank {}",
                            axis, input.rank
                        )));
                    }
                    if !seen.insert(axis) {
                        return Err(Error::Validation(format!(
                            "ReduceMean axis {} is listed twice",
                            axis
                        )));
                    }
                }
                axes.len()
            }
            None => input.rank,
        };

        let rank = if self.options.keep_dimensions {
            input.rank
        } else {
            input.rank - reduced
        };

        Ok(vec![OutputDesc {
            dtype: input.dtype,
            rank,
        }])
    }
}

impl OperatorNode for ReduceMean {
    fn kind(&self) -> OpKind {
        OpKind::ReduceMean
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
