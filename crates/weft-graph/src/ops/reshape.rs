//! Reshape operator.

use crate::operand::Operand;
use crate::operator::{input_desc, take_all, OpKind, OperatorNode, OutputDesc, Validate};
use crate::{Error, Result};
use std::any::Any;

/// Reinterprets an operand with a new shape.
///
/// At most one dimension may be -1 (inferred from the element count at
/// compile time); all others must be positive. Output rank is the length of
/// the new shape.
#[derive(Debug)]
pub struct Reshape {
    inputs: [Operand; 1],
    new_shape: Vec<i32>,
}

impl Reshape {
    pub fn new(input: Operand, new_shape: Vec<i32>) -> Self {
        Self {
            inputs: [input],
            new_shape,
        }
    }

    pub fn new_shape(&self) -> &[i32] {
        &self.new_shape
    }
}

impl Validate for Reshape {
    fn validate(&self) -> Result<Vec<OutputDesc>> {
        let input = input_desc(&self.inputs, 0)?;

        if self.new_shape.is_empty() {
            return Err(Error::Validation(
                "Reshape target shape must not be empty".to_string(),
            ));
        }
        let mut inferred = 0usize;
        for &dim in &self.new_shape {
            if dim == -1 {
                inferred += 1;
            } else if dim <= 0 {
                return Err(Error::Validation(format!(
                    "Reshape dimension {} is invalid; only -1 or positive values are allowed",
                    dim
                )));
            }
        }
        if inferred > 1 {
            return Err(Error::Validation(
                "Reshape allows at most one inferred (-1) dimension".to_string(),
            ));
        }

        Ok(vec![OutputDesc {
            dtype: input.dtype,
            rank: self.new_shape.len(),
        }])
    }
}

impl OperatorNode for Reshape {
    fn kind(&self) -> OpKind {
        OpKind::Reshape
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
