//! Concatenation operator.

use crate::operand::Operand;
use crate::operator::{input_desc, take_all, OpKind, OperatorNode, OutputDesc, Validate};
use crate::{Error, Result};
use std::any::Any;

/// Concatenates operands of equal rank and type along one axis.
#[derive(Debug)]
pub struct Concat {
    inputs: Vec<Operand>,
    axis: u32,
}

impl Concat {
    pub fn new(inputs: Vec<Operand>, axis: u32) -> Self {
        Self { inputs, axis }
    }

    pub fn axis(&self) -> u32 {
        self.axis
    }
}

impl Validate for Concat {
    fn validate(&self) -> Result<Vec<OutputDesc>> {
        if self.inputs.is_empty() {
            return Err(Error::Validation(
                "Concat requires at least one input".to_string(),
            ));
        }

        let first = input_desc(&self.inputs, 0)?;
        if first.rank == 0 {
            return Err(Error::Validation(
                "Concat inputs must have rank at least 1".to_string(),
            ));
        }
        for index in 1..self.inputs.len() {
            let other = input_desc(&self.inputs, index)?;
            if other.dtype != first.dtype || other.rank != first.rank {
                return Err(Error::Validation(format!(
                    "Concat input {} ({:?}, rank {}) does not match input 0 ({:?}, rank {})",
                    index, other.dtype, other.rank, first.dtype, first.rank
                )));
            }
        }
        if self.axis as usize >= first.rank {
            return Err(Error::Validation(format!(
                "Concat axis {} is out of bounds for rank {}",
                self.axis, first.rank
            )));
        }

        Ok(vec![first])
    }
}

impl OperatorNode for Concat {
    fn kind(&self) -> OpKind {
        OpKind::Concat
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
