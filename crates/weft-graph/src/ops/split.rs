//! Split operator.

use crate::operand::Operand;
use crate::operator::{input_desc, take_all, OpKind, OperatorNode, OutputDesc, Validate};
use crate::types::SplitOptions;
use crate::{Error, Result};
use std::any::Any;

/// Splits an operand along one axis into several outputs.
///
/// The only multi-output operator kind. `splits` is either a single element
/// (an even split into that many pieces) or one size per output piece. Each
/// output keeps the input's type and rank.
#[derive(Debug)]
pub struct Split {
    inputs: [Operand; 1],
    splits: Vec<u32>,
    options: SplitOptions,
}

impl Split {
    pub fn new(input: Operand, splits: Vec<u32>, options: SplitOptions) -> Self {
        Self {
            inputs: [input],
            splits,
            options,
        }
    }

    pub fn splits(&self) -> &[u32] {
        &self.splits
    }

    pub fn options(&self) -> &SplitOptions {
        &self.options
    }

    fn piece_count(&self) -> usize {
        if self.splits.len() == 1 {
            self.splits[0] as usize
        } else {
            self.splits.len()
        }
    }
}

impl Validate for Split {
    fn validate(&self) -> Result<Vec<OutputDesc>> {
        let input = input_desc(&self.inputs, 0)?;

        if self.splits.is_empty() {
            return Err(Error::Validation(
                "Split requires at least one split value".to_string(),
            ));
        }
        if self.splits.contains(&0) {
            return Err(Error::Validation(
                "Split values must be non-zero".to_string(),
            ));
        }
        if self.options.axis as usize >= input.rank {
            return Err(Error::Validation(format!(
                "Split axis {} is out of bounds for rank {}",
                self.options.axis, input.rank
            )));
        }

        let desc = OutputDesc {
            dtype: input.dtype,
            rank: input.rank,
        };
        Ok(vec![desc; self.piece_count()])
    }
}

impl OperatorNode for Split {
    fn kind(&self) -> OpKind {
        OpKind::Split
    }

    fn inputs(&self) -> &[Operand] {
        &self.inputs
    }

    fn output_count(&self) -> usize {
        self.piece_count()
    }

    fn take_inputs(&mut self) -> Vec<Operand> {
        take_all(&mut self.inputs)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
