//! Squeeze operator.

use crate::operand::Operand;
use crate::operator::{input_desc, take_all, OpKind, OperatorNode, OutputDesc, Validate};
use crate::types::SqueezeOptions;
use crate::{Error, Result};
use std::any::Any;
use std::collections::HashSet;

/// Removes dimensions from an operand.
///
/// With explicit axes the output rank drops by their count. Without axes all
/// size-1 dimensions are removed, which cannot be resolved from rank alone;
/// the rank is left unchanged here and the backend resolves it against
/// concrete shapes.
#[derive(Debug)]
pub struct Squeeze {
    inputs: [Operand; 1],
    options: SqueezeOptions,
}

impl Squeeze {
    pub fn new(input: Operand, options: SqueezeOptions) -> Self {
        Self {
            inputs: [input],
            options,
        }
    }

    pub fn options(&self) -> &SqueezeOptions {
        &self.options
    }
}

impl Validate for Squeeze {
    fn validate(&self) -> Result<Vec<OutputDesc>> {
        let input = input_desc(&self.inputs, 0)?;

        let rank = match &self.options.axes {
            Some(axes) => {
                let mut seen = HashSet::new();
                for &axis in axes {
                    if axis as usize >= input.rank {
                        return Err(Error::Validation(format!(
                            "Squeeze axis {} is out of bounds for rank {}",
                            axis, input.rank
                        )));
                    }
                    if !seen.insert(axis) {
                        return Err(Error::Validation(format!(
                            "Squeeze axis {} is listed twice",
                            axis
                        )));
                    }
                }
                input.rank - axes.len()
            }
            None => input.rank,
        };

        Ok(vec![OutputDesc {
            dtype: input.dtype,
            rank,
        }])
    }
}

impl OperatorNode for Squeeze {
    fn kind(&self) -> OpKind {
        OpKind::Squeeze
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
    fn test_squeeze_with_axes_reduces_rank() {
        let options = SqueezeOptions {
            axes: Some(vec![0, 2]),
        };
        let squeeze = Squeeze::new(operand(DataType::F32, 4), options);
        assert_eq!(squeeze.validate().unwrap()[0].rank, 2);
    }

    #[test]
    fn test_squeeze_axis_out_of_bounds_fails() {
        let options = SqueezeOptions {
            axes: Some(vec![4]),
        };
        let squeeze = Squeeze::new(operand(DataType::F32, 4), options);
        assert!(squeeze.validate().is_err());
    }

    #[test]
    fn test_squeeze_without_axes_keeps_rank() {
        let squeeze = Squeeze::new(operand(DataType::F32, 4), SqueezeOptions::default());
        assert_eq!(squeeze.validate().unwrap()[0].rank, 4);
    }
}
