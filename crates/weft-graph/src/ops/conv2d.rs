//! 2D convolution operator.

use crate::operand::Operand;
use crate::operator::{input_desc, take_all, OpKind, OperatorNode, OutputDesc, Validate};
use crate::types::Conv2dOptions;
use crate::{Error, Result};
use std::any::Any;

/// 2D convolution over an NCHW input with an OIHW filter.
///
/// The stored options may carry a fused activation; the builder strips a
/// clamp activation before construction and materializes it as an explicit
/// node instead (see [`crate::builder::GraphBuilder::conv2d`]).
#[derive(Debug)]
pub struct Conv2d {
    inputs: [Operand; 2],
    options: Conv2dOptions,
}

impl Conv2d {
    pub fn new(input: Operand, filter: Operand, options: Conv2dOptions) -> Self {
        Self {
            inputs: [input, filter],
            options,
        }
    }

    pub fn options(&self) -> &Conv2dOptions {
        &self.options
    }
}

impl Validate for Conv2d {
    fn validate(&self) -> Result<Vec<OutputDesc>> {
        let input = input_desc(&self.inputs, 0)?;
        let filter = input_desc(&self.inputs, 1)?;

        if input.rank != 4 {
            return Err(Error::Validation(format!(
                "Conv2d input must have rank 4, got {}",
                input.rank
            )));
        }
        if filter.rank != 4 {
            return Err(Error::Validation(format!(
                "Conv2d filter must have rank 4, got {}",
                filter.rank
            )));
        }
        if input.dtype != filter.dtype {
            return Err(Error::Validation(format!(
                "Conv2d input and filter types differ: {:?} vs {:?}",
                input.dtype, filter.dtype
            )));
        }
        if self.options.groups == 0 {
            return Err(Error::Validation(
                "Conv2d groups must be at least 1".to_string(),
            ));
        }

        Ok(vec![OutputDesc {
            dtype: input.dtype,
            rank: 4,
        }])
    }
}

impl OperatorNode for Conv2d {
    fn kind(&self) -> OpKind {
        OpKind::Conv2d
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
    fn test_conv2d_requires_rank_four_operands() {
        let conv = Conv2d::new(
            operand(DataType::F32, 4),
            operand(DataType::F32, 4),
            Conv2dOptions::default(),
        );
        assert_eq!(conv.validate().unwrap()[0].rank, 4);

        let bad_input = Conv2d::new(
            operand(DataType::F32, 3),
            operand(DataType::F32, 4),
            Conv2dOptions::default(),
        );
        assert!(bad_input.validate().is_err());

        let bad_filter = Conv2d::new(
            operand(DataType::F32, 4),
            operand(DataType::F32, 2),
            Conv2dOptions::default(),
        );
        assert!(bad_filter.validate().is_err());
    }

    #[test]
    fn test_conv2d_rejects_zero_groups() {
        let options = Conv2dOptions {
            groups: 0,
            ..Conv2dOptions::default()
        };
        let conv = Conv2d::new(
            operand(DataType::F32, 4),
            operand(DataType::F32, 4),
            options,
        );
        assert!(conv.validate().is_err());
    }
}
