//! Clamp operator.

use crate::operand::Operand;
use crate::operator::{passthrough, take_all, OpKind, OperatorNode, OutputDesc, Validate};
use crate::types::ClampOptions;
use crate::{Error, Result};
use std::any::Any;

/// Clamps every element into `[min_value, max_value]`.
///
/// Also the node the builder synthesizes when a conv2d or batch-norm carries
/// a clamp activation, so the bounds stay discoverable as an explicit graph
/// node regardless of backend fusion support.
#[derive(Debug)]
pub struct Clamp {
    inputs: [Operand; 1],
    options: ClampOptions,
}

impl Clamp {
    pub fn new(input: Operand, options: ClampOptions) -> Self {
        Self {
            inputs: [input],
            options,
        }
    }

    pub fn options(&self) -> &ClampOptions {
        &self.options
    }
}

impl Validate for Clamp {
    fn validate(&self) -> Result<Vec<OutputDesc>> {
        // NaN bounds also fail here: the comparison below is false for them.
        if !(self.options.min_value <= self.options.max_value) {
            return Err(Error::Validation(format!(
                "Clamp bounds are not ordered: min {} > max {}",
                self.options.min_value, self.options.max_value
            )));
        }
        passthrough(&self.inputs)
    }
}

impl OperatorNode for Clamp {
    fn kind(&self) -> OpKind {
        OpKind::Clamp
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
    fn test_clamp_passes_through_attributes() {
        let clamp = Clamp::new(
            operand(DataType::F32, 3),
            ClampOptions {
                min_value: 0.0,
                max_value: 6.0,
            },
        );
        let descs = clamp.validate().unwrap();
        assert_eq!(descs[0].rank, 3);
    }

    #[test]
    fn test_unordered_bounds_fail() {
        let clamp = Clamp::new(
            operand(DataType::F32, 1),
            ClampOptions {
                min_value: 1.0,
                max_value: 0.0,
            },
        );
        assert!(clamp.validate().is_err());
    }

    #[test]
    fn test_nan_bounds_fail() {
        let clamp = Clamp::new(
            operand(DataType::F32, 1),
            ClampOptions {
                min_value: f32::NAN,
                max_value: 1.0,
            },
        );
        assert!(clamp.validate().is_err());
    }

    #[test]
    fn test_default_bounds_are_valid() {
        let clamp = Clamp::new(operand(DataType::F32, 1), ClampOptions::default());
        assert!(clamp.validate().is_ok());
    }
}
