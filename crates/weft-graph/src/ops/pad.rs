//! Pad operator.

use crate::operand::Operand;
use crate::operator::{input_desc, take_all, OpKind, OperatorNode, OutputDesc, Validate};
use crate::types::PadOptions;
use crate::{Error, Result};
use std::any::Any;

/// Pads an operand; the per-dimension begin/end amounts arrive as a second
/// operand of shape `[rank, 2]` (only its rank is checkable here).
#[derive(Debug)]
pub struct Pad {
    inputs: [Operand; 2],
    options: PadOptions,
}

impl Pad {
    pub fn new(input: Operand, padding: Operand, options: PadOptions) -> Self {
        Self {
            inputs: [input, padding],
            options,
        }
    }

    pub fn options(&self) -> &PadOptions {
        &self.options
    }
}

impl Validate for Pad {
    fn validate(&self) -> Result<Vec<OutputDesc>> {
        let input = input_desc(&self.inputs, 0)?;
        let padding = input_desc(&self.inputs, 1)?;

        if padding.rank != 2 {
            return Err(Error::Validation(format!(
                "Pad padding operand must have rank 2, got {}",
                padding.rank
            )));
        }

        Ok(vec![OutputDesc {
            dtype: input.dtype,
            rank: input.rank,
        }])
    }
}

impl OperatorNode for Pad {
    fn kind(&self) -> OpKind {
        OpKind::Pad
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
    fn test_pad_keeps_input_rank() {
        let pad = Pad::new(
            operand(DataType::F32, 3),
            operand(DataType::I32, 2),
            PadOptions::default(),
        );
        assert_eq!(pad.validate().unwrap()[0].rank, 3);
    }

    #[test]
    fn test_pad_rejects_flat_padding_operand() {
        let pad = Pad::new(
            operand(DataType::F32, 3),
            operand(DataType::I32, 1),
            PadOptions::default(),
        );
        assert!(pad.validate().is_err());
    }
}
