//! Graph input operator.

use crate::operand::Operand;
use crate::operator::{OpKind, OperatorNode, OutputDesc, Validate};
use crate::types::OperandDescriptor;
use crate::Result;
use std::any::Any;

/// A named graph input.
///
/// Zero-input operator; type and rank come from the descriptor.
#[derive(Debug)]
pub struct Input {
    name: String,
    desc: OperandDescriptor,
}

impl Input {
    pub fn new(name: impl Into<String>, desc: OperandDescriptor) -> Self {
        Self {
            name: name.into(),
            desc,
        }
    }

    /// User-chosen input name, for backend binding.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type and dimensions.
    pub fn descriptor(&self) -> &OperandDescriptor {
        &self.desc
    }
}

impl Validate for Input {
    fn validate(&self) -> Result<Vec<OutputDesc>> {
        Ok(vec![OutputDesc {
            dtype: self.desc.dtype,
            rank: self.desc.rank(),
        }])
    }
}

impl OperatorNode for Input {
    fn kind(&self) -> OpKind {
        OpKind::Input
    }

    fn inputs(&self) -> &[Operand] {
        &[]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DataType;

    #[test]
    fn test_input_sets_type_and_rank_from_descriptor() {
        let input = Input::new("x", OperandDescriptor::new(DataType::F16, vec![1, 3, 8, 8]));
        let descs = input.validate().unwrap();
        assert_eq!(
            descs,
            vec![OutputDesc {
                dtype: DataType::F16,
                rank: 4
            }]
        );
    }

    #[test]
    fn test_scalar_input_has_rank_zero() {
        let input = Input::new("s", OperandDescriptor::new(DataType::F32, vec![]));
        assert_eq!(input.validate().unwrap()[0].rank, 0);
    }
}
