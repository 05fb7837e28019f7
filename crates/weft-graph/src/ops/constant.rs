//! Constant tensor operator.

use crate::operand::Operand;
use crate::operator::{OpKind, OperatorNode, OutputDesc, Validate};
use crate::types::OperandDescriptor;
use crate::{Error, Result};
use std::any::Any;

/// A constant tensor baked into the graph.
///
/// Zero-input operator; type and rank come from the descriptor. The raw
/// bytes are held for the backend to upload; buffer placement is the
/// backend's concern.
#[derive(Debug)]
pub struct Constant {
    desc: OperandDescriptor,
    data: Vec<u8>,
}

impl Constant {
    pub fn new(desc: OperandDescriptor, data: Vec<u8>) -> Self {
        Self { desc, data }
    }

    /// Declared type and dimensions.
    pub fn descriptor(&self) -> &OperandDescriptor {
        &self.desc
    }

    /// Raw constant bytes in element order.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl Validate for Constant {
    fn validate(&self) -> Result<Vec<OutputDesc>> {
        let expected = self.desc.element_count() * self.desc.dtype.size();
        if self.data.len() != expected {
            return Err(Error::Validation(format!(
                "constant data is {} bytes but dimensions {:?} of {:?} require {}",
                self.data.len(),
                self.desc.dimensions,
                self.desc.dtype,
                expected
            )));
        }
        Ok(vec![OutputDesc {
            dtype: self.desc.dtype,
            rank: self.desc.rank(),
        }])
    }
}

impl OperatorNode for Constant {
    fn kind(&self) -> OpKind {
        OpKind::Constant
    }

    fn inputs(&self) -> &[Operand] {
        &[]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
