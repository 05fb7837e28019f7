//! Leaky ReLU operator.

use crate::operand::Operand;
use crate::operator::{passthrough, take_all, OpKind, OperatorNode, OutputDesc, Validate};
use crate::types::LeakyReluOptions;
use crate::Result;
use std::any::Any;

/// ReLU with a configurable negative slope. Pass-through attributes.
#[derive(Debug)]
pub struct LeakyRelu {
    inputs: [Operand; 1],
    options: LeakyReluOptions,
}

impl LeakyRelu {
    pub fn new(input: Operand, options: LeakyReluOptions) -> Self {
        Self {
            inputs: [input],
            options,
        }
    }

    pub fn options(&self) -> &LeakyReluOptions {
        &self.options
    }
}

impl Validate for LeakyRelu {
    fn validate(&self) -> Result<Vec<OutputDesc>> {
        passthrough(&self.inputs)
    }
}

impl OperatorNode for LeakyRelu {
    fn kind(&self) -> OpKind {
        OpKind::LeakyRelu
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
