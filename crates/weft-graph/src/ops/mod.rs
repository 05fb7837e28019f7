//! Concrete operator kinds.
//!
//! One module per kind (or per family sharing an op-type discriminant, as
//! with the elementwise binaries and the unary activations). Every operator
//! is structural bookkeeping plus a `Validate` implementation; builders are
//! the only constructors that matter, and backends reach the option structs
//! back through `OperatorNode::as_any`.

pub mod batch_norm;
pub mod binary;
pub mod clamp;
pub mod concat;
pub mod constant;
pub mod conv2d;
pub mod gemm;
pub mod input;
pub mod instance_norm;
pub mod leaky_relu;
pub mod pad;
pub mod pool2d;
pub mod reduce;
pub mod resample;
pub mod reshape;
pub mod split;
pub mod squeeze;
pub mod transpose;
pub mod unary;

pub use batch_norm::BatchNorm;
pub use binary::{Binary, BinaryOpType};
pub use clamp::Clamp;
pub use concat::Concat;
pub use constant::Constant;
pub use conv2d::Conv2d;
pub use gemm::Gemm;
pub use input::Input;
pub use instance_norm::InstanceNorm;
pub use leaky_relu::LeakyRelu;
pub use pad::Pad;
pub use pool2d::{Pool2d, Pool2dType};
pub use reduce::ReduceMean;
pub use resample::Resample;
pub use reshape::Reshape;
pub use split::Split;
pub use squeeze::Squeeze;
pub use transpose::Transpose;
pub use unary::{Unary, UnaryOpType};
