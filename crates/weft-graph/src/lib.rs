//! Graph assembly and validation front-end for tensor computation graphs.
//!
//! This crate provides the construction half of a compile-then-execute
//! tensor API. Client code chains builder calls to grow a DAG of operators:
//! - `GraphBuilder` is the factory for every operator kind and applies a
//!   uniform validate-or-poison protocol per call
//! - `Operand` / `OperandArray` are immutable handles to operator outputs,
//!   with an explicit error-sentinel variant for failed constructions
//! - `topological_sort` linearizes the reachable operator set for backends
//! - `Backend` / `BackendGraph` are the seams a concrete backend implements
//!   to receive the sorted graph and compile it
//!
//! Construction calls never return `Result`; a failed call yields an error
//! sentinel that poisons everything downstream, and the first failure
//! surfaces (as a logged error and an absent result) when
//! [`GraphBuilder::build`] is invoked.

pub mod backend;
pub mod builder;
pub mod context;
pub mod operand;
pub mod operator;
pub mod ops;
pub mod sort;
pub mod types;

// Re-export commonly used types
pub use backend::{Backend, BackendGraph};
pub use builder::GraphBuilder;
pub use context::Context;
pub use operand::{NamedOperands, Operand, OperandArray, OperandData};
pub use operator::{OpKind, OperatorNode, OutputDesc, Validate};
pub use sort::topological_sort;
pub use types::{
    Activation, BatchNormOptions, ClampOptions, Conv2dOptions, DataType, GemmOptions,
    InstanceNormOptions, InterpolationMode, LeakyReluOptions, OperandDescriptor, PadOptions,
    PaddingMode, Pool2dOptions, ReduceOptions, ResampleOptions, SplitOptions, SqueezeOptions,
    TransposeOptions,
};

/// Result type using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for graph assembly.
///
/// Construction entry points never surface these to the caller directly;
/// they pass through [`Context::consumed_error`] and collapse into error
/// sentinels. The variants exist so logs and backends can tell the three
/// failure categories apart.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A single operator's structural or shape/type constraints are violated.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The backend rejected an add-operator, add-output, finish, or compile step.
    #[error("Backend error: {0}")]
    Backend(String),

    /// The finalize entry point was misused (e.g., no named outputs).
    #[error("Build error: {0}")]
    Build(String),
}
