//! Element types, operand descriptors, and per-operator option structs.

use crate::operand::Operand;

/// Element type of a tensor operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    F32,
    F16,
    I32,
    U32,
    I8,
    U8,
}

impl DataType {
    /// Size of one element in bytes.
    pub fn size(&self) -> usize {
        match self {
            DataType::F32 | DataType::I32 | DataType::U32 => 4,
            DataType::F16 => 2,
            DataType::I8 | DataType::U8 => 1,
        }
    }
}

/// Describes the element type and dimensions of a graph input or constant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperandDescriptor {
    /// Element type.
    pub dtype: DataType,

    /// Dimensions; empty for a scalar.
    pub dimensions: Vec<u32>,
}

impl OperandDescriptor {
    /// Create a descriptor from an element type and dimensions.
    pub fn new(dtype: DataType, dimensions: Vec<u32>) -> Self {
        Self { dtype, dimensions }
    }

    /// Number of dimensions.
    pub fn rank(&self) -> usize {
        self.dimensions.len()
    }

    /// Total number of elements.
    pub fn element_count(&self) -> usize {
        self.dimensions.iter().map(|&d| d as usize).product()
    }
}

/// An activation attached to another operator's options so the backend may
/// execute both as one step.
///
/// Modeled as a tagged variant rather than an operator handle: every case
/// except `Clamp` is forwarded opaquely to the base operator, while `Clamp`
/// triggers the builder's synthetic-node rewrite (see
/// [`crate::builder::GraphBuilder::conv2d`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Activation {
    Relu,
    Sigmoid,
    Tanh,
    HardSwish,
    LeakyRelu { alpha: f32 },
    Clamp { min: f32, max: f32 },
}

/// Options for 2D convolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Conv2dOptions {
    /// Padding as [beginning height, ending height, beginning width, ending width].
    pub padding: [u32; 4],

    /// Stride along [height, width].
    pub strides: [u32; 2],

    /// Dilation along [height, width].
    pub dilations: [u32; 2],

    /// Number of filter groups.
    pub groups: u32,

    /// Optional fused activation.
    pub activation: Option<Activation>,
}

impl Default for Conv2dOptions {
    fn default() -> Self {
        Self {
            padding: [0; 4],
            strides: [1, 1],
            dilations: [1, 1],
            groups: 1,
            activation: None,
        }
    }
}

/// Options for 2D pooling.
#[derive(Debug, Clone, PartialEq)]
pub struct Pool2dOptions {
    /// Window size along [height, width]; the full spatial extent if absent.
    pub window_dimensions: Option<[u32; 2]>,

    /// Padding as [beginning height, ending height, beginning width, ending width].
    pub padding: [u32; 4],

    /// Stride along [height, width].
    pub strides: [u32; 2],

    /// Dilation along [height, width].
    pub dilations: [u32; 2],
}

impl Default for Pool2dOptions {
    fn default() -> Self {
        Self {
            window_dimensions: None,
            padding: [0; 4],
            strides: [1, 1],
            dilations: [1, 1],
        }
    }
}

/// Options for reduction operators.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReduceOptions {
    /// Axes to reduce over; all axes if absent.
    pub axes: Option<Vec<u32>>,

    /// Keep the reduced dimensions as size-1 dimensions.
    pub keep_dimensions: bool,
}

/// Options for leaky ReLU.
#[derive(Debug, Clone, PartialEq)]
pub struct LeakyReluOptions {
    /// Slope for negative inputs.
    pub alpha: f32,
}

impl Default for LeakyReluOptions {
    fn default() -> Self {
        Self { alpha: 0.01 }
    }
}

/// Options for clamp.
#[derive(Debug, Clone, PartialEq)]
pub struct ClampOptions {
    /// Lower bound.
    pub min_value: f32,

    /// Upper bound.
    pub max_value: f32,
}

impl Default for ClampOptions {
    fn default() -> Self {
        Self {
            min_value: f32::NEG_INFINITY,
            max_value: f32::INFINITY,
        }
    }
}

/// Options for batch normalization.
///
/// `scale` and `bias` are operands; when present they become inputs of the
/// batch-norm operator so dependency ordering sees them.
#[derive(Debug, Clone)]
pub struct BatchNormOptions {
    /// Per-channel scale operand (rank 1).
    pub scale: Option<Operand>,

    /// Per-channel bias operand (rank 1).
    pub bias: Option<Operand>,

    /// Axis holding the channel dimension.
    pub axis: u32,

    /// Small value added to the variance for numeric stability.
    pub epsilon: f32,

    /// Optional fused activation.
    pub activation: Option<Activation>,
}

impl Default for BatchNormOptions {
    fn default() -> Self {
        Self {
            scale: None,
            bias: None,
            axis: 1,
            epsilon: 1e-5,
            activation: None,
        }
    }
}

/// Options for instance normalization.
#[derive(Debug, Clone)]
pub struct InstanceNormOptions {
    /// Per-channel scale operand (rank 1).
    pub scale: Option<Operand>,

    /// Per-channel bias operand (rank 1).
    pub bias: Option<Operand>,

    /// Small value added to the variance for numeric stability.
    pub epsilon: f32,
}

impl Default for InstanceNormOptions {
    fn default() -> Self {
        Self {
            scale: None,
            bias: None,
            epsilon: 1e-5,
        }
    }
}

/// Interpolation mode for resampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterpolationMode {
    #[default]
    NearestNeighbor,
    Linear,
}

/// Options for resampling.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResampleOptions {
    /// Interpolation mode.
    pub mode: InterpolationMode,

    /// Scale factor per dimension.
    pub scales: Option<[f32; 4]>,

    /// Target size per dimension; takes precedence over `scales`.
    pub sizes: Option<[u32; 4]>,
}

/// Options for transpose.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransposeOptions {
    /// Dimension permutation; reverses all dimensions if absent.
    pub permutation: Option<Vec<u32>>,
}

/// Options for squeeze.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SqueezeOptions {
    /// Axes to remove; all size-1 axes if absent.
    pub axes: Option<Vec<u32>>,
}

/// Options for split.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitOptions {
    /// Axis to split along.
    pub axis: u32,
}

/// Padding mode for the pad operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaddingMode {
    #[default]
    Constant,
    Edge,
    Reflection,
    Symmetric,
}

/// Options for pad.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PadOptions {
    /// Padding mode.
    pub mode: PaddingMode,

    /// Fill value for `PaddingMode::Constant`.
    pub value: f32,
}

/// Options for general matrix multiplication (`alpha * A * B + beta * C`).
#[derive(Debug, Clone)]
pub struct GemmOptions {
    /// Optional addend operand (rank at most 2).
    pub c: Option<Operand>,

    /// Multiplier for `A * B`.
    pub alpha: f32,

    /// Multiplier for `C`.
    pub beta: f32,

    /// Transpose `A` before multiplying.
    pub a_transpose: bool,

    /// Transpose `B` before multiplying.
    pub b_transpose: bool,
}

impl Default for GemmOptions {
    fn default() -> Self {
        Self {
            c: None,
            alpha: 1.0,
            beta: 1.0,
            a_transpose: false,
            b_transpose: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_type_sizes() {
        assert_eq!(DataType::F32.size(), 4);
        assert_eq!(DataType::F16.size(), 2);
        assert_eq!(DataType::U8.size(), 1);
    }

    #[test]
    fn test_descriptor_element_count() {
        let desc = OperandDescriptor::new(DataType::F32, vec![2, 3, 4]);
        assert_eq!(desc.rank(), 3);
        assert_eq!(desc.element_count(), 24);

        let scalar = OperandDescriptor::new(DataType::F32, vec![]);
        assert_eq!(scalar.rank(), 0);
        assert_eq!(scalar.element_count(), 1);
    }

    #[test]
    fn test_clamp_options_default_is_unbounded() {
        let options = ClampOptions::default();
        assert!(options.min_value.is_infinite() && options.min_value < 0.0);
        assert!(options.max_value.is_infinite() && options.max_value > 0.0);
    }
}
