//! The operator factory and graph-finalization entry point.

use crate::backend::{Backend, BackendGraph};
use crate::context::Context;
use crate::operand::{NamedOperands, Operand, OperandArray, SessionId};
use crate::operator::{OperatorNode, OutputDesc, Validate};
use crate::ops::{
    BatchNorm, Binary, BinaryOpType, Clamp, Concat, Constant, Conv2d, Gemm, Input, InstanceNorm,
    LeakyRelu, Pad, Pool2d, Pool2dType, ReduceMean, Resample, Reshape, Split, Squeeze, Transpose,
    Unary, UnaryOpType,
};
use crate::sort::topological_sort;
use crate::types::{
    Activation, BatchNormOptions, ClampOptions, Conv2dOptions, GemmOptions, InstanceNormOptions,
    LeakyReluOptions, OperandDescriptor, PadOptions, Pool2dOptions, ReduceOptions, ResampleOptions,
    SplitOptions, SqueezeOptions, TransposeOptions,
};
use crate::Error;
use std::rc::Rc;

/// Factory for every operator kind, and owner of one graph-building session.
///
/// Each construction entry point runs the same protocol: allocate the
/// operator with its inputs and options, base-validate (no error inputs, all
/// inputs from this session), kind-validate, and either wrap the finalized
/// outputs as operands or collapse the failure into an error sentinel of the
/// matching shape. Errors are logged through the [`Context`] at the point of
/// failure and surface to the caller only at [`GraphBuilder::build`].
pub struct GraphBuilder<B: Backend> {
    context: Rc<Context<B>>,
    session: SessionId,
}

impl<B: Backend> GraphBuilder<B> {
    /// Create a builder for a new graph-building session.
    pub fn new(context: Rc<Context<B>>) -> Self {
        Self {
            context,
            session: SessionId::next(),
        }
    }

    /// The context this session logs and creates backend graphs through.
    pub fn context(&self) -> &Rc<Context<B>> {
        &self.context
    }

    // ── Uniform validate-or-poison helpers ──

    /// Base-validate and kind-validate `op`, returning the shared node and
    /// its finalized output descriptors, or `None` if the operator is
    /// poisoned or invalid.
    fn validate_node<O>(&self, op: O) -> Option<(Rc<dyn OperatorNode>, Vec<OutputDesc>)>
    where
        O: OperatorNode + Validate + 'static,
    {
        for input in op.inputs() {
            match input.session() {
                // Poisoned input: propagate silently, the cause was already
                // logged where it happened.
                None => return None,
                Some(session) if session != self.session => {
                    self.context.consumed_error::<()>(Err(Error::Validation(
                        "input operand belongs to a different builder session".to_string(),
                    )));
                    return None;
                }
                Some(_) => {}
            }
        }

        let descs = self.context.consumed_error(op.validate())?;
        if descs.is_empty() {
            self.context.consumed_error::<()>(Err(Error::Validation(format!(
                "{} validation produced no output descriptors",
                op.kind()
            ))));
            return None;
        }
        Some((Rc::new(op), descs))
    }

    fn finish_operand<O>(&self, op: O) -> Operand
    where
        O: OperatorNode + Validate + 'static,
    {
        match self.validate_node(op) {
            Some((node, descs)) => Operand::new(node, 0, descs[0], self.session),
            None => Operand::Error,
        }
    }

    fn finish_array<O>(&self, op: O) -> OperandArray
    where
        O: OperatorNode + Validate + 'static,
    {
        match self.validate_node(op) {
            Some((node, descs)) => OperandArray::Value(
                descs
                    .into_iter()
                    .enumerate()
                    .map(|(index, desc)| Operand::new(node.clone(), index, desc, self.session))
                    .collect(),
            ),
            None => OperandArray::Error,
        }
    }

    /// Append an explicit clamp node behind `base`, for operators whose
    /// clamp activation is rewritten instead of fused.
    fn fused_clamp(&self, base: Operand, min: f32, max: f32) -> Operand {
        if base.is_error() {
            return base;
        }
        self.finish_operand(Clamp::new(
            base,
            ClampOptions {
                min_value: min,
                max_value: max,
            },
        ))
    }

    // ── Graph inputs and constants ──

    /// Declare a named graph input.
    pub fn input(&self, name: &str, desc: &OperandDescriptor) -> Operand {
        self.finish_operand(Input::new(name, desc.clone()))
    }

    /// Embed a constant tensor.
    pub fn constant(&self, desc: &OperandDescriptor, data: &[u8]) -> Operand {
        self.finish_operand(Constant::new(desc.clone(), data.to_vec()))
    }

    // ── Elementwise binary operators ──

    pub fn add(&self, a: &Operand, b: &Operand) -> Operand {
        self.binary(BinaryOpType::Add, a, b)
    }

    pub fn sub(&self, a: &Operand, b: &Operand) -> Operand {
        self.binary(BinaryOpType::Sub, a, b)
    }

    pub fn mul(&self, a: &Operand, b: &Operand) -> Operand {
        self.binary(BinaryOpType::Mul, a, b)
    }

    pub fn div(&self, a: &Operand, b: &Operand) -> Operand {
        self.binary(BinaryOpType::Div, a, b)
    }

    pub fn max(&self, a: &Operand, b: &Operand) -> Operand {
        self.binary(BinaryOpType::Max, a, b)
    }

    pub fn min(&self, a: &Operand, b: &Operand) -> Operand {
        self.binary(BinaryOpType::Min, a, b)
    }

    pub fn pow(&self, a: &Operand, b: &Operand) -> Operand {
        self.binary(BinaryOpType::Pow, a, b)
    }

    pub fn matmul(&self, a: &Operand, b: &Operand) -> Operand {
        self.binary(BinaryOpType::MatMul, a, b)
    }

    fn binary(&self, op_type: BinaryOpType, a: &Operand, b: &Operand) -> Operand {
        self.finish_operand(Binary::new(op_type, a.clone(), b.clone()))
    }

    // ── Convolution, pooling, reduction ──

    /// 2D convolution.
    ///
    /// A clamp activation in the options is not fused: not every backend can
    /// fuse a clamp region, so the builder constructs the convolution without
    /// it and appends an explicit clamp node consuming the convolution's
    /// output, keeping the min/max bounds discoverable in the graph. Other
    /// activations are stored on the convolution for backend fusion.
    pub fn conv2d(&self, input: &Operand, filter: &Operand, options: &Conv2dOptions) -> Operand {
        if let Some(Activation::Clamp { min, max }) = options.activation {
            let stripped = Conv2dOptions {
                activation: None,
                ..options.clone()
            };
            let conv = self.finish_operand(Conv2d::new(input.clone(), filter.clone(), stripped));
            return self.fused_clamp(conv, min, max);
        }
        self.finish_operand(Conv2d::new(input.clone(), filter.clone(), options.clone()))
    }

    pub fn average_pool2d(&self, input: &Operand, options: &Pool2dOptions) -> Operand {
        self.finish_operand(Pool2d::new(
            Pool2dType::Average,
            input.clone(),
            options.clone(),
        ))
    }

    pub fn max_pool2d(&self, input: &Operand, options: &Pool2dOptions) -> Operand {
        self.finish_operand(Pool2d::new(Pool2dType::Max, input.clone(), options.clone()))
    }

    pub fn reduce_mean(&self, input: &Operand, options: &ReduceOptions) -> Operand {
        self.finish_operand(ReduceMean::new(input.clone(), options.clone()))
    }

    // ── Activations ──

    pub fn relu(&self, input: &Operand) -> Operand {
        self.finish_operand(Unary::new(UnaryOpType::Relu, input.clone()))
    }

    pub fn sigmoid(&self, input: &Operand) -> Operand {
        self.finish_operand(Unary::new(UnaryOpType::Sigmoid, input.clone()))
    }

    pub fn tanh(&self, input: &Operand) -> Operand {
        self.finish_operand(Unary::new(UnaryOpType::Tanh, input.clone()))
    }

    pub fn hard_swish(&self, input: &Operand) -> Operand {
        self.finish_operand(Unary::new(UnaryOpType::HardSwish, input.clone()))
    }

    pub fn softmax(&self, input: &Operand) -> Operand {
        self.finish_operand(Unary::new(UnaryOpType::Softmax, input.clone()))
    }

    pub fn leaky_relu(&self, input: &Operand, options: &LeakyReluOptions) -> Operand {
        self.finish_operand(LeakyRelu::new(input.clone(), options.clone()))
    }

    pub fn clamp(&self, input: &Operand, options: &ClampOptions) -> Operand {
        self.finish_operand(Clamp::new(input.clone(), options.clone()))
    }

    // ── Normalization ──

    /// Batch normalization. Applies the same clamp-activation rewrite as
    /// [`GraphBuilder::conv2d`].
    pub fn batch_norm(
        &self,
        input: &Operand,
        mean: &Operand,
        variance: &Operand,
        options: &BatchNormOptions,
    ) -> Operand {
        if let Some(Activation::Clamp { min, max }) = options.activation {
            let stripped = BatchNormOptions {
                activation: None,
                ..options.clone()
            };
            let norm = self.finish_operand(BatchNorm::new(
                input.clone(),
                mean.clone(),
                variance.clone(),
                stripped,
            ));
            return self.fused_clamp(norm, min, max);
        }
        self.finish_operand(BatchNorm::new(
            input.clone(),
            mean.clone(),
            variance.clone(),
            options.clone(),
        ))
    }

    pub fn instance_norm(&self, input: &Operand, options: &InstanceNormOptions) -> Operand {
        self.finish_operand(InstanceNorm::new(input.clone(), options.clone()))
    }

    // ── Shape operators ──

    pub fn resample(&self, input: &Operand, options: &ResampleOptions) -> Operand {
        self.finish_operand(Resample::new(input.clone(), options.clone()))
    }

    pub fn reshape(&self, input: &Operand, new_shape: &[i32]) -> Operand {
        self.finish_operand(Reshape::new(input.clone(), new_shape.to_vec()))
    }

    pub fn transpose(&self, input: &Operand, options: &TransposeOptions) -> Operand {
        self.finish_operand(Transpose::new(input.clone(), options.clone()))
    }

    pub fn squeeze(&self, input: &Operand, options: &SqueezeOptions) -> Operand {
        self.finish_operand(Squeeze::new(input.clone(), options.clone()))
    }

    pub fn split(&self, input: &Operand, splits: &[u32], options: &SplitOptions) -> OperandArray {
        self.finish_array(Split::new(input.clone(), splits.to_vec(), options.clone()))
    }

    pub fn concat(&self, inputs: &[Operand], axis: u32) -> Operand {
        self.finish_operand(Concat::new(inputs.to_vec(), axis))
    }

    pub fn pad(&self, input: &Operand, padding: &Operand, options: &PadOptions) -> Operand {
        self.finish_operand(Pad::new(input.clone(), padding.clone(), options.clone()))
    }

    pub fn gemm(&self, a: &Operand, b: &Operand, options: &GemmOptions) -> Operand {
        self.finish_operand(Gemm::new(a.clone(), b.clone(), options.clone()))
    }

    // ── Finalize ──

    /// Finalize the graph defined by `outputs` into a compiled backend
    /// artifact.
    ///
    /// Runs the linear build sequence: precondition checks, root collection,
    /// topological sort, backend materialization in dependency order, output
    /// registration in insertion order, finish, compile. Any failure aborts
    /// immediately with a stage-identified log message and returns `None`;
    /// the partially built backend graph is dropped, never returned.
    #[tracing::instrument(skip_all, fields(num_outputs = outputs.len()))]
    pub fn build(&self, outputs: &NamedOperands) -> Option<B::Compiled> {
        if outputs.is_empty() {
            tracing::error!("the named output set is empty");
            return None;
        }

        let mut roots = Vec::with_capacity(outputs.len());
        for (name, operand) in outputs.iter() {
            match operand.session() {
                None => {
                    tracing::error!(output = name, "named output is an error operand");
                    return None;
                }
                Some(session) if session != self.session => {
                    tracing::error!(
                        output = name,
                        "named output was created by a different builder session"
                    );
                    return None;
                }
                Some(_) => roots.push(operand.clone()),
            }
        }

        let sorted = topological_sort(&roots);

        let Some(mut graph) = self.context.consumed_error(self.context.create_graph()) else {
            tracing::error!("failed to create the backend graph");
            return None;
        };

        for op in &sorted {
            if self
                .context
                .consumed_error(graph.add_operator(op.as_ref()))
                .is_none()
            {
                tracing::error!(kind = %op.kind(), "failed to add an operator while building the graph");
                return None;
            }
        }

        for (name, operand) in outputs.iter() {
            if self
                .context
                .consumed_error(graph.add_output(name, operand))
                .is_none()
            {
                tracing::error!(output = name, "failed to register a named output");
                return None;
            }
        }

        if self.context.consumed_error(graph.finish()).is_none() {
            tracing::error!("failed to finish building the graph");
            return None;
        }

        let Some(compiled) = self.context.consumed_error(graph.compile()) else {
            tracing::error!("failed to compile the graph");
            return None;
        };
        Some(compiled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::test_support::RecordingBackend;
    use crate::operator::OpKind;
    use crate::types::DataType;

    fn builder() -> GraphBuilder<RecordingBackend> {
        GraphBuilder::new(Context::new(RecordingBackend::default()))
    }

    fn matrix_desc() -> OperandDescriptor {
        OperandDescriptor::new(DataType::F32, vec![2, 2])
    }

    fn image_desc() -> OperandDescriptor {
        OperandDescriptor::new(DataType::F32, vec![1, 2, 4, 4])
    }

    #[test]
    fn test_default_propagation_through_builder() {
        let builder = builder();
        let input = builder.input("x", &OperandDescriptor::new(DataType::F16, vec![1, 2, 3]));
        let relu = builder.relu(&input);

        assert_eq!(relu.dtype(), Some(DataType::F16));
        assert_eq!(relu.rank(), Some(3));
    }

    #[test]
    fn test_poisoning_propagates_through_chains() {
        let builder = builder();
        // Softmax over rank 3 fails validation and starts the poison chain.
        let input = builder.input("x", &OperandDescriptor::new(DataType::F32, vec![1, 2, 3]));
        let bad = builder.softmax(&input);
        assert!(bad.is_error());

        let relu = builder.relu(&bad);
        let sum = builder.add(&relu, &input);
        let split = builder.split(&sum, &[2], &SplitOptions::default());

        assert!(relu.is_error());
        assert!(sum.is_error());
        assert!(split.is_error());
    }

    #[test]
    fn test_build_with_poisoned_output_never_touches_backend() {
        let builder = builder();
        let input = builder.input("x", &OperandDescriptor::new(DataType::F32, vec![1, 2, 3]));
        let bad = builder.softmax(&input);
        let worse = builder.relu(&bad);

        let mut outputs = NamedOperands::new();
        outputs.set("y", &worse);

        assert!(builder.build(&outputs).is_none());
        assert_eq!(builder.context().backend().graphs_created.get(), 0);
    }

    #[test]
    fn test_empty_output_set_is_rejected_before_backend() {
        let builder = builder();
        assert!(builder.build(&NamedOperands::new()).is_none());
        assert_eq!(builder.context().backend().graphs_created.get(), 0);
    }

    #[test]
    fn test_cross_session_operands_are_rejected() {
        let first = builder();
        let second = builder();

        let foreign = first.input("x", &matrix_desc());
        let local = second.input("y", &matrix_desc());
        let sum = second.add(&local, &foreign);
        assert!(sum.is_error());
    }

    #[test]
    fn test_build_records_sorted_operators_and_outputs() {
        let builder = builder();
        let a = builder.input("a", &matrix_desc());
        let b = builder.input("b", &matrix_desc());
        let c = builder.matmul(&a, &b);
        let d = builder.relu(&c);

        let mut outputs = NamedOperands::new();
        outputs.set("result", &d);

        let compiled = builder.build(&outputs).unwrap();
        assert_eq!(
            compiled.kinds,
            vec![OpKind::Input, OpKind::Input, OpKind::MatMul, OpKind::Relu]
        );
        assert_eq!(compiled.outputs, vec!["result".to_string()]);
        assert_eq!(builder.context().backend().graphs_created.get(), 1);
    }

    #[test]
    fn test_build_twice_is_deterministic() {
        let builder = builder();
        let a = builder.input("a", &matrix_desc());
        let b = builder.input("b", &matrix_desc());
        let sum = builder.add(&a, &b);
        let out = builder.mul(&sum, &a);

        let mut outputs = NamedOperands::new();
        outputs.set("out", &out);

        let first = builder.build(&outputs).unwrap();
        let second = builder.build(&outputs).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_conv2d_clamp_activation_is_rewritten() {
        let builder = builder();
        let input = builder.input("x", &image_desc());
        let filter = builder.constant(
            &OperandDescriptor::new(DataType::F32, vec![2, 2, 2, 2]),
            &[0u8; 64],
        );
        let options = Conv2dOptions {
            activation: Some(Activation::Clamp { min: 0.0, max: 6.0 }),
            ..Conv2dOptions::default()
        };
        let result = builder.conv2d(&input, &filter, &options);

        let producer = result.producer().unwrap();
        assert_eq!(producer.kind(), OpKind::Clamp);

        let clamp = producer.as_any().downcast_ref::<Clamp>().unwrap();
        assert_eq!(clamp.options().min_value, 0.0);
        assert_eq!(clamp.options().max_value, 6.0);

        // The clamp consumes the convolution's output, and the convolution
        // no longer carries the activation.
        let conv = clamp.inputs()[0].producer().unwrap();
        assert_eq!(conv.kind(), OpKind::Conv2d);
        let conv = conv.as_any().downcast_ref::<Conv2d>().unwrap();
        assert_eq!(conv.options().activation, None);
    }

    #[test]
    fn test_conv2d_non_clamp_activation_is_fused() {
        let builder = builder();
        let input = builder.input("x", &image_desc());
        let filter = builder.constant(
            &OperandDescriptor::new(DataType::F32, vec![2, 2, 2, 2]),
            &[0u8; 64],
        );
        let options = Conv2dOptions {
            activation: Some(Activation::Relu),
            ..Conv2dOptions::default()
        };
        let result = builder.conv2d(&input, &filter, &options);

        let producer = result.producer().unwrap();
        assert_eq!(producer.kind(), OpKind::Conv2d);
        let conv = producer.as_any().downcast_ref::<Conv2d>().unwrap();
        assert_eq!(conv.options().activation, Some(Activation::Relu));
    }

    #[test]
    fn test_invalid_conv2d_with_clamp_activation_is_one_error() {
        let builder = builder();
        // Rank-2 input makes the base convolution invalid; the rewrite must
        // not construct the synthetic clamp node on top of the failure.
        let input = builder.input("x", &matrix_desc());
        let filter = builder.input("w", &matrix_desc());
        let options = Conv2dOptions {
            activation: Some(Activation::Clamp { min: 0.0, max: 6.0 }),
            ..Conv2dOptions::default()
        };
        assert!(builder.conv2d(&input, &filter, &options).is_error());
    }

    #[test]
    fn test_batch_norm_clamp_activation_is_rewritten() {
        let builder = builder();
        let input = builder.input("x", &image_desc());
        let mean = builder.input("mean", &OperandDescriptor::new(DataType::F32, vec![2]));
        let variance = builder.input("var", &OperandDescriptor::new(DataType::F32, vec![2]));
        let options = BatchNormOptions {
            activation: Some(Activation::Clamp {
                min: -1.0,
                max: 1.0,
            }),
            ..BatchNormOptions::default()
        };
        let result = builder.batch_norm(&input, &mean, &variance, &options);

        let producer = result.producer().unwrap();
        assert_eq!(producer.kind(), OpKind::Clamp);
        let clamp = producer.as_any().downcast_ref::<Clamp>().unwrap();
        assert_eq!(clamp.options().min_value, -1.0);
        assert_eq!(clamp.options().max_value, 1.0);
        assert_eq!(
            clamp.inputs()[0].producer().unwrap().kind(),
            OpKind::BatchNorm
        );
    }

    #[test]
    fn test_split_returns_collection() {
        let builder = builder();
        let input = builder.input("x", &OperandDescriptor::new(DataType::F32, vec![6, 4]));
        let pieces = builder.split(&input, &[3], &SplitOptions::default());

        assert_eq!(pieces.len(), 3);
        for piece in pieces.iter() {
            assert_eq!(piece.rank(), Some(2));
            assert_eq!(piece.dtype(), Some(DataType::F32));
        }

        // All pieces share the one split node.
        let first = pieces.get(0).unwrap().producer().unwrap();
        let last = pieces.get(2).unwrap().producer().unwrap();
        assert!(Rc::ptr_eq(first, last));
        assert_eq!(first.output_count(), 3);
    }

    #[test]
    fn test_same_operand_under_two_names_is_added_once() {
        let builder = builder();
        let input = builder.input("x", &matrix_desc());
        let out = builder.relu(&input);

        let mut outputs = NamedOperands::new();
        outputs.set("a", &out);
        outputs.set("b", &out);

        let compiled = builder.build(&outputs).unwrap();
        assert_eq!(compiled.kinds, vec![OpKind::Input, OpKind::Relu]);
        assert_eq!(compiled.outputs, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_descriptorless_validation_poisons_instead_of_panicking() {
        use std::any::Any;

        // An operator whose validation succeeds but describes no outputs
        // must collapse into an error sentinel, not index out of bounds.
        #[derive(Debug)]
        struct Silent;

        impl crate::operator::OperatorNode for Silent {
            fn kind(&self) -> OpKind {
                OpKind::Relu
            }

            fn inputs(&self) -> &[Operand] {
                &[]
            }

            fn as_any(&self) -> &dyn Any {
                self
            }
        }

        impl crate::operator::Validate for Silent {
            fn validate(&self) -> crate::Result<Vec<crate::operator::OutputDesc>> {
                Ok(Vec::new())
            }
        }

        let builder = builder();
        assert!(builder.finish_operand(Silent).is_error());
        assert!(builder.finish_array(Silent).is_error());
    }

    #[test]
    fn test_unreachable_error_does_not_fail_build() {
        let builder = builder();
        let input = builder.input("x", &matrix_desc());

        // A failed construction on a side branch poisons nothing reachable
        // from the requested outputs.
        let dead_end = builder.softmax(&builder.input(
            "y",
            &OperandDescriptor::new(DataType::F32, vec![1, 2, 3]),
        ));
        assert!(dead_end.is_error());

        let out = builder.relu(&input);
        let mut outputs = NamedOperands::new();
        outputs.set("out", &out);
        assert!(builder.build(&outputs).is_some());
    }
}
