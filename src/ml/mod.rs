// ============================================================
// Layer 5 - ML / Tensor Layer
// ============================================================
// All numeric array code lives here and nowhere else.
//
//   tensor.rs   - owned row-major Tensor4 / Tensor2 types
//
//   ops.rs      - pad, conv2d, relu, max_pool, flatten, dense,
//                 each validating shapes before computing
//
//   weights.rs  - the immutable WeightStore: six weight
//                 tensors drawn once from N(0,1)·scale, six
//                 zero bias vectors
//
//   model.rs    - PriceCnn: three conv/relu/pool stages,
//                 flatten, three dense layers → one scalar
//                 per image
//
// No training, no gradients, no weight files.
//
// Reference: LeCun et al. (1998) Gradient-based learning
//            Rust Book §8 (Vectors), §16 (Fearless Concurrency)

/// Dense tensor containers
pub mod tensor;

/// Shape-checked tensor kernels
pub mod ops;

/// Randomly initialised, read-only network parameters
pub mod weights;

/// The forward pipeline
pub mod model;
