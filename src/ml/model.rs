// ============================================================
// Layer 5 - Price CNN (forward pipeline)
// ============================================================
// A small convolutional network evaluated with the kernels in
// ops.rs and the parameters in weights.rs. Nothing is learned;
// the network is a fixed random projection of the image.
//
//   input            [N, 64, 64, 3]   pixels in [0, 1]
//   conv1 → relu → pool   [N, 32, 32, 16]
//   conv2 → relu → pool   [N, 16, 16, 32]
//   conv3 → relu → pool   [N,  8,  8, 64]
//   flatten               [N, 4096]
//   fc1 → relu            [N, 128]
//   fc2 → relu            [N, 64]
//   fc3                   [N, 1]
//
// All convolutions use stride 1 and padding 1, so only the
// pooling steps shrink the image. The input shape is checked
// before the first convolution; each kernel re-checks its own
// operands on top of that.
//
// Reference: LeCun et al. (1998), Rust Book §15 (Rc/Arc)

use std::sync::Arc;

use crate::domain::error::{EngineError, EngineResult};
use crate::ml::ops::{conv2d, dense, flatten, max_pool, relu, relu2};
use crate::ml::tensor::{Tensor2, Tensor4};
use crate::ml::weights::{ConvLayer, WeightStore};

/// Side length of the square input image
pub const INPUT_SIZE: usize = 64;
/// RGB
pub const INPUT_CHANNELS: usize = 3;

const CONV_STRIDE: usize = 1;
const CONV_PAD:    usize = 1;
const POOL_SIZE:   usize = 2;

#[derive(Debug, Clone)]
pub struct PriceCnn {
    weights: Arc<WeightStore>,
}

impl PriceCnn {
    pub fn new(weights: Arc<WeightStore>) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &WeightStore {
        &self.weights
    }

    /// The only input shape `forward` accepts for a batch of `n`
    pub fn expected_input_shape(n: usize) -> [usize; 4] {
        [n, INPUT_SIZE, INPUT_SIZE, INPUT_CHANNELS]
    }

    /// x: [N, 64, 64, 3] → [N, 1]
    pub fn forward(&self, x: &Tensor4) -> EngineResult<Tensor2> {
        validate_input(x)?;
        tracing::debug!("Input shape: {:?}", x.shape());

        let [conv1, conv2, conv3] = self.weights.conv_layers();
        let x = conv_stage(x,  conv1, 1)?;
        let x = conv_stage(&x, conv2, 2)?;
        let x = conv_stage(&x, conv3, 3)?;

        let x = flatten(x);
        tracing::debug!("After flatten: {:?}", x.shape());

        let [fc1, fc2, fc3] = self.weights.dense_layers();
        let x = relu2(dense(&x, fc1.weight(), fc1.bias())?);
        tracing::debug!("After fc1: {:?}", x.shape());
        let x = relu2(dense(&x, fc2.weight(), fc2.bias())?);
        tracing::debug!("After fc2: {:?}", x.shape());
        let x = dense(&x, fc3.weight(), fc3.bias())?;
        tracing::debug!("Final output: {:?}", x.shape());

        Ok(x)
    }

    /// Forward pass for a single image, returning its scalar.
    pub fn score(&self, image: &Tensor4) -> EngineResult<f32> {
        let [n, ..] = image.shape();
        if n != 1 {
            return Err(EngineError::shape(
                "score",
                format!("expected a single image, got a batch of {n}"),
            ));
        }
        Ok(self.forward(image)?.at(0, 0))
    }
}

/// conv → relu → pool with one layer's parameters
fn conv_stage(x: &Tensor4, layer: &ConvLayer, index: usize) -> EngineResult<Tensor4> {
    let y = conv2d(x, layer.filters(), layer.bias(), CONV_STRIDE, CONV_PAD)?;
    tracing::debug!("After conv{}: {:?}", index, y.shape());
    let y = max_pool(&relu(y), POOL_SIZE)?;
    tracing::debug!("After pool{}: {:?}", index, y.shape());
    Ok(y)
}

fn validate_input(x: &Tensor4) -> EngineResult<()> {
    let [n, h, w, c] = x.shape();
    if n == 0 || h != INPUT_SIZE || w != INPUT_SIZE || c != INPUT_CHANNELS {
        return Err(EngineError::shape(
            "forward",
            format!(
                "expected [N, {INPUT_SIZE}, {INPUT_SIZE}, {INPUT_CHANNELS}] with N >= 1, got {:?}",
                x.shape()
            ),
        ));
    }
    Ok(())
}
