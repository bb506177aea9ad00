// ============================================================
// Layer 5 - Weight Store
// ============================================================
// The six weight tensors and six bias vectors of the network.
//
// Weights are i.i.d. standard-normal samples multiplied by a
// small scale (0.01 unless configured otherwise); every bias
// starts and stays at zero. Nothing here is ever trained,
// saved, or reloaded: a store is generated once, wrapped in an
// Arc, and read by every inference call. There is no method
// that hands out a mutable reference.
//
// Shape chain (channels must line up from one layer to the next):
//
//   conv1  [16,  3, 3, 3]    64x64x3  → 64x64x16 → pool → 32x32x16
//   conv2  [32, 16, 3, 3]    32x32x16 → 32x32x32 → pool → 16x16x32
//   conv3  [64, 32, 3, 3]    16x16x32 → 16x16x64 → pool →  8x8x64
//   fc1    [128, 4096]       flatten 8·8·64 = 4096 → 128
//   fc2    [64, 128]         128 → 64
//   fc3    [1, 64]           64 → 1
//
// Reference: He et al. (2015) Delving deep into rectifiers
//            rand / rand_distr documentation

use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::StandardNormal;

use crate::ml::tensor::{Tensor2, Tensor4};

/// Default multiplier applied to every standard-normal sample
pub const DEFAULT_WEIGHT_SCALE: f32 = 0.01;

/// Filter shapes `[filters, in_channels, kh, kw]` for conv1..conv3
pub const CONV_SHAPES: [[usize; 4]; 3] = [
    [16,  3, 3, 3],
    [32, 16, 3, 3],
    [64, 32, 3, 3],
];

/// Matrix shapes `[out_features, in_features]` for fc1..fc3
pub const DENSE_SHAPES: [[usize; 2]; 3] = [
    [128, 64 * 8 * 8],
    [64,  128],
    [1,   64],
];

#[derive(Debug, Clone)]
pub struct ConvLayer {
    filters: Tensor4,
    bias:    Vec<f32>,
}

impl ConvLayer {
    pub fn filters(&self) -> &Tensor4 { &self.filters }
    pub fn bias(&self) -> &[f32] { &self.bias }
}

#[derive(Debug, Clone)]
pub struct DenseLayer {
    weight: Tensor2,
    bias:   Vec<f32>,
}

impl DenseLayer {
    pub fn weight(&self) -> &Tensor2 { &self.weight }
    pub fn bias(&self) -> &[f32] { &self.bias }
}

/// Immutable network parameters.
#[derive(Debug, Clone)]
pub struct WeightStore {
    conv:  [ConvLayer; 3],
    dense: [DenseLayer; 3],
}

impl WeightStore {
    /// Draw every weight from `rng`. The draw order is fixed
    /// (conv1, conv2, conv3, fc1, fc2, fc3), so the same seeded
    /// generator always yields the same store.
    pub fn generate<R: Rng>(rng: &mut R, scale: f32) -> Self {
        let conv = CONV_SHAPES.map(|shape| ConvLayer {
            filters: Tensor4::from_fn(shape, || sample(&mut *rng, scale)),
            bias:    vec![0.0; shape[0]],
        });
        let dense = DENSE_SHAPES.map(|shape| DenseLayer {
            weight: Tensor2::from_fn(shape, || sample(&mut *rng, scale)),
            bias:   vec![0.0; shape[0]],
        });

        let store = Self { conv, dense };
        tracing::debug!(
            "Generated weight store: {} parameters, scale {}",
            store.parameter_count(),
            scale,
        );
        store
    }

    /// Reproducible store from a fixed seed
    pub fn from_seed(seed: u64, scale: f32) -> Self {
        Self::generate(&mut StdRng::seed_from_u64(seed), scale)
    }

    /// Store seeded from OS entropy; differs on every call
    pub fn from_entropy(scale: f32) -> Self {
        Self::generate(&mut StdRng::from_entropy(), scale)
    }

    pub fn conv(&self, index: usize) -> &ConvLayer {
        &self.conv[index]
    }

    pub fn dense(&self, index: usize) -> &DenseLayer {
        &self.dense[index]
    }

    pub fn conv_layers(&self) -> &[ConvLayer; 3] {
        &self.conv
    }

    pub fn dense_layers(&self) -> &[DenseLayer; 3] {
        &self.dense
    }

    /// Total number of weights and biases
    pub fn parameter_count(&self) -> usize {
        let conv: usize = self.conv.iter()
            .map(|l| l.filters.len() + l.bias.len())
            .sum();
        let dense: usize = self.dense.iter()
            .map(|l| l.weight.data().len() + l.bias.len())
            .sum();
        conv + dense
    }
}

fn sample<R: Rng>(rng: &mut R, scale: f32) -> f32 {
    rng.sample::<f32, _>(StandardNormal) * scale
}
