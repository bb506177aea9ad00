// ============================================================
// Layer 5 - Dense Tensors
// ============================================================
// Two owned, row-major tensor types:
//
//   Tensor4  [batch, height, width, channels]   activations (NHWC)
//            [filters, in_channels, kh, kw]     convolution filters
//   Tensor2  [batch, features]                  after flatten / dense
//            [out_features, in_features]        dense weight matrices
//
// The element count always equals the product of the shape;
// both constructors check it so nothing downstream has to.
//
// Reference: Rust Book §8 (Vectors)

use crate::domain::error::{EngineError, EngineResult};

#[derive(Debug, Clone, PartialEq)]
pub struct Tensor4 {
    data:  Vec<f32>,
    shape: [usize; 4],
}

impl Tensor4 {
    /// Wrap `data` with the given shape. Fails if the lengths disagree.
    pub fn from_vec(data: Vec<f32>, shape: [usize; 4]) -> EngineResult<Self> {
        let expected: usize = shape.iter().product();
        if data.len() != expected {
            return Err(EngineError::shape(
                "tensor4",
                format!("{} elements cannot fill shape {:?} ({} needed)",
                    data.len(), shape, expected),
            ));
        }
        Ok(Self { data, shape })
    }

    pub fn zeros(shape: [usize; 4]) -> Self {
        Self::filled(shape, 0.0)
    }

    pub fn filled(shape: [usize; 4], value: f32) -> Self {
        Self { data: vec![value; shape.iter().product()], shape }
    }

    /// Fill in row-major order from a generator
    pub fn from_fn(shape: [usize; 4], mut f: impl FnMut() -> f32) -> Self {
        let len: usize = shape.iter().product();
        Self { data: (0..len).map(|_| f()).collect(), shape }
    }

    pub fn shape(&self) -> [usize; 4] { self.shape }

    pub fn data(&self) -> &[f32] { &self.data }

    pub(crate) fn data_mut(&mut self) -> &mut [f32] { &mut self.data }

    pub fn len(&self) -> usize { self.data.len() }

    pub fn is_empty(&self) -> bool { self.data.is_empty() }

    /// Flat offset of `[a, b, c, d]` in row-major order
    #[inline]
    pub fn offset(&self, a: usize, b: usize, c: usize, d: usize) -> usize {
        let [_, s1, s2, s3] = self.shape;
        ((a * s1 + b) * s2 + c) * s3 + d
    }

    #[inline]
    pub fn at(&self, a: usize, b: usize, c: usize, d: usize) -> f32 {
        self.data[self.offset(a, b, c, d)]
    }

    /// Collapse everything after the batch axis into one feature axis.
    pub fn flatten(self) -> Tensor2 {
        let [n, h, w, c] = self.shape;
        Tensor2 { data: self.data, shape: [n, h * w * c] }
    }

    /// Arithmetic mean of every element; 0.0 for an empty tensor.
    pub fn mean(&self) -> f64 {
        if self.data.is_empty() {
            return 0.0;
        }
        self.data.iter().map(|&v| v as f64).sum::<f64>() / self.data.len() as f64
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tensor2 {
    data:  Vec<f32>,
    shape: [usize; 2],
}

impl Tensor2 {
    pub fn from_vec(data: Vec<f32>, shape: [usize; 2]) -> EngineResult<Self> {
        let expected = shape[0] * shape[1];
        if data.len() != expected {
            return Err(EngineError::shape(
                "tensor2",
                format!("{} elements cannot fill shape {:?} ({} needed)",
                    data.len(), shape, expected),
            ));
        }
        Ok(Self { data, shape })
    }

    pub fn zeros(shape: [usize; 2]) -> Self {
        Self { data: vec![0.0; shape[0] * shape[1]], shape }
    }

    pub fn from_fn(shape: [usize; 2], mut f: impl FnMut() -> f32) -> Self {
        Self { data: (0..shape[0] * shape[1]).map(|_| f()).collect(), shape }
    }

    pub fn shape(&self) -> [usize; 2] { self.shape }

    pub fn data(&self) -> &[f32] { &self.data }

    pub(crate) fn data_mut(&mut self) -> &mut [f32] { &mut self.data }

    /// One row as a slice
    pub fn row(&self, r: usize) -> &[f32] {
        let cols = self.shape[1];
        &self.data[r * cols..(r + 1) * cols]
    }

    #[inline]
    pub fn at(&self, r: usize, c: usize) -> f32 {
        self.data[r * self.shape[1] + c]
    }
}
