// ============================================================
// Layer 5 - Tensor Operations
// ============================================================
// The primitive kernels the forward pipeline is built from:
//
//   pad        zero border around the two spatial dimensions
//   conv2d     strided 2D convolution + per-filter bias
//   relu       elementwise max(0, x)
//   max_pool   non-overlapping window maximum, remainder dropped
//   flatten    [N, H, W, C] → [N, H·W·C]
//   dense      x · wᵀ + b
//
// Every kernel checks its operands before the first multiply
// and returns EngineError::ShapeMismatch instead of producing a
// malformed tensor. The two heavy kernels (conv2d, dense) split
// their output by rows across the rayon pool. Each output value
// is still a single sequential sum, so results are identical no
// matter how the rows are scheduled.
//
// Reference: LeCun et al. (1998) Gradient-based learning
//            Rust Book §13 (Iterators), rayon documentation

use rayon::prelude::*;

use crate::domain::error::{EngineError, EngineResult};
use crate::ml::tensor::{Tensor2, Tensor4};

/// Zero-extend height and width by `p` on each side.
/// Batch and channel dimensions are left alone.
pub fn pad(x: &Tensor4, p: usize) -> Tensor4 {
    if p == 0 {
        return x.clone();
    }
    let [n, h, w, c] = x.shape();
    let mut out = Tensor4::zeros([n, h + 2 * p, w + 2 * p, c]);
    let padded_w = w + 2 * p;

    let src = x.data();
    let dst = out.data_mut();
    for b in 0..n {
        for y in 0..h {
            let src_start = ((b * h + y) * w) * c;
            let dst_start = ((b * (h + 2 * p) + y + p) * padded_w + p) * c;
            dst[dst_start..dst_start + w * c]
                .copy_from_slice(&src[src_start..src_start + w * c]);
        }
    }
    out
}

/// Output length of one spatial dimension, or None when the
/// kernel does not fit even once.
fn conv_output_dim(dim: usize, pad: usize, kernel: usize, stride: usize) -> Option<usize> {
    let padded = dim + 2 * pad;
    if padded < kernel {
        return None;
    }
    Some((padded - kernel) / stride + 1)
}

/// Strided 2D convolution.
///
/// * `x` - activations `[N, H, W, C]`
/// * `w` - filters `[F, C, KH, KW]`
/// * `b` - one bias per filter
///
/// Output: `[N, H_out, W_out, F]` with
/// `H_out = (H + 2·pad − KH) / stride + 1` (same for width).
pub fn conv2d(
    x:      &Tensor4,
    w:      &Tensor4,
    b:      &[f32],
    stride: usize,
    pad_by: usize,
) -> EngineResult<Tensor4> {
    let [n, h, wd, c]       = x.shape();
    let [f, in_c, kh, kw]   = w.shape();

    if c != in_c {
        return Err(EngineError::shape(
            "conv2d",
            format!("input has {c} channels but filters expect {in_c}"),
        ));
    }
    if f == 0 || kh == 0 || kw == 0 {
        return Err(EngineError::shape(
            "conv2d",
            format!("filter bank {:?} is empty", w.shape()),
        ));
    }
    if b.len() != f {
        return Err(EngineError::shape(
            "conv2d",
            format!("{} biases for {f} filters", b.len()),
        ));
    }
    if stride == 0 {
        return Err(EngineError::shape("conv2d", "stride must be at least 1"));
    }
    let (out_h, out_w) = match (
        conv_output_dim(h,  pad_by, kh, stride),
        conv_output_dim(wd, pad_by, kw, stride),
    ) {
        (Some(oh), Some(ow)) => (oh, ow),
        _ => {
            return Err(EngineError::shape(
                "conv2d",
                format!("{h}x{wd} input with pad {pad_by} is smaller than the {kh}x{kw} kernel"),
            ))
        }
    };

    let xp = pad(x, pad_by);
    let wts = w.data();
    let mut out = vec![0.0f32; n * out_h * out_w * f];

    // One chunk = one output row (all columns, all filters) of one image
    out.par_chunks_mut(out_w * f)
        .enumerate()
        .for_each(|(row, dst)| {
            let bn = row / out_h;
            let oy = row % out_h;
            for ox in 0..out_w {
                for k in 0..f {
                    let mut sum = 0.0f32;
                    for dy in 0..kh {
                        for dx in 0..kw {
                            let iy = oy * stride + dy;
                            let ix = ox * stride + dx;
                            let base = xp.offset(bn, iy, ix, 0);
                            for ci in 0..c {
                                let wi = ((k * in_c + ci) * kh + dy) * kw + dx;
                                sum += xp.data()[base + ci] * wts[wi];
                            }
                        }
                    }
                    dst[ox * f + k] = sum + b[k];
                }
            }
        });

    Tensor4::from_vec(out, [n, out_h, out_w, f])
}

/// Elementwise max(0, x) on activations
pub fn relu(mut x: Tensor4) -> Tensor4 {
    x.data_mut().iter_mut().for_each(|v| *v = v.max(0.0));
    x
}

/// Elementwise max(0, x) on dense features
pub fn relu2(mut x: Tensor2) -> Tensor2 {
    x.data_mut().iter_mut().for_each(|v| *v = v.max(0.0));
    x
}

/// Non-overlapping max pooling.
///
/// Each spatial dimension is floor-divided by `pool_size`; rows
/// and columns past the last full window are dropped, never
/// padded. A 5x5 input with pool 2 becomes 2x2 and row/column 4
/// take no part in the result.
pub fn max_pool(x: &Tensor4, pool_size: usize) -> EngineResult<Tensor4> {
    if pool_size == 0 {
        return Err(EngineError::shape("max_pool", "pool size must be at least 1"));
    }
    let [n, h, w, c] = x.shape();
    let (out_h, out_w) = (h / pool_size, w / pool_size);
    if out_h == 0 || out_w == 0 {
        return Err(EngineError::shape(
            "max_pool",
            format!("{h}x{w} input is too small for pool size {pool_size}"),
        ));
    }

    let mut out = Tensor4::zeros([n, out_h, out_w, c]);
    for bn in 0..n {
        for oy in 0..out_h {
            for ox in 0..out_w {
                for ch in 0..c {
                    let mut best = f32::NEG_INFINITY;
                    for dy in 0..pool_size {
                        for dx in 0..pool_size {
                            best = best.max(x.at(bn, oy * pool_size + dy, ox * pool_size + dx, ch));
                        }
                    }
                    let o = out.offset(bn, oy, ox, ch);
                    out.data_mut()[o] = best;
                }
            }
        }
    }
    Ok(out)
}

/// `[N, H, W, C]` → `[N, H·W·C]`, keeping row-major NHWC order
pub fn flatten(x: Tensor4) -> Tensor2 {
    x.flatten()
}

/// Fully connected layer: `x · wᵀ + b`.
///
/// * `x` - `[N, in_features]`
/// * `w` - `[out_features, in_features]`
/// * `b` - `[out_features]`
pub fn dense(x: &Tensor2, w: &Tensor2, b: &[f32]) -> EngineResult<Tensor2> {
    let [n, fin]       = x.shape();
    let [fout, w_in]   = w.shape();

    if fin != w_in {
        return Err(EngineError::shape(
            "dense",
            format!("input has {fin} features but weights expect {w_in}"),
        ));
    }
    if fout == 0 {
        return Err(EngineError::shape("dense", "weight matrix has no output rows"));
    }
    if b.len() != fout {
        return Err(EngineError::shape(
            "dense",
            format!("{} biases for {fout} outputs", b.len()),
        ));
    }

    let mut out = vec![0.0f32; n * fout];
    out.par_chunks_mut(fout)
        .enumerate()
        .for_each(|(r, dst)| {
            let xr = x.row(r);
            for (o, slot) in dst.iter_mut().enumerate() {
                let dot: f32 = xr.iter().zip(w.row(o)).map(|(a, b)| a * b).sum();
                *slot = dot + b[o];
            }
        });

    Tensor2::from_vec(out, [n, fout])
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(shape: [usize; 4]) -> Tensor4 {
        let len: usize = shape.iter().product();
        Tensor4::from_vec((0..len).map(|v| v as f32).collect(), shape).unwrap()
    }

    #[test]
    fn test_pad_adds_zero_border() {
        let x = Tensor4::filled([1, 2, 2, 1], 1.0);
        let p = pad(&x, 1);
        assert_eq!(p.shape(), [1, 4, 4, 1]);
        assert_eq!(p.at(0, 0, 0, 0), 0.0);
        assert_eq!(p.at(0, 1, 1, 0), 1.0);
        assert_eq!(p.at(0, 2, 2, 0), 1.0);
        assert_eq!(p.at(0, 3, 3, 0), 0.0);
        // sum of ones is unchanged by the border
        assert_eq!(p.data().iter().sum::<f32>(), 4.0);
    }

    #[test]
    fn test_conv_same_padding_preserves_64x64() {
        let x = Tensor4::filled([1, 64, 64, 3], 0.5);
        let w = Tensor4::filled([16, 3, 3, 3], 0.01);
        let y = conv2d(&x, &w, &[0.0; 16], 1, 1).unwrap();
        assert_eq!(y.shape(), [1, 64, 64, 16]);
    }

    #[test]
    fn test_conv_ones_counts_window_cells() {
        // 3x3 ones, 3x3 ones filter, pad 1: each output counts the
        // in-bounds cells of its window.
        let x = Tensor4::filled([1, 3, 3, 1], 1.0);
        let w = Tensor4::filled([1, 1, 3, 3], 1.0);
        let y = conv2d(&x, &w, &[0.5], 1, 1).unwrap();
        assert_eq!(y.at(0, 1, 1, 0), 9.5);
        assert_eq!(y.at(0, 0, 0, 0), 4.5);
        assert_eq!(y.at(0, 0, 1, 0), 6.5);
    }

    #[test]
    fn test_conv_sums_over_channels_with_filter_layout() {
        // 1x1 spatial input with 2 channels, a single 1x1 filter
        let x = Tensor4::from_vec(vec![2.0, 3.0], [1, 1, 1, 2]).unwrap();
        let w = Tensor4::from_vec(vec![10.0, 100.0], [1, 2, 1, 1]).unwrap();
        let y = conv2d(&x, &w, &[0.0], 1, 0).unwrap();
        assert_eq!(y.data(), &[320.0]);
    }

    #[test]
    fn test_conv_stride_two_output_size() {
        // (7 + 2 - 3) / 2 + 1 = 4
        let x = ramp([2, 7, 7, 1]);
        let w = Tensor4::filled([4, 1, 3, 3], 1.0);
        let y = conv2d(&x, &w, &[0.0; 4], 2, 1).unwrap();
        assert_eq!(y.shape(), [2, 4, 4, 4]);
    }

    #[test]
    fn test_conv_rejects_channel_mismatch() {
        let x = Tensor4::zeros([1, 8, 8, 16]);
        let w = Tensor4::zeros([64, 32, 3, 3]);
        let err = conv2d(&x, &w, &[0.0; 64], 1, 1).unwrap_err();
        assert!(err.is_shape_mismatch());
        assert!(err.to_string().contains("16 channels"));
    }

    #[test]
    fn test_conv_rejects_bias_length() {
        let x = Tensor4::zeros([1, 4, 4, 3]);
        let w = Tensor4::zeros([8, 3, 3, 3]);
        assert!(conv2d(&x, &w, &[0.0; 7], 1, 1).is_err());
    }

    #[test]
    fn test_conv_rejects_non_positive_output() {
        // 2x2 input, no padding, 3x3 kernel → (2 - 3) / 1 + 1 = 0
        let x = Tensor4::zeros([1, 2, 2, 1]);
        let w = Tensor4::zeros([1, 1, 3, 3]);
        assert!(conv2d(&x, &w, &[0.0], 1, 0).unwrap_err().is_shape_mismatch());
        assert!(conv2d(&x, &w, &[0.0], 0, 1).is_err());
    }

    #[test]
    fn test_relu() {
        let x = Tensor4::from_vec(vec![-1.0, 0.0, 2.5, -0.1], [1, 2, 2, 1]).unwrap();
        assert_eq!(relu(x).data(), &[0.0, 0.0, 2.5, 0.0]);
        let d = Tensor2::from_vec(vec![-3.0, 4.0], [1, 2]).unwrap();
        assert_eq!(relu2(d).data(), &[0.0, 4.0]);
    }

    #[test]
    fn test_max_pool_halves_even_dims() {
        let x = ramp([1, 4, 4, 1]);
        let y = max_pool(&x, 2).unwrap();
        assert_eq!(y.shape(), [1, 2, 2, 1]);
        assert_eq!(y.data(), &[5.0, 7.0, 13.0, 15.0]);
    }

    #[test]
    fn test_max_pool_truncates_odd_dims() {
        // 5x5 ramp: the largest values live in row 4 / column 4,
        // which must not leak into the 2x2 result.
        let x = ramp([1, 5, 5, 1]);
        let y = max_pool(&x, 2).unwrap();
        assert_eq!(y.shape(), [1, 2, 2, 1]);
        assert_eq!(y.data(), &[6.0, 8.0, 16.0, 18.0]);
    }

    #[test]
    fn test_max_pool_keeps_channels_apart() {
        let x = Tensor4::from_vec(
            vec![1.0, 9.0, 2.0, 8.0, 3.0, 7.0, 4.0, 6.0],
            [1, 2, 2, 2],
        ).unwrap();
        let y = max_pool(&x, 2).unwrap();
        assert_eq!(y.data(), &[4.0, 9.0]);
    }

    #[test]
    fn test_max_pool_rejects_zero_sized_output() {
        let x = Tensor4::zeros([1, 1, 4, 3]);
        assert!(max_pool(&x, 2).unwrap_err().is_shape_mismatch());
        assert!(max_pool(&Tensor4::zeros([1, 4, 4, 1]), 0).is_err());
    }

    #[test]
    fn test_flatten_keeps_nhwc_order() {
        let x = ramp([2, 2, 2, 3]);
        let f = flatten(x);
        assert_eq!(f.shape(), [2, 12]);
        assert_eq!(f.at(1, 0), 12.0);
        assert_eq!(f.at(0, 11), 11.0);
    }

    #[test]
    fn test_dense_matches_hand_computation() {
        let x = Tensor2::from_vec(vec![1.0, 2.0, 3.0], [1, 3]).unwrap();
        let w = Tensor2::from_vec(vec![1.0, 0.0, -1.0, 0.5, 0.5, 0.5], [2, 3]).unwrap();
        let y = dense(&x, &w, &[10.0, 0.0]).unwrap();
        assert_eq!(y.shape(), [1, 2]);
        assert_eq!(y.data(), &[8.0, 3.0]);
    }

    #[test]
    fn test_dense_rejects_feature_mismatch() {
        // A 32x32 image leaves 4x4x64 = 1024 features, not 4096
        let x = Tensor2::zeros([1, 4 * 4 * 64]);
        let w = Tensor2::zeros([128, 64 * 8 * 8]);
        let err = dense(&x, &w, &[0.0; 128]).unwrap_err();
        assert!(err.is_shape_mismatch());
        assert!(dense(&Tensor2::zeros([1, 4]), &Tensor2::zeros([2, 4]), &[0.0]).is_err());
    }
}
