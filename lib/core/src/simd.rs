// SIMD kernels for Euclidean distance
// Feature profiles are short (a handful of centroid distances), so the SSE path
// works on 4-lane chunks and falls back to scalar code for the tail.

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

#[cfg(target_arch = "x86_64")]
const MIN_DIM_SIZE_SSE: usize = 4;

/// Squared Euclidean distance
/// Returns `f32::INFINITY` if the slices differ in length
#[inline]
pub fn squared_l2_simd(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return f32::INFINITY;
    }

    #[cfg(target_arch = "x86_64")]
    {
        if is_x86_feature_detected!("sse") && a.len() >= MIN_DIM_SIZE_SSE {
            return unsafe { squared_l2_sse(a, b) };
        }
    }

    squared_l2_scalar(a, b)
}

/// Euclidean distance
#[inline]
pub fn l2_distance_simd(a: &[f32], b: &[f32]) -> f32 {
    squared_l2_simd(a, b).sqrt()
}

/// SSE squared L2 (4 floats at a time)
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "sse")]
#[inline]
unsafe fn squared_l2_sse(a: &[f32], b: &[f32]) -> f32 {
    let dim = a.len();
    let mut i = 0;
    let mut sum = _mm_setzero_ps();

    while i + 3 < dim {
        let va = _mm_loadu_ps(a.as_ptr().add(i));
        let vb = _mm_loadu_ps(b.as_ptr().add(i));
        let diff = _mm_sub_ps(va, vb);
        sum = _mm_add_ps(sum, _mm_mul_ps(diff, diff));
        i += 4;
    }

    // Horizontal sum
    let shuf = _mm_shuffle_ps(sum, sum, 0b10_11_00_01);
    sum = _mm_add_ps(sum, shuf);
    let shuf = _mm_movehl_ps(sum, sum);
    sum = _mm_add_ss(sum, shuf);

    let mut total = _mm_cvtss_f32(sum);

    while i < dim {
        let diff = a[i] - b[i];
        total += diff * diff;
        i += 1;
    }

    total
}

/// Scalar squared L2 (two accumulators)
#[inline]
fn squared_l2_scalar(a: &[f32], b: &[f32]) -> f32 {
    let mut sum0 = 0.0f32;
    let mut sum1 = 0.0f32;

    let chunks = a.chunks_exact(2);
    let remainder = chunks.remainder();
    let b_chunks = b.chunks_exact(2);

    for (a_chunk, b_chunk) in chunks.zip(b_chunks) {
        let d0 = a_chunk[0] - b_chunk[0];
        let d1 = a_chunk[1] - b_chunk[1];
        sum0 += d0 * d0;
        sum1 += d1 * d1;
    }

    if let (Some(x), Some(y)) = (remainder.first(), b.last()) {
        let diff = x - y;
        sum0 += diff * diff;
    }

    sum0 + sum1
}
