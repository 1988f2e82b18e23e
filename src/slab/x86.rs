#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use crate::{
    slab::types::{AabbBatch, HitMask},
    spatial::raytracing::{near_far, RayProbe},
};

/// Slab test of 4 consecutive lanes, starting at `first_lane`, in one SSE register.
/// Returns the hit bits of the 4 lanes in the low bits of the result.
/// # Safety
/// `first_lane + 4` must not exceed `LANES`; SSE2 is a compile time requirement of this module
#[inline(always)]
unsafe fn four_lanes<const LANES: usize>(
    probe: &RayProbe,
    boxes: &AabbBatch<LANES>,
    first_lane: usize,
    t_max: f32,
) -> u8 {
    debug_assert!(first_lane + 4 <= LANES);
    let mut entry = _mm_setzero_ps();
    let mut exit = _mm_set1_ps(t_max);

    for axis in 0..3 {
        let inv = probe.inv_direction[axis];
        let (near, far) = near_far(inv, &boxes.min[axis], &boxes.max[axis]);
        let origin = _mm_set1_ps(probe.origin[axis]);
        let inv = _mm_set1_ps(inv);
        let t_near = _mm_mul_ps(
            _mm_sub_ps(_mm_loadu_ps(near.as_ptr().add(first_lane)), origin),
            inv,
        );
        let t_far = _mm_mul_ps(
            _mm_sub_ps(_mm_loadu_ps(far.as_ptr().add(first_lane)), origin),
            inv,
        );
        // maxps/minps return the second operand if either one is NaN,
        // so NaN slab distances leave the accumulators untouched
        entry = _mm_max_ps(t_near, entry);
        exit = _mm_min_ps(t_far, exit);
    }

    _mm_movemask_ps(_mm_cmple_ps(entry, exit)) as u8
}

pub(crate) fn quad_sse(probe: &RayProbe, boxes: &AabbBatch<4>, t_max: f32) -> HitMask {
    HitMask(unsafe { four_lanes(probe, boxes, 0, t_max) })
}

pub(crate) fn oct_sse(probe: &RayProbe, boxes: &AabbBatch<8>, t_max: f32) -> HitMask {
    let (low, high) = unsafe {
        (
            four_lanes(probe, boxes, 0, t_max),
            four_lanes(probe, boxes, 4, t_max),
        )
    };
    HitMask(low | (high << 4))
}

#[target_feature(enable = "avx")]
unsafe fn oct_avx_impl(probe: &RayProbe, boxes: &AabbBatch<8>, t_max: f32) -> HitMask {
    let mut entry = _mm256_setzero_ps();
    let mut exit = _mm256_set1_ps(t_max);

    for axis in 0..3 {
        let inv = probe.inv_direction[axis];
        let (near, far) = near_far(inv, &boxes.min[axis], &boxes.max[axis]);
        let origin = _mm256_set1_ps(probe.origin[axis]);
        let inv = _mm256_set1_ps(inv);
        let t_near = _mm256_mul_ps(_mm256_sub_ps(_mm256_loadu_ps(near.as_ptr()), origin), inv);
        let t_far = _mm256_mul_ps(_mm256_sub_ps(_mm256_loadu_ps(far.as_ptr()), origin), inv);
        entry = _mm256_max_ps(t_near, entry);
        exit = _mm256_min_ps(t_far, exit);
    }

    HitMask(_mm256_movemask_ps(_mm256_cmp_ps::<_CMP_LE_OQ>(entry, exit)) as u8)
}

/// Only ever installed into a tester after runtime detection confirmed AVX support
pub(crate) fn oct_avx(probe: &RayProbe, boxes: &AabbBatch<8>, t_max: f32) -> HitMask {
    unsafe { oct_avx_impl(probe, boxes, t_max) }
}

pub(crate) fn avx_detected() -> bool {
    is_x86_feature_detected!("avx")
}
