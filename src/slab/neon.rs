use std::arch::aarch64::*;

use crate::{
    slab::types::{AabbBatch, HitMask},
    spatial::raytracing::{near_far, RayProbe},
};

const LANE_BITS: [u32; 4] = [1, 2, 4, 8];

/// Slab test of 4 consecutive lanes, starting at `first_lane`, in one NEON register.
/// # Safety
/// `first_lane + 4` must not exceed `LANES`; NEON is a compile time requirement of this module
#[inline(always)]
unsafe fn four_lanes<const LANES: usize>(
    probe: &RayProbe,
    boxes: &AabbBatch<LANES>,
    first_lane: usize,
    t_max: f32,
) -> u8 {
    debug_assert!(first_lane + 4 <= LANES);
    let mut entry = vdupq_n_f32(0.);
    let mut exit = vdupq_n_f32(t_max);

    for axis in 0..3 {
        let inv = probe.inv_direction[axis];
        let (near, far) = near_far(inv, &boxes.min[axis], &boxes.max[axis]);
        let origin = vdupq_n_f32(probe.origin[axis]);
        let inv = vdupq_n_f32(inv);
        let t_near = vmulq_f32(vsubq_f32(vld1q_f32(near.as_ptr().add(first_lane)), origin), inv);
        let t_far = vmulq_f32(vsubq_f32(vld1q_f32(far.as_ptr().add(first_lane)), origin), inv);
        // fmaxnm/fminnm return the number when the other operand is a quiet NaN
        entry = vmaxnmq_f32(entry, t_near);
        exit = vminnmq_f32(exit, t_far);
    }

    let hit = vandq_u32(vcleq_f32(entry, exit), vld1q_u32(LANE_BITS.as_ptr()));
    vaddvq_u32(hit) as u8
}

pub(crate) fn quad_neon(probe: &RayProbe, boxes: &AabbBatch<4>, t_max: f32) -> HitMask {
    HitMask(unsafe { four_lanes(probe, boxes, 0, t_max) })
}

pub(crate) fn oct_neon(probe: &RayProbe, boxes: &AabbBatch<8>, t_max: f32) -> HitMask {
    let (low, high) = unsafe {
        (
            four_lanes(probe, boxes, 0, t_max),
            four_lanes(probe, boxes, 4, t_max),
        )
    };
    HitMask(low | (high << 4))
}
