use crate::{
    slab::types::{AabbBatch, HitMask},
    spatial::raytracing::{near_far, RayProbe},
};

/// Portable slab test of one ray against every lane of the batch.
/// The lane loops run over contiguous arrays, so the compiler is free to vectorize them;
/// this is also the reference every other backend has to match bit for bit.
pub(crate) fn intersect<const LANES: usize>(
    probe: &RayProbe,
    boxes: &AabbBatch<LANES>,
    t_max: f32,
) -> HitMask {
    debug_assert!(LANES <= 8);
    let mut entry = [0.0_f32; LANES];
    let mut exit = [t_max; LANES];

    for axis in 0..3 {
        let origin = probe.origin[axis];
        let inv = probe.inv_direction[axis];
        let (near, far) = near_far(inv, &boxes.min[axis], &boxes.max[axis]);
        for lane in 0..LANES {
            // NaN slab distances ( 0 * inf ) are skipped by max/min
            entry[lane] = entry[lane].max((near[lane] - origin) * inv);
            exit[lane] = exit[lane].min((far[lane] - origin) * inv);
        }
    }

    let mut bits = 0u8;
    for lane in 0..LANES {
        bits |= ((entry[lane] <= exit[lane]) as u8) << lane;
    }
    HitMask(bits)
}
