mod tests;
pub mod vector;

pub use vector::{V3c, V3cf32};

pub const AXIS_X: usize = 0;
pub const AXIS_Y: usize = 1;
pub const AXIS_Z: usize = 2;

/// The smallest f32 strictly greater than the given value
/// Infinities in the direction of the step and NaN are returned unchanged
pub(crate) fn next_up(value: f32) -> f32 {
    if value.is_nan() || value == f32::INFINITY {
        return value;
    }
    if value == 0. {
        // covers -0. as well
        return f32::from_bits(1);
    }
    let bits = value.to_bits();
    if value > 0. {
        f32::from_bits(bits + 1)
    } else {
        f32::from_bits(bits - 1)
    }
}

/// The largest f32 strictly smaller than the given value
pub(crate) fn next_down(value: f32) -> f32 {
    -next_up(-value)
}

/// Narrows an f64 into the nearest f32 which is not greater than it.
/// Used for minimum bounds, so the narrowed box never shrinks.
pub fn round_down_f32(value: f64) -> f32 {
    let narrowed = value as f32;
    if narrowed as f64 > value {
        next_down(narrowed)
    } else {
        narrowed
    }
}

/// Narrows an f64 into the nearest f32 which is not smaller than it.
/// Used for maximum bounds, so the narrowed box never shrinks.
pub fn round_up_f32(value: f64) -> f32 {
    let narrowed = value as f32;
    if (narrowed as f64) < value {
        next_up(narrowed)
    } else {
        narrowed
    }
}
