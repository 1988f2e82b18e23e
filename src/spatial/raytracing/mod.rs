use crate::spatial::{math::V3c, Aabb};

mod tests;

#[derive(Debug, Clone, Copy)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Ray {
    pub origin: V3c<f32>,
    pub direction: V3c<f32>,
}

impl Ray {
    pub fn is_valid(&self) -> bool {
        (1. - self.direction.length()).abs() < 0.000001
    }

    pub fn point_at(&self, d: f32) -> V3c<f32> {
        self.origin + self.direction * d
    }

    /// Prepares the ray for slab tests: the reciprocal direction is computed once here,
    /// so the box tests themselves never divide
    pub fn probe(&self) -> RayProbe {
        RayProbe {
            origin: self.origin,
            inv_direction: self.direction.recip(),
        }
    }
}

/// A ray as the slab tests consume it: origin and reciprocal direction.
/// Components of `inv_direction` may be infinite ( for zero direction components ), but never NaN.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct RayProbe {
    pub origin: V3c<f32>,
    pub inv_direction: V3c<f32>,
}

impl RayProbe {
    pub fn new(origin: V3c<f32>, inv_direction: V3c<f32>) -> Self {
        Self {
            origin,
            inv_direction,
        }
    }

    /// Builds a probe from a double precision ray.
    /// The reciprocal is taken before narrowing, so very small direction components
    /// saturate to infinity instead of losing their sign
    pub fn from_f64(origin: [f64; 3], direction: [f64; 3]) -> Self {
        Self {
            origin: V3c::<f64>::from(origin).into(),
            inv_direction: V3c::<f64>::from(direction).recip().into(),
        }
    }

    /// NaN anywhere in the probe makes every box test result unspecified
    pub fn is_well_formed(&self) -> bool {
        !self.origin.has_nan() && !self.inv_direction.has_nan()
    }
}

/// Orders the two bounds of one axis into (near, far) based on the direction of the ray.
/// The sign bit decides, so the reciprocal of -0. is treated as a negative direction.
/// On a box with `min > max` this produces near > far, which makes the box miss.
#[inline(always)]
pub(crate) fn near_far<T>(inv_direction: f32, min: T, max: T) -> (T, T) {
    if inv_direction.is_sign_negative() {
        (max, min)
    } else {
        (min, max)
    }
}

/// Parametric interval of the ray inside the box, clipped to [0, t_max]
/// The box is hit if entry <= exit.
/// Slab distances of `0 * inf` are NaN ( origin on a slab plane, ray parallel to it );
/// `f32::max`/`f32::min` skip those, so such an axis does not constrain the interval.
#[inline(always)]
pub(crate) fn slab_interval(
    probe: &RayProbe,
    min: &V3c<f32>,
    max: &V3c<f32>,
    t_max: f32,
) -> (f32, f32) {
    let mut entry = 0.0_f32;
    let mut exit = t_max;
    for axis in 0..3 {
        let inv = probe.inv_direction[axis];
        let (near, far) = near_far(inv, min[axis], max[axis]);
        entry = entry.max((near - probe.origin[axis]) * inv);
        exit = exit.min((far - probe.origin[axis]) * inv);
    }
    (entry, exit)
}

impl Aabb {
    /// Tells the intersection of the box with the given ray inside [0, t_max].
    /// returns the entry and exit distances, where the entry distance is 0 if the ray starts inside the box
    pub fn intersect(&self, probe: &RayProbe, t_max: f32) -> Option<(f32, f32)> {
        let (entry, exit) = slab_interval(probe, &self.min, &self.max, t_max);
        if entry <= exit {
            Some((entry, exit))
        } else {
            None
        }
    }

    pub fn intersect_ray(&self, ray: &Ray, t_max: f32) -> Option<(f32, f32)> {
        self.intersect(&ray.probe(), t_max)
    }
}
