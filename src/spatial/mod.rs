pub mod math;
pub mod raytracing;

use crate::spatial::math::{round_down_f32, round_up_f32, V3c};

/// A single axis aligned bounding box.
/// Any axis where `min > max` marks the box as empty; such a box is never hit by a ray.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Aabb {
    pub min: V3c<f32>,
    pub max: V3c<f32>,
}

impl Aabb {
    pub fn new(min: V3c<f32>, max: V3c<f32>) -> Self {
        Self { min, max }
    }

    /// The box which contains nothing: bounds are inverted on every axis
    pub fn empty() -> Self {
        Self {
            min: V3c::unit(f32::INFINITY),
            max: V3c::unit(f32::NEG_INFINITY),
        }
    }

    /// Narrows double precision bounds so the result always encloses the double precision box
    pub fn from_f64(min: V3c<f64>, max: V3c<f64>) -> Self {
        Self {
            min: min.map(round_down_f32),
            max: max.map(round_up_f32),
        }
    }

    /// True if the box has a non-negative extent on every axis
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }

    pub fn midpoint(&self) -> V3c<f32> {
        (self.min + self.max) * 0.5
    }

    /// Extends the box so it contains the given point
    pub fn grow(&mut self, point: &V3c<f32>) {
        self.min = self.min.min(*point);
        self.max = self.max.max(*point);
    }

    /// True if the given point is inside the box, edges included
    pub fn contains_point(&self, point: &V3c<f32>) -> bool {
        (point.x >= self.min.x)
            && (point.x <= self.max.x)
            && (point.y >= self.min.y)
            && (point.y <= self.max.y)
            && (point.z >= self.min.z)
            && (point.z <= self.max.z)
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}
