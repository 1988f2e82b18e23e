use thiserror::Error;

#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

/// A batch of axis aligned bounding boxes in structure-of-arrays layout.
/// Storage is axis-major: `min[AXIS_X]` holds the minimum X bound of every lane contiguously,
/// so one axis of all lanes can be loaded into a single vector register.
/// A lane with `min > max` on any axis holds no box and is never hit.
#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(C, align(32))]
pub struct AabbBatch<const LANES: usize> {
    pub min: [[f32; LANES]; 3],
    pub max: [[f32; LANES]; 3],
}

/// The child bounds of a 4-wide BVH node
pub type QuadAabb = AabbBatch<4>;

/// The child bounds of an 8-wide BVH node
pub type OctAabb = AabbBatch<8>;

/// Result of a batched slab test: bit `i` is set if the box in lane `i` is hit.
/// The kernels never set bits above the width of the batch they test,
/// but lanes the caller left empty are not cleared either; see [`HitMask::masked`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct HitMask(pub u8);

/// Iterates the lanes of a [`HitMask`] with their bit set, in ascending order
#[derive(Clone, Debug)]
pub struct HitLanes(pub(crate) u8);

/// Implementations of the slab test kernels, each tied to an instruction set
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum Backend {
    /// Portable per-lane loop, available everywhere
    Scalar,
    /// 128 bit SSE registers on x86 and x86_64; 8 lanes take two passes
    Sse,
    /// 256 bit AVX registers on x86 and x86_64, detected at runtime; 4 lanes use SSE
    Avx,
    /// 128 bit NEON registers on aarch64; 8 lanes take two passes
    Neon,
}

/// error types during setup of slab tests; the tests themselves can not fail
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlabError {
    #[error("the {0} backend is not supported on this machine")]
    UnsupportedBackend(Backend),

    #[error("unknown slab test backend: {0:?}")]
    UnknownBackend(String),

    #[error("{given} boxes do not fit into a batch of {lanes} lanes")]
    TooManyBoxes { given: usize, lanes: usize },

    #[error("lane {lane} is out of range for a batch of {lanes} lanes")]
    LaneOutOfRange { lane: usize, lanes: usize },
}
