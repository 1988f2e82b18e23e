pub mod types;

mod scalar;

#[cfg(all(
    feature = "simd",
    any(target_arch = "x86", target_arch = "x86_64"),
    target_feature = "sse2"
))]
mod x86;

#[cfg(all(feature = "simd", target_arch = "aarch64", target_feature = "neon"))]
mod neon;

pub use crate::spatial::{
    math::V3c,
    raytracing::{Ray, RayProbe},
    Aabb,
};
pub use types::{AabbBatch, Backend, HitLanes, HitMask, OctAabb, QuadAabb, SlabError};

use std::{fmt, str::FromStr, sync::OnceLock};

/// Environment variable which, if set, names the backend the global tester should use
pub const BACKEND_ENV_VAR: &str = "QUADSLAB_BACKEND";

pub(crate) type QuadKernel = fn(&RayProbe, &QuadAabb, f32) -> HitMask;
pub(crate) type OctKernel = fn(&RayProbe, &OctAabb, f32) -> HitMask;

static GLOBAL_TESTER: OnceLock<SlabTester> = OnceLock::new();

///####################################################################################
/// Backend
///####################################################################################
impl Backend {
    /// Every backend, in order of preference
    pub const ALL: [Backend; 4] = [Backend::Avx, Backend::Sse, Backend::Neon, Backend::Scalar];

    pub fn name(&self) -> &'static str {
        match self {
            Backend::Scalar => "scalar",
            Backend::Sse => "sse",
            Backend::Avx => "avx",
            Backend::Neon => "neon",
        }
    }

    /// True if the backend is compiled in and the running CPU can execute it
    pub fn is_supported(&self) -> bool {
        match self {
            Backend::Scalar => true,
            Backend::Sse => cfg!(all(
                feature = "simd",
                any(target_arch = "x86", target_arch = "x86_64"),
                target_feature = "sse2"
            )),
            Backend::Avx => avx_detected(),
            Backend::Neon => cfg!(all(
                feature = "simd",
                target_arch = "aarch64",
                target_feature = "neon"
            )),
        }
    }

    /// The supported backends, best first. Always ends with [`Backend::Scalar`]
    pub fn available() -> Vec<Backend> {
        Self::ALL
            .into_iter()
            .filter(|backend| backend.is_supported())
            .collect()
    }

    /// The best backend the running CPU supports
    pub fn detect() -> Backend {
        Self::ALL
            .into_iter()
            .find(|backend| backend.is_supported())
            .unwrap_or(Backend::Scalar)
    }
}

#[cfg(all(
    feature = "simd",
    any(target_arch = "x86", target_arch = "x86_64"),
    target_feature = "sse2"
))]
fn avx_detected() -> bool {
    x86::avx_detected()
}

#[cfg(not(all(
    feature = "simd",
    any(target_arch = "x86", target_arch = "x86_64"),
    target_feature = "sse2"
)))]
fn avx_detected() -> bool {
    false
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Backend {
    type Err = SlabError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|backend| backend.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| SlabError::UnknownBackend(name.to_string()))
    }
}

///####################################################################################
/// SlabTester
///####################################################################################

/// Ray versus box batch tests, bound to one backend.
/// Resolving the backend happens once, at construction; afterwards every test is a plain call
/// through a function pointer, so a tester can be copied freely between threads.
#[derive(Clone, Copy)]
pub struct SlabTester {
    backend: Backend,
    quad: QuadKernel,
    oct: OctKernel,
}

impl SlabTester {
    fn from_kernels(backend: Backend, quad: QuadKernel, oct: OctKernel) -> Self {
        Self { backend, quad, oct }
    }

    /// The portable tester, available on every platform
    pub fn scalar() -> Self {
        Self::from_kernels(
            Backend::Scalar,
            scalar::intersect::<4>,
            scalar::intersect::<8>,
        )
    }

    /// Creates a tester bound to the given backend, if the running CPU supports it
    pub fn new(backend: Backend) -> Result<Self, SlabError> {
        if !backend.is_supported() {
            return Err(SlabError::UnsupportedBackend(backend));
        }
        match backend {
            Backend::Scalar => Ok(Self::scalar()),
            #[cfg(all(
                feature = "simd",
                any(target_arch = "x86", target_arch = "x86_64"),
                target_feature = "sse2"
            ))]
            Backend::Sse => Ok(Self::from_kernels(backend, x86::quad_sse, x86::oct_sse)),
            #[cfg(all(
                feature = "simd",
                any(target_arch = "x86", target_arch = "x86_64"),
                target_feature = "sse2"
            ))]
            Backend::Avx => Ok(Self::from_kernels(backend, x86::quad_sse, x86::oct_avx)),
            #[cfg(all(feature = "simd", target_arch = "aarch64", target_feature = "neon"))]
            Backend::Neon => Ok(Self::from_kernels(backend, neon::quad_neon, neon::oct_neon)),
            #[allow(unreachable_patterns)]
            _ => Err(SlabError::UnsupportedBackend(backend)),
        }
    }

    /// The tester using the best backend of the running CPU
    pub fn detected() -> Self {
        Self::new(Backend::detect()).unwrap_or_else(|_| Self::scalar())
    }

    /// Resolves the tester from an optional backend name, falling back to detection
    /// if the name is unknown or the backend is not supported
    pub(crate) fn resolve(requested: Option<&str>) -> Self {
        if let Some(name) = requested {
            match name.parse::<Backend>().and_then(Self::new) {
                Ok(tester) => return tester,
                Err(err) => log::warn!("Ignoring {BACKEND_ENV_VAR}={name:?}: {err}"),
            }
        }
        Self::detected()
    }

    /// The process-wide tester. The backend is resolved on first use from [`BACKEND_ENV_VAR`]
    /// or by detecting the capabilities of the running CPU
    pub fn global() -> &'static SlabTester {
        GLOBAL_TESTER.get_or_init(|| {
            let requested = std::env::var(BACKEND_ENV_VAR).ok();
            let tester = Self::resolve(requested.as_deref());
            log::info!("Ray/box slab tests use the {} backend", tester.backend);
            tester
        })
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Tests the ray against the 4 boxes of the batch in [0, t_max]
    #[inline]
    pub fn test_quad(&self, probe: &RayProbe, boxes: &QuadAabb, t_max: f32) -> HitMask {
        (self.quad)(probe, boxes, t_max)
    }

    /// Tests the ray against the 8 boxes of the batch in [0, t_max]
    #[inline]
    pub fn test_oct(&self, probe: &RayProbe, boxes: &OctAabb, t_max: f32) -> HitMask {
        (self.oct)(probe, boxes, t_max)
    }
}

impl fmt::Debug for SlabTester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlabTester")
            .field("backend", &self.backend)
            .finish_non_exhaustive()
    }
}

impl Default for SlabTester {
    fn default() -> Self {
        *Self::global()
    }
}

///####################################################################################
/// Free functions
///####################################################################################

/// Tests one ray against four boxes given as separate per-axis arrays.
/// Returns a mask where bit `i` is set if box `i` is hit in [0, t_max]; bits 4..8 are always zero.
/// The reciprocal direction components may be infinite but must not be NaN.
#[allow(clippy::too_many_arguments)]
#[inline]
pub fn test_quad_aabb(
    ray_org_x: f32,
    ray_org_y: f32,
    ray_org_z: f32,
    ray_inv_dir_x: f32,
    ray_inv_dir_y: f32,
    ray_inv_dir_z: f32,
    min_x: &[f32; 4],
    min_y: &[f32; 4],
    min_z: &[f32; 4],
    max_x: &[f32; 4],
    max_y: &[f32; 4],
    max_z: &[f32; 4],
    t_max: f32,
) -> u8 {
    let probe = RayProbe::new(
        V3c::new(ray_org_x, ray_org_y, ray_org_z),
        V3c::new(ray_inv_dir_x, ray_inv_dir_y, ray_inv_dir_z),
    );
    let boxes = QuadAabb {
        min: [*min_x, *min_y, *min_z],
        max: [*max_x, *max_y, *max_z],
    };
    intersect_quad(&probe, &boxes, t_max).bits()
}

/// Tests the ray against the 4 boxes of the batch, using the global tester
#[inline]
pub fn intersect_quad(probe: &RayProbe, boxes: &QuadAabb, t_max: f32) -> HitMask {
    SlabTester::global().test_quad(probe, boxes, t_max)
}

/// Tests the ray against the 8 boxes of the batch, using the global tester
#[inline]
pub fn intersect_oct(probe: &RayProbe, boxes: &OctAabb, t_max: f32) -> HitMask {
    SlabTester::global().test_oct(probe, boxes, t_max)
}

///####################################################################################
/// AabbBatch
///####################################################################################
impl<const LANES: usize> AabbBatch<LANES> {
    /// A batch where no lane holds a box
    pub fn empty() -> Self {
        Self {
            min: [[f32::INFINITY; LANES]; 3],
            max: [[f32::NEG_INFINITY; LANES]; 3],
        }
    }

    /// Packs the given boxes into the first lanes, the remaining lanes are left empty
    pub fn from_boxes(boxes: &[Aabb]) -> Result<Self, SlabError> {
        if boxes.len() > LANES {
            return Err(SlabError::TooManyBoxes {
                given: boxes.len(),
                lanes: LANES,
            });
        }
        let mut batch = Self::empty();
        for (lane, bounds) in boxes.iter().enumerate() {
            batch.write_lane(lane, bounds);
        }
        Ok(batch)
    }

    fn check_lane(lane: usize) -> Result<(), SlabError> {
        if lane < LANES {
            Ok(())
        } else {
            Err(SlabError::LaneOutOfRange {
                lane,
                lanes: LANES,
            })
        }
    }

    fn write_lane(&mut self, lane: usize, bounds: &Aabb) {
        for axis in 0..3 {
            self.min[axis][lane] = bounds.min[axis];
            self.max[axis][lane] = bounds.max[axis];
        }
    }

    pub fn set_lane(&mut self, lane: usize, bounds: &Aabb) -> Result<(), SlabError> {
        Self::check_lane(lane)?;
        self.write_lane(lane, bounds);
        Ok(())
    }

    /// Stores double precision bounds, rounded outwards so the stored box encloses the given one
    pub fn set_lane_f64(
        &mut self,
        lane: usize,
        min: V3c<f64>,
        max: V3c<f64>,
    ) -> Result<(), SlabError> {
        self.set_lane(lane, &Aabb::from_f64(min, max))
    }

    pub fn clear_lane(&mut self, lane: usize) -> Result<(), SlabError> {
        self.set_lane(lane, &Aabb::empty())
    }

    pub fn lane(&self, lane: usize) -> Result<Aabb, SlabError> {
        Self::check_lane(lane)?;
        Ok(Aabb {
            min: V3c::new(self.min[0][lane], self.min[1][lane], self.min[2][lane]),
            max: V3c::new(self.max[0][lane], self.max[1][lane], self.max[2][lane]),
        })
    }

    /// Mask of the lanes holding a box with valid ( non-inverted ) bounds
    pub fn valid_lanes(&self) -> HitMask {
        let mut bits = 0u8;
        for lane in 0..LANES.min(8) {
            let valid = (0..3).all(|axis| self.min[axis][lane] <= self.max[axis][lane]);
            bits |= (valid as u8) << lane;
        }
        HitMask(bits)
    }

    /// Entry and exit distance of the ray for a single lane; same rules as the batched test.
    /// Meant for the lanes a batched test flagged, so distances are only computed where needed.
    /// Lanes out of range are reported as not hit.
    pub fn lane_interval(&self, lane: usize, probe: &RayProbe, t_max: f32) -> Option<(f32, f32)> {
        self.lane(lane).ok()?.intersect(probe, t_max)
    }
}

impl<const LANES: usize> Default for AabbBatch<LANES> {
    fn default() -> Self {
        Self::empty()
    }
}

///####################################################################################
/// HitMask
///####################################################################################
impl HitMask {
    pub fn bits(&self) -> u8 {
        self.0
    }

    pub fn is_hit(&self, lane: usize) -> bool {
        lane < 8 && 0 != (self.0 & (0x01 << lane))
    }

    pub fn count(&self) -> u32 {
        self.0.count_ones()
    }

    pub fn is_empty(&self) -> bool {
        0 == self.0
    }

    /// Clears the bits of the lanes not set in `valid_lanes`
    pub fn masked(self, valid_lanes: impl Into<HitMask>) -> HitMask {
        HitMask(self.0 & valid_lanes.into().0)
    }

    pub fn lanes(&self) -> HitLanes {
        HitLanes(self.0)
    }
}

impl From<u8> for HitMask {
    fn from(bits: u8) -> Self {
        HitMask(bits)
    }
}

impl From<HitMask> for u8 {
    fn from(mask: HitMask) -> u8 {
        mask.0
    }
}

impl IntoIterator for HitMask {
    type Item = usize;
    type IntoIter = HitLanes;

    fn into_iter(self) -> HitLanes {
        self.lanes()
    }
}

impl Iterator for HitLanes {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if 0 == self.0 {
            return None;
        }
        let lane = self.0.trailing_zeros() as usize;
        self.0 &= self.0 - 1;
        Some(lane)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.0.count_ones() as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for HitLanes {}
