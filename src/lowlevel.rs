//! Low-level building blocks for custom correlation pipelines.
//!
//! These expose the cost kernels, reference-window plans, and sub-pixel
//! helpers used inside the correlator. Most users should prefer
//! `Correlator`.

pub use crate::image::{Patch, Rect};
pub use crate::metric::scalar::ScalarKernel;
#[cfg(feature = "simd")]
pub use crate::metric::simd::SimdKernel;
pub use crate::metric::{CostKernel, WindowPlan, NCC_MIN_STDDEV};
pub use crate::refine::quad1d::quad_min_offset_1d;
pub use crate::refine::quad2d::{refine_disparity_2d, AxisCosts};
