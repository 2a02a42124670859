//! Sub-pixel refinement of integer disparities.

pub(crate) mod quad1d;
pub(crate) mod quad2d;
