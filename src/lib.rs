//! Stereocorr is a CPU-first dense stereo correlator.
//!
//! Given a left and a right image with validity masks, the correlator finds
//! for every left pixel the offset `(dx, dy)` of the best-matching window in
//! the right image within a configured search range. Images can be
//! preprocessed (`PreFilter`), windows are scored with one of three cost
//! metrics (`Metric`), and results can be sub-pixel refined and checked for
//! left-right consistency. Work is split into output tiles, optionally
//! processed in parallel via the `rayon` feature; the `simd` feature
//! vectorizes the cost kernels.

pub mod cancel;
pub mod correlate;
pub mod disparity;
pub mod filter;
pub mod image;
pub mod lowlevel;
pub mod metric;
mod refine;
pub mod search;
mod trace;
pub mod util;

pub use cancel::CancelToken;
pub use correlate::{Correlator, CorrelatorConfig};
pub use disparity::{Disparity, DisparityMap};
pub use filter::PreFilter;
pub use image::{
    materialize, EdgeExtension, ImageView, MaskView, OwnedImage, PixelSource, Translated,
};
pub use metric::Metric;
pub use search::{KernelSize, SearchRange};
pub use util::{StereoError, StereoResult};
