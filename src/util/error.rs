//! Error types for stereocorr.

use thiserror::Error;

/// Result alias for stereocorr operations.
pub type StereoResult<T> = std::result::Result<T, StereoError>;

/// Errors raised while validating inputs or configuration.
///
/// Per-pixel failures (border, masks, degenerate windows) are never errors;
/// they show up as invalid cells in the disparity map.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StereoError {
    /// Image dimensions are zero or overflow.
    #[error("invalid dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Stride is smaller than the row width.
    #[error("invalid stride {stride} for width {width}")]
    InvalidStride { width: usize, stride: usize },
    /// Backing buffer is shorter than the view requires.
    #[error("buffer too small: needed {needed} elements, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// Correlation kernel has a zero extent.
    #[error("invalid kernel size {width}x{height}")]
    InvalidKernelSize { width: usize, height: usize },
    /// Search range is empty or inverted on at least one axis.
    #[error("empty search range dx [{dx_min}, {dx_max}] dy [{dy_min}, {dy_max}]")]
    EmptySearchRange {
        dx_min: i32,
        dx_max: i32,
        dy_min: i32,
        dy_max: i32,
    },
    /// A configuration value was rejected.
    #[error("invalid config: {reason}")]
    InvalidConfig { reason: &'static str },
    /// A mask does not match the size of its image.
    #[error("{what} is {width}x{height}, expected {expected_width}x{expected_height}")]
    DimensionMismatch {
        what: &'static str,
        expected_width: usize,
        expected_height: usize,
        width: usize,
        height: usize,
    },
    /// Cancellation was requested between tiles.
    #[error("correlation cancelled")]
    Cancelled,
    /// Image decoding or encoding failed.
    #[error("image io error: {reason}")]
    ImageIo { reason: String },
}
