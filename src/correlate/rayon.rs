//! Tile-parallel driver (feature-gated).
//!
//! Tiles are processed on the rayon pool with one scratch set per worker and
//! collected in tile order, so the merged map matches the sequential path.

use super::pixel::Scratch;
use super::{Correlator, TileOutput};
use crate::cancel::CancelToken;
use crate::image::{MaskView, PixelSource, Rect};
use crate::util::{StereoError, StereoResult};
use rayon::prelude::*;

pub(super) fn run_tiles_par<L, R>(
    correlator: &Correlator,
    left: &L,
    right: &R,
    left_mask: MaskView<'_>,
    right_mask: MaskView<'_>,
    tiles: &[Rect],
    cancel: &CancelToken,
) -> StereoResult<Vec<TileOutput>>
where
    L: PixelSource + Sync + ?Sized,
    R: PixelSource + Sync + ?Sized,
{
    tiles
        .par_iter()
        .map_init(Scratch::default, |scratch, &tile| {
            if cancel.is_cancelled() {
                return Err(StereoError::Cancelled);
            }
            Ok(correlator.process_tile(left, right, left_mask, right_mask, tile, scratch))
        })
        .collect()
}
