use stereocorr::lowlevel::{quad_min_offset_1d, refine_disparity_2d, AxisCosts};
use stereocorr::{
    materialize, Disparity, DisparityMap, ImageView, KernelSize, Metric, OwnedImage, PixelSource,
    PreFilter, SearchRange, StereoError,
};

#[test]
fn image_view_rejects_invalid_dimensions() {
    let data = [0u8; 4];

    let err = ImageView::from_slice(&data, 0, 1).err().unwrap();
    assert_eq!(
        err,
        StereoError::InvalidDimensions {
            width: 0,
            height: 1,
        }
    );

    let err = ImageView::from_slice(&data, 1, 0).err().unwrap();
    assert_eq!(
        err,
        StereoError::InvalidDimensions {
            width: 1,
            height: 0,
        }
    );
}

#[test]
fn image_view_rejects_invalid_stride() {
    let data = [0u8; 8];

    let err = ImageView::new(&data, 4, 1, 3).err().unwrap();
    assert_eq!(
        err,
        StereoError::InvalidStride {
            width: 4,
            stride: 3,
        }
    );

    let err = ImageView::new(&data, 3, 3, 4).err().unwrap();
    assert_eq!(err, StereoError::BufferTooSmall { needed: 11, got: 8 });
}

#[test]
fn strided_view_samples_skip_padding() {
    let data = [1u8, 2, 3, 99, 4, 5, 6, 99];
    let view = ImageView::new(&data, 3, 2, 4).unwrap();
    assert_eq!(view.row(1), Some(&data[4..7]));
    let dense = materialize(&view).unwrap();
    assert_eq!(dense.data(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    assert_eq!(view.sample(2, 1), 6.0);
}

#[test]
fn search_range_and_kernel_validation() {
    assert!(matches!(
        SearchRange::new(3, 2, 0, 0),
        Err(StereoError::EmptySearchRange { .. })
    ));
    let range = SearchRange::new(-1, 2, 0, 1).unwrap();
    assert_eq!(range.len(), 8);
    let order: Vec<(i32, i32)> = range.iter().take(5).collect();
    assert_eq!(order, vec![(-1, 0), (0, 0), (1, 0), (2, 0), (-1, 1)]);
    assert_eq!(range.negated(), SearchRange::new(-2, 1, -1, 0).unwrap());

    assert_eq!(
        KernelSize::new(0, 3).unwrap_err(),
        StereoError::InvalidKernelSize {
            width: 0,
            height: 3,
        }
    );
    let kernel = KernelSize::new(5, 3).unwrap();
    assert_eq!(kernel.radius(), (2, 1));
    assert!(kernel.fits(2, 1, 5, 3));
    assert!(!kernel.fits(1, 1, 5, 3));
}

#[test]
fn null_filter_is_idempotent() {
    let img = OwnedImage::from_fn(9, 7, |x, y| ((x * 37 + y * 11) % 256) as u8).unwrap();
    let once = PreFilter::Null.apply(&img).unwrap();
    let twice = PreFilter::Null.apply(&once).unwrap();
    assert_eq!(once, twice);
    assert_eq!((once.width(), once.height()), (9, 7));
}

#[test]
fn metrics_score_identical_windows_best() {
    let window: Vec<f32> = (0..9).map(|v| (v * v) as f32).collect();
    let other: Vec<f32> = window.iter().rev().copied().collect();
    for metric in [Metric::AbsDiff, Metric::SqrDiff, Metric::NormXCorr] {
        let same = metric.cost_of(&window, &window).unwrap();
        let diff = metric.cost_of(&window, &other).unwrap();
        assert!(same < diff, "{}", metric.name());
        assert!(same.abs() < 1e-5, "{}", metric.name());
    }
    assert_eq!(Metric::NormXCorr.cost_of(&window, &[4.0; 9]), None);
}

#[test]
fn disparity_map_cells_and_summaries() {
    let mut map = DisparityMap::new(4, 3);
    assert_eq!(map.valid_count(), 0);
    assert_eq!(map.min_max(), None);
    assert_eq!(map.fraction_equal(0.0, 0.0), 0.0);

    map.set(1, 1, Disparity::new(3.0, 3.0));
    map.set(2, 1, Disparity::new(3.0, 3.0));
    map.set(3, 2, Disparity::new(-1.0, 2.5));
    assert_eq!(map.valid_count(), 3);
    assert!((map.fraction_equal(3.0, 3.0) - 2.0 / 3.0).abs() < 1e-6);
    let (lo, hi) = map.min_max().unwrap();
    assert_eq!((lo.dx, lo.dy, hi.dx, hi.dy), (-1.0, 2.5, 3.0, 3.0));

    map.invalidate(2, 1);
    assert!(!map.is_valid(2, 1));
    assert_eq!(map.get(1, 1), Some(Disparity::new(3.0, 3.0)));
    assert_eq!(map.get(9, 9), None);
}

#[test]
fn subpixel_helpers_locate_parabola_vertex() {
    let offset = quad_min_offset_1d(3.0, 1.0, 2.0).unwrap();
    assert!((offset - 1.0 / 6.0).abs() < 1e-6);
    assert_eq!(quad_min_offset_1d(1.0, 1.0, 1.0), None);

    let (dx, dy) = refine_disparity_2d(
        4,
        -1,
        AxisCosts {
            center: 1.0,
            x_minus: Some(3.0),
            x_plus: Some(2.0),
            y_minus: None,
            y_plus: Some(5.0),
        },
    );
    assert!((dx - (4.0 + 1.0 / 6.0)).abs() < 1e-6);
    assert_eq!(dy, -1.0);
}
