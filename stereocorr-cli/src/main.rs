use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use stereocorr::image::io::{load_gray_image, load_mask, save_gray_image};
use stereocorr::{
    Correlator, CorrelatorConfig, DisparityMap, KernelSize, Metric, OwnedImage, PreFilter,
    SearchRange,
};
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "Stereocorr CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output for performance profiling.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum FilterConfig {
    Null,
    Blur,
    Log,
    Slog,
}

impl From<FilterConfig> for PreFilter {
    fn from(value: FilterConfig) -> Self {
        match value {
            FilterConfig::Null => PreFilter::Null,
            FilterConfig::Blur => PreFilter::Blur,
            FilterConfig::Log => PreFilter::Log,
            FilterConfig::Slog => PreFilter::SLog,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum MetricConfig {
    AbsDiff,
    SqrDiff,
    NormXcorr,
}

impl From<MetricConfig> for Metric {
    fn from(value: MetricConfig) -> Self {
        match value {
            MetricConfig::AbsDiff => Metric::AbsDiff,
            MetricConfig::SqrDiff => Metric::SqrDiff,
            MetricConfig::NormXcorr => Metric::NormXCorr,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct SearchRangeJson {
    dx_min: i32,
    dx_max: i32,
    dy_min: i32,
    dy_max: i32,
}

impl Default for SearchRangeJson {
    fn default() -> Self {
        let range = SearchRange::default();
        Self {
            dx_min: range.dx_min,
            dx_max: range.dx_max,
            dy_min: range.dy_min,
            dy_max: range.dy_max,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct CorrelatorConfigJson {
    filter: FilterConfig,
    metric: MetricConfig,
    kernel_size: [usize; 2],
    search_range: SearchRangeJson,
    subpixel: bool,
    consistency_threshold: Option<f32>,
    tile_size: [usize; 2],
    parallel: bool,
}

impl Default for CorrelatorConfigJson {
    fn default() -> Self {
        let cfg = CorrelatorConfig::default();
        Self {
            filter: FilterConfig::Null,
            metric: MetricConfig::AbsDiff,
            kernel_size: [cfg.kernel_size.width, cfg.kernel_size.height],
            search_range: SearchRangeJson::default(),
            subpixel: cfg.subpixel,
            consistency_threshold: cfg.consistency_threshold,
            tile_size: [cfg.tile_size.0, cfg.tile_size.1],
            parallel: cfg.parallel,
        }
    }
}

impl CorrelatorConfigJson {
    fn into_config(self) -> Result<CorrelatorConfig, Box<dyn std::error::Error>> {
        Ok(CorrelatorConfig {
            filter: self.filter.into(),
            metric: self.metric.into(),
            kernel_size: KernelSize::new(self.kernel_size[0], self.kernel_size[1])?,
            search_range: SearchRange::new(
                self.search_range.dx_min,
                self.search_range.dx_max,
                self.search_range.dy_min,
                self.search_range.dy_max,
            )?,
            subpixel: self.subpixel,
            consistency_threshold: self.consistency_threshold,
            tile_size: (self.tile_size[0], self.tile_size[1]),
            parallel: self.parallel,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Config {
    left_path: String,
    right_path: String,
    left_mask_path: Option<String>,
    right_mask_path: Option<String>,
    output_path: Option<String>,
    disparity_image_path: Option<String>,
    correlator: CorrelatorConfigJson,
}

#[derive(Debug, Serialize)]
struct Range {
    min: [f32; 2],
    max: [f32; 2],
}

#[derive(Debug, Serialize)]
struct Output {
    width: usize,
    height: usize,
    valid: usize,
    invalid: usize,
    valid_fraction: f32,
    disparity_range: Option<Range>,
}

impl From<&DisparityMap> for Output {
    fn from(map: &DisparityMap) -> Self {
        let total = map.width() * map.height();
        let valid = map.valid_count();
        Self {
            width: map.width(),
            height: map.height(),
            valid,
            invalid: total - valid,
            valid_fraction: valid as f32 / total as f32,
            disparity_range: map.min_max().map(|(lo, hi)| Range {
                min: [lo.dx, lo.dy],
                max: [hi.dx, hi.dy],
            }),
        }
    }
}

fn load_mask_or_full(
    path: Option<&str>,
    width: usize,
    height: usize,
) -> Result<OwnedImage<u8>, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(load_mask(path)?),
        None => Ok(OwnedImage::filled(width, height, 1u8)?),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive("stereocorr=info".parse()?),
            )
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.left_path.is_empty() || config.right_path.is_empty() {
        return Err("left_path and right_path must be set in the config".into());
    }

    let left = load_gray_image(&config.left_path)?;
    let right = load_gray_image(&config.right_path)?;
    let left_mask = load_mask_or_full(
        config.left_mask_path.as_deref(),
        left.width(),
        left.height(),
    )?;
    let right_mask = load_mask_or_full(
        config.right_mask_path.as_deref(),
        right.width(),
        right.height(),
    )?;

    let correlator = Correlator::new(config.correlator.into_config()?)?;
    let map = correlator.correlate(&left, &right, left_mask.view(), right_mask.view())?;
    tracing::info!(valid = map.valid_count(), "correlation finished");

    if let Some(path) = &config.disparity_image_path {
        save_gray_image(&map.to_gray_image(), path)?;
    }

    let json = serde_json::to_string_pretty(&Output::from(&map))?;
    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
