//! Application and pipeline configuration.
//!
//! Every threshold, kernel shape and distance used by the action detector
//! lives in [`PipelineConfig`]. Defaults are the reference tunables for
//! 180-pool optical-flow matrices.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{FlowbeatError, FlowbeatResult};

/// Global application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Action detector tunables.
    pub pipeline: PipelineConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Rectangular all-ones structuring element applied `iterations` times.
///
/// `rows`/`cols` follow the `(height, width)` order. The anchor sits at
/// `(rows / 2, cols / 2)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KernelSpec {
    pub rows: usize,
    pub cols: usize,
    pub iterations: usize,
}

impl KernelSpec {
    pub const fn new(rows: usize, cols: usize, iterations: usize) -> Self {
        Self {
            rows,
            cols,
            iterations,
        }
    }

    fn validate(&self, name: &str) -> FlowbeatResult<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(FlowbeatError::config(format!(
                "{name}: structuring element must be at least 1x1, got {}x{}",
                self.rows, self.cols
            )));
        }
        Ok(())
    }
}

/// Tunables for the full image-to-events pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Normalizer clipping.
    pub normalize: NormalizeConfig,

    /// Directional differencer.
    pub differencer: DifferencerConfig,

    /// Mask refiner.
    pub refine: RefineConfig,

    /// Peak/valley extraction and event labels.
    pub extract: ExtractConfig,
}

/// Intensity ceiling derived from the canonical capture resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    pub reference_width: usize,
    pub reference_height: usize,

    /// Fraction of the reference pixel count used as the clipping ceiling.
    pub noise_ceiling_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifferencerConfig {
    /// Samples strictly above this become foreground.
    pub binarize_threshold: u8,

    /// Row where the rotated frame is split into two equal halves.
    /// The rotated frame must have exactly `2 * split_row` rows.
    pub split_row: usize,

    /// Circular column shift applied to each half before the minimum.
    pub edge_shift: usize,

    pub pre_dilate: KernelSpec,
    pub pre_close: KernelSpec,
    pub post_dilate: KernelSpec,

    /// Columns rolled left after the pre-filter.
    pub realign_shift: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefineConfig {
    /// Threshold turning the primary field into a mask seed.
    pub mask_threshold: u8,
    pub mask_dilate: KernelSpec,
    pub mask_close: KernelSpec,

    /// Threshold applied to the gated secondary field.
    pub gate_threshold: u8,
    pub gate_dilate: KernelSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Minimum value (of the series or its negation) for a candidate.
    pub min_height: f64,

    /// Minimum index distance between two kept extrema of the same kind.
    pub min_distance: usize,

    pub valley_category: i32,
    pub peak_category: i32,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            reference_width: 1280,
            reference_height: 720,
            noise_ceiling_ratio: 0.01,
        }
    }
}

impl Default for DifferencerConfig {
    fn default() -> Self {
        Self {
            binarize_threshold: 15,
            split_row: 90,
            edge_shift: 2,
            pre_dilate: KernelSpec::new(2, 2, 1),
            pre_close: KernelSpec::new(8, 2, 2),
            post_dilate: KernelSpec::new(2, 2, 1),
            realign_shift: 4,
        }
    }
}

impl Default for RefineConfig {
    fn default() -> Self {
        Self {
            mask_threshold: 70,
            mask_dilate: KernelSpec::new(4, 4, 1),
            mask_close: KernelSpec::new(3, 8, 4),
            gate_threshold: 5,
            gate_dilate: KernelSpec::new(4, 2, 1),
        }
    }
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            min_height: 0.0,
            min_distance: 6,
            valley_category: 10,
            peak_category: 90,
        }
    }
}

impl NormalizeConfig {
    /// Clipping ceiling: `floor(width * height * ratio)`.
    pub fn clip_ceiling(&self) -> f64 {
        (self.reference_width as f64 * self.reference_height as f64 * self.noise_ceiling_ratio)
            .floor()
    }
}

impl DifferencerConfig {
    /// Number of rows the rotated frame must have.
    pub fn expected_rows(&self) -> usize {
        self.split_row * 2
    }
}

impl PipelineConfig {
    /// Check the tunables for values the pipeline cannot work with.
    pub fn validate(&self) -> FlowbeatResult<()> {
        let ceiling = self.normalize.clip_ceiling();
        if !ceiling.is_finite() || ceiling <= 0.0 {
            return Err(FlowbeatError::config(format!(
                "clipping ceiling must be positive, got {ceiling}"
            )));
        }
        if self.differencer.split_row == 0 {
            return Err(FlowbeatError::config("split_row must be at least 1"));
        }
        if self.extract.min_distance == 0 {
            return Err(FlowbeatError::config("min_distance must be at least 1"));
        }
        if self.extract.valley_category == self.extract.peak_category {
            return Err(FlowbeatError::config(
                "valley and peak categories must differ",
            ));
        }

        self.differencer.pre_dilate.validate("differencer.pre_dilate")?;
        self.differencer.pre_close.validate("differencer.pre_close")?;
        self.differencer.post_dilate.validate("differencer.post_dilate")?;
        self.refine.mask_dilate.validate("refine.mask_dilate")?;
        self.refine.mask_close.validate("refine.mask_close")?;
        self.refine.gate_dilate.validate("refine.gate_dilate")?;
        Ok(())
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "flowbeat=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match Self::load_from(&config_path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!("Failed to load config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Load and validate config from an explicit path.
    pub fn load_from(path: &Path) -> FlowbeatResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.pipeline.validate()?;
        Ok(config)
    }

    /// Save config to the standard location.
    pub fn save(&self) -> FlowbeatResult<()> {
        self.save_to(&config_file_path())
    }

    /// Save config as pretty JSON at `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> FlowbeatResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("flowbeat").join("config.json")
}
