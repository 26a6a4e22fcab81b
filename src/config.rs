use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{AnalysisError, Result};

/// Optional overrides file, looked up in the working directory.
pub const CONFIG_FILE_NAME: &'static str = "constituinte.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    pub input_path: PathBuf,
    pub output_dir: PathBuf,
    pub delimiter: char,
    /// WHATWG encoding label, resolved through `encoding_rs`.
    pub encoding: String,
    pub na_values: Vec<String>,
    pub plot: PlotConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            input_path: PathBuf::from("dados_constituinte.csv"),
            output_dir: PathBuf::from("."),
            delimiter: ';',
            encoding: String::from("latin1"),
            na_values: vec![String::from("NA"), String::new()],
            plot: PlotConfig::default(),
        }
    }
}

impl AnalysisConfig {
    /// Reads `constituinte.json` from `dir` when present, defaults otherwise.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        if !path.exists() {
            debug!("no {} found, using defaults", CONFIG_FILE_NAME);
            return Ok(AnalysisConfig::default());
        }
        let raw = fs::read_to_string(&path).map_err(|source| AnalysisError::Io {
            path: path.clone(),
            source,
        })?;
        let config: AnalysisConfig = serde_json::from_str(&raw)?;
        info!(path = %path.display(), "loaded configuration overrides");
        Ok(config)
    }

    pub fn delimiter_byte(&self) -> u8 {
        let mut buf = [0u8; 4];
        self.delimiter.encode_utf8(&mut buf);
        buf[0]
    }
}

/// Figure dimensions in inches; pixel size is derived from [`PlotConfig::dpi`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FigureSize {
    pub width: f64,
    pub height: f64,
}

impl FigureSize {
    pub const fn new(width: f64, height: f64) -> Self {
        FigureSize { width, height }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlotStyle {
    pub background: String,
    pub grid: bool,
    pub grid_alpha: f64,
}

impl Default for PlotStyle {
    fn default() -> Self {
        PlotStyle {
            background: String::from("#FFFFFF"),
            grid: true,
            grid_alpha: 0.3,
        }
    }
}

/// Rendering settings handed to the renderer instead of living in global state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlotConfig {
    pub dpi: u32,
    /// Base font size in points.
    pub font_size: f64,
    pub style: PlotStyle,
}

impl Default for PlotConfig {
    fn default() -> Self {
        PlotConfig {
            dpi: 300,
            font_size: 12.0,
            style: PlotStyle::default(),
        }
    }
}

impl PlotConfig {
    pub fn pixels(&self, size: FigureSize) -> (u32, u32) {
        let dpi = self.dpi as f64;
        (
            (size.width * dpi).round().max(1.0) as u32,
            (size.height * dpi).round().max(1.0) as u32,
        )
    }

    /// Converts a point size into pixels at the configured resolution.
    pub fn points_to_px(&self, points: f64) -> f64 {
        points * self.dpi as f64 / 72.0
    }

    pub fn font_px(&self) -> f64 {
        self.points_to_px(self.font_size)
    }
}
