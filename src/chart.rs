//! Backend-independent chart descriptions.
//!
//! Analysis steps build a [`Figure`] and hand it to a [`Renderer`]; only the
//! renderer knows about pixels, fonts and files.

use std::path::{Path, PathBuf};

use crate::config::FigureSize;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Parses `#RRGGBB`.
    pub fn from_hex(hex: &str) -> Option<Rgb> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        Some(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

pub const SKY_BLUE: Rgb = Rgb(0x87, 0xCE, 0xEB);
pub const LIGHT_GREEN: Rgb = Rgb(0x90, 0xEE, 0x90);

const SET3: [Rgb; 12] = [
    Rgb(0x8D, 0xD3, 0xC7),
    Rgb(0xFF, 0xFF, 0xB3),
    Rgb(0xBE, 0xBA, 0xDA),
    Rgb(0xFB, 0x80, 0x72),
    Rgb(0x80, 0xB1, 0xD3),
    Rgb(0xFD, 0xB4, 0x62),
    Rgb(0xB3, 0xDE, 0x69),
    Rgb(0xFC, 0xCD, 0xE5),
    Rgb(0xD9, 0xD9, 0xD9),
    Rgb(0xBC, 0x80, 0xBD),
    Rgb(0xCC, 0xEB, 0xC5),
    Rgb(0xFF, 0xED, 0x6F),
];

/// `n` colors spread evenly across the qualitative Set3 palette.
pub fn set3_spread(n: usize) -> Vec<Rgb> {
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![SET3[0]];
    }
    (0..n)
        .map(|i| {
            let t = i as f64 / (n - 1) as f64;
            let idx = ((t * SET3.len() as f64) as usize).min(SET3.len() - 1);
            SET3[idx]
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub title: String,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub bars: Vec<(String, u64)>,
    pub orientation: Orientation,
    /// Cycled over the bars.
    pub colors: Vec<Rgb>,
    pub alpha: f64,
    /// Print the count next to each non-empty bar.
    pub annotate: bool,
    /// First bar drawn at the top of a horizontal chart.
    pub inverted: bool,
    pub rotate_labels: bool,
    pub grid: bool,
}

impl BarChart {
    pub fn new(title: impl Into<String>, bars: Vec<(String, u64)>, orientation: Orientation) -> Self {
        BarChart {
            title: title.into(),
            x_label: None,
            y_label: None,
            bars,
            orientation,
            colors: vec![SKY_BLUE],
            alpha: 1.0,
            annotate: true,
            inverted: false,
            rotate_labels: false,
            grid: false,
        }
    }

    pub fn max_value(&self) -> u64 {
        self.bars.iter().map(|(_, v)| *v).max().unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieChart {
    pub title: String,
    pub slices: Vec<(String, u64)>,
    pub colors: Vec<Rgb>,
    /// Degrees, counter-clockwise from three o'clock.
    pub start_angle: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    pub title: String,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub points: Vec<(String, u64)>,
    pub color: Rgb,
    pub markers: bool,
    pub grid: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Chart {
    Bar(BarChart),
    Pie(PieChart),
    Line(LineChart),
}

/// One output image: a grid of panels, filled row by row.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub file_name: String,
    pub title: Option<String>,
    pub size: FigureSize,
    pub grid: (usize, usize),
    pub panels: Vec<Chart>,
}

impl Figure {
    pub fn single(file_name: impl Into<String>, size: FigureSize, chart: Chart) -> Self {
        Figure {
            file_name: file_name.into(),
            title: None,
            size,
            grid: (1, 1),
            panels: vec![chart],
        }
    }
}

pub trait Renderer {
    /// Writes `figure` under `out_dir`, returning the path of the image.
    fn render(&self, figure: &Figure, out_dir: &Path) -> Result<PathBuf>;
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_colors() {
        assert_eq!(Rgb::from_hex("#FF6B6B"), Some(Rgb(0xFF, 0x6B, 0x6B)));
        assert_eq!(Rgb::from_hex("4ecdc4"), Some(Rgb(0x4E, 0xCD, 0xC4)));
        assert_eq!(Rgb::from_hex("#FFF"), None);
        assert_eq!(Rgb::from_hex("#GGGGGG"), None);
    }

    #[test]
    fn set3_spread_spans_palette_ends() {
        let colors = set3_spread(10);
        assert_eq!(colors.len(), 10);
        assert_eq!(colors[0], SET3[0]);
        assert_eq!(colors[9], SET3[11]);
        assert!(set3_spread(0).is_empty());
    }
}
