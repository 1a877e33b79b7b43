use std::{ops::Range, path::PathBuf};

/// NOAA GHCN-daily extract for the stations around Ann Arbor, Michigan.
pub const DATA_PATH: &str = "fb441e62df2d58994928907a91895ec62c2c42e6cd075c2700843b89.csv";
pub const STATION: &str = "Ann Arbor, Michigan";
pub const TARGET_YEAR: i32 = 2015;

#[derive(Debug, Clone)]
pub struct Config {
    pub data_path: PathBuf,
    pub station: String,
    pub target_year: i32,
    pub chart: ChartConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DATA_PATH),
            station: STATION.to_string(),
            target_year: TARGET_YEAR,
            chart: ChartConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartConfig {
    /// Inches, converted to pixels with `dpi`.
    pub figure_size: (f32, f32),
    pub dpi: u32,
    pub x_range: Range<i32>,
    pub y_range: Range<f32>,
    /// Day of year the two baseline annotations point at.
    pub annotation_day: u16,
    /// How far below its line an annotation's text sits, in degrees.
    pub annotation_drop: f32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            figure_size: (12.0, 7.0),
            dpi: 150,
            x_range: 1..367,
            y_range: -50.0..50.0,
            annotation_day: 310,
            annotation_drop: 25.0,
        }
    }
}

impl ChartConfig {
    pub fn pixel_size(&self) -> (u32, u32) {
        let (width, height) = self.figure_size;
        (
            (width * self.dpi as f32).round() as u32,
            (height * self.dpi as f32).round() as u32,
        )
    }

    /// Maps a fraction of the plotting area (0 = left/bottom, 1 = right/top)
    /// to data coordinates.
    pub fn axes_fraction(&self, x: f32, y: f32) -> (i32, f32) {
        let width = (self.x_range.end - self.x_range.start) as f32;
        let height = self.y_range.end - self.y_range.start;
        (
            self.x_range.start + (x * width).round() as i32,
            self.y_range.start + y * height,
        )
    }
}
