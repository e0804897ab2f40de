//! Density histograms of length distributions, rendered to PNG

use std::path::Path;

use image::{Rgb, RgbImage};

use crate::config::Config;
use crate::error::Result;

const WIDTH: u32 = 640;
const HEIGHT: u32 = 480;
const MARGIN: u32 = 48;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const BAR: Rgb<u8> = Rgb([135, 206, 250]);
const BAR_EDGE: Rgb<u8> = Rgb([96, 160, 205]);
const GRID: Rgb<u8> = Rgb([220, 220, 220]);
const AXIS: Rgb<u8> = Rgb([0, 0, 0]);

/// `histogram_of_<type>_length.png`, lower-cased
pub fn histogram_filename(type_text: &str) -> String {
    format!("histogram_of_{type_text}_length.png").to_lowercase()
}

/// Draws a histogram of `data` to `path`
pub trait HistogramRenderer {
    fn render(&self, data: &[usize], path: &Path) -> Result<()>;
}

/// Unit-width bins over integer edges `0..bins`, y-axis as probability density
#[derive(Debug, Clone, Copy)]
pub struct PngHistogram {
    pub bins: usize,
    pub x_max: f64,
    pub y_max: f64,
}

impl PngHistogram {
    pub fn new(config: &Config) -> Self {
        Self {
            bins: config.histogram_bins,
            x_max: config.histogram_x_max,
            y_max: config.histogram_y_max,
        }
    }

    /// Density of each unit bin. The last bin is closed on the right and
    /// values past the last edge are ignored.
    pub fn densities(&self, data: &[usize]) -> Vec<f64> {
        let num_bins = self.bins.saturating_sub(1);
        let mut counts = vec![0usize; num_bins];
        for &value in data {
            if num_bins == 0 || value > num_bins {
                continue;
            }
            counts[value.min(num_bins - 1)] += 1;
        }

        let in_range: usize = counts.iter().sum();
        if in_range == 0 {
            return vec![0.0; num_bins];
        }
        counts
            .into_iter()
            .map(|count| count as f64 / in_range as f64)
            .collect()
    }

    fn x_pixel(&self, x: f64) -> u32 {
        let span = f64::from(WIDTH - 2 * MARGIN);
        MARGIN + ((x / self.x_max).clamp(0.0, 1.0) * span) as u32
    }

    fn y_pixel(&self, y: f64) -> u32 {
        let span = f64::from(HEIGHT - 2 * MARGIN);
        HEIGHT - MARGIN - ((y / self.y_max).clamp(0.0, 1.0) * span) as u32
    }

    fn draw(&self, data: &[usize]) -> RgbImage {
        let mut img = RgbImage::from_pixel(WIDTH, HEIGHT, BACKGROUND);
        let (left, right) = (self.x_pixel(0.0), self.x_pixel(self.x_max));
        let (top, bottom) = (self.y_pixel(self.y_max), self.y_pixel(0.0));

        // grid: every other x tick, every 0.05 on y
        for tick in (0..self.bins).step_by(2) {
            vline(&mut img, self.x_pixel(tick as f64), top, bottom, GRID);
        }
        let mut y = 0.0;
        while y <= self.y_max {
            hline(&mut img, left, right, self.y_pixel(y), GRID);
            y += 0.05;
        }

        for (bin, density) in self.densities(data).into_iter().enumerate() {
            if density <= 0.0 {
                continue;
            }
            let x0 = self.x_pixel(bin as f64);
            let x1 = self.x_pixel(bin as f64 + 1.0);
            let y0 = self.y_pixel(density);
            for x in x0..x1 {
                vline(&mut img, x, y0, bottom, BAR);
            }
            vline(&mut img, x0, y0, bottom, BAR_EDGE);
            hline(&mut img, x0, x1, y0, BAR_EDGE);
        }

        hline(&mut img, left, right, bottom, AXIS);
        vline(&mut img, left, top, bottom, AXIS);
        img
    }
}

impl HistogramRenderer for PngHistogram {
    fn render(&self, data: &[usize], path: &Path) -> Result<()> {
        self.draw(data).save(path)?;
        Ok(())
    }
}

fn vline(img: &mut RgbImage, x: u32, y0: u32, y1: u32, color: Rgb<u8>) {
    if x >= img.width() {
        return;
    }
    for y in y0..=y1.min(img.height() - 1) {
        img.put_pixel(x, y, color);
    }
}

fn hline(img: &mut RgbImage, x0: u32, x1: u32, y: u32, color: Rgb<u8>) {
    if y >= img.height() {
        return;
    }
    for x in x0..=x1.min(img.width() - 1) {
        img.put_pixel(x, y, color);
    }
}
