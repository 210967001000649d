//! Colorbar image rendering.
//!
//! The bar is drawn vertically with the minimum at the bottom, primary-unit
//! ticks on the left and secondary-unit ticks on the right. Labels are drawn
//! sideways so that once the finished image is turned a quarter turn
//! clockwise the bar reads left to right with upright text.

use image::{imageops, Rgba, RgbaImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_line_segment_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use once_cell::sync::Lazy;
use rusttype::{Font, Scale};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use super::ticks::{primary_ticks, secondary_ticks, Ticks, Unit};
use crate::colormaps::{colormap_for, ColorRamp};
use crate::error::{Result, TilesError};

/// Embedded font data - DejaVu Sans
const FONT_DATA: &[u8] = include_bytes!("../../assets/DejaVuSans.ttf");

static FONT: Lazy<Option<Font<'static>>> = Lazy::new(|| Font::try_from_bytes(FONT_DATA));

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);
const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Geometry and typography of the colorbar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendStyle {
    /// Label font size in pixels
    #[serde(default = "default_font_size")]
    pub font_size: f32,

    /// Width of the color bar in pixels
    #[serde(default = "default_bar_width")]
    pub bar_width: u32,

    /// Length of the color bar in pixels
    #[serde(default = "default_bar_height")]
    pub bar_height: u32,

    /// Length of tick marks in pixels
    #[serde(default = "default_tick_length")]
    pub tick_length: u32,

    /// Transparent margin around the drawing
    #[serde(default = "default_padding")]
    pub padding: u32,
}

impl Default for LegendStyle {
    fn default() -> Self {
        Self {
            font_size: default_font_size(),
            bar_width: default_bar_width(),
            bar_height: default_bar_height(),
            tick_length: default_tick_length(),
            padding: default_padding(),
        }
    }
}

fn default_font_size() -> f32 {
    24.0
}

fn default_bar_width() -> u32 {
    60
}

fn default_bar_height() -> u32 {
    800
}

fn default_tick_length() -> u32 {
    10
}

fn default_padding() -> u32 {
    25
}

/// Render the colorbar for `ramp`, unrotated (bar vertical)
pub fn render_colorbar(
    values: &[f64],
    ramp: &ColorRamp,
    unit: Unit,
    style: &LegendStyle,
) -> Result<RgbaImage> {
    if style.bar_width == 0 || style.bar_height == 0 {
        return Err(TilesError::ImageGeneration {
            message: "colorbar dimensions must be non-zero".to_string(),
        });
    }

    let font = FONT.as_ref().ok_or_else(|| TilesError::ImageGeneration {
        message: "Failed to load embedded font".to_string(),
    })?;
    let scale = Scale::uniform(style.font_size);

    let primary = primary_ticks(values)?;
    let secondary = secondary_ticks(values, unit)?;
    let colormap = colormap_for(ramp)?;

    let left_title = sideways_label(font, scale, unit.name());
    let right_title = sideways_label(font, scale, unit.secondary_name());
    let left_labels: Vec<RgbaImage> = primary
        .labels
        .iter()
        .map(|text| sideways_label(font, scale, text))
        .collect();
    let right_labels: Vec<RgbaImage> = secondary
        .labels
        .iter()
        .map(|text| sideways_label(font, scale, text))
        .collect();

    let gap = (style.font_size / 3.0).ceil() as u32;
    let left_label_width = left_labels.iter().map(|l| l.width()).max().unwrap_or(0);
    let right_label_width = right_labels.iter().map(|l| l.width()).max().unwrap_or(0);
    let label_overhang = left_labels
        .iter()
        .chain(&right_labels)
        .map(|l| l.height() / 2 + 1)
        .max()
        .unwrap_or(0);

    let bar_top = style.padding + label_overhang;
    let bar_left =
        style.padding + left_title.width() + gap + left_label_width + gap + style.tick_length;
    let bar_right = bar_left + style.bar_width;
    let width = bar_right
        + style.tick_length
        + gap
        + right_label_width
        + gap
        + right_title.width()
        + style.padding;
    let height = (bar_top + style.bar_height + label_overhang + style.padding)
        .max(left_title.height() + 2 * style.padding)
        .max(right_title.height() + 2 * style.padding);

    debug!(
        width = width,
        height = height,
        stops = ramp.len(),
        unit = %unit,
        "Rendering colorbar"
    );

    let mut img = RgbaImage::from_pixel(width, height, TRANSPARENT);

    // Color bar, maximum at the top
    for row in 0..style.bar_height {
        let position = 1.0 - (row as f64 + 0.5) / style.bar_height as f64;
        let color = Rgba(colormap.map_normalized(position));
        for col in 0..style.bar_width {
            img.put_pixel(bar_left + col, bar_top + row, color);
        }
    }
    draw_hollow_rect_mut(
        &mut img,
        Rect::at(bar_left as i32, bar_top as i32).of_size(style.bar_width, style.bar_height),
        BLACK,
    );

    let axis = BarAxis {
        top: bar_top,
        length: style.bar_height,
    };

    for (y, label) in axis.tick_rows(&primary).zip(&left_labels) {
        if let Some(y) = y {
            draw_tick(&mut img, bar_left - style.tick_length, bar_left, y);
            let x = bar_left - style.tick_length - gap - label.width();
            imageops::overlay(&mut img, label, x as i64, y as i64 - (label.height() / 2) as i64);
        }
    }

    for (y, label) in axis.tick_rows(&secondary).zip(&right_labels) {
        if let Some(y) = y {
            draw_tick(&mut img, bar_right, bar_right + style.tick_length, y);
            let x = bar_right + style.tick_length + gap;
            imageops::overlay(&mut img, label, x as i64, y as i64 - (label.height() / 2) as i64);
        }
    }

    let centre = bar_top + style.bar_height / 2;
    imageops::overlay(
        &mut img,
        &left_title,
        style.padding as i64,
        centre as i64 - (left_title.height() / 2) as i64,
    );
    imageops::overlay(
        &mut img,
        &right_title,
        (width - style.padding - right_title.width()) as i64,
        centre as i64 - (right_title.height() / 2) as i64,
    );

    Ok(img)
}

/// Render the colorbar to `path`, then turn the saved image a quarter turn
/// clockwise so the bar is horizontal, overwriting the same file
pub fn write_colorbar(
    path: &Path,
    values: &[f64],
    ramp: &ColorRamp,
    unit: Unit,
    style: &LegendStyle,
) -> Result<()> {
    let img = render_colorbar(values, ramp, unit, style)?;
    img.save(path)?;

    let saved = image::open(path)?.to_rgba8();
    let rotated = imageops::rotate90(&saved);
    rotated.save(path)?;

    debug!(
        path = %path.display(),
        width = rotated.width(),
        height = rotated.height(),
        "Colorbar written"
    );
    Ok(())
}

/// Vertical pixel layout of the bar
struct BarAxis {
    top: u32,
    length: u32,
}

impl BarAxis {
    /// Pixel row of every tick, `None` for ticks outside the axis limits
    fn tick_rows<'a>(&'a self, ticks: &'a Ticks) -> impl Iterator<Item = Option<u32>> + 'a {
        let low = ticks.values[0];
        let high = ticks.values[4];
        ticks.values.iter().map(move |&value| {
            let position = (value - low) / (high - low);
            if !(0.0..=1.0).contains(&position) {
                return None;
            }
            let offset = ((1.0 - position) * self.length as f64).round() as u32;
            Some(self.top + offset.min(self.length - 1))
        })
    }
}

/// Two-pixel horizontal tick mark
fn draw_tick(img: &mut RgbaImage, from_x: u32, to_x: u32, y: u32) {
    for dy in 0..2 {
        let y = (y + dy) as f32;
        draw_line_segment_mut(img, (from_x as f32, y), (to_x as f32, y), BLACK);
    }
}

/// Text drawn on its own transparent tile and turned to read bottom to top
fn sideways_label(font: &Font<'static>, scale: Scale, text: &str) -> RgbaImage {
    let (w, h) = text_size(scale, font, text);
    let mut label = RgbaImage::from_pixel(w.max(1) as u32 + 2, h.max(1) as u32 + 2, TRANSPARENT);
    draw_text_mut(&mut label, BLACK, 1, 1, scale, font, text);
    imageops::rotate270(&label)
}
