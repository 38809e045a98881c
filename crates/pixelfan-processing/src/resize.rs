//! Width-targeted, aspect-preserving resize
//!
//! The resize ladder targets a width per size name; height follows the source
//! aspect ratio. Sources narrower than the target are kept at their original
//! dimensions rather than upscaled.

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};

/// Compute output dimensions for a target width. Returns the original
/// dimensions when the source is already at or below the target width.
pub fn target_dimensions(orig_width: u32, orig_height: u32, target_width: u32) -> (u32, u32) {
    if orig_width <= target_width {
        return (orig_width, orig_height);
    }
    let aspect_ratio = orig_height as f32 / orig_width as f32;
    let height = (target_width as f32 * aspect_ratio).round() as u32;
    (target_width, height.max(1))
}

/// Select a resampling filter based on the downscale ratio. Strong downscales
/// get a cheaper filter; mild ones keep Lanczos3.
fn select_filter(orig_width: u32, orig_height: u32, new_width: u32, new_height: u32) -> FilterType {
    let width_ratio = orig_width as f32 / new_width as f32;
    let height_ratio = orig_height as f32 / new_height as f32;
    let max_ratio = width_ratio.max(height_ratio);

    if max_ratio > 2.0 {
        FilterType::Triangle
    } else if max_ratio > 1.5 {
        FilterType::CatmullRom
    } else {
        FilterType::Lanczos3
    }
}

/// Resize to a target width, preserving aspect ratio, never upscaling.
pub fn resize_to_width(img: &DynamicImage, target_width: u32) -> DynamicImage {
    let (orig_width, orig_height) = img.dimensions();
    let (width, height) = target_dimensions(orig_width, orig_height, target_width);

    if (width, height) == (orig_width, orig_height) {
        return img.clone();
    }

    let filter = select_filter(orig_width, orig_height, width, height);
    img.resize_exact(width, height, filter)
}
