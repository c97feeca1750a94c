use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use super::PixelRect;

#[derive(Clone)]
pub struct CaptureBuffer {
    pub scale_factor: f64,
    pub width: u32,
    pub height: u32,
    raw_data: Vec<u8>,
}

impl std::fmt::Debug for CaptureBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureBuffer")
            .field("scale_factor", &self.scale_factor)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

impl CaptureBuffer {
    pub fn build_from_raw_data(
        scale_factor: f64,
        width_pixels: u32,
        height_pixels: u32,
        raw_rgba_data: Vec<u8>,
    ) -> Self {
        log::debug!(
            "[CAPTURE_BUFFER] building buffer: {}x{}, scale={}",
            width_pixels,
            height_pixels,
            scale_factor
        );

        Self {
            scale_factor,
            width: width_pixels,
            height: height_pixels,
            raw_data: raw_rgba_data,
        }
    }

    pub fn crop_region(&self, rect: PixelRect) -> Result<Self> {
        if rect.width == 0 || rect.height == 0 {
            anyhow::bail!("Crop dimensions must be greater than zero");
        }

        if rect.x >= self.width || rect.y >= self.height {
            anyhow::bail!(
                "Crop origin ({}, {}) lies outside the {}x{} frame",
                rect.x,
                rect.y,
                self.width,
                self.height
            );
        }

        let (x, y) = (rect.x, rect.y);
        let crop_width = rect.width.min(self.width - x);
        let crop_height = rect.height.min(self.height - y);

        log::debug!(
            "[CAPTURE_BUFFER] Cropping region: {}x{} at ({}, {}) from {}x{}",
            crop_width,
            crop_height,
            x,
            y,
            self.width,
            self.height
        );

        let mut cropped_data = Vec::with_capacity((crop_width * crop_height * 4) as usize);

        for row in y..(y + crop_height) {
            let row_start = (row * self.width * 4 + x * 4) as usize;
            let row_end = row_start + (crop_width * 4) as usize;

            if row_end <= self.raw_data.len() {
                cropped_data.extend_from_slice(&self.raw_data[row_start..row_end]);
            } else {
                anyhow::bail!("Crop region exceeds image bounds");
            }
        }

        Ok(Self::build_from_raw_data(
            self.scale_factor,
            crop_width,
            crop_height,
            cropped_data,
        ))
    }

    pub fn into_rgba_image(self) -> Result<image::RgbaImage> {
        let (width, height) = (self.width, self.height);
        image::RgbaImage::from_raw(width, height, self.raw_data).with_context(|| {
            format!("raw buffer does not match {}x{} RGBA dimensions", width, height)
        })
    }
}

/// One snapshot of a capture run, owned by the loop until persisted.
#[derive(Debug)]
pub struct CapturedFrame {
    pub ordinal: u32,
    pub captured_at: DateTime<Utc>,
    pub buffer: CaptureBuffer,
}

impl CapturedFrame {
    pub fn new(ordinal: u32, buffer: CaptureBuffer) -> Self {
        Self {
            ordinal,
            captured_at: Utc::now(),
            buffer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_buffer(width: u32, height: u32) -> CaptureBuffer {
        let mut raw = Vec::with_capacity((width * height * 4) as usize);
        for row in 0..height {
            for column in 0..width {
                raw.extend_from_slice(&[column as u8, row as u8, 0, 255]);
            }
        }
        CaptureBuffer::build_from_raw_data(2.0, width, height, raw)
    }

    #[test]
    fn test_crop_region_extracts_expected_pixels() {
        let buffer = gradient_buffer(8, 6);

        let cropped = buffer
            .crop_region(PixelRect {
                x: 2,
                y: 1,
                width: 3,
                height: 2,
            })
            .unwrap();

        assert_eq!(cropped.width, 3);
        assert_eq!(cropped.height, 2);
        let image = cropped.into_rgba_image().unwrap();
        assert_eq!(image.get_pixel(0, 0).0, [2, 1, 0, 255]);
        assert_eq!(image.get_pixel(2, 1).0, [4, 2, 0, 255]);
    }

    #[test]
    fn test_crop_region_clamps_to_frame_bounds() {
        let buffer = gradient_buffer(8, 6);

        let cropped = buffer
            .crop_region(PixelRect {
                x: 6,
                y: 4,
                width: 100,
                height: 100,
            })
            .unwrap();

        assert_eq!((cropped.width, cropped.height), (2, 2));
    }

    #[test]
    fn test_crop_region_rejects_origin_outside_frame() {
        let buffer = gradient_buffer(8, 6);

        let result = buffer.crop_region(PixelRect {
            x: 8,
            y: 0,
            width: 3,
            height: 3,
        });

        assert!(result.is_err());
    }

    #[test]
    fn test_crop_region_rejects_empty_rect() {
        let buffer = gradient_buffer(8, 6);

        let result = buffer.crop_region(PixelRect {
            x: 0,
            y: 0,
            width: 0,
            height: 4,
        });

        assert!(result.is_err());
    }

    #[test]
    fn test_crop_preserves_scale_factor() {
        let buffer = gradient_buffer(4, 4);

        let cropped = buffer
            .crop_region(PixelRect {
                x: 0,
                y: 0,
                width: 2,
                height: 2,
            })
            .unwrap();

        assert_eq!(cropped.scale_factor, 2.0);
    }

    #[test]
    fn test_into_rgba_image_rejects_mismatched_buffer() {
        let buffer = CaptureBuffer::build_from_raw_data(1.0, 10, 10, vec![0u8; 12]);

        assert!(buffer.into_rgba_image().is_err());
    }
}
