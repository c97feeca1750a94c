use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::core::errors::CaptureError;
use crate::core::interfaces::ports::ScreenCapturer;
use crate::core::models::{select_capture_display, CaptureBuffer, DisplayInfo};
use crate::global_constants::{
    ERROR_CONTEXT_CAPTURE_MONITOR, ERROR_CONTEXT_LIST_MONITORS, ERROR_CONTEXT_SCALE_FACTOR,
    LOG_TAG_CAPTURE,
};

pub struct XcapScreenCapturer;

impl XcapScreenCapturer {
    pub fn initialize() -> Self {
        log::debug!("{} initializing xcap screen capturer", LOG_TAG_CAPTURE);
        Self
    }

    fn list_monitors() -> Result<Vec<(DisplayInfo, xcap::Monitor)>> {
        let monitors = xcap::Monitor::all().with_context(|| ERROR_CONTEXT_LIST_MONITORS)?;

        let mut displays = Vec::with_capacity(monitors.len());
        for monitor in monitors {
            match Self::read_display_info(&monitor) {
                Ok(display) => displays.push((display, monitor)),
                Err(error) => log::warn!(
                    "{} skipping monitor without readable geometry: {:#}",
                    LOG_TAG_CAPTURE,
                    error
                ),
            }
        }
        Ok(displays)
    }

    fn read_display_info(monitor: &xcap::Monitor) -> Result<DisplayInfo> {
        let scale_factor = monitor
            .scale_factor()
            .with_context(|| ERROR_CONTEXT_SCALE_FACTOR)? as f64;

        Ok(DisplayInfo {
            id: monitor.id()?,
            name: monitor.name().unwrap_or_default(),
            x: logical_extent(monitor.x()? as f64, scale_factor).round() as i32,
            y: logical_extent(monitor.y()? as f64, scale_factor).round() as i32,
            width: logical_extent(monitor.width()? as f64, scale_factor).floor() as u32,
            height: logical_extent(monitor.height()? as f64, scale_factor).floor() as u32,
            scale_factor,
            is_primary: monitor.is_primary().unwrap_or(false),
        })
    }

    fn capture_primary_blocking() -> Result<(DisplayInfo, CaptureBuffer)> {
        let displays = Self::list_monitors().map_err(|error| {
            log::error!("{} {:#}", LOG_TAG_CAPTURE, error);
            CaptureError::NoCaptureSource
        })?;

        let infos: Vec<DisplayInfo> = displays.iter().map(|(info, _)| info.clone()).collect();
        let display = select_capture_display(&infos)
            .cloned()
            .ok_or(CaptureError::NoCaptureSource)?;
        let monitor = displays
            .into_iter()
            .find(|(info, _)| info.id == display.id)
            .map(|(_, monitor)| monitor)
            .ok_or(CaptureError::NoCaptureSource)?;

        log::debug!(
            "{} capturing display {} ({}) at {}",
            LOG_TAG_CAPTURE,
            display.id,
            display.name,
            display.bounds()
        );

        let captured_image = monitor
            .capture_image()
            .with_context(|| ERROR_CONTEXT_CAPTURE_MONITOR)?;
        let physical_image = normalize_to_physical_size(captured_image, display.physical_size());
        let capture_buffer = convert_image_to_capture_buffer(physical_image, display.scale_factor);

        Ok((display, capture_buffer))
    }
}

/// xcap reports macOS geometry in points and other platforms in pixels.
fn logical_extent(value: f64, scale_factor: f64) -> f64 {
    if cfg!(target_os = "macos") || scale_factor <= 0.0 {
        value
    } else {
        value / scale_factor
    }
}

fn normalize_to_physical_size(
    image: xcap::image::RgbaImage,
    (target_width, target_height): (u32, u32),
) -> xcap::image::RgbaImage {
    if target_width == 0
        || target_height == 0
        || image.dimensions() == (target_width, target_height)
    {
        return image;
    }

    log::debug!(
        "{} resampling {}x{} capture to {}x{}",
        LOG_TAG_CAPTURE,
        image.width(),
        image.height(),
        target_width,
        target_height
    );
    xcap::image::imageops::resize(
        &image,
        target_width,
        target_height,
        xcap::image::imageops::FilterType::Triangle,
    )
}

fn convert_image_to_capture_buffer(
    image: xcap::image::RgbaImage,
    scale_factor: f64,
) -> CaptureBuffer {
    let width_pixels = image.width();
    let height_pixels = image.height();
    let raw_rgba_data = image.into_raw();

    log::info!(
        "{} captured {}x{} screenshot, scale_factor={}",
        LOG_TAG_CAPTURE,
        width_pixels,
        height_pixels,
        scale_factor
    );

    CaptureBuffer::build_from_raw_data(scale_factor, width_pixels, height_pixels, raw_rgba_data)
}

#[async_trait]
impl ScreenCapturer for XcapScreenCapturer {
    fn list_displays(&self) -> Result<Vec<DisplayInfo>> {
        let displays = Self::list_monitors()?;
        if displays.is_empty() {
            return Err(CaptureError::NoCaptureSource.into());
        }
        Ok(displays.into_iter().map(|(info, _)| info).collect())
    }

    async fn capture_primary_display(&self) -> Result<(DisplayInfo, CaptureBuffer)> {
        tokio::task::spawn_blocking(Self::capture_primary_blocking)
            .await
            .context("screen capture task aborted")?
    }
}
