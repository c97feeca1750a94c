use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::time::Instant;

use super::Session;
use crate::core::interfaces::ports::{FrameStore, KeyPresser, ScreenCapturer};
use crate::core::models::{CaptureRequest, CaptureResult, CapturedFrame, KeyIdentifier};
use crate::global_constants::LOG_TAG_CAPTURE_LOOP;

/// Runs a fixed number of capture iterations: snapshot, optional crop,
/// persist, key press, then a paced wait so iterations start `interval`
/// apart regardless of how long capturing took.
pub struct CaptureLoop {
    screen_capturer: Arc<dyn ScreenCapturer>,
    frame_store: Arc<dyn FrameStore>,
    preparation_delay: Duration,
}

impl CaptureLoop {
    pub fn build(
        screen_capturer: Arc<dyn ScreenCapturer>,
        frame_store: Arc<dyn FrameStore>,
        preparation_delay: Duration,
    ) -> Self {
        Self {
            screen_capturer,
            frame_store,
            preparation_delay,
        }
    }

    pub fn output_folder(&self) -> PathBuf {
        self.frame_store.directory().to_path_buf()
    }

    pub async fn run(
        &self,
        request: &CaptureRequest,
        key_presser: &dyn KeyPresser,
        session: &Session,
    ) -> CaptureResult {
        let requested = request.count();
        let folder = self.output_folder();

        log::info!(
            "{} Starting capture of {} screenshots, interval={:?}, key={}, region={}",
            LOG_TAG_CAPTURE_LOOP,
            requested,
            request.interval(),
            request.key(),
            request
                .region()
                .map(|region| region.to_string())
                .unwrap_or_else(|| "full screen".to_string())
        );

        if !wait_unless_cancelled(self.preparation_delay, session).await {
            log::info!("{} Cancelled during preparation delay", LOG_TAG_CAPTURE_LOOP);
            return CaptureResult::summarize(requested, 0, true, folder);
        }

        if let Err(error) = self.frame_store.prepare() {
            log::error!(
                "{} Failed to prepare capture directory {:?}: {:#}",
                LOG_TAG_CAPTURE_LOOP,
                folder,
                error
            );
        }

        let mut captured = 0;

        for ordinal in 1..=requested {
            if session.is_cancelled() {
                break;
            }

            let iteration_start = Instant::now();

            let persistence = match self.capture_frame(ordinal, request).await {
                Ok(frame) => {
                    let handle = self.spawn_persist(frame);
                    press_key_logged(key_presser, request.key()).await;
                    Some(handle)
                }
                Err(error) => {
                    log::error!(
                        "{} Screenshot {} failed: {:#}",
                        LOG_TAG_CAPTURE_LOOP,
                        ordinal,
                        error
                    );
                    None
                }
            };

            let capture_time = iteration_start.elapsed();
            let wait_time = request.interval().saturating_sub(capture_time);
            log::debug!(
                "{} Capture {} took {:?}, waiting {:?}",
                LOG_TAG_CAPTURE_LOOP,
                ordinal,
                capture_time,
                wait_time
            );

            let (completed_wait, persisted) = tokio::join!(
                wait_unless_cancelled(wait_time, session),
                await_persistence(ordinal, persistence)
            );

            if persisted {
                captured += 1;
            }

            if !completed_wait {
                log::info!(
                    "{} Cancelled after screenshot {}",
                    LOG_TAG_CAPTURE_LOOP,
                    ordinal
                );
                break;
            }
        }

        let result = CaptureResult::summarize(requested, captured, session.is_cancelled(), folder);
        log::info!("{} {}", LOG_TAG_CAPTURE_LOOP, result.describe());
        result
    }

    async fn capture_frame(&self, ordinal: u32, request: &CaptureRequest) -> Result<CapturedFrame> {
        let (display, buffer) = self.screen_capturer.capture_primary_display().await?;

        let buffer = match request.region() {
            Some(region) => {
                let pixel_rect = region
                    .to_pixel_rect(&display.bounds(), display.scale_factor)
                    .with_context(|| {
                        format!("region {} is not on the captured display", region)
                    })?;
                buffer
                    .crop_region(pixel_rect)
                    .with_context(|| format!("failed to crop screenshot to {}", region))?
            }
            None => buffer,
        };

        Ok(CapturedFrame::new(ordinal, buffer))
    }

    fn spawn_persist(&self, frame: CapturedFrame) -> tokio::task::JoinHandle<Result<PathBuf>> {
        let frame_store = Arc::clone(&self.frame_store);
        tokio::task::spawn_blocking(move || frame_store.persist(frame))
    }
}

async fn press_key_logged(key_presser: &dyn KeyPresser, key: &KeyIdentifier) {
    if let Err(error) = key_presser.press_key(key).await {
        log::warn!(
            "{} Key press '{}' via {} failed: {:#}",
            LOG_TAG_CAPTURE_LOOP,
            key,
            key_presser.name(),
            error
        );
    }
}

async fn await_persistence(
    ordinal: u32,
    persistence: Option<tokio::task::JoinHandle<Result<PathBuf>>>,
) -> bool {
    let Some(handle) = persistence else {
        return false;
    };

    match handle.await {
        Ok(Ok(path)) => {
            log::info!("{} Saved: {:?}", LOG_TAG_CAPTURE_LOOP, path);
            true
        }
        Ok(Err(error)) => {
            log::error!(
                "{} Failed to save screenshot {}: {:#}",
                LOG_TAG_CAPTURE_LOOP,
                ordinal,
                error
            );
            false
        }
        Err(join_error) => {
            log::error!(
                "{} Save task for screenshot {} aborted: {}",
                LOG_TAG_CAPTURE_LOOP,
                ordinal,
                join_error
            );
            false
        }
    }
}

/// Sleeps for `duration` unless the session is cancelled first. Returns
/// `false` when cancelled.
async fn wait_unless_cancelled(duration: Duration, session: &Session) -> bool {
    if duration.is_zero() {
        return !session.is_cancelled();
    }

    tokio::select! {
        _ = tokio::time::sleep(duration) => !session.is_cancelled(),
        _ = session.cancelled() => false,
    }
}
