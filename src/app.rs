use std::path::PathBuf;
use std::sync::Arc;

use iced::window::Id;
use iced::{Color, Element, Task, Theme};

use crate::adapters::capability_probe::probe_capabilities;
use crate::adapters::{PdfDocumentExporter, PngFrameStore};
use crate::core::models::UserSettings;
use crate::core::orchestrators::app_orchestrator::{AppOrchestrator, OrchestratorMessage};
use crate::global_constants::{
    APPLICATION_DIRECTORY_NAME, LOG_TAG_APP, OUTPUT_DIRECTORY_NAME, SCREENSHOTS_DIRECTORY_NAME,
};
use crate::ports::{GlobalKeyboardListener, SystemTray, XcapScreenCapturer};
use crate::presentation::app_theme;

pub struct BookerApp {
    orchestrator: AppOrchestrator,
    theme: Theme,
    _tray: Option<SystemTray>,
}

impl BookerApp {
    pub fn build() -> (Self, Task<OrchestratorMessage>) {
        log::info!("{} Initializing application", LOG_TAG_APP);

        let settings = UserSettings::load().unwrap_or_else(|e| {
            log::warn!("{} Failed to load settings: {}, using defaults", LOG_TAG_APP, e);
            UserSettings::default()
        });

        let screenshots_directory =
            resolve_directory(settings.screenshots_dir(), SCREENSHOTS_DIRECTORY_NAME);
        let output_directory = resolve_directory(settings.output_dir(), OUTPUT_DIRECTORY_NAME);
        log::info!(
            "{} Screenshots: {}, output: {}",
            LOG_TAG_APP,
            screenshots_directory.display(),
            output_directory.display()
        );

        let capabilities = probe_capabilities();
        let theme = app_theme::get_theme(&settings.theme_mode);

        let tray = match SystemTray::build() {
            Ok(tray) => {
                log::info!("{} System tray initialized successfully", LOG_TAG_APP);
                Some(tray)
            }
            Err(e) => {
                log::error!("{} Failed to initialize system tray: {}", LOG_TAG_APP, e);
                None
            }
        };

        let mut orchestrator = AppOrchestrator::build(
            Arc::new(XcapScreenCapturer::initialize()),
            Arc::new(PngFrameStore::build(screenshots_directory)),
            Arc::new(PdfDocumentExporter::build()),
            output_directory,
            capabilities,
            settings,
        )
        .exit_when_main_closed(tray.is_none());

        match UserSettings::settings_file_path() {
            Ok(settings_path) => orchestrator = orchestrator.with_settings_path(settings_path),
            Err(e) => log::warn!("{} Settings will not be saved: {}", LOG_TAG_APP, e),
        }

        (
            Self {
                orchestrator,
                theme,
                _tray: tray,
            },
            Task::done(OrchestratorMessage::OpenMainWindow),
        )
    }

    pub fn handle_update(&mut self, message: OrchestratorMessage) -> Task<OrchestratorMessage> {
        self.orchestrator.update(message)
    }

    pub fn render_view(&self, window_id: Id) -> Element<'_, OrchestratorMessage> {
        self.orchestrator.render_view(window_id)
    }

    pub fn window_title(&self, window_id: Id) -> String {
        self.orchestrator.get_window_title(window_id)
    }

    /// Windows clear to transparent so selector overlays show the desktop;
    /// the main window paints its own background.
    pub fn window_style(&self, _theme: &Theme) -> iced::theme::Style {
        iced::theme::Style {
            background_color: Color::TRANSPARENT,
            text_color: self.theme.palette().text,
        }
    }

    pub fn handle_subscription(&self) -> iced::Subscription<OrchestratorMessage> {
        use iced::window;

        iced::Subscription::batch([
            iced::Subscription::run(GlobalKeyboardListener::create_event_stream)
                .map(OrchestratorMessage::Keyboard),
            iced::event::listen_with(|event, _status, id| {
                if let iced::Event::Window(window::Event::Closed) = event {
                    return Some(OrchestratorMessage::WindowClosed(id));
                }
                None
            }),
            iced::Subscription::run(|| {
                iced::stream::channel(
                    10,
                    |mut output: futures::channel::mpsc::Sender<OrchestratorMessage>| async move {
                        loop {
                            tokio::time::sleep(std::time::Duration::from_millis(100)).await;
                            if let Some(event) = SystemTray::poll_events() {
                                let _ = output.try_send(OrchestratorMessage::TrayEvent(event));
                            }
                        }
                    },
                )
            }),
        ])
    }
}

fn resolve_directory(resolved: anyhow::Result<PathBuf>, name: &str) -> PathBuf {
    resolved.unwrap_or_else(|e| {
        let fallback = std::env::temp_dir()
            .join(APPLICATION_DIRECTORY_NAME)
            .join(name);
        log::warn!(
            "{} No data directory ({}), using {}",
            LOG_TAG_APP,
            e,
            fallback.display()
        );
        fallback
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_directory_keeps_resolved_path() {
        let resolved = resolve_directory(Ok(PathBuf::from("/data/booker/output")), "output");

        assert_eq!(resolved, PathBuf::from("/data/booker/output"));
    }

    #[test]
    fn test_resolve_directory_falls_back_to_temp() {
        let resolved = resolve_directory(Err(anyhow::anyhow!("no data dir")), "screenshots");

        assert_eq!(
            resolved,
            std::env::temp_dir().join("booker").join("screenshots")
        );
    }
}
