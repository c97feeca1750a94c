use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use iced::widget::{button, column, container, row, text, text_input, Space};
use iced::window::{self, Id};
use iced::{Alignment, Background, Color, Element, Length, Point, Size, Task};

use super::{CaptureLoop, Session, SessionGuard};
use crate::adapters::{directory_opener, macos_permissions, KeyActuator};
use crate::core::errors::CaptureError;
use crate::core::interfaces::ports::{DocumentExporter, FrameStore, ScreenCapturer};
use crate::core::models::{
    select_capture_display, Capabilities, CaptureRequest, CaptureResult, DisplayInfo,
    ExportResult, PermissionStatus, RegionSelection, ScreenRegion, SelectionOutcome, UserSettings,
};
use crate::global_constants::{APPLICATION_TITLE, LOG_TAG_ORCHESTRATOR};
use crate::ports::{GlobalKeyboardEvent, TrayEvent};
use crate::presentation::app_theme;
use crate::presentation::{RegionSelectorMessage, RegionSelectorView};

const STATUS_READY: &str = "Ready";

pub enum AppWindow {
    Main,
    SelectorOverlay(RegionSelectorView),
}

pub struct AppOrchestrator {
    screen_capturer: Arc<dyn ScreenCapturer>,
    frame_store: Arc<dyn FrameStore>,
    document_exporter: Arc<dyn DocumentExporter>,
    output_directory: PathBuf,
    capabilities: Capabilities,
    settings: UserSettings,
    settings_path: Option<PathBuf>,
    exit_when_main_closed: bool,
    windows: HashMap<Id, AppWindow>,
    main_window_id: Option<Id>,
    capture_session: Session,
    selector_session: Session,
    selector_guard: Option<SessionGuard>,
    region_selection: RegionSelection,
    last_pointer: Option<(i32, i32)>,
    selected_region: Option<ScreenRegion>,
    count_input: String,
    interval_input: String,
    key_input: String,
    permission_status: PermissionStatus,
    last_capture: Option<CaptureResult>,
    last_export: Option<ExportResult>,
    is_exporting: bool,
    status: String,
}

#[derive(Debug, Clone)]
pub enum OrchestratorMessage {
    OpenMainWindow,
    StartCapture,
    StartRegionCapture,
    CaptureFinished(CaptureResult),
    CancelCapture,
    OpenRegionSelector,
    SelectorOverlay(Id, RegionSelectorMessage),
    RegionResolved(Option<ScreenRegion>),
    SelectorError(String),
    ClearRegion,
    ExportDocument,
    ExportFinished(ExportResult),
    QueryPermissionStatus,
    PermissionStatusReady(PermissionStatus),
    OpenPermissionSettings,
    OpenScreenshotDirectory,
    OpenOutputDirectory,
    DirectoryOpened(Result<PathBuf, String>),
    WindowClosed(Id),
    Keyboard(GlobalKeyboardEvent),
    TrayEvent(TrayEvent),
    UpdateCount(String),
    UpdateInterval(String),
    UpdateKey(String),
}

impl AppOrchestrator {
    pub fn build(
        screen_capturer: Arc<dyn ScreenCapturer>,
        frame_store: Arc<dyn FrameStore>,
        document_exporter: Arc<dyn DocumentExporter>,
        output_directory: PathBuf,
        capabilities: Capabilities,
        settings: UserSettings,
    ) -> Self {
        let count_input = settings.capture_count.to_string();
        let interval_input = settings.interval_seconds.to_string();
        let key_input = settings.key_name.clone();
        let permission_status = capabilities.screen_recording;

        Self {
            screen_capturer,
            frame_store,
            document_exporter,
            output_directory,
            capabilities,
            settings,
            settings_path: None,
            exit_when_main_closed: false,
            windows: HashMap::new(),
            main_window_id: None,
            capture_session: Session::new("capture"),
            selector_session: Session::new("selector"),
            selector_guard: None,
            region_selection: RegionSelection::new(),
            last_pointer: None,
            selected_region: None,
            count_input,
            interval_input,
            key_input,
            permission_status,
            last_capture: None,
            last_export: None,
            is_exporting: false,
            status: STATUS_READY.to_string(),
        }
    }

    /// Capture inputs are written back here when a run starts.
    pub fn with_settings_path(mut self, settings_path: PathBuf) -> Self {
        self.settings_path = Some(settings_path);
        self
    }

    /// Without a tray there is no way back to a closed main window.
    pub fn exit_when_main_closed(mut self, exit: bool) -> Self {
        self.exit_when_main_closed = exit;
        self
    }

    pub fn get_window_title(&self, window_id: Id) -> String {
        match self.windows.get(&window_id) {
            Some(AppWindow::SelectorOverlay(_)) => format!("{} - Select Region", APPLICATION_TITLE),
            _ => APPLICATION_TITLE.to_string(),
        }
    }

    pub fn update(&mut self, message: OrchestratorMessage) -> Task<OrchestratorMessage> {
        match &message {
            OrchestratorMessage::SelectorOverlay(_, RegionSelectorMessage::MouseMoved(_)) => {}
            _ => log::info!("{} Received message: {:?}", LOG_TAG_ORCHESTRATOR, message),
        }

        match message {
            OrchestratorMessage::OpenMainWindow => {
                return self.handle_open_main_window();
            }
            OrchestratorMessage::StartCapture => {
                return self.handle_start_capture(None);
            }
            OrchestratorMessage::StartRegionCapture => match self.selected_region {
                Some(region) => return self.handle_start_capture(Some(region)),
                None => self.status = "Select a region first".to_string(),
            },
            OrchestratorMessage::CaptureFinished(result) => {
                return self.handle_capture_finished(result);
            }
            OrchestratorMessage::CancelCapture => {
                if self.capture_session.cancel() {
                    self.status = "Cancelling capture...".to_string();
                }
            }
            OrchestratorMessage::OpenRegionSelector => {
                return self.handle_open_region_selector();
            }
            OrchestratorMessage::SelectorOverlay(window_id, selector_message) => {
                return self.handle_selector_message(window_id, selector_message);
            }
            OrchestratorMessage::RegionResolved(region) => {
                self.handle_region_resolved(region);
            }
            OrchestratorMessage::SelectorError(error) => {
                return self.handle_selector_error(error);
            }
            OrchestratorMessage::ClearRegion => {
                self.selected_region = None;
                self.status = STATUS_READY.to_string();
            }
            OrchestratorMessage::ExportDocument => {
                return self.handle_export_document();
            }
            OrchestratorMessage::ExportFinished(result) => {
                self.is_exporting = false;
                self.status = result.describe();
                self.last_export = Some(result);
            }
            OrchestratorMessage::QueryPermissionStatus => {
                return Task::future(async {
                    let status = tokio::task::spawn_blocking(
                        macos_permissions::macos::screen_recording_status,
                    )
                    .await
                    .unwrap_or(PermissionStatus::Unsupported);
                    OrchestratorMessage::PermissionStatusReady(status)
                });
            }
            OrchestratorMessage::PermissionStatusReady(status) => {
                self.permission_status = status;
                self.capabilities.screen_recording = status;
                self.status = status.user_message().to_string();
            }
            OrchestratorMessage::OpenPermissionSettings => {
                return Task::future(tokio::task::spawn_blocking(
                    macos_permissions::macos::open_screen_recording_settings,
                ))
                .discard();
            }
            OrchestratorMessage::OpenScreenshotDirectory => {
                return Self::open_directory_task(self.frame_store.directory().to_path_buf());
            }
            OrchestratorMessage::OpenOutputDirectory => {
                return Self::open_directory_task(self.output_directory.clone());
            }
            OrchestratorMessage::DirectoryOpened(result) => match result {
                Ok(directory) => {
                    log::debug!("{} Opened {}", LOG_TAG_ORCHESTRATOR, directory.display())
                }
                Err(error) => self.status = format!("Failed to open folder: {}", error),
            },
            OrchestratorMessage::WindowClosed(id) => {
                return self.handle_window_closed(id);
            }
            OrchestratorMessage::Keyboard(GlobalKeyboardEvent::EscapePressed) => {
                if self.selector_session.is_active() {
                    let outcome = self.region_selection.cancel();
                    return self.finish_selection(outcome);
                }
            }
            OrchestratorMessage::TrayEvent(event) => {
                return self.handle_tray_event(event);
            }
            OrchestratorMessage::UpdateCount(value) => self.count_input = value,
            OrchestratorMessage::UpdateInterval(value) => self.interval_input = value,
            OrchestratorMessage::UpdateKey(value) => self.key_input = value,
        }

        Task::none()
    }

    pub fn render_view(&self, window_id: Id) -> Element<'_, OrchestratorMessage> {
        match self.windows.get(&window_id) {
            Some(AppWindow::Main) => self.render_main_window(),
            Some(AppWindow::SelectorOverlay(view)) => view
                .render_ui(self.region_selection.preview())
                .map(move |msg| OrchestratorMessage::SelectorOverlay(window_id, msg)),
            None => text("Loading...").into(),
        }
    }

    fn handle_open_main_window(&mut self) -> Task<OrchestratorMessage> {
        if let Some(id) = self.main_window_id {
            log::debug!("{} Main window already open, focusing", LOG_TAG_ORCHESTRATOR);
            return window::minimize(id, false).chain(window::gain_focus(id));
        }

        let (id, task) = window::open(window::Settings {
            size: Size::new(560.0, 640.0),
            position: window::Position::Centered,
            resizable: false,
            ..Default::default()
        });

        self.main_window_id = Some(id);
        self.windows.insert(id, AppWindow::Main);
        log::info!("{} Main window created with ID: {:?}", LOG_TAG_ORCHESTRATOR, id);
        task.discard()
    }

    fn build_capture_request(
        &self,
        region: Option<ScreenRegion>,
    ) -> Result<CaptureRequest, String> {
        let count = parse_count(&self.count_input)?;

        let Some(region) = region else {
            return CaptureRequest::full_screen(count).map_err(|error| error.to_string());
        };

        let interval = parse_interval(&self.interval_input, self.settings.interval())?;
        let request = CaptureRequest::validated(count, interval, Some(region), &self.key_input)
            .map_err(|error| error.to_string())?;
        self.ensure_region_on_capture_display(&region)?;
        Ok(request)
    }

    /// Rejects regions that do not touch the display a run captures.
    fn ensure_region_on_capture_display(&self, region: &ScreenRegion) -> Result<(), String> {
        let displays = match self.screen_capturer.list_displays() {
            Ok(displays) => displays,
            Err(error) => {
                log::warn!(
                    "{} Could not list displays to check region: {:#}",
                    LOG_TAG_ORCHESTRATOR,
                    error
                );
                return Ok(());
            }
        };

        match select_capture_display(&displays) {
            Some(display) if region.intersection(&display.bounds()).is_none() => {
                Err(CaptureError::RegionOffCaptureDisplay.to_string())
            }
            _ => Ok(()),
        }
    }

    fn handle_start_capture(&mut self, region: Option<ScreenRegion>) -> Task<OrchestratorMessage> {
        let request = match self.build_capture_request(region) {
            Ok(request) => request,
            Err(error) => {
                log::warn!("{} Rejected capture request: {}", LOG_TAG_ORCHESTRATOR, error);
                self.status = error;
                return Task::none();
            }
        };

        let Some(guard) = self.capture_session.start() else {
            self.status = CaptureError::AlreadyRunning.to_string();
            return Task::none();
        };

        self.remember_inputs(&request);

        let preparation_delay = self.settings.preparation_delay();
        let capture_loop = CaptureLoop::build(
            Arc::clone(&self.screen_capturer),
            Arc::clone(&self.frame_store),
            preparation_delay,
        );
        let capabilities = self.capabilities.clone();
        let use_key_helper = self.settings.use_key_helper;
        let session = self.capture_session.clone();

        self.status = format!(
            "Capturing {} screenshots in {}s, switch to the target window",
            request.count(),
            preparation_delay.as_secs()
        );
        log::info!(
            "{} Starting capture: count={}, interval={:?}, key={}, region={:?}",
            LOG_TAG_ORCHESTRATOR,
            request.count(),
            request.interval(),
            request.key(),
            request.region()
        );

        let run = Task::future(async move {
            let actuator = KeyActuator::acquire(&capabilities, use_key_helper).await;
            let result = capture_loop.run(&request, &actuator, &session).await;
            actuator.shutdown().await;
            drop(guard);
            OrchestratorMessage::CaptureFinished(result)
        });

        match self.main_window_id {
            Some(id) => Task::batch(vec![window::minimize(id, true), run]),
            None => run,
        }
    }

    fn remember_inputs(&mut self, request: &CaptureRequest) {
        self.settings.capture_count = request.count();
        if request.region().is_some() {
            self.settings.interval_seconds = request.interval().as_secs_f64();
            self.settings.key_name = request.key().name();
        }

        if let Some(settings_path) = &self.settings_path {
            if let Err(error) = self.settings.save_to(settings_path) {
                log::error!("{} Failed to save settings: {:#}", LOG_TAG_ORCHESTRATOR, error);
            }
        }
    }

    fn handle_capture_finished(&mut self, result: CaptureResult) -> Task<OrchestratorMessage> {
        log::info!("{} {}", LOG_TAG_ORCHESTRATOR, result.describe());
        self.status = result.describe();
        self.last_capture = Some(result);
        self.restore_main_window()
    }

    fn handle_open_region_selector(&mut self) -> Task<OrchestratorMessage> {
        if self.selector_session.is_active() {
            log::warn!(
                "{} {}, focusing existing overlays",
                LOG_TAG_ORCHESTRATOR,
                CaptureError::SelectorAlreadyOpen
            );
            return Task::batch(self.overlay_ids().into_iter().map(window::gain_focus));
        }

        let displays = match self.screen_capturer.list_displays() {
            Ok(displays) if !displays.is_empty() => displays,
            Ok(_) => {
                return self.handle_selector_error(CaptureError::NoCaptureSource.to_string());
            }
            Err(error) => return self.handle_selector_error(format!("{:#}", error)),
        };

        let Some(guard) = self.selector_session.start() else {
            return Task::none();
        };
        self.selector_guard = Some(guard);
        self.region_selection = RegionSelection::new();
        self.last_pointer = None;
        self.status = "Selecting region...".to_string();

        let mut tasks = Vec::with_capacity(displays.len() + 1);
        if let Some(main_id) = self.main_window_id {
            tasks.push(window::minimize(main_id, true));
        }
        for display in displays {
            tasks.push(self.open_overlay(display));
        }

        Task::batch(tasks)
    }

    fn open_overlay(&mut self, display: DisplayInfo) -> Task<OrchestratorMessage> {
        let (id, task) = window::open(window::Settings {
            position: window::Position::Specific(Point::new(display.x as f32, display.y as f32)),
            size: Size::new(display.width as f32, display.height as f32),
            transparent: true,
            decorations: false,
            resizable: false,
            level: window::Level::AlwaysOnTop,
            ..Default::default()
        });

        log::info!(
            "{} Overlay {:?} opened on display {} ({})",
            LOG_TAG_ORCHESTRATOR,
            id,
            display.id,
            display.bounds()
        );
        self.windows
            .insert(id, AppWindow::SelectorOverlay(RegionSelectorView::build(display)));

        task.discard().chain(window::gain_focus(id))
    }

    fn overlay_ids(&self) -> Vec<Id> {
        self.windows
            .iter()
            .filter(|(_, window)| matches!(window, AppWindow::SelectorOverlay(_)))
            .map(|(id, _)| *id)
            .collect()
    }

    fn handle_selector_message(
        &mut self,
        window_id: Id,
        message: RegionSelectorMessage,
    ) -> Task<OrchestratorMessage> {
        let Some(AppWindow::SelectorOverlay(view)) = self.windows.get(&window_id) else {
            return Task::none();
        };

        match message {
            RegionSelectorMessage::MousePressed(local) => {
                let point = view.to_global(local);
                self.last_pointer = Some(point);
                self.region_selection.press(point);
            }
            RegionSelectorMessage::MouseMoved(local) => {
                let point = view.to_global(local);
                self.last_pointer = Some(point);
                self.region_selection.move_to(point);
            }
            RegionSelectorMessage::MouseReleased(local) => {
                let point = local.map(|local| view.to_global(local)).or(self.last_pointer);
                if let Some(outcome) = point.and_then(|point| self.region_selection.release(point))
                {
                    return self.finish_selection(Some(outcome));
                }
            }
            RegionSelectorMessage::CancelRequested => {
                let outcome = self.region_selection.cancel();
                return self.finish_selection(outcome);
            }
        }

        Task::none()
    }

    /// Tears down every overlay and reports the outcome once.
    fn finish_selection(&mut self, outcome: Option<SelectionOutcome>) -> Task<OrchestratorMessage> {
        if self.selector_guard.is_none() {
            return Task::none();
        }
        let outcome = outcome
            .or(self.region_selection.outcome())
            .unwrap_or(SelectionOutcome::Cancelled);
        log::info!("{} Selection resolved: {:?}", LOG_TAG_ORCHESTRATOR, outcome);

        let overlay_ids = self.overlay_ids();
        for id in &overlay_ids {
            self.windows.remove(id);
        }
        self.selector_guard = None;
        self.last_pointer = None;

        let mut tasks: Vec<Task<OrchestratorMessage>> =
            overlay_ids.into_iter().map(window::close).collect();
        tasks.push(self.restore_main_window());
        tasks.push(Task::done(OrchestratorMessage::RegionResolved(
            outcome.region(),
        )));
        Task::batch(tasks)
    }

    fn handle_region_resolved(&mut self, region: Option<ScreenRegion>) {
        match region {
            Some(region) => {
                self.selected_region = Some(region);
                self.status = format!("Region selected: {}", region);
            }
            None => self.status = "Region selection cancelled".to_string(),
        }
    }

    fn handle_selector_error(&mut self, error: String) -> Task<OrchestratorMessage> {
        log::error!("{} Region selector error: {}", LOG_TAG_ORCHESTRATOR, error);
        self.status = error;
        self.restore_main_window()
    }

    fn handle_export_document(&mut self) -> Task<OrchestratorMessage> {
        if self.is_exporting {
            log::warn!("{} Export already in progress", LOG_TAG_ORCHESTRATOR);
            return Task::none();
        }
        self.is_exporting = true;
        self.status = "Creating PDF...".to_string();

        let exporter = Arc::clone(&self.document_exporter);
        let frames_directory = self.frame_store.directory().to_path_buf();
        let output_directory = self.output_directory.clone();

        Task::future(async move {
            let outcome = tokio::task::spawn_blocking(move || {
                exporter.export(&frames_directory, &output_directory)
            })
            .await;

            let result = match outcome {
                Ok(Ok(document)) => ExportResult::Exported {
                    path: document.path,
                    pages: document.pages,
                },
                Ok(Err(error)) => ExportResult::Failed {
                    error: error.to_string(),
                },
                Err(error) => ExportResult::Failed {
                    error: error.to_string(),
                },
            };
            OrchestratorMessage::ExportFinished(result)
        })
    }

    fn open_directory_task(directory: PathBuf) -> Task<OrchestratorMessage> {
        Task::future(async move {
            let result = directory_opener::open_directory(&directory)
                .await
                .map(|()| directory)
                .map_err(|error| format!("{:#}", error));
            OrchestratorMessage::DirectoryOpened(result)
        })
    }

    fn handle_window_closed(&mut self, id: Id) -> Task<OrchestratorMessage> {
        log::info!("{} Window closed: {:?}", LOG_TAG_ORCHESTRATOR, id);

        if Some(id) == self.main_window_id {
            self.windows.remove(&id);
            self.main_window_id = None;
            if self.exit_when_main_closed {
                log::info!("{} Main window closed without a tray, exiting", LOG_TAG_ORCHESTRATOR);
                return iced::exit();
            }
            log::info!("{} Main window closed, app will continue in system tray", LOG_TAG_ORCHESTRATOR);
            return Task::none();
        }

        if matches!(self.windows.get(&id), Some(AppWindow::SelectorOverlay(_))) {
            log::warn!("{} Overlay closed externally, cancelling selection", LOG_TAG_ORCHESTRATOR);
            self.windows.remove(&id);
            let outcome = self.region_selection.cancel();
            return self.finish_selection(outcome);
        }

        Task::none()
    }

    fn handle_tray_event(&mut self, event: TrayEvent) -> Task<OrchestratorMessage> {
        log::info!("{} Handling tray event: {:?}", LOG_TAG_ORCHESTRATOR, event);

        match event {
            TrayEvent::ShowWindow => self.handle_open_main_window(),
            TrayEvent::OpenScreenshots => self.update(OrchestratorMessage::OpenScreenshotDirectory),
            TrayEvent::OpenOutput => self.update(OrchestratorMessage::OpenOutputDirectory),
            TrayEvent::Quit => {
                log::info!("{} Quit requested from tray", LOG_TAG_ORCHESTRATOR);
                self.capture_session.cancel();
                iced::exit()
            }
        }
    }

    fn restore_main_window(&self) -> Task<OrchestratorMessage> {
        match self.main_window_id {
            Some(id) => window::minimize(id, false).chain(window::gain_focus(id)),
            None => Task::none(),
        }
    }

    fn render_main_window(&self) -> Element<'_, OrchestratorMessage> {
        let theme = app_theme::get_theme(&self.settings.theme_mode);
        let is_capturing = self.capture_session.is_active();
        let is_selecting = self.selector_session.is_active();

        let title = text(APPLICATION_TITLE).size(32);
        let subtitle = text("Capture slides, pages and screens into a PDF")
            .size(14)
            .style(muted_text);
        let header_section = column![title, subtitle]
            .spacing(6)
            .align_x(Alignment::Center);

        let count_row = labelled_input("Screenshots", "10", &self.count_input)
            .with_handler(|input| input.on_input(OrchestratorMessage::UpdateCount));

        let full_screen_btn = button(text("Capture Full Screen").size(16))
            .padding([12, 32])
            .style(app_theme::primary_button_style)
            .on_press_maybe((!is_capturing).then_some(OrchestratorMessage::StartCapture));

        let full_screen_section = container(
            column![
                text("Full screen").size(16),
                count_row,
                text("Every 2 seconds, pressing space after each shot")
                    .size(12)
                    .style(muted_text),
                full_screen_btn,
            ]
            .spacing(10),
        )
        .padding(16)
        .width(Length::Fill)
        .style(app_theme::panel_style);

        let region_label = match self.selected_region {
            Some(region) => format!("Region: {}", region),
            None => "No region selected".to_string(),
        };
        let interval_row = labelled_input("Interval (s)", "2", &self.interval_input)
            .with_handler(|input| input.on_input(OrchestratorMessage::UpdateInterval));
        let key_row = labelled_input("Key", "space", &self.key_input)
            .with_handler(|input| input.on_input(OrchestratorMessage::UpdateKey));

        let select_btn = button(text("Select Region").size(14))
            .padding([8, 20])
            .style(app_theme::secondary_button_style)
            .on_press_maybe(
                (!is_capturing && !is_selecting).then_some(OrchestratorMessage::OpenRegionSelector),
            );
        let clear_btn = button(text("Clear").size(14))
            .padding([8, 20])
            .style(app_theme::secondary_button_style)
            .on_press_maybe(self.selected_region.map(|_| OrchestratorMessage::ClearRegion));
        let region_capture_btn = button(text("Capture Region").size(16))
            .padding([12, 32])
            .style(app_theme::primary_button_style)
            .on_press_maybe(
                (!is_capturing && self.selected_region.is_some())
                    .then_some(OrchestratorMessage::StartRegionCapture),
            );

        let region_section = container(
            column![
                text("Region").size(16),
                row![select_btn, clear_btn, text(region_label).size(13)]
                    .spacing(10)
                    .align_y(Alignment::Center),
                interval_row,
                key_row,
                region_capture_btn,
            ]
            .spacing(10),
        )
        .padding(16)
        .width(Length::Fill)
        .style(app_theme::panel_style);

        let cancel_btn = button(text("Cancel Capture").size(14))
            .padding([8, 20])
            .style(app_theme::danger_button_style)
            .on_press_maybe(is_capturing.then_some(OrchestratorMessage::CancelCapture));
        let export_btn = button(text("Create PDF").size(14))
            .padding([8, 20])
            .style(app_theme::primary_button_style)
            .on_press_maybe(
                (!is_capturing && !self.is_exporting).then_some(OrchestratorMessage::ExportDocument),
            );
        let screenshots_btn = button(text("Screenshots").size(14))
            .padding([8, 20])
            .style(app_theme::secondary_button_style)
            .on_press(OrchestratorMessage::OpenScreenshotDirectory);
        let output_btn = button(text("Output").size(14))
            .padding([8, 20])
            .style(app_theme::secondary_button_style)
            .on_press(OrchestratorMessage::OpenOutputDirectory);

        let action_row = row![cancel_btn, export_btn, screenshots_btn, output_btn]
            .spacing(10)
            .align_y(Alignment::Center);

        let content = column![
            header_section,
            Space::new().height(Length::Fixed(16.0)),
            full_screen_section,
            region_section,
            action_row,
            Space::new().height(Length::Fixed(8.0)),
            self.render_status_indicator(),
            self.render_last_results(),
            self.render_permission_row(),
        ]
        .spacing(12)
        .padding(28)
        .align_x(Alignment::Center);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .style(move |_theme| {
                let palette = theme.palette();
                container::Style {
                    background: Some(Background::Color(palette.background)),
                    text_color: Some(palette.text),
                    ..Default::default()
                }
            })
            .into()
    }

    fn render_status_indicator(&self) -> Element<'_, OrchestratorMessage> {
        let status_color = if self.status.to_lowercase().contains("failed") {
            Color::from_rgb(1.0, 0.3, 0.3)
        } else if self.capture_session.is_active() || self.is_exporting {
            Color::from_rgb(1.0, 0.8, 0.2)
        } else {
            Color::from_rgb(0.2, 0.8, 0.4)
        };

        let status_text = row![
            text("●")
                .size(12)
                .style(move |_theme: &iced::Theme| text::Style {
                    color: Some(status_color),
                }),
            text(&self.status).size(13).style(muted_text),
        ]
        .spacing(8)
        .align_y(Alignment::Center);

        container(status_text).into()
    }

    fn render_last_results(&self) -> Element<'_, OrchestratorMessage> {
        let mut lines = column![].spacing(4).align_x(Alignment::Center);

        if let Some(capture) = &self.last_capture {
            lines = lines.push(
                text(format!(
                    "Last run: {} of {} screenshots{}",
                    capture.captured,
                    capture.requested,
                    if capture.cancelled { " (cancelled)" } else { "" }
                ))
                .size(12)
                .style(muted_text),
            );
        }
        if let Some(ExportResult::Exported { path, .. }) = &self.last_export {
            lines = lines.push(
                text(format!("Last PDF: {}", path.display()))
                    .size(12)
                    .style(muted_text),
            );
        }

        lines.into()
    }

    fn render_permission_row(&self) -> Element<'_, OrchestratorMessage> {
        let check_btn = button(text("Check").size(12))
            .padding([4, 12])
            .style(app_theme::secondary_button_style)
            .on_press(OrchestratorMessage::QueryPermissionStatus);

        let mut permission_row = row![
            text(format!("Screen recording: {}", self.permission_status))
                .size(12)
                .style(muted_text),
            check_btn,
        ]
        .spacing(8)
        .align_y(Alignment::Center);

        if self.permission_status == PermissionStatus::Denied {
            permission_row = permission_row.push(
                button(text("Open Settings").size(12))
                    .padding([4, 12])
                    .style(app_theme::secondary_button_style)
                    .on_press(OrchestratorMessage::OpenPermissionSettings),
            );
        }

        permission_row.into()
    }
}

fn muted_text(_theme: &iced::Theme) -> text::Style {
    text::Style {
        color: Some(Color::from_rgba(0.6, 0.6, 0.6, 1.0)),
    }
}

/// A label and an input sharing one row; the caller attaches the handler.
struct LabelledInput<'a> {
    label: &'a str,
    input: text_input::TextInput<'a, OrchestratorMessage>,
}

impl<'a> LabelledInput<'a> {
    fn with_handler(
        self,
        attach: impl FnOnce(
            text_input::TextInput<'a, OrchestratorMessage>,
        ) -> text_input::TextInput<'a, OrchestratorMessage>,
    ) -> Element<'a, OrchestratorMessage> {
        row![
            text(self.label).size(14).width(Length::Fixed(110.0)),
            attach(self.input).width(Length::Fixed(120.0)).padding(6),
        ]
        .spacing(10)
        .align_y(Alignment::Center)
        .into()
    }
}

fn labelled_input<'a>(label: &'a str, placeholder: &'a str, value: &'a str) -> LabelledInput<'a> {
    LabelledInput {
        label,
        input: text_input(placeholder, value),
    }
}

fn parse_count(input: &str) -> Result<u32, String> {
    input
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("Screenshot count must be a whole number, got {:?}", input))
}

/// Empty input keeps the configured interval.
fn parse_interval(input: &str, fallback: Duration) -> Result<Duration, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(fallback);
    }

    trimmed
        .parse::<f64>()
        .ok()
        .and_then(|seconds| Duration::try_from_secs_f64(seconds).ok())
        .ok_or_else(|| format!("Interval must be a number of seconds, got {:?}", input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::ExportError;
    use crate::core::interfaces::ports::ExportedDocument;
    use crate::core::models::{CaptureBuffer, CapturedFrame};
    use std::path::Path;

    struct MockScreenCapturer {
        displays: Vec<DisplayInfo>,
    }

    #[async_trait::async_trait]
    impl ScreenCapturer for MockScreenCapturer {
        fn list_displays(&self) -> anyhow::Result<Vec<DisplayInfo>> {
            Ok(self.displays.clone())
        }

        async fn capture_primary_display(&self) -> anyhow::Result<(DisplayInfo, CaptureBuffer)> {
            anyhow::bail!("not used")
        }
    }

    struct MockFrameStore;
    impl FrameStore for MockFrameStore {
        fn directory(&self) -> &Path {
            Path::new("/tmp/booker-test/screenshots")
        }

        fn prepare(&self) -> anyhow::Result<()> {
            Ok(())
        }

        fn persist(&self, _frame: CapturedFrame) -> anyhow::Result<PathBuf> {
            Ok(PathBuf::from("/tmp/booker-test/screenshots/frame.png"))
        }
    }

    struct MockDocumentExporter;
    impl DocumentExporter for MockDocumentExporter {
        fn export(
            &self,
            _frames_directory: &Path,
            _output_directory: &Path,
        ) -> Result<ExportedDocument, ExportError> {
            Err(ExportError::NoFrames)
        }
    }

    fn display(id: u32, x: i32, is_primary: bool) -> DisplayInfo {
        DisplayInfo {
            id,
            name: format!("Display {}", id),
            x,
            y: 0,
            width: 1920,
            height: 1080,
            scale_factor: 1.0,
            is_primary,
        }
    }

    fn create_test_orchestrator_with(displays: Vec<DisplayInfo>) -> AppOrchestrator {
        AppOrchestrator::build(
            Arc::new(MockScreenCapturer { displays }),
            Arc::new(MockFrameStore),
            Arc::new(MockDocumentExporter),
            PathBuf::from("/tmp/booker-test/output"),
            Capabilities::default(),
            UserSettings::default(),
        )
    }

    fn create_test_orchestrator() -> AppOrchestrator {
        create_test_orchestrator_with(vec![display(1, 0, true), display(2, 1920, false)])
    }

    fn overlay_for_display(orchestrator: &AppOrchestrator, display_id: u32) -> Id {
        orchestrator
            .windows
            .iter()
            .find_map(|(id, window)| match window {
                AppWindow::SelectorOverlay(view) if view.display().id == display_id => Some(*id),
                _ => None,
            })
            .expect("overlay for display")
    }

    #[test]
    fn test_build_creates_orchestrator_with_correct_initial_state() {
        let orchestrator = create_test_orchestrator();

        assert_eq!(orchestrator.windows.len(), 0);
        assert!(orchestrator.main_window_id.is_none());
        assert!(orchestrator.selected_region.is_none());
        assert_eq!(orchestrator.count_input, "10");
        assert_eq!(orchestrator.key_input, "space");
        assert_eq!(orchestrator.status, "Ready");
    }

    #[test]
    fn test_open_region_selector_creates_one_overlay_per_display() {
        let mut orchestrator = create_test_orchestrator();

        let _ = orchestrator.update(OrchestratorMessage::OpenRegionSelector);

        assert_eq!(orchestrator.overlay_ids().len(), 2);
        assert!(orchestrator.selector_session.is_active());
    }

    #[test]
    fn test_opening_selector_twice_does_not_create_second_overlay_set() {
        let mut orchestrator = create_test_orchestrator();

        let _ = orchestrator.update(OrchestratorMessage::OpenRegionSelector);
        let first_ids = {
            let mut ids = orchestrator.overlay_ids();
            ids.sort_by_key(|id| format!("{:?}", id));
            ids
        };
        let _ = orchestrator.update(OrchestratorMessage::OpenRegionSelector);
        let mut second_ids = orchestrator.overlay_ids();
        second_ids.sort_by_key(|id| format!("{:?}", id));

        assert_eq!(first_ids, second_ids);
        assert_eq!(orchestrator.windows.len(), 2);
    }

    #[test]
    fn test_selector_without_displays_reports_error() {
        let mut orchestrator = create_test_orchestrator_with(Vec::new());

        let _ = orchestrator.update(OrchestratorMessage::OpenRegionSelector);

        assert!(orchestrator.overlay_ids().is_empty());
        assert!(!orchestrator.selector_session.is_active());
        assert!(orchestrator.status.contains("screen recording permission"));
    }

    #[test]
    fn test_drag_across_displays_resolves_global_region() {
        let mut orchestrator = create_test_orchestrator();
        let _ = orchestrator.update(OrchestratorMessage::OpenRegionSelector);
        let left = overlay_for_display(&orchestrator, 1);
        let right = overlay_for_display(&orchestrator, 2);

        let _ = orchestrator.update(OrchestratorMessage::SelectorOverlay(
            left,
            RegionSelectorMessage::MousePressed(Point::new(1900.0, 100.0)),
        ));
        let _ = orchestrator.update(OrchestratorMessage::SelectorOverlay(
            right,
            RegionSelectorMessage::MouseMoved(Point::new(50.0, 300.0)),
        ));
        assert_eq!(
            orchestrator.region_selection.preview(),
            Some(ScreenRegion::new(1900, 100, 70, 200))
        );

        let _ = orchestrator.update(OrchestratorMessage::SelectorOverlay(
            right,
            RegionSelectorMessage::MouseReleased(Some(Point::new(50.0, 300.0))),
        ));

        assert_eq!(
            orchestrator.region_selection.outcome(),
            Some(SelectionOutcome::Selected(ScreenRegion::new(1900, 100, 70, 200)))
        );
        assert!(orchestrator.overlay_ids().is_empty());
        assert!(!orchestrator.selector_session.is_active());
    }

    #[test]
    fn test_release_outside_overlay_uses_last_pointer() {
        let mut orchestrator = create_test_orchestrator();
        let _ = orchestrator.update(OrchestratorMessage::OpenRegionSelector);
        let left = overlay_for_display(&orchestrator, 1);

        let _ = orchestrator.update(OrchestratorMessage::SelectorOverlay(
            left,
            RegionSelectorMessage::MousePressed(Point::new(10.0, 10.0)),
        ));
        let _ = orchestrator.update(OrchestratorMessage::SelectorOverlay(
            left,
            RegionSelectorMessage::MouseMoved(Point::new(110.0, 60.0)),
        ));
        let _ = orchestrator.update(OrchestratorMessage::SelectorOverlay(
            left,
            RegionSelectorMessage::MouseReleased(None),
        ));

        assert_eq!(
            orchestrator.region_selection.outcome(),
            Some(SelectionOutcome::Selected(ScreenRegion::new(10, 10, 100, 50)))
        );
    }

    #[test]
    fn test_small_drag_resolves_as_cancellation() {
        let mut orchestrator = create_test_orchestrator();
        let _ = orchestrator.update(OrchestratorMessage::OpenRegionSelector);
        let left = overlay_for_display(&orchestrator, 1);

        let _ = orchestrator.update(OrchestratorMessage::SelectorOverlay(
            left,
            RegionSelectorMessage::MousePressed(Point::new(10.0, 10.0)),
        ));
        let _ = orchestrator.update(OrchestratorMessage::SelectorOverlay(
            left,
            RegionSelectorMessage::MouseReleased(Some(Point::new(15.0, 200.0))),
        ));

        assert_eq!(
            orchestrator.region_selection.outcome(),
            Some(SelectionOutcome::Cancelled)
        );
        assert!(orchestrator.overlay_ids().is_empty());
    }

    #[test]
    fn test_global_escape_cancels_selection() {
        let mut orchestrator = create_test_orchestrator();
        let _ = orchestrator.update(OrchestratorMessage::OpenRegionSelector);

        let _ = orchestrator.update(OrchestratorMessage::Keyboard(
            GlobalKeyboardEvent::EscapePressed,
        ));

        assert_eq!(
            orchestrator.region_selection.outcome(),
            Some(SelectionOutcome::Cancelled)
        );
        assert!(orchestrator.overlay_ids().is_empty());
        assert!(!orchestrator.selector_session.is_active());
    }

    #[test]
    fn test_external_overlay_close_tears_down_all_overlays() {
        let mut orchestrator = create_test_orchestrator();
        let _ = orchestrator.update(OrchestratorMessage::OpenRegionSelector);
        let right = overlay_for_display(&orchestrator, 2);

        let _ = orchestrator.update(OrchestratorMessage::WindowClosed(right));

        assert!(orchestrator.windows.is_empty());
        assert!(!orchestrator.selector_session.is_active());
        assert_eq!(
            orchestrator.region_selection.outcome(),
            Some(SelectionOutcome::Cancelled)
        );
    }

    #[test]
    fn test_selector_can_reopen_after_resolution() {
        let mut orchestrator = create_test_orchestrator();
        let _ = orchestrator.update(OrchestratorMessage::OpenRegionSelector);
        let _ = orchestrator.update(OrchestratorMessage::Keyboard(
            GlobalKeyboardEvent::EscapePressed,
        ));

        let _ = orchestrator.update(OrchestratorMessage::OpenRegionSelector);

        assert_eq!(orchestrator.overlay_ids().len(), 2);
        assert!(orchestrator.region_selection.outcome().is_none());
    }

    #[test]
    fn test_region_resolved_stores_region() {
        let mut orchestrator = create_test_orchestrator();
        let region = ScreenRegion::new(100, 100, 400, 300);

        let _ = orchestrator.update(OrchestratorMessage::RegionResolved(Some(region)));

        assert_eq!(orchestrator.selected_region, Some(region));
        assert!(orchestrator.status.contains("Region selected"));
    }

    #[test]
    fn test_region_resolved_none_keeps_previous_region() {
        let mut orchestrator = create_test_orchestrator();
        let region = ScreenRegion::new(100, 100, 400, 300);
        let _ = orchestrator.update(OrchestratorMessage::RegionResolved(Some(region)));

        let _ = orchestrator.update(OrchestratorMessage::RegionResolved(None));

        assert_eq!(orchestrator.selected_region, Some(region));
        assert_eq!(orchestrator.status, "Region selection cancelled");
    }

    #[test]
    fn test_region_capture_without_region_is_rejected() {
        let mut orchestrator = create_test_orchestrator();

        let _ = orchestrator.update(OrchestratorMessage::StartRegionCapture);

        assert!(!orchestrator.capture_session.is_active());
        assert_eq!(orchestrator.status, "Select a region first");
    }

    #[test]
    fn test_start_capture_rejects_zero_count() {
        let mut orchestrator = create_test_orchestrator();
        let _ = orchestrator.update(OrchestratorMessage::UpdateCount("0".to_string()));

        let _ = orchestrator.update(OrchestratorMessage::StartCapture);

        assert!(!orchestrator.capture_session.is_active());
        assert!(orchestrator.status.contains("at least 1"));
    }

    #[test]
    fn test_start_capture_while_running_is_rejected() {
        let mut orchestrator = create_test_orchestrator();
        let _guard = orchestrator.capture_session.start();

        let _ = orchestrator.update(OrchestratorMessage::StartCapture);

        assert_eq!(orchestrator.status, CaptureError::AlreadyRunning.to_string());
    }

    #[test]
    fn test_start_capture_activates_session() {
        let mut orchestrator = create_test_orchestrator();

        let _task = orchestrator.update(OrchestratorMessage::StartCapture);

        assert!(orchestrator.capture_session.is_active());
        assert_eq!(orchestrator.settings.capture_count, 10);
    }

    #[test]
    fn test_region_capture_rejects_unknown_key() {
        let mut orchestrator = create_test_orchestrator();
        let _ = orchestrator.update(OrchestratorMessage::RegionResolved(Some(
            ScreenRegion::new(0, 0, 200, 200),
        )));
        let _ = orchestrator.update(OrchestratorMessage::UpdateKey("hyper".to_string()));

        let _ = orchestrator.update(OrchestratorMessage::StartRegionCapture);

        assert!(!orchestrator.capture_session.is_active());
        assert!(orchestrator.status.contains("unknown key"));
    }

    #[test]
    fn test_region_capture_off_primary_display_is_rejected() {
        let mut orchestrator = create_test_orchestrator();
        let _ = orchestrator.update(OrchestratorMessage::RegionResolved(Some(
            ScreenRegion::new(2000, 100, 300, 200),
        )));

        let _ = orchestrator.update(OrchestratorMessage::StartRegionCapture);

        assert!(!orchestrator.capture_session.is_active());
        assert_eq!(
            orchestrator.status,
            CaptureError::RegionOffCaptureDisplay.to_string()
        );
    }

    #[test]
    fn test_region_partly_on_primary_display_is_accepted() {
        let orchestrator = create_test_orchestrator();
        let region = ScreenRegion::new(1800, 100, 300, 200);

        let request = orchestrator
            .build_capture_request(Some(region))
            .expect("region overlaps the primary display");

        assert_eq!(request.region(), Some(region));
    }

    #[test]
    fn test_build_capture_request_for_region_uses_inputs() {
        let mut orchestrator = create_test_orchestrator();
        let region = ScreenRegion::new(0, 0, 200, 200);
        orchestrator.count_input = "4".to_string();
        orchestrator.interval_input = "1.5".to_string();
        orchestrator.key_input = "right".to_string();

        let request = orchestrator
            .build_capture_request(Some(region))
            .expect("valid request");

        assert_eq!(request.count(), 4);
        assert_eq!(request.interval(), Duration::from_millis(1500));
        assert_eq!(request.region(), Some(region));
        assert_eq!(request.key().name(), "right");
    }

    #[test]
    fn test_build_capture_request_full_screen_ignores_interval_and_key() {
        let mut orchestrator = create_test_orchestrator();
        orchestrator.count_input = "3".to_string();
        orchestrator.interval_input = "0.1".to_string();
        orchestrator.key_input = "hyper".to_string();

        let request = orchestrator.build_capture_request(None).expect("valid request");

        assert_eq!(request.count(), 3);
        assert_eq!(request.interval(), Duration::from_secs(2));
        assert_eq!(request.key().name(), "space");
    }

    #[test]
    fn test_parse_interval_rejects_short_and_garbage_input() {
        assert_eq!(
            parse_interval("", Duration::from_secs(2)),
            Ok(Duration::from_secs(2))
        );
        assert!(parse_interval("abc", Duration::from_secs(2)).is_err());
        assert!(parse_interval("-1", Duration::from_secs(2)).is_err());
        assert!(parse_count("three").is_err());
        assert_eq!(parse_count(" 7 "), Ok(7));
    }

    #[test]
    fn test_cancel_capture_marks_session_cancelled() {
        let mut orchestrator = create_test_orchestrator();
        let _guard = orchestrator.capture_session.start();

        let _ = orchestrator.update(OrchestratorMessage::CancelCapture);

        assert!(orchestrator.capture_session.is_cancelled());
        assert_eq!(orchestrator.status, "Cancelling capture...");
    }

    #[test]
    fn test_capture_finished_updates_status() {
        let mut orchestrator = create_test_orchestrator();
        let result = CaptureResult::summarize(5, 3, false, PathBuf::from("/tmp/shots"));

        let _ = orchestrator.update(OrchestratorMessage::CaptureFinished(result.clone()));

        assert_eq!(orchestrator.last_capture, Some(result));
        assert!(orchestrator.status.contains("3 of 5"));
    }

    #[test]
    fn test_export_finished_failure_updates_status() {
        let mut orchestrator = create_test_orchestrator();
        orchestrator.is_exporting = true;

        let _ = orchestrator.update(OrchestratorMessage::ExportFinished(ExportResult::Failed {
            error: "No screenshots found.".to_string(),
        }));

        assert!(!orchestrator.is_exporting);
        assert_eq!(orchestrator.status, "Export failed: No screenshots found.");
    }

    #[test]
    fn test_second_export_request_is_ignored_while_exporting() {
        let mut orchestrator = create_test_orchestrator();

        let _ = orchestrator.update(OrchestratorMessage::ExportDocument);
        orchestrator.status = "still exporting".to_string();
        let _ = orchestrator.update(OrchestratorMessage::ExportDocument);

        assert!(orchestrator.is_exporting);
        assert_eq!(orchestrator.status, "still exporting");
    }

    #[test]
    fn test_permission_status_ready_updates_capabilities() {
        let mut orchestrator = create_test_orchestrator();

        let _ = orchestrator.update(OrchestratorMessage::PermissionStatusReady(
            PermissionStatus::Denied,
        ));

        assert_eq!(orchestrator.permission_status, PermissionStatus::Denied);
        assert_eq!(
            orchestrator.capabilities.screen_recording,
            PermissionStatus::Denied
        );
        assert!(orchestrator.status.contains("denied"));
    }

    #[test]
    fn test_update_inputs_modify_fields() {
        let mut orchestrator = create_test_orchestrator();

        let _ = orchestrator.update(OrchestratorMessage::UpdateCount("25".to_string()));
        let _ = orchestrator.update(OrchestratorMessage::UpdateInterval("3".to_string()));
        let _ = orchestrator.update(OrchestratorMessage::UpdateKey("pagedown".to_string()));

        assert_eq!(orchestrator.count_input, "25");
        assert_eq!(orchestrator.interval_input, "3");
        assert_eq!(orchestrator.key_input, "pagedown");
    }

    #[test]
    fn test_get_window_title_returns_correct_title() {
        let mut orchestrator = create_test_orchestrator();
        let _ = orchestrator.update(OrchestratorMessage::OpenRegionSelector);
        let overlay = overlay_for_display(&orchestrator, 1);

        assert_eq!(orchestrator.get_window_title(Id::unique()), "Booker");
        assert_eq!(
            orchestrator.get_window_title(overlay),
            "Booker - Select Region"
        );
    }
}
