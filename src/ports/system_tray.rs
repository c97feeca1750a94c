use tray_icon::menu::{Menu, MenuEvent, MenuItem};
use tray_icon::{Icon, TrayIcon, TrayIconBuilder};

use crate::global_constants::APPLICATION_TITLE;

const MENU_ID_SHOW_WINDOW: &str = "show-window";
const MENU_ID_OPEN_SCREENSHOTS: &str = "open-screenshots";
const MENU_ID_OPEN_OUTPUT: &str = "open-output";
const MENU_ID_QUIT: &str = "quit";
const TRAY_ICON_SIZE: u32 = 32;

pub struct SystemTray {
    _tray_icon: TrayIcon,
    _menu: Menu,
    _show_window_item: MenuItem,
    _open_screenshots_item: MenuItem,
    _open_output_item: MenuItem,
    _quit_item: MenuItem,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrayEvent {
    ShowWindow,
    OpenScreenshots,
    OpenOutput,
    Quit,
}

impl SystemTray {
    pub fn build() -> anyhow::Result<Self> {
        log::info!("[SYSTEM_TRAY] Initializing system tray");

        let icon = Icon::from_rgba(
            render_icon_rgba(TRAY_ICON_SIZE),
            TRAY_ICON_SIZE,
            TRAY_ICON_SIZE,
        )?;

        let menu = Menu::new();
        let show_window_item = MenuItem::with_id(MENU_ID_SHOW_WINDOW, "Show Window", true, None);
        let open_screenshots_item =
            MenuItem::with_id(MENU_ID_OPEN_SCREENSHOTS, "Open Screenshots", true, None);
        let open_output_item = MenuItem::with_id(MENU_ID_OPEN_OUTPUT, "Open Output", true, None);
        let quit_item = MenuItem::with_id(MENU_ID_QUIT, "Quit", true, None);

        menu.append(&show_window_item)?;
        menu.append(&open_screenshots_item)?;
        menu.append(&open_output_item)?;
        menu.append(&quit_item)?;

        let tray_icon = TrayIconBuilder::new()
            .with_menu(Box::new(menu.clone()))
            .with_tooltip(APPLICATION_TITLE)
            .with_icon(icon)
            .build()?;

        log::info!("[SYSTEM_TRAY] System tray initialized successfully");

        Ok(Self {
            _tray_icon: tray_icon,
            _menu: menu,
            _show_window_item: show_window_item,
            _open_screenshots_item: open_screenshots_item,
            _open_output_item: open_output_item,
            _quit_item: quit_item,
        })
    }

    pub fn poll_events() -> Option<TrayEvent> {
        if let Ok(event) = MenuEvent::receiver().try_recv() {
            log::debug!("[SYSTEM_TRAY] Received menu event: {:?}", event.id);
            return TrayEvent::from_menu_id(event.id.0.as_ref());
        }
        None
    }
}

impl TrayEvent {
    fn from_menu_id(menu_id: &str) -> Option<Self> {
        match menu_id {
            MENU_ID_SHOW_WINDOW => Some(TrayEvent::ShowWindow),
            MENU_ID_OPEN_SCREENSHOTS => Some(TrayEvent::OpenScreenshots),
            MENU_ID_OPEN_OUTPUT => Some(TrayEvent::OpenOutput),
            MENU_ID_QUIT => Some(TrayEvent::Quit),
            _ => {
                log::warn!("[SYSTEM_TRAY] Unknown menu event: {}", menu_id);
                None
            }
        }
    }
}

/// A closed book: dark cover with a light page edge on the right.
fn render_icon_rgba(size: u32) -> Vec<u8> {
    let mut icon = image::RgbaImage::new(size, size);
    let margin = size / 8;
    let page_edge = size - margin - size / 6;

    for (x, y, pixel) in icon.enumerate_pixels_mut() {
        let inside = x >= margin && x < size - margin && y >= margin && y < size - margin;
        *pixel = match (inside, x >= page_edge) {
            (false, _) => image::Rgba([0, 0, 0, 0]),
            (true, false) => image::Rgba([52, 84, 140, 255]),
            (true, true) => image::Rgba([240, 236, 224, 255]),
        };
    }

    icon.into_raw()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_ids_map_to_events() {
        assert_eq!(
            TrayEvent::from_menu_id("show-window"),
            Some(TrayEvent::ShowWindow)
        );
        assert_eq!(
            TrayEvent::from_menu_id("open-screenshots"),
            Some(TrayEvent::OpenScreenshots)
        );
        assert_eq!(
            TrayEvent::from_menu_id("open-output"),
            Some(TrayEvent::OpenOutput)
        );
        assert_eq!(TrayEvent::from_menu_id("quit"), Some(TrayEvent::Quit));
        assert_eq!(TrayEvent::from_menu_id("7"), None);
    }

    #[test]
    fn test_icon_has_transparent_margin() {
        let rgba = render_icon_rgba(32);

        assert_eq!(rgba.len(), 32 * 32 * 4);
        assert_eq!(rgba[3], 0);
        let center = ((16 * 32 + 10) * 4) as usize;
        assert_eq!(rgba[center + 3], 255);
    }
}
