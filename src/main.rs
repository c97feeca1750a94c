#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod adapters;
mod app;
mod core;
mod global_constants;
mod ports;
mod presentation;
mod utils;

use iced::daemon;

use crate::adapters::key_helper_process::{press_with_fallback, serve_key_helper};
use crate::adapters::macos_permissions::log_permission_status;
use crate::adapters::{CommandKeyPresser, EnigoKeyPresser};
use crate::core::models::KeyIdentifier;
use crate::global_constants::KEY_HELPER_ARGUMENT;

fn main() -> iced::Result {
    env_logger::init();

    if std::env::args().any(|argument| argument == KEY_HELPER_ARGUMENT) {
        run_key_helper();
        return Ok(());
    }

    log::info!("[MAIN] Starting Booker");
    log_permission_status();

    if !utils::ensure_single_instance() {
        log::error!("[MAIN] Another Booker instance is already running, exiting");
        return Ok(());
    }

    #[cfg(target_os = "macos")]
    {
        use tray_icon::TrayIconEvent;
        TrayIconEvent::set_event_handler(Some(|_event| {}));
    }

    daemon(
        app::BookerApp::build,
        app::BookerApp::handle_update,
        app::BookerApp::render_view,
    )
    .title(app::BookerApp::window_title)
    .style(app::BookerApp::window_style)
    .subscription(app::BookerApp::handle_subscription)
    .run()
}

fn run_key_helper() {
    log::info!("[MAIN] Running as key helper");
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let command_presser = CommandKeyPresser::for_current_platform();

    let press = |key: &KeyIdentifier| {
        press_with_fallback(key, EnigoKeyPresser::click, |key| match &command_presser {
            Some(presser) => presser.press_blocking(key),
            None => Err(anyhow::anyhow!("no command key presser for this platform")),
        })
    };

    if let Err(e) = serve_key_helper(stdin.lock(), stdout.lock(), press) {
        log::error!("[MAIN] Key helper stopped with error: {:#}", e);
        std::process::exit(1);
    }
}
