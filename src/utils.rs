use std::fs;
use std::io::Write;
use std::path::Path;

use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};

use crate::global_constants::INSTANCE_LOCK_FILE_NAME;

/// Returns `false` when another live instance holds the lock.
pub fn ensure_single_instance() -> bool {
    let lock_file_path = std::env::temp_dir().join(INSTANCE_LOCK_FILE_NAME);
    acquire_instance_lock(&lock_file_path)
}

fn acquire_instance_lock(lock_file_path: &Path) -> bool {
    let current_pid = std::process::id();

    if let Ok(pid_string) = fs::read_to_string(lock_file_path) {
        match pid_string.trim().parse::<u32>() {
            Ok(pid) if pid != current_pid && is_process_running(pid) => {
                log::warn!("[INSTANCE] Existing instance is running (PID: {})", pid);
                return false;
            }
            Ok(pid) => {
                log::info!(
                    "[INSTANCE] Previous instance (PID: {}) is not running, cleaning up stale lock file",
                    pid
                );
            }
            Err(_) => log::warn!("[INSTANCE] Lock file is unreadable, replacing it"),
        }
        let _ = fs::remove_file(lock_file_path);
    }

    if let Err(e) = fs::File::create(lock_file_path)
        .and_then(|mut file| file.write_all(current_pid.to_string().as_bytes()))
    {
        log::error!("[INSTANCE] Failed to create lock file: {}", e);
        return true;
    }

    log::info!("[INSTANCE] Created lock file with PID: {}", current_pid);
    true
}

fn is_process_running(pid: u32) -> bool {
    let mut system = System::new();
    system.refresh_processes_specifics(
        ProcessesToUpdate::Some(&[Pid::from_u32(pid)]),
        true,
        ProcessRefreshKind::nothing(),
    );
    system.process(Pid::from_u32(pid)).is_some()
}
