pub mod app_orchestrator;
mod capture_loop;
mod session;

pub use capture_loop::CaptureLoop;
pub use session::{Session, SessionGuard};
