pub mod capability_probe;
pub mod command_key_presser;
pub mod directory_opener;
mod enigo_key_presser;
mod fallback_key_presser;
mod key_actuator;
pub mod key_helper_process;
pub mod macos_permissions;
mod pdf_document_exporter;
mod png_frame_store;

pub use command_key_presser::CommandKeyPresser;
pub use enigo_key_presser::EnigoKeyPresser;
pub use fallback_key_presser::FallbackKeyPresser;
pub use key_actuator::KeyActuator;
pub use key_helper_process::KeyHelperProcess;
pub use pdf_document_exporter::PdfDocumentExporter;
pub use png_frame_store::PngFrameStore;
