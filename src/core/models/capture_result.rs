use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct CaptureResult {
    pub success: bool,
    pub requested: u32,
    pub captured: u32,
    pub cancelled: bool,
    pub folder: PathBuf,
}

impl CaptureResult {
    pub fn summarize(requested: u32, captured: u32, cancelled: bool, folder: PathBuf) -> Self {
        Self {
            success: !cancelled && captured == requested,
            requested,
            captured,
            cancelled,
            folder,
        }
    }

    pub fn describe(&self) -> String {
        if self.cancelled {
            format!(
                "Capture cancelled after {} of {} screenshots",
                self.captured, self.requested
            )
        } else if self.success {
            format!(
                "Captured {} screenshots into {}",
                self.captured,
                self.folder.display()
            )
        } else {
            format!(
                "Captured {} of {} screenshots into {} (see log for failures)",
                self.captured,
                self.requested,
                self.folder.display()
            )
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExportResult {
    Exported { path: PathBuf, pages: usize },
    Failed { error: String },
}

impl ExportResult {
    pub fn describe(&self) -> String {
        match self {
            ExportResult::Exported { path, pages } => {
                format!("Exported {} pages to {}", pages, path.display())
            }
            ExportResult::Failed { error } => format!("Export failed: {}", error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_reports_success_when_all_frames_saved() {
        let result = CaptureResult::summarize(3, 3, false, PathBuf::from("/tmp/shots"));

        assert!(result.success);
        assert_eq!(result.captured, 3);
    }

    #[test]
    fn test_summarize_reports_actual_count_on_partial_failure() {
        let result = CaptureResult::summarize(5, 3, false, PathBuf::from("/tmp/shots"));

        assert!(!result.success);
        assert_eq!(result.requested, 5);
        assert_eq!(result.captured, 3);
        assert!(result.describe().contains("3 of 5"));
    }

    #[test]
    fn test_summarize_cancelled_run_is_not_success() {
        let result = CaptureResult::summarize(2, 2, true, PathBuf::from("/tmp/shots"));

        assert!(!result.success);
        assert!(result.describe().contains("cancelled"));
    }

    #[test]
    fn test_export_result_describe() {
        let failed = ExportResult::Failed {
            error: "No screenshots found.".to_string(),
        };

        assert_eq!(failed.describe(), "Export failed: No screenshots found.");
    }
}
