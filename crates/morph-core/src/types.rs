//! Summary and report types returned by pipeline operations.

use serde::{Deserialize, Serialize};

/// One line of `list_input` output: a record's identity and shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordSummary {
    /// Identity key (lowercased filename)
    pub name: String,

    /// Image width in pixels
    pub width: u32,

    /// Image height in pixels
    pub height: u32,

    /// Channels per pixel
    pub channels: u8,

    /// Pixel buffer size in bytes
    pub bytes: usize,

    /// Whether any filter has touched this record
    pub modified: bool,
}

impl RecordSummary {
    /// Buffer size in MiB.
    pub fn size_mib(&self) -> f64 {
        self.bytes as f64 / (1024.0 * 1024.0)
    }
}

impl std::fmt::Display for RecordSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}x{}, {:.2} MiB)",
            self.name,
            self.width,
            self.height,
            self.size_mib()
        )?;
        if self.modified {
            write!(f, " [MODIFIED]")?;
        }
        Ok(())
    }
}

/// Outcome of a preview or export pass.
///
/// Per-record failures never abort the batch, so the report carries both
/// counts; the operation as a whole succeeded iff at least one record wrote.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WriteReport {
    /// Records written successfully
    pub written: usize,

    /// Records that failed to encode or write
    pub failed: usize,

    /// Records removed from the store afterwards (export-with-clear only)
    pub cleared: usize,
}

impl WriteReport {
    /// True iff at least one record was written.
    pub fn is_success(&self) -> bool {
        self.written > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(modified: bool) -> RecordSummary {
        RecordSummary {
            name: "beach.jpg".to_string(),
            width: 1920,
            height: 1080,
            channels: 3,
            bytes: 1920 * 1080 * 3,
            modified,
        }
    }

    #[test]
    fn test_summary_display() {
        let text = summary(false).to_string();
        assert!(text.starts_with("beach.jpg (1920x1080,"));
        assert!(!text.contains("[MODIFIED]"));

        let text = summary(true).to_string();
        assert!(text.ends_with("[MODIFIED]"));
    }

    #[test]
    fn test_summary_size_mib() {
        let s = summary(false);
        assert!((s.size_mib() - 5.93).abs() < 0.01);
    }

    #[test]
    fn test_summary_serde_roundtrip() {
        let json = serde_json::to_string(&summary(true)).unwrap();
        assert!(json.contains("\"name\":\"beach.jpg\""));
        let parsed: RecordSummary = serde_json::from_str(&json).unwrap();
        assert!(parsed.modified);
        assert_eq!(parsed.bytes, 1920 * 1080 * 3);
    }

    #[test]
    fn test_write_report_success() {
        let mut report = WriteReport::default();
        assert!(!report.is_success());
        report.written = 1;
        report.failed = 3;
        assert!(report.is_success());
    }
}
