use std::{fs::OpenOptions, io::Write, path::PathBuf};

use chrono::Local;
use skycast_core::EventSink;

/// Appends timestamped attempt failures to a log file, one per line.
/// Logging failures are reported but never fail a fetch.
#[derive(Debug)]
pub struct FileEventSink {
    path: PathBuf,
}

impl FileEventSink {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl EventSink for FileEventSink {
    fn record(&self, event: &str) {
        let line = format!("[{}] {}\n", Local::now().to_rfc3339(), event);

        let written = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut file| file.write_all(line.as_bytes()));

        if let Err(err) = written {
            tracing::warn!(path = %self.path.display(), %err, "failed to write attempt log");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_appends_timestamped_lines() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("attempts.log");

        let sink = FileEventSink::new(path.clone());
        sink.record("openweather failed: missing API key for openweather");
        sink.record("weatherapi failed: request failed: timed out");

        let contents = std::fs::read_to_string(&path).expect("read log");
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with('['));
        assert!(lines[0].contains("openweather failed"));
        assert!(lines[1].contains("weatherapi failed"));
    }
}
