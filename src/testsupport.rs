//! Shared test fixtures for theme, config, and downloader test modules.
//!
//! Keeping tiny but reusable helpers here prevents each test module from
//! rebuilding ad-hoc temp dirs, fake tool scripts, and recording sinks.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::downloader::{CancelFlag, DownloadEvent, LineTag, OutputSink};

static TEST_DIR_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Temporary directory fixture with best-effort cleanup.
#[derive(Debug)]
pub struct TestTempDir {
    path: PathBuf,
}

impl TestTempDir {
    /// Create a unique temporary directory with a readable prefix.
    pub fn new(prefix: &str) -> Self {
        let suffix = TEST_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        let dir = std::env::temp_dir().join(format!("ytdrop-{prefix}-{millis}-{suffix}"));
        fs::create_dir_all(&dir).expect("failed to create temporary fixture directory");
        Self { path: dir }
    }

    /// Root directory path for this fixture.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Build a child path under the fixture root.
    pub fn child(&self, relative: &str) -> PathBuf {
        self.path.join(relative)
    }

    /// Write UTF-8 text to a child path, creating parent directories as needed.
    pub fn write_text(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.child(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create parent directories for fixture");
        }
        fs::write(&path, content).expect("failed to write fixture file");
        path
    }
}

impl Drop for TestTempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

/// Fake media tool: answers title probes and format listings, and reports a
/// destination line for downloads.
pub const FAKE_TOOL_OK: &str = r#"case " $* " in
  *" --print title "*) echo "Fake Title"; exit 0 ;;
  *" --list-formats "*) echo "ID  EXT  RESOLUTION"; echo "18  mp4  640x360"; exit 0 ;;
esac
echo "[download] Destination: out.mp4"
echo "[download] 100% of 1.00MiB"
exit 0
"#;

/// Write an executable `/bin/sh` script standing in for the media tool.
#[cfg(unix)]
pub fn write_fake_tool(dir: &TestTempDir, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.write_text("bin/fake-yt-dlp", &format!("#!/bin/sh\n{body}"));
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
        .expect("failed to mark fake tool executable");
    path
}

/// Sink that records every event, optionally cancelling on a trigger line.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<DownloadEvent>>,
    trigger: Option<(String, CancelFlag)>,
}

impl RecordingSink {
    /// Cancel `flag` as soon as a line equal to `trigger` is written.
    pub fn cancelling_on(trigger: &str, flag: CancelFlag) -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            trigger: Some((trigger.to_string(), flag)),
        }
    }

    pub fn events(&self) -> Vec<DownloadEvent> {
        self.events.lock().expect("events lock").clone()
    }

    pub fn lines(&self) -> Vec<(String, Option<LineTag>)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                DownloadEvent::Line { text, tag } => Some((text, tag)),
                _ => None,
            })
            .collect()
    }

    pub fn statuses(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                DownloadEvent::Status(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn done_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|event| **event == DownloadEvent::Done)
            .count()
    }

    fn push(&self, event: DownloadEvent) {
        self.events.lock().expect("events lock").push(event);
    }
}

impl OutputSink for RecordingSink {
    fn write(&self, text: &str, tag: Option<LineTag>) {
        self.push(DownloadEvent::Line {
            text: text.to_string(),
            tag,
        });
        if let Some((trigger, flag)) = &self.trigger {
            if text == trigger {
                flag.cancel();
            }
        }
    }

    fn set_status(&self, text: &str) {
        self.push(DownloadEvent::Status(text.to_string()));
    }

    fn on_done(&self) {
        self.push(DownloadEvent::Done);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_dir_fixture_writes_and_resolves_paths() {
        let fixture = TestTempDir::new("fixture");
        let file = fixture.write_text("nested/file.txt", "hello");
        assert_eq!(fs::read_to_string(file).unwrap(), "hello");
        assert!(fixture.path().join("nested").is_dir());
    }

    #[test]
    fn recording_sink_cancels_on_trigger() {
        let flag = CancelFlag::new();
        let sink = RecordingSink::cancelling_on("go", flag.clone());
        sink.write("not yet", None);
        assert!(!flag.is_cancelled());
        sink.write("go", None);
        assert!(flag.is_cancelled());
        assert_eq!(sink.lines().len(), 2);
    }

    #[cfg(unix)]
    #[test]
    fn fake_tool_is_executable() {
        use std::os::unix::fs::PermissionsExt;

        let fixture = TestTempDir::new("fake-tool");
        let path = write_fake_tool(&fixture, "exit 0\n");
        let mode = fs::metadata(path).expect("metadata").permissions().mode();
        assert_eq!(mode & 0o111, 0o111);
    }
}
