//! Shared fixtures for integration tests: temp dirs and a fake media tool.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use ytdrop::config::defaults::{DEFAULT_AUDIO_PARAMS, DEFAULT_VIDEO_PARAMS};
use ytdrop::config::JobConfig;

static COUNTER: AtomicU64 = AtomicU64::new(0);

/// Temporary directory removed on drop.
pub struct TempDir {
    path: PathBuf,
}

impl TempDir {
    pub fn new(prefix: &str) -> Self {
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        let path = std::env::temp_dir().join(format!("ytdrop-it-{prefix}-{millis}-{n}"));
        fs::create_dir_all(&path).expect("create temp dir");
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn child(&self, relative: &str) -> PathBuf {
        self.path.join(relative)
    }

    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.child(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent");
        }
        fs::write(&path, content).expect("write fixture");
        path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

/// Executable `/bin/sh` script standing in for yt-dlp.
#[cfg(unix)]
pub fn fake_tool(dir: &TempDir, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.write("bin/yt-dlp", &format!("#!/bin/sh\n{body}"));
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod fake tool");
    path
}

/// Job config pointing at `tool` and downloading into `<dir>/out`.
pub fn job_config(dir: &TempDir, tool: &Path) -> JobConfig {
    JobConfig {
        tool_path: tool.display().to_string(),
        download_dir: dir.child("out").display().to_string(),
        video_params: DEFAULT_VIDEO_PARAMS.to_string(),
        audio_params: DEFAULT_AUDIO_PARAMS.to_string(),
        cookie_file: None,
    }
}
