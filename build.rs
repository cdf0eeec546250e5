//! Build metadata for `--help` output and download log headers.
//!
//! Missing git or date tooling yields "unknown" markers instead of failing.

use std::env;
use std::fs;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

const GIT_HASH_ENV: &str = "YTDROP_BUILD_GIT_HASH";
const TIMESTAMP_ENV: &str = "YTDROP_BUILD_TIMESTAMP";

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    watch_branch_ref();

    let git_hash = env_or(GIT_HASH_ENV, || {
        capture("git", &["rev-parse", "--short=12", "HEAD"])
            .unwrap_or_else(|| "unknown".to_string())
    });
    let timestamp = env_or(TIMESTAMP_ENV, || {
        capture("date", &["-u", "+%Y-%m-%dT%H:%M:%SZ"]).unwrap_or_else(|| {
            let secs = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0);
            format!("unix:{secs}")
        })
    });

    println!("cargo:rustc-env={GIT_HASH_ENV}={git_hash}");
    println!("cargo:rustc-env={TIMESTAMP_ENV}={timestamp}");
}

fn env_or(key: &str, fallback: impl FnOnce() -> String) -> String {
    println!("cargo:rerun-if-env-changed={key}");
    env::var(key).unwrap_or_else(|_| fallback())
}

fn watch_branch_ref() {
    let Ok(head) = fs::read_to_string(".git/HEAD") else {
        return;
    };
    if let Some(reference) = head.trim().strip_prefix("ref: ") {
        println!("cargo:rerun-if-changed=.git/{reference}");
    }
}

fn capture(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?;
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
