//! Download orchestration around the external media tool.
//!
//! A [`Downloader`] runs at most one batch job at a time on a background
//! tokio task. The job iterates URLs (and modes, for fetches), streams each
//! tool invocation to the [`OutputSink`], writes one log file per unit, and
//! finishes with exactly one `on_done` call. Cancellation is cooperative
//! through a shared [`CancelFlag`] and escalates to terminating the child.

pub mod classify;
pub mod command;
pub mod log_file;
pub mod process;
pub mod sink;

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::task::JoinHandle;

use crate::config::JobConfig;
use crate::textutil::prefix_chars;

pub use classify::{classify, LineTag};
pub use command::{
    build_command, list_formats_command, modes_for, resolution, rewrite_output_path,
    shell_split, split_params, title_command, DownloadMode, SplitError, DEFAULT_RES_INDEX,
    RESOLUTIONS,
};
pub use log_file::{list_formats_stem, log_file_name, sanitize_title, sanitize_url, UnitLog};
pub use process::{fetch_title, run_streaming, terminate_child, CancelFlag, RunStatus};
pub use sink::{ChannelSink, DownloadEvent, OutputSink};

const STATUS_URL_MAX_CHARS: usize = 60;
const LIST_FORMATS_LOG_KIND: &str = "list-formats";

/// Lifecycle of the most recent job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobState {
    #[default]
    Idle,
    Running,
    /// Every unit succeeded.
    Completed,
    /// The batch ran to the end but at least one unit did not succeed.
    Failed,
    Cancelled,
}

/// Download one or more URLs in the selected modes.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub urls: Vec<String>,
    pub video: bool,
    pub audio: bool,
    pub use_cookie: bool,
    pub res_index: usize,
    pub config: JobConfig,
}

/// List available formats for one or more URLs.
#[derive(Debug, Clone)]
pub struct ListFormatsRequest {
    pub urls: Vec<String>,
    pub use_cookie: bool,
    pub config: JobConfig,
}

enum Job {
    Fetch {
        urls: Vec<String>,
        modes: Vec<DownloadMode>,
        use_cookie: bool,
        res_index: usize,
        config: JobConfig,
    },
    ListFormats {
        urls: Vec<String>,
        use_cookie: bool,
        config: JobConfig,
    },
}

struct WorkerContext {
    sink: Arc<dyn OutputSink>,
    cancel: CancelFlag,
}

/// Handle owning the single in-flight job.
pub struct Downloader {
    sink: Arc<dyn OutputSink>,
    cancel: CancelFlag,
    state: Arc<Mutex<JobState>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl std::fmt::Debug for Downloader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Downloader")
            .field("state", &self.state())
            .field("cancelled", &self.cancel.is_cancelled())
            .finish()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn clean_urls(urls: &[String]) -> Vec<String> {
    urls.iter()
        .map(|url| url.trim())
        .filter(|url| !url.is_empty())
        .map(str::to_string)
        .collect()
}

impl Downloader {
    pub fn new(sink: Arc<dyn OutputSink>) -> Self {
        Self {
            sink,
            cancel: CancelFlag::new(),
            state: Arc::new(Mutex::new(JobState::Idle)),
            worker: Mutex::new(None),
        }
    }

    /// Start a fetch job. Returns `false` without side effects when a job is
    /// already running, no URL is given, or no mode is selected.
    ///
    /// Must be called from within a tokio runtime.
    pub fn fetch(&self, request: FetchRequest) -> bool {
        let urls = clean_urls(&request.urls);
        let modes = modes_for(request.video, request.audio);
        if urls.is_empty() || modes.is_empty() {
            return false;
        }
        self.start(Job::Fetch {
            urls,
            modes,
            use_cookie: request.use_cookie,
            res_index: request.res_index,
            config: request.config,
        })
    }

    /// Start a list-formats job. Same no-op rules as [`Downloader::fetch`].
    pub fn list_formats(&self, request: ListFormatsRequest) -> bool {
        let urls = clean_urls(&request.urls);
        if urls.is_empty() {
            return false;
        }
        self.start(Job::ListFormats {
            urls,
            use_cookie: request.use_cookie,
            config: request.config,
        })
    }

    /// Signal cancellation. The worker terminates the active child and
    /// stops before the next unit.
    pub fn cancel(&self) {
        if self.is_running() {
            tracing::info!("cancel requested");
        }
        self.cancel.cancel();
    }

    pub fn is_running(&self) -> bool {
        self.state() == JobState::Running
    }

    pub fn state(&self) -> JobState {
        *lock(&self.state)
    }

    /// Wait for the current worker, if any, to finish.
    pub async fn wait_idle(&self) {
        let handle = lock(&self.worker).take();
        if let Some(handle) = handle {
            if let Err(err) = handle.await {
                tracing::warn!(error = %err, "download worker aborted");
            }
        }
    }

    fn start(&self, job: Job) -> bool {
        {
            let mut state = lock(&self.state);
            if *state == JobState::Running {
                tracing::debug!("job already running; request ignored");
                return false;
            }
            *state = JobState::Running;
            self.cancel.reset();
        }

        let ctx = WorkerContext {
            sink: Arc::clone(&self.sink),
            cancel: self.cancel.clone(),
        };
        let state = Arc::clone(&self.state);
        let handle = tokio::spawn(async move {
            let outcome = match job {
                Job::Fetch {
                    urls,
                    modes,
                    use_cookie,
                    res_index,
                    config,
                } => run_fetch(&ctx, &urls, &modes, use_cookie, res_index, &config).await,
                Job::ListFormats {
                    urls,
                    use_cookie,
                    config,
                } => run_list_formats(&ctx, &urls, use_cookie, &config).await,
            };
            tracing::info!(outcome = ?outcome, "job finished");
            *lock(&state) = outcome;
            ctx.sink.on_done();
        });
        *lock(&self.worker) = Some(handle);
        true
    }
}

async fn run_fetch(
    ctx: &WorkerContext,
    urls: &[String],
    modes: &[DownloadMode],
    use_cookie: bool,
    res_index: usize,
    config: &JobConfig,
) -> JobState {
    let total = urls.len();
    let out_dir = PathBuf::from(&config.download_dir);
    let mut any_failed = false;
    tracing::info!(urls = total, modes = ?modes, "fetch started");

    'urls: for (i, url) in urls.iter().enumerate() {
        for &mode in modes {
            if ctx.cancel.is_cancelled() {
                break 'urls;
            }
            ctx.sink.set_status(&format!(
                "Downloading {}/{total} [{mode}]: {}...",
                i + 1,
                prefix_chars(url, STATUS_URL_MAX_CHARS)
            ));
            let argv = build_command(url, mode, config, use_cookie, res_index);

            let title = fetch_title(&title_command(url, config, use_cookie), &ctx.cancel).await;
            if ctx.cancel.is_cancelled() {
                break 'urls;
            }
            let stem = if title.is_empty() {
                sanitize_url(url)
            } else {
                title
            };

            match run_unit(ctx, &argv, &out_dir, &stem, mode.as_str()).await {
                RunStatus::Cancelled => break 'urls,
                RunStatus::Exited(0) => {
                    ctx.sink
                        .write(&format!("Done [{mode}]: {url}"), Some(LineTag::Success));
                }
                // The runner already reported why.
                RunStatus::LaunchFailed => any_failed = true,
                RunStatus::Exited(code) => {
                    any_failed = true;
                    ctx.sink.write(
                        &format!("Failed (code {code}) [{mode}]: {url}"),
                        Some(LineTag::Error),
                    );
                }
                RunStatus::Signaled => {
                    any_failed = true;
                    ctx.sink.write(
                        &format!("Failed (killed by signal) [{mode}]: {url}"),
                        Some(LineTag::Error),
                    );
                }
            }
        }
    }

    if ctx.cancel.is_cancelled() {
        ctx.sink.set_status("Cancelled.");
        return JobState::Cancelled;
    }
    ctx.sink.set_status("All downloads complete.");
    ctx.sink.write("All tasks finished.", Some(LineTag::Success));
    if any_failed {
        JobState::Failed
    } else {
        JobState::Completed
    }
}

async fn run_list_formats(
    ctx: &WorkerContext,
    urls: &[String],
    use_cookie: bool,
    config: &JobConfig,
) -> JobState {
    let out_dir = PathBuf::from(&config.download_dir);
    let mut any_failed = false;
    ctx.sink.set_status("Listing formats...");
    tracing::info!(urls = urls.len(), "list formats started");

    for url in urls {
        if ctx.cancel.is_cancelled() {
            break;
        }
        let argv = list_formats_command(url, config, use_cookie);
        let status = run_unit(
            ctx,
            &argv,
            &out_dir,
            &list_formats_stem(url),
            LIST_FORMATS_LOG_KIND,
        )
        .await;
        match status {
            RunStatus::Cancelled => break,
            status if status.is_success() => {}
            _ => any_failed = true,
        }
    }

    if ctx.cancel.is_cancelled() {
        ctx.sink.set_status("Cancelled.");
        return JobState::Cancelled;
    }
    ctx.sink.set_status("Done listing formats.");
    if any_failed {
        JobState::Failed
    } else {
        JobState::Completed
    }
}

/// One invocation with its own log file, closed whatever the outcome.
async fn run_unit(
    ctx: &WorkerContext,
    argv: &[String],
    out_dir: &Path,
    stem: &str,
    kind: &str,
) -> RunStatus {
    let mut log = match UnitLog::open(out_dir, stem, kind) {
        Ok(log) => {
            ctx.sink
                .write(&format!("Log: {}", log.path().display()), Some(LineTag::Info));
            Some(log)
        }
        Err(err) => {
            tracing::warn!(dir = %out_dir.display(), error = %err, "could not open log file");
            ctx.sink
                .write(&format!("Could not open log file: {err}"), Some(LineTag::Warn));
            None
        }
    };
    let status = run_streaming(argv, &ctx.cancel, ctx.sink.as_ref(), log.as_mut()).await;
    if let Some(log) = log {
        log.close();
    }
    status
}
