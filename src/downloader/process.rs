//! Subprocess execution: streaming runs, title probes, and termination.

use std::io::{BufRead, BufReader, PipeReader};
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::process::{Child, Command};
use tokio::sync::{mpsc, Notify};
use tokio::time::{timeout, Duration};

use super::classify::{classify, LineTag};
use super::log_file::UnitLog;
use super::sink::OutputSink;

/// Grace period between SIGTERM and a forced kill.
pub const TERMINATE_GRACE: Duration = Duration::from_secs(3);
/// Upper bound for the title probe.
pub const TITLE_TIMEOUT: Duration = Duration::from_secs(15);

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// Shared, resettable cancellation signal for one job at a time.
///
/// Setting is idempotent and stays set until [`CancelFlag::reset`] at the
/// start of the next job.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag {
    inner: Arc<CancelInner>,
}

#[derive(Debug, Default)]
struct CancelInner {
    cancelled: AtomicBool,
    notify: Notify,
}

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.inner.cancelled.store(false, Ordering::SeqCst);
    }

    /// Resolve once the flag is set. Returns immediately if it already is.
    pub async fn cancelled(&self) {
        loop {
            let notified = self.inner.notify.notified();
            tokio::pin!(notified);
            // Register before checking so a concurrent `cancel` is not missed.
            notified.as_mut().enable();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}

/// Outcome of one streamed invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Tool exited with its own code.
    Exited(i32),
    /// Tool was killed by a signal nobody here sent.
    Signaled,
    /// Executable missing or the run broke down; an error line was written.
    LaunchFailed,
    Cancelled,
}

impl RunStatus {
    pub const LAUNCH_FAILED_CODE: i32 = -1;
    pub const CANCELLED_CODE: i32 = -2;

    /// Numeric result code. Negative values are reserved for this crate.
    pub fn code(self) -> Option<i32> {
        match self {
            Self::Exited(code) => Some(code),
            Self::Signaled => None,
            Self::LaunchFailed => Some(Self::LAUNCH_FAILED_CODE),
            Self::Cancelled => Some(Self::CANCELLED_CODE),
        }
    }

    pub fn is_success(self) -> bool {
        self == Self::Exited(0)
    }
}

fn base_command(program: &str, args: &[String]) -> Command {
    let mut cmd = Command::new(program);
    cmd.args(args).stdin(Stdio::null()).kill_on_drop(true);
    #[cfg(windows)]
    cmd.creation_flags(CREATE_NO_WINDOW);
    cmd
}

/// Run `argv`, forwarding merged stdout/stderr lines to `sink` and `log`.
///
/// Cancellation is raced against every read and against the final wait; when
/// it fires the child is terminated and [`RunStatus::Cancelled`] is returned
/// without draining further output.
pub async fn run_streaming(
    argv: &[String],
    cancel: &CancelFlag,
    sink: &dyn OutputSink,
    mut log: Option<&mut UnitLog>,
) -> RunStatus {
    let Some((program, args)) = argv.split_first() else {
        sink.write("ERROR: empty command", Some(LineTag::Error));
        return RunStatus::LaunchFailed;
    };

    let echo = format!("$ {}", argv.join(" "));
    sink.write(&echo, Some(LineTag::Info));
    if let Some(log) = log.as_deref_mut() {
        log.write_command(argv);
    }

    let (reader, stdout, stderr) = match merged_pipe() {
        Ok(pipe) => pipe,
        Err(err) => {
            sink.write(&format!("ERROR: {err}"), Some(LineTag::Error));
            return RunStatus::LaunchFailed;
        }
    };
    let mut cmd = base_command(program, args);
    cmd.stdout(stdout).stderr(stderr);
    let spawned = cmd.spawn();
    // Our copies of the write end must close or the reader never sees EOF.
    drop(cmd);
    let mut child = match spawned {
        Ok(child) => child,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            sink.write(
                &format!("ERROR: {program} not found. Please install it: pip install yt-dlp"),
                Some(LineTag::Error),
            );
            return RunStatus::LaunchFailed;
        }
        Err(err) => {
            sink.write(&format!("ERROR: {err}"), Some(LineTag::Error));
            return RunStatus::LaunchFailed;
        }
    };
    tracing::debug!(pid = ?child.id(), program = %program, "spawned tool");

    let (line_tx, mut line_rx) = mpsc::unbounded_channel();
    spawn_line_pump(reader, line_tx);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return cancel_child(&mut child, sink).await;
            }
            line = line_rx.recv() => match line {
                Some(line) => {
                    if let Some(log) = log.as_deref_mut() {
                        log.write_line(&line);
                    }
                    sink.write(&line, classify(&line));
                }
                None => break,
            }
        }
    }

    let waited = tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            return cancel_child(&mut child, sink).await;
        }
        waited = child.wait() => waited,
    };
    match waited {
        Ok(_) if cancel.is_cancelled() => RunStatus::Cancelled,
        Ok(status) => {
            tracing::debug!(status = %status, program = %program, "tool exited");
            status.code().map_or(RunStatus::Signaled, RunStatus::Exited)
        }
        Err(err) => {
            sink.write(&format!("ERROR: {err}"), Some(LineTag::Error));
            RunStatus::LaunchFailed
        }
    }
}

async fn cancel_child(child: &mut Child, sink: &dyn OutputSink) -> RunStatus {
    terminate_child(child).await;
    sink.write("Download cancelled by user.", Some(LineTag::Warn));
    RunStatus::Cancelled
}

/// One pipe shared by stdout and stderr so the tool's output keeps its order.
fn merged_pipe() -> std::io::Result<(PipeReader, Stdio, Stdio)> {
    let (reader, writer) = std::io::pipe()?;
    let err_writer = writer.try_clone()?;
    Ok((reader, Stdio::from(writer), Stdio::from(err_writer)))
}

fn spawn_line_pump(reader: PipeReader, tx: mpsc::UnboundedSender<String>) {
    tokio::task::spawn_blocking(move || {
        let mut reader = BufReader::new(reader);
        let mut splitter = LineSplitter::default();
        loop {
            let chunk = match reader.fill_buf() {
                Ok([]) => break,
                Ok(chunk) => chunk,
                Err(err) if err.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(err) => {
                    tracing::debug!(error = %err, "tool output stream closed");
                    break;
                }
            };
            let consumed = chunk.len();
            for line in splitter.push(chunk) {
                if tx.send(line).is_err() {
                    return;
                }
            }
            reader.consume(consumed);
        }
        if let Some(line) = splitter.finish() {
            let _ = tx.send(line);
        }
    });
}

/// Splits tool output on `\n` and `\r`.
///
/// Progress updates arrive as `\r`-separated rewrites of one terminal line;
/// each becomes its own line here. Empty pieces are dropped, which also folds
/// `\r\n` into a single break.
#[derive(Debug, Default)]
struct LineSplitter {
    pending: Vec<u8>,
}

impl LineSplitter {
    fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        let mut lines = Vec::new();
        for &byte in chunk {
            if byte == b'\n' || byte == b'\r' {
                lines.extend(self.take_line());
            } else {
                self.pending.push(byte);
            }
        }
        lines
    }

    fn finish(&mut self) -> Option<String> {
        self.take_line()
    }

    fn take_line(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let line = String::from_utf8_lossy(&self.pending).trim_end().to_string();
        self.pending.clear();
        Some(line)
    }
}

/// Ask the child to exit, force-killing it after [`TERMINATE_GRACE`].
pub async fn terminate_child(child: &mut Child) {
    if request_graceful_exit(child).await {
        match timeout(TERMINATE_GRACE, child.wait()).await {
            Ok(_) => return,
            Err(_) => tracing::warn!(pid = ?child.id(), "tool ignored SIGTERM; killing"),
        }
    }
    if let Err(err) = child.kill().await {
        tracing::debug!(error = %err, "kill after exit");
    }
}

#[cfg(unix)]
async fn request_graceful_exit(child: &Child) -> bool {
    let Some(pid) = child.id() else {
        return false;
    };
    let sent = Command::new("kill")
        .args(["-TERM", &pid.to_string()])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await;
    matches!(sent, Ok(status) if status.success())
}

#[cfg(not(unix))]
async fn request_graceful_exit(_child: &Child) -> bool {
    false
}

/// First stdout line of a title probe, or empty on any failure.
pub async fn fetch_title(argv: &[String], cancel: &CancelFlag) -> String {
    fetch_title_with(argv, cancel, TITLE_TIMEOUT).await
}

async fn fetch_title_with(argv: &[String], cancel: &CancelFlag, limit: Duration) -> String {
    let Some((program, args)) = argv.split_first() else {
        return String::new();
    };
    let mut cmd = base_command(program, args);
    cmd.stdout(Stdio::piped()).stderr(Stdio::null());

    let output = tokio::select! {
        _ = cancel.cancelled() => return String::new(),
        output = timeout(limit, cmd.output()) => output,
    };
    match output {
        Ok(Ok(out)) if out.status.success() => String::from_utf8_lossy(&out.stdout)
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .unwrap_or_default()
            .to_string(),
        Ok(Ok(out)) => {
            tracing::debug!(status = %out.status, "title probe failed");
            String::new()
        }
        Ok(Err(err)) => {
            tracing::debug!(error = %err, "title probe did not start");
            String::new()
        }
        Err(_) => {
            tracing::debug!("title probe timed out");
            String::new()
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::downloader::sink::DownloadEvent;
    use crate::testsupport::RecordingSink;

    fn sh(script: &str) -> Vec<String> {
        vec!["sh".to_string(), "-c".to_string(), script.to_string()]
    }

    #[tokio::test]
    async fn cancelled_resolves_after_cancel() {
        let flag = CancelFlag::new();
        let waiter = {
            let flag = flag.clone();
            tokio::spawn(async move { flag.cancelled().await })
        };
        flag.cancel();
        timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter finished")
            .expect("join");
        assert!(flag.is_cancelled());
        flag.reset();
        assert!(!flag.is_cancelled());
    }

    #[tokio::test]
    async fn streams_and_classifies_lines() {
        let sink = RecordingSink::default();
        let status = run_streaming(
            &sh("echo '[download] Destination: a.mp4'; echo 'ERROR: nope' >&2; exit 3"),
            &CancelFlag::new(),
            &sink,
            None,
        )
        .await;
        assert_eq!(status, RunStatus::Exited(3));
        let lines = sink.lines();
        assert!(lines[0].0.starts_with("$ sh -c"));
        assert_eq!(lines[0].1, Some(LineTag::Info));
        assert!(lines.contains(&(
            "[download] Destination: a.mp4".to_string(),
            Some(LineTag::Success)
        )));
        assert!(lines.contains(&("ERROR: nope".to_string(), Some(LineTag::Error))));
    }

    #[tokio::test]
    async fn carriage_return_progress_becomes_separate_lines() {
        let sink = RecordingSink::default();
        let status = run_streaming(
            &sh(r"printf '[download]  10.0%%\r[download]  50.0%%\r[download] 100.0%%\n'"),
            &CancelFlag::new(),
            &sink,
            None,
        )
        .await;
        assert_eq!(status, RunStatus::Exited(0));
        let output: Vec<String> = sink.lines().into_iter().skip(1).map(|(text, _)| text).collect();
        assert_eq!(
            output,
            vec![
                "[download]  10.0%",
                "[download]  50.0%",
                "[download] 100.0%"
            ]
        );
    }

    #[tokio::test]
    async fn stdout_and_stderr_keep_their_order() {
        let sink = RecordingSink::default();
        let status = run_streaming(
            &sh("for i in 1 2 3 4 5 6 7 8; do echo out$i; echo err$i >&2; done"),
            &CancelFlag::new(),
            &sink,
            None,
        )
        .await;
        assert_eq!(status, RunStatus::Exited(0));
        let output: Vec<String> = sink.lines().into_iter().skip(1).map(|(text, _)| text).collect();
        let expected: Vec<String> = (1..=8)
            .flat_map(|i| [format!("out{i}"), format!("err{i}")])
            .collect();
        assert_eq!(output, expected);
    }

    #[test]
    fn splitter_folds_crlf_and_carries_partial_lines() {
        let mut splitter = LineSplitter::default();
        assert_eq!(splitter.push(b"a\r\nb\n\nc"), vec!["a", "b"]);
        assert_eq!(splitter.push(b"d\r"), vec!["cd"]);
        assert_eq!(splitter.push(b"tail  "), Vec::<String>::new());
        assert_eq!(splitter.finish(), Some("tail".to_string()));
        assert_eq!(splitter.finish(), None);
    }

    #[tokio::test]
    async fn missing_binary_is_a_launch_failure() {
        let sink = RecordingSink::default();
        let argv = vec!["/nonexistent/ytdrop-tool".to_string()];
        let status = run_streaming(&argv, &CancelFlag::new(), &sink, None).await;
        assert_eq!(status, RunStatus::LaunchFailed);
        assert_eq!(status.code(), Some(-1));
        let lines = sink.lines();
        let last = lines.last().expect("error line");
        assert!(last.0.contains("not found"), "got: {}", last.0);
        assert_eq!(last.1, Some(LineTag::Error));
    }

    #[tokio::test]
    async fn cancel_terminates_a_running_child() {
        let flag = CancelFlag::new();
        let sink = RecordingSink::cancelling_on("started", flag.clone());
        let status = timeout(
            Duration::from_secs(10),
            run_streaming(&sh("echo started; exec sleep 30"), &flag, &sink, None),
        )
        .await
        .expect("run finished promptly");
        assert_eq!(status, RunStatus::Cancelled);
        assert_eq!(status.code(), Some(-2));
        assert!(sink.events().contains(&DownloadEvent::Line {
            text: "Download cancelled by user.".to_string(),
            tag: Some(LineTag::Warn),
        }));
    }

    #[tokio::test]
    async fn title_probe_takes_first_line() {
        let title = fetch_title(&sh("echo 'My Clip'; echo second"), &CancelFlag::new()).await;
        assert_eq!(title, "My Clip");
    }

    #[tokio::test]
    async fn title_probe_failures_are_empty() {
        let flag = CancelFlag::new();
        assert_eq!(fetch_title(&sh("echo t; exit 1"), &flag).await, "");
        assert_eq!(fetch_title(&sh("true"), &flag).await, "");
        assert_eq!(
            fetch_title(&["/nonexistent/ytdrop-tool".to_string()], &flag).await,
            ""
        );
    }

    #[tokio::test]
    async fn title_probe_gives_up_after_its_time_limit() {
        let started = std::time::Instant::now();
        let title = fetch_title_with(
            &sh("sleep 5; echo late"),
            &CancelFlag::new(),
            Duration::from_millis(200),
        )
        .await;
        assert_eq!(title, "");
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[tokio::test]
    async fn title_probe_stops_on_cancel() {
        let flag = CancelFlag::new();
        let canceller = {
            let flag = flag.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(100)).await;
                flag.cancel();
            })
        };
        let title = timeout(
            Duration::from_secs(5),
            fetch_title_with(&sh("sleep 30; echo late"), &flag, TITLE_TIMEOUT),
        )
        .await
        .expect("probe returned after cancel");
        assert_eq!(title, "");
        canceller.await.expect("join");
    }
}
