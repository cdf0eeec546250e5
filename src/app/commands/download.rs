//! `ytdrop fetch` / `ytdrop formats` command helpers.
//!
//! The downloader reports through a [`ChannelSink`]; this module drains that
//! channel into the console and turns Ctrl-C into a single cancel request.

use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;

use ytdrop::config::{Config, JobConfig};
use ytdrop::downloader::{
    ChannelSink, DownloadEvent, Downloader, FetchRequest, JobState, ListFormatsRequest,
};
use ytdrop::render::Console;

use crate::cli::{FetchArgs, FormatsArgs};

const EXIT_CANCELLED: i32 = 130;

/// Run a fetch job to completion and return the process exit code.
pub(crate) async fn run_fetch(console: &Console, config: &Config, args: FetchArgs) -> i32 {
    let mut job = JobConfig::from(config);
    if let Some(dir) = args.output.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
        job.download_dir = dir.to_string();
    }
    warn_missing_cookie_file(console, &job, args.cookies);

    let (video, audio) = args.modes();
    let (sink, events) = ChannelSink::channel();
    let downloader = Downloader::new(Arc::new(sink));
    let started = downloader.fetch(FetchRequest {
        urls: args.urls,
        video,
        audio,
        use_cookie: args.cookies,
        res_index: usize::from(args.res),
        config: job,
    });
    if !started {
        console.error("no URLs to download");
        return 2;
    }
    drive(console, &downloader, events).await
}

/// Run a list-formats job to completion and return the process exit code.
pub(crate) async fn run_formats(console: &Console, config: &Config, args: FormatsArgs) -> i32 {
    let job = JobConfig::from(config);
    warn_missing_cookie_file(console, &job, args.cookies);

    let (sink, events) = ChannelSink::channel();
    let downloader = Downloader::new(Arc::new(sink));
    let started = downloader.list_formats(ListFormatsRequest {
        urls: args.urls,
        use_cookie: args.cookies,
        config: job,
    });
    if !started {
        console.error("no URLs to inspect");
        return 2;
    }
    drive(console, &downloader, events).await
}

fn warn_missing_cookie_file(console: &Console, job: &JobConfig, use_cookie: bool) {
    if use_cookie && job.cookie_file.is_none() {
        console.warn("--cookies given but no cookie_file is configured; continuing without cookies");
    }
}

/// Render events until the job reports done. The first Ctrl-C cancels;
/// later ones are swallowed until the worker finishes.
async fn drive(
    console: &Console,
    downloader: &Downloader,
    mut events: UnboundedReceiver<DownloadEvent>,
) -> i32 {
    let mut cancel_requested = false;
    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(event) => {
                    if console.render_event(&event) {
                        break;
                    }
                }
                None => break,
            },
            signal = tokio::signal::ctrl_c(), if !cancel_requested => {
                cancel_requested = true;
                match signal {
                    Ok(()) => {
                        console.warn("cancelling...");
                        downloader.cancel();
                    }
                    Err(err) => tracing::warn!(error = %err, "could not listen for Ctrl-C"),
                }
            }
        }
    }
    downloader.wait_idle().await;
    exit_code(downloader.state())
}

pub(crate) fn exit_code(state: JobState) -> i32 {
    match state {
        JobState::Completed => 0,
        JobState::Cancelled => EXIT_CANCELLED,
        JobState::Failed | JobState::Idle | JobState::Running => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_job_state() {
        assert_eq!(exit_code(JobState::Completed), 0);
        assert_eq!(exit_code(JobState::Failed), 1);
        assert_eq!(exit_code(JobState::Cancelled), 130);
    }
}
