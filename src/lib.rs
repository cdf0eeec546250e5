//! ytdrop: themed frontend core for the `yt-dlp` media downloader.
//!
//! Two independent engines live here:
//!
//! - [`theme`]: built-in palettes, editor-theme import with derivation of
//!   missing colors, and styling of a component descriptor tree.
//! - [`downloader`]: command construction, streamed subprocess execution with
//!   line classification, per-unit log files, and cooperative cancellation.
//!
//! # Quick start
//!
//! ```no_run
//! use std::sync::Arc;
//! use ytdrop::config::{load_config, default_config_path, JobConfig};
//! use ytdrop::downloader::{ChannelSink, Downloader, FetchRequest, DEFAULT_RES_INDEX};
//!
//! # async fn example() {
//! let path = default_config_path().expect("home directory");
//! let config = load_config(&path).config;
//! let (sink, mut events) = ChannelSink::channel();
//! let downloader = Downloader::new(Arc::new(sink));
//! downloader.fetch(FetchRequest {
//!     urls: vec!["https://www.youtube.com/watch?v=dQw4w9WgXcQ".into()],
//!     video: true,
//!     audio: false,
//!     use_cookie: false,
//!     res_index: DEFAULT_RES_INDEX,
//!     config: JobConfig::from(&config),
//! });
//! while let Some(event) = events.recv().await {
//!     println!("{event:?}");
//! }
//! # }
//! ```

pub mod build_info;
pub mod config;
pub mod downloader;
pub mod error;
pub mod logging;
pub mod render;
#[cfg(test)]
pub mod testsupport;
pub mod textutil;
pub mod theme;
