//! Output sink protocol between the download worker and its frontend.
//!
//! The worker never touches frontend state directly. Every line, status
//! update, and completion notice flows through one [`OutputSink`]; the stock
//! [`ChannelSink`] marshals them over an unbounded tokio channel.

use tokio::sync::mpsc;

use super::classify::LineTag;

/// Receiver side of a running job.
pub trait OutputSink: Send + Sync {
    /// Append one console line with an optional semantic tag.
    fn write(&self, text: &str, tag: Option<LineTag>);
    /// Replace the single current status string.
    fn set_status(&self, text: &str);
    /// Batch finished. Called exactly once per job.
    fn on_done(&self);
}

/// One message produced by the worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadEvent {
    Line { text: String, tag: Option<LineTag> },
    Status(String),
    Done,
}

/// Sink that forwards every call as a [`DownloadEvent`].
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<DownloadEvent>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::UnboundedSender<DownloadEvent>) -> Self {
        Self { tx }
    }

    /// Sink plus the receiver the frontend drains.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<DownloadEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    fn send(&self, event: DownloadEvent) {
        // A dropped receiver means nobody is listening; the job keeps going.
        if self.tx.send(event).is_err() {
            tracing::debug!("download event receiver closed");
        }
    }
}

impl OutputSink for ChannelSink {
    fn write(&self, text: &str, tag: Option<LineTag>) {
        self.send(DownloadEvent::Line {
            text: text.to_string(),
            tag,
        });
    }

    fn set_status(&self, text: &str) {
        self.send(DownloadEvent::Status(text.to_string()));
    }

    fn on_done(&self) {
        self.send(DownloadEvent::Done);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_sink_forwards_events_in_order() {
        let (sink, mut rx) = ChannelSink::channel();
        sink.set_status("Listing formats...");
        sink.write("ERROR: boom", Some(LineTag::Error));
        sink.on_done();

        assert_eq!(
            rx.try_recv().ok(),
            Some(DownloadEvent::Status("Listing formats...".to_string()))
        );
        assert_eq!(
            rx.try_recv().ok(),
            Some(DownloadEvent::Line {
                text: "ERROR: boom".to_string(),
                tag: Some(LineTag::Error),
            })
        );
        assert_eq!(rx.try_recv().ok(), Some(DownloadEvent::Done));
    }

    #[test]
    fn closed_receiver_does_not_panic() {
        let (sink, rx) = ChannelSink::channel();
        drop(rx);
        sink.write("line", None);
        sink.on_done();
    }
}
