//! Tokio glue for `mathstream`.
//!
//! `IncrementalSession` is synchronous and single-owner. This crate serializes updates coming from
//! async producers through one task that owns the session:
//!
//! - Debounce edits: flush once the input has been quiet for a while, with a max-delay guarantee.
//! - Run an actor task that owns the session and emits the normalized text of every flush.

use mathstream::IncrementalSession;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::time::Instant;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TextInput {
    /// Append a delta to the current document.
    Append(String),
    /// Replace the whole document (cheap only if it extends the previous text).
    Replace(String),
    /// Drop the document; flushed immediately.
    Clear,
}

#[derive(Clone, Copy, Debug)]
pub struct DebounceOptions {
    /// Flush once no input arrived for this long.
    pub quiet: Duration,
    /// Flush at the latest this long after the first unflushed input (progress guarantee).
    pub max_delay: Duration,
}

impl Default for DebounceOptions {
    fn default() -> Self {
        Self {
            quiet: Duration::from_millis(300),
            max_delay: Duration::from_secs(1),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlushReason {
    Quiet,
    MaxDelay,
    Cleared,
    ChannelClosed,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Flush {
    /// The full document at flush time.
    pub text: String,
    pub reason: FlushReason,
    /// Number of inputs folded into this flush.
    pub merged_inputs: usize,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DebounceStats {
    pub total_inputs: u64,
    pub total_flushes: u64,
    pub last_reason: Option<FlushReason>,
    pub last_merged_inputs: usize,
}

/// A receiver wrapper that folds text inputs into a document and flushes it when editing pauses.
pub struct DebouncingReceiver {
    rx: mpsc::Receiver<TextInput>,
    opts: DebounceOptions,
    text: String,
    first_pending: Option<Instant>,
    last_input: Instant,
    merged: usize,
    stats: DebounceStats,
}

impl DebouncingReceiver {
    pub fn new(rx: mpsc::Receiver<TextInput>, opts: DebounceOptions) -> Self {
        Self {
            rx,
            opts,
            text: String::new(),
            first_pending: None,
            last_input: Instant::now(),
            merged: 0,
            stats: DebounceStats::default(),
        }
    }

    pub fn set_options(&mut self, opts: DebounceOptions) {
        self.opts = opts;
    }

    pub fn options(&self) -> DebounceOptions {
        self.opts
    }

    pub fn stats(&self) -> DebounceStats {
        self.stats
    }

    /// The document as received so far, flushed or not.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Receive the next flush.
    ///
    /// - Returns `None` once the channel is closed and nothing is left to flush.
    /// - A pending document is flushed once more when the channel closes.
    pub async fn recv(&mut self) -> Option<Flush> {
        loop {
            let Some(first) = self.first_pending else {
                let input = self.rx.recv().await?;
                if let Some(flush) = self.accept(input) {
                    return Some(flush);
                }
                continue;
            };

            let quiet_at = self.last_input + self.opts.quiet;
            let max_at = first + self.opts.max_delay;
            match tokio::time::timeout_at(quiet_at.min(max_at), self.rx.recv()).await {
                Ok(Some(input)) => {
                    if let Some(flush) = self.accept(input) {
                        return Some(flush);
                    }
                }
                Ok(None) => return Some(self.flush(FlushReason::ChannelClosed)),
                Err(_) => {
                    let reason = if max_at <= quiet_at {
                        FlushReason::MaxDelay
                    } else {
                        FlushReason::Quiet
                    };
                    return Some(self.flush(reason));
                }
            }
        }
    }

    fn accept(&mut self, input: TextInput) -> Option<Flush> {
        self.stats.total_inputs = self.stats.total_inputs.saturating_add(1);
        self.merged += 1;
        match input {
            TextInput::Append(delta) => {
                self.text.push_str(&delta);
                self.mark_pending();
                None
            }
            TextInput::Replace(text) => {
                self.text = text;
                self.mark_pending();
                None
            }
            TextInput::Clear => {
                self.text.clear();
                Some(self.flush(FlushReason::Cleared))
            }
        }
    }

    fn mark_pending(&mut self) {
        let now = Instant::now();
        self.last_input = now;
        self.first_pending.get_or_insert(now);
    }

    fn flush(&mut self, reason: FlushReason) -> Flush {
        self.first_pending = None;
        let merged_inputs = std::mem::take(&mut self.merged);
        self.stats.total_flushes = self.stats.total_flushes.saturating_add(1);
        self.stats.last_reason = Some(reason);
        self.stats.last_merged_inputs = merged_inputs;
        Flush {
            text: self.text.clone(),
            reason,
            merged_inputs,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum SendError {
    #[error("math session actor has stopped")]
    Closed,
}

/// Producer side of a session actor.
#[derive(Clone, Debug)]
pub struct SessionHandle {
    tx: mpsc::Sender<TextInput>,
}

impl SessionHandle {
    pub fn new(tx: mpsc::Sender<TextInput>) -> Self {
        Self { tx }
    }

    pub async fn append(&self, delta: impl Into<String>) -> Result<(), SendError> {
        self.send(TextInput::Append(delta.into())).await
    }

    pub async fn replace(&self, text: impl Into<String>) -> Result<(), SendError> {
        self.send(TextInput::Replace(text.into())).await
    }

    pub async fn clear(&self) -> Result<(), SendError> {
        self.send(TextInput::Clear).await
    }

    async fn send(&self, input: TextInput) -> Result<(), SendError> {
        self.tx.send(input).await.map_err(|_| SendError::Closed)
    }
}

/// Spawn a task that owns `session` and emits the normalized document after every flush.
///
/// All updates go through this one task, so the session never sees concurrent access.
pub fn spawn_session_actor(
    mut session: IncrementalSession,
    rx: mpsc::Receiver<TextInput>,
    opts: DebounceOptions,
) -> mpsc::Receiver<String> {
    let (tx_out, rx_out) = mpsc::channel::<String>(64);

    tokio::spawn(async move {
        let mut rx = DebouncingReceiver::new(rx, opts);
        while let Some(flush) = rx.recv().await {
            let out = session.update(&flush.text);
            tracing::trace!(
                reason = ?flush.reason,
                merged = flush.merged_inputs,
                raw_boundary = session.raw_boundary(),
                "math session flushed"
            );
            if tx_out.send(out).await.is_err() {
                return;
            }
        }
    });

    rx_out
}

/// Convenience wrapper: a channel, its [`SessionHandle`], and the actor's output receiver.
pub fn spawn_session(
    session: IncrementalSession,
    opts: DebounceOptions,
) -> (SessionHandle, mpsc::Receiver<String>) {
    let (tx, rx) = mpsc::channel::<TextInput>(64);
    (SessionHandle::new(tx), spawn_session_actor(session, rx, opts))
}
