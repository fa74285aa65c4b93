use crate::normalize::DelimiterNormalizer;
use crate::options::NormalizerOptions;
use crate::state::CleanSnapshot;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub updates: u64,
    pub resets: u64,
    /// Total bytes handed to the normalizer across all updates.
    pub scanned_bytes: u64,
    pub last_scanned_bytes: usize,
    pub boundary_advances: u64,
}

/// Incremental driver for [`DelimiterNormalizer`] over append-only text.
///
/// Each [`update`](Self::update) scans only the text after the cached clean prefix. The session is
/// single-owner (`&mut self`); serialize access if updates come from several threads.
#[derive(Debug, Clone, Default)]
pub struct IncrementalSession {
    normalizer: DelimiterNormalizer,
    snapshot: CleanSnapshot,
    stats: SessionStats,
}

impl IncrementalSession {
    pub fn new(opts: NormalizerOptions) -> Self {
        Self {
            normalizer: DelimiterNormalizer::new(opts),
            snapshot: CleanSnapshot::empty(),
            stats: SessionStats::default(),
        }
    }

    pub fn options(&self) -> &NormalizerOptions {
        self.normalizer.options()
    }

    pub fn snapshot(&self) -> &CleanSnapshot {
        &self.snapshot
    }

    pub fn raw_boundary(&self) -> usize {
        self.snapshot.raw_boundary()
    }

    pub fn rewritten_boundary(&self) -> usize {
        self.snapshot.rewritten_boundary()
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn reset(&mut self) {
        if !self.snapshot.is_empty() {
            tracing::debug!(
                raw_boundary = self.snapshot.raw_boundary(),
                "math session cache dropped"
            );
        }
        self.snapshot = CleanSnapshot::empty();
        self.stats.resets = self.stats.resets.saturating_add(1);
    }

    /// Normalize `full_text`, which must extend the text of the previous call.
    ///
    /// Returns the cached clean output followed by the freshly normalized open tail. Empty input
    /// resets the cache. Input that does not extend the cached prefix is reprocessed from scratch.
    pub fn update(&mut self, full_text: &str) -> String {
        self.stats.updates = self.stats.updates.saturating_add(1);

        if full_text.is_empty() {
            self.reset();
            self.stats.last_scanned_bytes = 0;
            return String::new();
        }
        if !full_text.starts_with(self.snapshot.raw_prefix()) {
            tracing::debug!(
                raw_boundary = self.snapshot.raw_boundary(),
                len = full_text.len(),
                "input does not extend the cached prefix; reprocessing"
            );
            self.reset();
        }

        let prefix = self.snapshot.raw_prefix();
        let at_line_start = prefix.is_empty() || prefix.ends_with('\n');
        let tail = &full_text[self.snapshot.raw_boundary()..];
        let normalized = self.normalizer.process_fragment(tail, at_line_start);
        self.stats.last_scanned_bytes = tail.len();
        self.stats.scanned_bytes = self.stats.scanned_bytes.saturating_add(tail.len() as u64);

        let mut out =
            String::with_capacity(self.snapshot.rewritten_boundary() + normalized.text.len());
        out.push_str(self.snapshot.rewritten_prefix());
        out.push_str(&normalized.text);

        if let Some(b) = normalized.boundary {
            let snapshot = std::mem::take(&mut self.snapshot);
            self.snapshot = snapshot.extended(&tail[..b.raw], &normalized.text[..b.rewritten]);
            self.stats.boundary_advances = self.stats.boundary_advances.saturating_add(1);
            tracing::trace!(
                raw_boundary = self.snapshot.raw_boundary(),
                rewritten_boundary = self.snapshot.rewritten_boundary(),
                "math session boundary advanced"
            );
        }

        out
    }
}
