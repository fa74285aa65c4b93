/// The memoized, fully-resolved prefix of a session, in raw and rewritten coordinates.
///
/// Every delimiter opened in `raw_prefix` is also closed in it, so neither prefix changes as more
/// input arrives. Snapshots are replaced, never edited: see [`CleanSnapshot::extended`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CleanSnapshot {
    raw_boundary: usize,
    rewritten_boundary: usize,
    raw_prefix: String,
    rewritten_prefix: String,
}

impl CleanSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn raw_boundary(&self) -> usize {
        self.raw_boundary
    }

    pub fn rewritten_boundary(&self) -> usize {
        self.rewritten_boundary
    }

    pub fn raw_prefix(&self) -> &str {
        &self.raw_prefix
    }

    pub fn rewritten_prefix(&self) -> &str {
        &self.rewritten_prefix
    }

    pub fn is_empty(&self) -> bool {
        self.raw_boundary == 0
    }

    /// A new snapshot whose prefixes are this one's plus the given clean pieces.
    pub fn extended(self, raw_piece: &str, rewritten_piece: &str) -> Self {
        let mut raw_prefix = self.raw_prefix;
        raw_prefix.push_str(raw_piece);
        let mut rewritten_prefix = self.rewritten_prefix;
        rewritten_prefix.push_str(rewritten_piece);
        Self {
            raw_boundary: raw_prefix.len(),
            rewritten_boundary: rewritten_prefix.len(),
            raw_prefix,
            rewritten_prefix,
        }
    }
}
