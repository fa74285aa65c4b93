#![allow(dead_code)]

use mathstream::{IncrementalSession, NormalizerOptions};

/// Feed `chunks` to a fresh session as a growing document; returns every intermediate output.
pub fn stream_outputs(
    chunks: impl IntoIterator<Item = String>,
    opts: NormalizerOptions,
) -> Vec<String> {
    let mut session = IncrementalSession::new(opts);
    stream_outputs_with_session(chunks, &mut session)
}

pub fn stream_outputs_with_session(
    chunks: impl IntoIterator<Item = String>,
    session: &mut IncrementalSession,
) -> Vec<String> {
    let mut text = String::new();
    let mut out = Vec::new();
    for chunk in chunks {
        text.push_str(&chunk);
        out.push(session.update(&text));
    }
    out
}

pub fn stream_final(chunks: impl IntoIterator<Item = String>, opts: NormalizerOptions) -> String {
    stream_outputs(chunks, opts).pop().unwrap_or_default()
}

pub fn chunk_whole(text: &str) -> Vec<String> {
    vec![text.to_string()]
}

pub fn chunk_lines(text: &str) -> Vec<String> {
    text.split_inclusive('\n').map(|s| s.to_string()).collect()
}

pub fn chunk_chars(text: &str) -> Vec<String> {
    text.chars().map(|c| c.to_string()).collect()
}

/// Splits right after every delimiter byte, so each delimiter ends a chunk.
pub fn chunk_after_delimiters(text: &str) -> Vec<String> {
    text.split_inclusive(['$', '\\', '`', '~', '\n'])
        .map(str::to_string)
        .collect()
}

/// Deterministic chunk-size source: xorshift64 seeded with the FNV-1a hash of a label.
struct ChunkSizes(u64);

impl ChunkSizes {
    fn new(label: &str, trial: u64) -> Self {
        let seed = label.bytes().fold(0xcbf2_9ce4_8422_2325u64, |h, b| {
            (h ^ u64::from(b)).wrapping_mul(0x0100_0000_01b3)
        });
        Self((seed ^ trial.wrapping_mul(0x9e37_79b9_7f4a_7c15)) | 1)
    }

    fn next(&mut self, max_bytes: usize) -> usize {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        (x % max_bytes as u64) as usize + 1
    }
}

/// Random chunk sizes in `1..=max_bytes`, widened to the next char boundary.
pub fn chunk_pseudo_random(
    text: &str,
    seed_label: &str,
    trial: u64,
    max_bytes: usize,
) -> Vec<String> {
    assert!(max_bytes > 0);
    let mut sizes = ChunkSizes::new(seed_label, trial);
    let mut out = Vec::new();
    let mut start = 0usize;
    while start < text.len() {
        let mut end = (start + sizes.next(max_bytes)).min(text.len());
        while !text.is_char_boundary(end) {
            end += 1;
        }
        out.push(text[start..end].to_string());
        start = end;
    }
    out
}
