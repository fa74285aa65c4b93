/// Outcome of looking for the closing `$` of an inline `$...$` span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InlineDollar {
    /// Closing `$` at `close`, followed by a boundary character.
    Closed { close: usize },
    /// Closing `$` at `close` is the last byte of the input.
    ///
    /// Accepted for display, but the next appended character may still revoke it.
    ClosedAtEnd { close: usize },
    /// Not a math span, whatever follows.
    Rejected,
    /// The input ended before the line did.
    Undecided,
}

/// Whether `next` may follow the closing `$` of an inline span. `None` is end of input.
pub fn is_closing_boundary(next: Option<char>) -> bool {
    match next {
        None => true,
        Some(c) => {
            c.is_whitespace()
                || matches!(
                    c,
                    '?' | '!' | '.' | ',' | ':' | ')' | '？' | '！' | '。' | '，' | '：' | '）'
                )
        }
    }
}

/// Length of the run of `marker` bytes starting at `at`.
pub fn run_len(text: &str, at: usize, marker: u8) -> usize {
    text.as_bytes()
        .get(at..)
        .map(|rest| rest.iter().take_while(|&&b| b == marker).count())
        .unwrap_or(0)
}

/// First `$$` at or after `from`.
pub fn find_double_dollar_close(text: &str, from: usize) -> Option<usize> {
    text.get(from..)?.find("$$").map(|i| from + i)
}

/// First `closer` (`\)` or `\]`) at or after `from`.
pub fn find_bracket_close(text: &str, from: usize, closer: &str) -> Option<usize> {
    text.get(from..)?.find(closer).map(|i| from + i)
}

/// Whether the line starting at `at` ends the paragraph above it: a blank line or a code fence.
///
/// `None` while the line is still too short to tell.
pub fn interrupts_paragraph(text: &str, at: usize) -> Option<bool> {
    let bytes = text.as_bytes();
    let mut i = at;
    while i < bytes.len() && matches!(bytes[i], b' ' | b'\t') {
        i += 1;
    }
    match bytes.get(i) {
        None => None,
        Some(b'\n') => Some(true),
        Some(&marker @ (b'`' | b'~')) if i - at <= 3 => {
            let run = run_len(text, i, marker);
            if run >= 3 {
                Some(true)
            } else if i + run == bytes.len() {
                None
            } else {
                Some(false)
            }
        }
        Some(_) => Some(false),
    }
}

/// Outcome of looking for the run that closes a backtick code span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BacktickClose {
    /// Closing run at `close`. `at_end` when it touches the end of input and may still grow.
    Closed { close: usize, at_end: bool },
    /// The paragraph ended first: the opening run is literal text.
    Unmatched,
    /// The input ended first.
    Open,
}

/// Look for the next run of exactly `len` backticks at or after `from`, within the paragraph.
pub fn find_backtick_close(text: &str, from: usize, len: usize) -> BacktickClose {
    let bytes = text.as_bytes();
    let mut i = from;
    while i < bytes.len() {
        match bytes[i] {
            b'\n' => match interrupts_paragraph(text, i + 1) {
                Some(true) => return BacktickClose::Unmatched,
                Some(false) => i += 1,
                None => return BacktickClose::Open,
            },
            b'`' => {
                let run = run_len(text, i, b'`');
                if run == len {
                    return BacktickClose::Closed {
                        close: i,
                        at_end: i + run == bytes.len(),
                    };
                }
                i += run;
            }
            _ => i += 1,
        }
    }
    BacktickClose::Open
}

/// Outcome of scanning a code fence opened by `run` markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fence {
    /// The closing fence line ends right before `end`.
    Closed { end: usize },
    /// Not a fence: a backtick info string containing a backtick.
    NotFence,
    /// No complete closing line yet; the block runs to the end of input.
    Open,
}

/// Scan a fence whose opening run of `run` `marker` bytes starts at `open`.
///
/// The caller checks that `open` starts a line (at most three spaces of indent).
pub fn scan_fence(text: &str, open: usize, marker: u8, run: usize) -> Fence {
    let bytes = text.as_bytes();
    let info_start = open + run;
    let info_end = text[info_start..]
        .find('\n')
        .map_or(bytes.len(), |i| info_start + i);
    if marker == b'`' && bytes[info_start..info_end].contains(&b'`') {
        return Fence::NotFence;
    }

    let mut line = info_end + 1;
    while line < bytes.len() {
        let Some(nl) = text[line..].find('\n').map(|i| line + i) else {
            return Fence::Open;
        };
        let indent = run_len(text, line, b' ');
        if indent <= 3 {
            let close_run = run_len(text, line + indent, marker);
            let rest = &bytes[line + indent + close_run..nl];
            if close_run >= run && rest.iter().all(|&b| matches!(b, b' ' | b'\t')) {
                return Fence::Closed { end: nl + 1 };
            }
        }
        line = nl + 1;
    }
    Fence::Open
}

/// Scan for the close of an inline `$` span opened at `open`.
///
/// Rules: the opener must not be followed by whitespace (or another `$`); the content may not
/// contain a line break or an unescaped `$`; `\x` is consumed as a pair; the closing `$` must be
/// followed by [`is_closing_boundary`].
pub fn scan_inline_dollar(text: &str, open: usize) -> InlineDollar {
    let bytes = text.as_bytes();
    let first = open + 1;
    match text.get(first..).and_then(|s| s.chars().next()) {
        None => return InlineDollar::Undecided,
        Some('$') => return InlineDollar::Rejected,
        Some(c) if c.is_whitespace() => return InlineDollar::Rejected,
        Some(_) => {}
    }

    let mut i = first;
    while i < bytes.len() {
        match bytes[i] {
            b'\n' => return InlineDollar::Rejected,
            b'\\' => match bytes.get(i + 1) {
                None => return InlineDollar::Undecided,
                Some(b'\n') => return InlineDollar::Rejected,
                Some(_) => i += 2,
            },
            b'$' => {
                return match text[i + 1..].chars().next() {
                    None => InlineDollar::ClosedAtEnd { close: i },
                    next if is_closing_boundary(next) => InlineDollar::Closed { close: i },
                    Some(_) => InlineDollar::Rejected,
                };
            }
            _ => i += 1,
        }
    }
    InlineDollar::Undecided
}

/// Backtick fence width needed to quote `content` as a single code span.
pub fn code_fence_len(content: &str) -> usize {
    let mut longest = 0usize;
    let mut run = 0usize;
    for &b in content.as_bytes() {
        if b == b'`' {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    longest + 1
}
