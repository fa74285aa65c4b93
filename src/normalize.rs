use crate::options::NormalizerOptions;
use crate::syntax::{
    BacktickClose, Fence, InlineDollar, code_fence_len, find_backtick_close, find_bracket_close,
    find_double_dollar_close, interrupts_paragraph, run_len, scan_fence, scan_inline_dollar,
};
use crate::types::{Boundary, Normalized};

/// Rewrites ad-hoc math delimiters into backtick-quoted canonical spans.
///
/// - `$$...$$` becomes `` `\[...\]` ``
/// - `$...$` becomes `` `\(...\)` ``
/// - `\(...\)` and `\[...\]` are kept and quoted.
///
/// Stateless: every call scans only the fragment it is given. See [`crate::IncrementalSession`]
/// for the cached, append-only driver.
#[derive(Debug, Clone, Default)]
pub struct DelimiterNormalizer {
    opts: NormalizerOptions,
}

impl DelimiterNormalizer {
    pub fn new(opts: NormalizerOptions) -> Self {
        Self { opts }
    }

    pub fn options(&self) -> &NormalizerOptions {
        &self.opts
    }

    pub fn process(&self, text: &str) -> Normalized {
        self.process_fragment(text, true)
    }

    /// Like [`process`](Self::process), for text that continues an earlier fragment.
    ///
    /// `at_line_start` tells whether `text` begins a new line, which decides whether a leading
    /// run of backticks or tildes can open a code fence.
    pub fn process_fragment(&self, text: &str, at_line_start: bool) -> Normalized {
        Scanner::new(text, &self.opts, at_line_start).run()
    }
}

/// Normalize a complete document with default options.
pub fn normalize_math(text: &str) -> String {
    DelimiterNormalizer::default().process(text).text
}

struct Scanner<'a> {
    text: &'a str,
    opts: &'a NormalizerOptions,
    out: String,
    pos: usize,
    // Raw position up to which input has been written to `out`.
    copied: usize,
    boundary: Option<Boundary>,
    blocked: bool,
    starts_line: bool,
    // Lengths of unmatched backtick runs in the current paragraph.
    stray_runs: Vec<usize>,
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str, opts: &'a NormalizerOptions, starts_line: bool) -> Self {
        Self {
            text,
            opts,
            out: String::with_capacity(text.len() + text.len() / 8),
            pos: 0,
            copied: 0,
            boundary: None,
            blocked: false,
            starts_line,
            stray_runs: Vec::new(),
        }
    }

    fn run(mut self) -> Normalized {
        let text = self.text;
        let bytes = text.as_bytes();
        while self.pos < bytes.len() {
            match bytes[self.pos] {
                b'`' | b'~' if self.opts.protect_code_spans => self.code(),
                b'$' if self.opts.dollar_display || self.opts.dollar_inline => self.dollar(),
                b'\\' => self.backslash(),
                b'\n' => {
                    self.pos += 1;
                    if interrupts_paragraph(text, self.pos) == Some(true) {
                        self.stray_runs.clear();
                    }
                    if self.opts.checkpoint_line_breaks {
                        self.checkpoint();
                    }
                }
                _ => self.pos += 1,
            }
        }
        self.copy_through(self.text.len());
        Normalized {
            text: self.out,
            boundary: self.boundary,
            blocked: self.blocked,
        }
    }

    fn dollar(&mut self) {
        let open = self.pos;
        let text = self.text;

        if self.opts.dollar_display && text.as_bytes().get(open + 1) == Some(&b'$') {
            match find_double_dollar_close(text, open + 2) {
                Some(close) => self.emit_math(open, "\\[", open + 2, close, "\\]", close + 2, true),
                None => self.leave_open(),
            }
            return;
        }

        if !self.opts.dollar_inline {
            self.pos += 1;
            return;
        }
        match scan_inline_dollar(text, open) {
            InlineDollar::Closed { close } => {
                self.emit_math(open, "\\(", open + 1, close, "\\)", close + 1, true)
            }
            InlineDollar::ClosedAtEnd { close } => {
                self.emit_math(open, "\\(", open + 1, close, "\\)", close + 1, false)
            }
            InlineDollar::Rejected => self.pos += 1,
            InlineDollar::Undecided => self.leave_open(),
        }
    }

    fn backslash(&mut self) {
        let open = self.pos;
        match self.text.as_bytes().get(open + 1) {
            Some(b'(') if self.opts.bracket_delimiters => self.bracket(open, "\\(", "\\)"),
            Some(b'[') if self.opts.bracket_delimiters => self.bracket(open, "\\[", "\\]"),
            Some(b'\n') | None => self.pos += 1,
            // Escaped character: `\$` and `` \` `` never open anything.
            Some(_) => self.pos += 2,
        }
    }

    fn bracket(&mut self, open: usize, opener: &'static str, closer: &'static str) {
        match find_bracket_close(self.text, open + 2, closer) {
            Some(close) => self.emit_math(open, opener, open + 2, close, closer, close + 2, true),
            None => self.leave_open(),
        }
    }

    fn code(&mut self) {
        let open = self.pos;
        let marker = self.text.as_bytes()[open];
        let run = run_len(self.text, open, marker);
        if run >= 3 && self.at_line_start(open) {
            match scan_fence(self.text, open, marker, run) {
                Fence::Closed { end } => {
                    self.stray_runs.clear();
                    self.pos = end;
                    self.checkpoint();
                    return;
                }
                // An unclosed fence runs to the end of the document.
                Fence::Open => {
                    self.stray_runs.clear();
                    self.leave_open();
                    return;
                }
                Fence::NotFence => {}
            }
        }
        if marker == b'~' {
            self.pos += run;
        } else {
            self.code_span(open, run);
        }
    }

    fn code_span(&mut self, open: usize, run: usize) {
        let after = open + run;
        // A run touching the end may still grow, so its width is not known yet.
        if after == self.text.len() {
            self.pos = after;
            self.blocked = true;
            return;
        }
        self.pos = after;
        match find_backtick_close(self.text, after, run) {
            BacktickClose::Closed { close, at_end } => {
                self.pos = close + run;
                if at_end {
                    self.blocked = true;
                } else {
                    self.checkpoint();
                }
            }
            // Literal for good; later math spans in this paragraph must not pair with it.
            BacktickClose::Unmatched => self.stray_runs.push(run),
            // Literal for now, but later input may still close it.
            BacktickClose::Open => {
                self.stray_runs.push(run);
                self.blocked = true;
            }
        }
    }

    fn at_line_start(&self, at: usize) -> bool {
        let before = &self.text.as_bytes()[..at];
        let indent = before.iter().rev().take(4).take_while(|&&b| b == b' ').count();
        if indent > 3 {
            return false;
        }
        match before.len().checked_sub(indent + 1) {
            Some(i) => before[i] == b'\n',
            None => self.starts_line,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn emit_math(
        &mut self,
        open: usize,
        opener: &str,
        content_start: usize,
        content_end: usize,
        closer: &str,
        end: usize,
        is_final: bool,
    ) {
        self.copy_through(open);
        let content = &self.text[content_start..content_end];
        let mut fence = code_fence_len(content);
        while self.stray_runs.contains(&fence) {
            fence += 1;
        }
        for _ in 0..fence {
            self.out.push('`');
        }
        if fence > 1 {
            self.out.push(' ');
        }
        self.out.push_str(opener);
        self.out.push_str(content);
        self.out.push_str(closer);
        if fence > 1 {
            self.out.push(' ');
        }
        for _ in 0..fence {
            self.out.push('`');
        }
        self.copied = end;
        self.pos = end;
        if is_final {
            self.checkpoint();
        }
    }

    /// An unclosed math opener: the rest of the fragment stays literal until it closes.
    fn leave_open(&mut self) {
        self.pos = self.text.len();
        self.blocked = true;
    }

    fn checkpoint(&mut self) {
        // Fence widths in the rest of a paragraph depend on its stray runs.
        if self.blocked || !self.stray_runs.is_empty() {
            return;
        }
        self.copy_through(self.pos);
        self.boundary = Some(Boundary {
            raw: self.pos,
            rewritten: self.out.len(),
        });
    }

    fn copy_through(&mut self, upto: usize) {
        if upto > self.copied {
            self.out.push_str(&self.text[self.copied..upto]);
            self.copied = upto;
        }
    }
}
