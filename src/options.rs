#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizerOptions {
    /// Recognize `$$...$$` (may span lines), rewritten to `\[...\]`.
    pub dollar_display: bool,
    /// Recognize `$...$` (single line), rewritten to `\(...\)`.
    pub dollar_inline: bool,
    /// Recognize the canonical `\(...\)` / `\[...\]` forms and quote them.
    pub bracket_delimiters: bool,
    /// Pass code spans and fenced code blocks (backtick or tilde) through verbatim.
    ///
    /// A backtick run with no closing run before the paragraph ends is literal text. While the
    /// paragraph is still open nothing after it is cached. An unclosed fence runs to the end of
    /// input, so nothing after its opening line is rewritten.
    pub protect_code_spans: bool,
    /// Also commit the cache at line breaks reached with nothing open.
    ///
    /// Off by default: the cache boundary then only advances past closed delimiter pairs.
    pub checkpoint_line_breaks: bool,
}

impl Default for NormalizerOptions {
    fn default() -> Self {
        Self {
            dollar_display: true,
            dollar_inline: true,
            bracket_delimiters: true,
            protect_code_spans: true,
            checkpoint_line_breaks: false,
        }
    }
}

impl NormalizerOptions {
    /// Only the four math delimiter forms; code spans are scanned like plain text.
    pub fn math_only() -> Self {
        Self {
            protect_code_spans: false,
            ..Self::default()
        }
    }
}
