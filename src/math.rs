use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MathKind {
    Inline,
    Display,
}

/// LaTeX source pulled out of a code span, without its delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MathSource<'a> {
    pub kind: MathKind,
    pub latex: &'a str,
}

/// Recognize a code-span payload written in one of the four math forms.
///
/// `$$...$$` and `\[...\]` are display math; `$...$` and `\(...\)` are inline. Normalized text
/// only produces the bracket forms, but code spans the author quoted by hand are accepted too.
pub fn extract_math(code: &str) -> Option<MathSource<'_>> {
    const FORMS: [(&str, &str, MathKind); 4] = [
        ("$$", "$$", MathKind::Display),
        ("\\[", "\\]", MathKind::Display),
        ("\\(", "\\)", MathKind::Inline),
        ("$", "$", MathKind::Inline),
    ];
    for (open, close, kind) in FORMS {
        if code.len() < open.len() + close.len() {
            continue;
        }
        if let Some(latex) = code
            .strip_prefix(open)
            .and_then(|rest| rest.strip_suffix(close))
        {
            if latex.trim().is_empty() {
                return None;
            }
            return Some(MathSource { kind, latex });
        }
    }
    None
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MathRenderError {
    #[error("math engine unavailable: {0}")]
    Unavailable(String),
    #[error("invalid LaTeX `{latex}`: {message}")]
    InvalidLatex { latex: String, message: String },
    #[error("failed to produce image: {0}")]
    Image(String),
}

/// Turns LaTeX into something displayable (an image, MathML, a glyph run...).
///
/// Errors are caught by the caller and degrade to showing the literal code text.
pub trait MathRenderer {
    type Output;

    fn render(&self, source: &MathSource<'_>) -> Result<Self::Output, MathRenderError>;
}

impl<R> MathRenderer for &R
where
    R: MathRenderer + ?Sized,
{
    type Output = R::Output;

    fn render(&self, source: &MathSource<'_>) -> Result<Self::Output, MathRenderError> {
        (**self).render(source)
    }
}

pub struct FnMathRenderer<F>(pub F);

impl<F, O> MathRenderer for FnMathRenderer<F>
where
    for<'a> F: Fn(&MathSource<'a>) -> Result<O, MathRenderError>,
{
    type Output = O;

    fn render(&self, source: &MathSource<'_>) -> Result<O, MathRenderError> {
        (self.0)(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_all_four_forms() {
        let cases = [
            ("$$x^2$$", MathKind::Display, "x^2"),
            ("\\[x^2\\]", MathKind::Display, "x^2"),
            ("\\(x^2\\)", MathKind::Inline, "x^2"),
            ("$x^2$", MathKind::Inline, "x^2"),
        ];
        for (code, kind, latex) in cases {
            assert_eq!(extract_math(code), Some(MathSource { kind, latex }), "{code}");
        }
    }

    #[test]
    fn plain_code_is_not_math() {
        assert_eq!(extract_math("let x = 1;"), None);
        assert_eq!(extract_math("$"), None);
        assert_eq!(extract_math("\\(x"), None);
        assert_eq!(extract_math("$HOME"), None);
    }

    #[test]
    fn empty_math_is_left_as_code() {
        assert_eq!(extract_math("$$"), None);
        assert_eq!(extract_math("\\( \\)"), None);
        assert_eq!(extract_math("$$ $$"), None);
    }
}
