use pulldown_cmark::{Event, Options as PulldownOptions, Parser};

use crate::math::{MathKind, MathRenderer, MathSource, extract_math};
use crate::options::NormalizerOptions;
use crate::session::IncrementalSession;

#[derive(Debug, Clone)]
pub struct PulldownMathOptions {
    pub pulldown: PulldownOptions,
}

impl Default for PulldownMathOptions {
    fn default() -> Self {
        Self {
            pulldown: PulldownOptions::empty(),
        }
    }
}

/// What the view layer receives: Markdown events untouched, math already rendered.
#[derive(Debug, Clone, PartialEq)]
pub enum Piece<O> {
    Markdown(Event<'static>),
    Math {
        kind: MathKind,
        latex: String,
        output: O,
    },
}

impl<O> Piece<O> {
    pub fn is_math(&self) -> bool {
        matches!(self, Piece::Math { .. })
    }
}

/// Parse normalized Markdown and render every math code span with `renderer`.
///
/// A renderer error never escapes: the span falls back to its literal code text.
pub fn render_pieces<R>(
    markdown: &str,
    opts: &PulldownMathOptions,
    renderer: &R,
) -> Vec<Piece<R::Output>>
where
    R: MathRenderer,
{
    Parser::new_ext(markdown, opts.pulldown)
        .map(|event| piece_for(event, renderer))
        .collect()
}

fn piece_for<R>(event: Event<'_>, renderer: &R) -> Piece<R::Output>
where
    R: MathRenderer,
{
    match event {
        Event::Code(code) => {
            let Some(source) = extract_math(&code) else {
                return Piece::Markdown(Event::Code(code).into_static());
            };
            match render_math(source, renderer) {
                Some(piece) => piece,
                None => Piece::Markdown(Event::Code(code.clone()).into_static()),
            }
        }
        // Only produced when the caller enables pulldown's own math extension.
        Event::InlineMath(latex) => {
            let source = MathSource {
                kind: MathKind::Inline,
                latex: &latex,
            };
            match render_math(source, renderer) {
                Some(piece) => piece,
                None => Piece::Markdown(Event::InlineMath(latex.clone()).into_static()),
            }
        }
        Event::DisplayMath(latex) => {
            let source = MathSource {
                kind: MathKind::Display,
                latex: &latex,
            };
            match render_math(source, renderer) {
                Some(piece) => piece,
                None => Piece::Markdown(Event::DisplayMath(latex.clone()).into_static()),
            }
        }
        other => Piece::Markdown(other.into_static()),
    }
}

fn render_math<R>(source: MathSource<'_>, renderer: &R) -> Option<Piece<R::Output>>
where
    R: MathRenderer,
{
    match renderer.render(&source) {
        Ok(output) => Some(Piece::Math {
            kind: source.kind,
            latex: source.latex.to_string(),
            output,
        }),
        Err(err) => {
            tracing::warn!(latex = source.latex, "math render failed, showing code: {err}");
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rendered<O> {
    /// The normalized Markdown the pieces were parsed from.
    pub text: String,
    pub pieces: Vec<Piece<O>>,
}

/// A live view's backing state: an [`IncrementalSession`] plus a math renderer.
///
/// `update` returns the rendered value; the caller owns it (there is no hidden "last rendered
/// text" kept here beyond the session cache).
#[derive(Debug)]
pub struct MathMarkdown<R> {
    session: IncrementalSession,
    opts: PulldownMathOptions,
    renderer: R,
}

impl<R> MathMarkdown<R>
where
    R: MathRenderer,
{
    pub fn new(normalizer: NormalizerOptions, opts: PulldownMathOptions, renderer: R) -> Self {
        Self {
            session: IncrementalSession::new(normalizer),
            opts,
            renderer,
        }
    }

    pub fn session(&self) -> &IncrementalSession {
        &self.session
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn update(&mut self, text: &str) -> Rendered<R::Output> {
        let text = self.session.update(text);
        let pieces = render_pieces(&text, &self.opts, &self.renderer);
        Rendered { text, pieces }
    }

    pub fn clear(&mut self) {
        self.session.reset();
    }
}
