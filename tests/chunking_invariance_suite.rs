mod support;

use mathstream::{DelimiterNormalizer, IncrementalSession, NormalizerOptions};

fn assert_invariant(
    case_name: &str,
    markdown: &str,
    opts: NormalizerOptions,
    trials: u64,
    max_bytes: usize,
) {
    let expected = DelimiterNormalizer::new(opts.clone()).process(markdown).text;

    let whole = support::stream_final(support::chunk_whole(markdown), opts.clone());
    assert_eq!(whole, expected, "case={case_name} chunker=whole");

    let lines = support::stream_final(support::chunk_lines(markdown), opts.clone());
    assert_eq!(lines, expected, "case={case_name} chunker=lines");

    let chars = support::stream_final(support::chunk_chars(markdown), opts.clone());
    assert_eq!(chars, expected, "case={case_name} chunker=chars");

    let delims = support::stream_final(support::chunk_after_delimiters(markdown), opts.clone());
    assert_eq!(delims, expected, "case={case_name} chunker=delimiters");

    for t in 0..trials {
        let rand = support::stream_final(
            support::chunk_pseudo_random(markdown, case_name, t, max_bytes),
            opts.clone(),
        );
        assert_eq!(rand, expected, "case={case_name} chunker=rand t={t}");
    }
}

const LLM_ANSWER: &str = "## Solving the quadratic\n\n\
The roots of $ax^2 + bx + c = 0$ are given by\n\n\
$$\nx = \\frac{-b \\pm \\sqrt{b^2 - 4ac}}{2a}\n$$\n\n\
When the discriminant \\(\\Delta = b^2 - 4ac\\) is negative, the roots are complex.\n\
For example, with $a = 1$, $b = 2$, $c = 5$:\n\n\
\\[\nx = -1 \\pm 2i\n\\]\n\n\
```python\nprice = \"$5\"  # not math: $x$\n```\n\n\
That costs $5 or $10, which is fine.";

const MIXED_WIDTH: &str = "公式 $E = mc^2$。其中 $m$ 是质量，$c$ 是光速！\n\n\
全角括号（$x$）与 \\(y\\)：完毕";

const NASTY: &str = "$$ $ $$ $x$$ \\( $ \\) \\[ $$ \\] `` ` `` $`$ \\$ $a\\$b$. $\n$ $$";

const STRAY_BACKTICKS: &str = "Use ` sparingly, e.g. $x$ here.\n\n\
The area is $\\pi r^2$ and `code` too.\n\n\
~~~\n$y$ in a fence\n~~~\n\
Done: $z$.\n\n\
``` py\nprice = $5\n";

#[test]
fn llm_answer_chunking_invariance() {
    assert_invariant("llm_answer", LLM_ANSWER, NormalizerOptions::default(), 16, 48);
    assert_invariant("llm_answer_math_only", LLM_ANSWER, NormalizerOptions::math_only(), 8, 48);
    assert_invariant(
        "llm_answer_line_checkpoints",
        LLM_ANSWER,
        NormalizerOptions {
            checkpoint_line_breaks: true,
            ..Default::default()
        },
        8,
        48,
    );
}

#[test]
fn full_width_punctuation_chunking_invariance() {
    assert_invariant("mixed_width", MIXED_WIDTH, NormalizerOptions::default(), 16, 16);
}

#[test]
fn pathological_delimiters_chunking_invariance() {
    assert_invariant("nasty", NASTY, NormalizerOptions::default(), 32, 8);
    assert_invariant("nasty_math_only", NASTY, NormalizerOptions::math_only(), 32, 8);
}

#[test]
fn stray_backticks_and_fences_chunking_invariance() {
    assert_invariant("stray_backticks", STRAY_BACKTICKS, NormalizerOptions::default(), 16, 12);
    assert_invariant(
        "stray_backticks_line_checkpoints",
        STRAY_BACKTICKS,
        NormalizerOptions {
            checkpoint_line_breaks: true,
            ..Default::default()
        },
        16,
        12,
    );
}

#[test]
fn stray_backticks_render_expected_spans() {
    let out = DelimiterNormalizer::default().process(STRAY_BACKTICKS).text;
    assert!(out.starts_with("Use ` sparingly, e.g. `` \\(x\\) `` here.\n\n"));
    assert!(out.contains("`\\(\\pi r^2\\)` and `code` too."));
    assert!(out.contains("~~~\n$y$ in a fence\n~~~\n"));
    assert!(out.contains("Done: `\\(z\\)`."));
    assert!(out.ends_with("``` py\nprice = $5\n"));
}

#[test]
fn llm_answer_renders_expected_spans() {
    let out = DelimiterNormalizer::default().process(LLM_ANSWER).text;
    assert!(out.contains("`\\(ax^2 + bx + c = 0\\)`"));
    assert!(out.contains("`\\[\nx = \\frac{-b \\pm \\sqrt{b^2 - 4ac}}{2a}\n\\]`"));
    assert!(out.contains("`\\(\\Delta = b^2 - 4ac\\)`"));
    assert!(out.contains("`\\(a = 1\\)`, `\\(b = 2\\)`, `\\(c = 5\\)`:"));
    assert!(out.contains("price = \"$5\"  # not math: $x$"));
    assert!(out.ends_with("That costs $5 or $10, which is fine."));
}

#[test]
fn session_can_be_reused_after_clear() {
    let mut s = IncrementalSession::default();
    support::stream_outputs_with_session(support::chunk_chars(LLM_ANSWER), &mut s);
    assert_eq!(s.update(""), "");

    let outputs = support::stream_outputs_with_session(support::chunk_lines(MIXED_WIDTH), &mut s);
    let expected = DelimiterNormalizer::default().process(MIXED_WIDTH).text;
    assert_eq!(outputs.last(), Some(&expected));
}
