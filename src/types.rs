/// A cut point in both coordinate spaces: `raw` indexes the input, `rewritten` the output.
///
/// Everything before a boundary is final; appending text never changes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Boundary {
    pub raw: usize,
    pub rewritten: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Normalized {
    pub text: String,
    /// The last boundary in the fragment, or `None` if the whole fragment is still open.
    pub boundary: Option<Boundary>,
    /// True if an opener in the fragment is still waiting for its close.
    pub blocked: bool,
}

impl Normalized {
    /// The still-open part of the input, starting at the boundary.
    pub fn open_tail<'a>(&self, raw: &'a str) -> &'a str {
        &raw[self.boundary.map_or(0, |b| b.raw)..]
    }

    /// The final part of the output, up to the boundary.
    pub fn clean_output(&self) -> &str {
        &self.text[..self.boundary.map_or(0, |b| b.rewritten)]
    }
}
