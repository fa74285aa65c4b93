//! Incremental math-delimiter normalization for streaming Markdown.
//!
//! Text arriving token by token is rewritten so that `$...$`, `$$...$$`, `\(...\)` and `\[...\]`
//! become backtick-quoted `\(...\)` / `\[...\]` code spans a plain Markdown parser can carry to a
//! math renderer. Unclosed spans are left literal until they close.

pub mod math;
pub mod normalize;
pub mod options;
pub mod session;
pub mod state;
pub mod syntax;
pub mod types;

#[cfg(feature = "pulldown")]
pub mod adapters;

pub use math::*;
pub use normalize::*;
pub use options::*;
pub use session::*;
pub use state::*;
pub use types::*;
