//! Helpers for filtering, normalising and matching asset references.
//!
//! Filtering, normalisation and suffix matching live in separate submodules so each rule can be
//! tested on its own. The scanner, the unused-asset classifier and the deployment check all go
//! through these helpers, so a reference means the same thing everywhere.

mod filters;
mod matching;
mod normalize;

pub use filters::should_ignore_reference;
pub use matching::is_used_by;
pub use normalize::normalize_reference;
