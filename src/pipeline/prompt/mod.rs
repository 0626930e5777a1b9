//! Prompt compilation. Pure functions: every input, however sparse, yields a prompt.

pub mod diagnosis;
pub mod interview;
pub mod sanitize;

pub use diagnosis::*;
pub use interview::*;
pub use sanitize::*;
