//! Built-in lint rules

pub mod brace_placement;
pub mod regions;
pub mod trailing_whitespace;

pub use brace_placement::{BRACE_PLACEMENT, BraceOptions, BracePlacement};
pub use regions::{NO_REGIONS, NO_REGIONS_IN_ELEMENTS, NoRegions, NoRegionsInElements};
pub use trailing_whitespace::{NO_TRAILING_WHITESPACE, TrailingWhitespace, find_trailing_whitespace};
