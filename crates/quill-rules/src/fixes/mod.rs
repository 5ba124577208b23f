//! Batch fixers for the built-in rules

pub mod directive_removal;
pub mod trailing_whitespace;

pub use directive_removal::DirectiveRemoval;
pub use trailing_whitespace::TrailingWhitespaceFix;
