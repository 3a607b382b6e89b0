//! Format implementations
//!
//! This module contains all format implementations that convert between
//! the Document model and text representations.

pub mod markdown;
pub mod raw;

pub use markdown::{MarkdownFormat, ParseOptions};
pub use raw::RawFormat;
