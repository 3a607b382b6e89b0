//! Markdown format implementation
//!
//! This module implements bidirectional conversion between the Document
//! model and CommonMark Markdown (with the GFM table extension enabled).
//!
//! # Library Choice
//!
//! We use the `comrak` crate for Markdown parsing and serialization. This choice is based on:
//! - Single crate for both parsing and serialization
//! - Feature-rich with CommonMark compliance
//! - Robust and well-maintained
//! - Supports extensions (tables, strikethrough, etc.)
//!
//! # Element Mapping Table
//!
//! | Block type           | Markdown Equivalent  | Import Notes                            | Export Notes                         |
//! |----------------------|----------------------|-----------------------------------------|--------------------------------------|
//! | unstyled             | Paragraph            | Direct; soft breaks per break mode      | Direct; `\n` → backslash break       |
//! | header-one/two/three | Heading (# ## ###)   | Levels 4-6 clamp to header-three        | Direct; `\n` → space                 |
//! | blockquote           | > quote              | One block per quoted paragraph          | Quote wrapping a paragraph           |
//! | unordered-list-item  | - item               | Nesting level → depth                   | depth → nesting; tight lists         |
//! | ordered-list-item    | 1. item              | Start numbers discarded                 | Renumbered from 1 per run            |
//! | code-block           | Fenced code block    | Info string first word → data.language  | data.language → info string          |
//! | BOLD / ITALIC / CODE | ** / * / `           | Delimiter spans → char ranges           | Ranges → nested delimiters           |
//! | LINK entity          | [text](url)          | Interned by url, MUTABLE                | Range → link around span text        |
//!
//! # Degraded Constructs
//!
//! The model enumerates a fixed set of block types, so markdown constructs
//! outside it degrade to literal unstyled text rather than failing the
//! parse: thematic breaks, raw HTML blocks, GFM tables (flattened to
//! pipe-joined cell lines), images (alt text only). Strikethrough stays
//! disabled so `~~text~~` survives as literal text. Parsing never fails.
//!
//! # Lossy Conversions
//!
//! - Ordered list start numbers are discarded; rendering renumbers from 1.
//! - Emphasis ranges are trimmed to non-whitespace edges before rendering
//!   (whitespace-flanked delimiters would not re-parse).
//! - Interleaved (non-nestable) ranges render as repeated delimiter pairs;
//!   re-parsing coalesces touching pairs back together, but whitespace
//!   between split spans loses its (invisible) styling.

pub mod parser;
pub mod serializer;

use crate::error::FormatError;
use crate::format::Format;
use draftmark_core::Document;

/// Options controlling the Markdown → Document direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Treat soft line breaks inside a paragraph as hard breaks (the text
    /// keeps a `\n` and the block is not split). When disabled, soft
    /// breaks collapse to a space.
    pub hard_breaks: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions { hard_breaks: true }
    }
}

/// Format implementation for Markdown
#[derive(Debug, Clone, Default)]
pub struct MarkdownFormat {
    options: ParseOptions,
}

impl MarkdownFormat {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ParseOptions) -> Self {
        MarkdownFormat { options }
    }
}

impl Format for MarkdownFormat {
    fn name(&self) -> &str {
        "markdown"
    }

    fn description(&self) -> &str {
        "CommonMark Markdown format"
    }

    fn file_extensions(&self) -> &[&str] {
        &["md", "markdown"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<Document, FormatError> {
        Ok(parser::parse_from_markdown_with(source, &self.options))
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        serializer::serialize_to_markdown(doc)
    }
}
