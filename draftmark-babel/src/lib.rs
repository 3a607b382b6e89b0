//! Bidirectional conversion between flat rich-text documents and Markdown
//!
//!     This crate converts between the block-and-ranges Document model
//!     (draftmark-core) and CommonMark Markdown, in both directions.
//!
//!     TLDR: For format authors:
//!         - Babel never hand-writes a parser or serializer for a text format, it relies on the format's library (comrak for Markdown, serde_json for raw).
//!         - The flat/nested mismatch is solved once, in common/spans.rs; format code only maps between library ASTs and the Document model.
//!         - Each format implements the Format trait and registers in FormatRegistry.
//!         - Tests live under tests/<format>/ and must be declared in tests/lib.rs, rust does not discover tests in subdirectories by default.
//!
//! Architecture
//!
//!     The Document model is flat: a sequence of blocks, each carrying its
//!     text plus integer ranges for styles and link entities. Markdown is a
//!     tree. Everything difficult about this crate is bridging that shape
//!     mismatch, so the bridging lives in one format agnostic layer
//!     (./common/spans.rs) and the format code stays focused on data
//!     format transformations.
//!
//!     This is a pure lib. It powers the draftmark CLI but is shell
//!     agnostic, no code here may assume a shell environment, std print,
//!     env vars and so on.
//!
//!     The file structure :
//!     .
//!     ├── error.rs
//!     ├── format.rs               # Format trait definition
//!     ├── registry.rs             # FormatRegistry for discovery and selection
//!     ├── formats
//!     │   ├── markdown
//!     │   │   ├── parser.rs       # Markdown → Document
//!     │   │   ├── serializer.rs   # Document → Markdown
//!     │   │   └── mod.rs
//!     │   └── raw                 # The JSON wire form of the model itself
//!     ├── common
//!     │   └── spans.rs            # Flat ranges ↔ nested span trees
//!     └── lib.rs
//!
//! Core Algorithms
//!
//!     The hard direction is export: style and entity ranges may overlap
//!     arbitrarily, while Markdown delimiters must nest. resolve_spans in
//!     common/spans.rs segments the text at every range boundary and keeps
//!     a stack of open annotations, closing and reopening spans where they
//!     interleave. Import is the inverse: walk the comrak AST keeping a
//!     character offset, emit ranges as delimiter spans close, then
//!     coalesce adjacent same-style ranges so an exported document parses
//!     back to the same range set.
//!
//! Formats
//!
//!     Format specific capabilities are implemented with the Format trait.
//!     Formats have parse() and serialize() methods, a name and file
//!     extensions. See the trait def [./format.rs]
//!     - Format trait: uniform interface for all formats
//!     - FormatRegistry: centralized discovery and selection of formats
//!
//!     The raw JSON wire form is itself registered as a format, which
//!     gives all formats identical interfaces and makes the CLI trivially
//!     symmetrical (any registered format to any other).
//!
//! Library Choices
//!
//!     We offload as much as possible to specialized crates. Markdown
//!     parsing and rendering both go through comrak, so CommonMark
//!     escaping, delimiter flanking and blockquote prefixing are never
//!     reimplemented here; import walks comrak's AST and export builds
//!     one. The raw format is plain serde_json over the derived model.

pub mod common;
pub mod error;
pub mod format;
pub mod formats;
pub mod registry;

pub use error::FormatError;
pub use format::Format;
pub use formats::markdown::{MarkdownFormat, ParseOptions};
pub use formats::raw::RawFormat;
pub use registry::FormatRegistry;

use draftmark_core::Document;

/// Converts Markdown text to a Document with default options.
///
/// Parsing is total: constructs the model cannot express degrade to
/// literal text instead of failing.
pub fn markdown_to_document(source: &str) -> Document {
    formats::markdown::parser::parse_from_markdown(source)
}

/// Converts Markdown text to a Document with explicit options.
pub fn markdown_to_document_with(source: &str, options: &ParseOptions) -> Document {
    formats::markdown::parser::parse_from_markdown_with(source, options)
}

/// Converts a Document to Markdown text.
///
/// Fails only when the document breaks the model invariants (out of
/// bounds ranges, dangling entity keys, duplicate block keys).
pub fn document_to_markdown(doc: &Document) -> Result<String, FormatError> {
    formats::markdown::serializer::serialize_to_markdown(doc)
}
