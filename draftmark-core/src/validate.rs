//! Structural invariant validation for documents.
//!
//! The renderer refuses documents that violate these invariants; everything
//! else is renderable. The parser constructs documents that satisfy them by
//! construction, so validation only runs on externally supplied input.

use crate::document::Document;
use std::collections::HashSet;
use std::fmt;

/// A violation of the document invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A style or entity range extends past the end of its block's text.
    RangeOutOfBounds {
        block_key: String,
        offset: usize,
        length: usize,
        text_len: usize,
    },
    /// An entity range references a key absent from the entity map.
    DanglingEntityKey { block_key: String, entity_key: u32 },
    /// A non-list block carries a non-zero depth.
    DepthOnNonListBlock { block_key: String, depth: usize },
    /// Two blocks share the same key.
    DuplicateBlockKey { block_key: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::RangeOutOfBounds {
                block_key,
                offset,
                length,
                text_len,
            } => write!(
                f,
                "Range {offset}+{length} exceeds text length {text_len} in block '{block_key}'"
            ),
            ValidationError::DanglingEntityKey {
                block_key,
                entity_key,
            } => write!(
                f,
                "Block '{block_key}' references missing entity key {entity_key}"
            ),
            ValidationError::DepthOnNonListBlock { block_key, depth } => write!(
                f,
                "Non-list block '{block_key}' has non-zero depth {depth}"
            ),
            ValidationError::DuplicateBlockKey { block_key } => {
                write!(f, "Duplicate block key '{block_key}'")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Bounds check that stays correct when `offset + length` would overflow;
/// wire input can carry arbitrary `usize` values.
fn range_exceeds(offset: usize, length: usize, text_len: usize) -> bool {
    match offset.checked_add(length) {
        Some(end) => end > text_len,
        None => true,
    }
}

impl Document {
    /// Check the structural invariants, returning the first violation found.
    ///
    /// Checked per block, in order: key uniqueness, depth restricted to list
    /// items, range bounds (in characters), entity key resolution.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut seen_keys = HashSet::new();

        for block in &self.blocks {
            if !seen_keys.insert(block.key.as_str()) {
                return Err(ValidationError::DuplicateBlockKey {
                    block_key: block.key.clone(),
                });
            }

            if block.depth != 0 && !block.block_type.is_list_item() {
                return Err(ValidationError::DepthOnNonListBlock {
                    block_key: block.key.clone(),
                    depth: block.depth,
                });
            }

            let text_len = block.char_len();

            for range in &block.inline_style_ranges {
                if range_exceeds(range.offset, range.length, text_len) {
                    return Err(ValidationError::RangeOutOfBounds {
                        block_key: block.key.clone(),
                        offset: range.offset,
                        length: range.length,
                        text_len,
                    });
                }
            }

            for range in &block.entity_ranges {
                if range_exceeds(range.offset, range.length, text_len) {
                    return Err(ValidationError::RangeOutOfBounds {
                        block_key: block.key.clone(),
                        offset: range.offset,
                        length: range.length,
                        text_len,
                    });
                }
                if !self.entity_map.contains_key(&range.key) {
                    return Err(ValidationError::DanglingEntityKey {
                        block_key: block.key.clone(),
                        entity_key: range.key,
                    });
                }
            }
        }

        Ok(())
    }
}
