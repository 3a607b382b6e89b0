//! Document model data structures and their wire schema.
//!
//! The serde attributes define the JSON encoding consumed and produced at
//! the process boundary: `blocks` + `entityMap` at the top level, camelCase
//! block fields, kebab-case block type names, SCREAMING_CASE style names,
//! and entity ranges referencing entities through an integer `key`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Block-level metadata. The only key with defined meaning is `language`
/// on `code-block` blocks.
pub type BlockData = BTreeMap<String, String>;

/// Entity payload. For `LINK` entities the defined key is `url`.
pub type EntityData = BTreeMap<String, String>;

/// A complete rich-text document: ordered blocks plus the entities their
/// ranges reference.
///
/// Entity keys are small integers assigned in first-seen order; the map is
/// keyed numerically so iteration follows insertion order. JSON encodes the
/// keys as strings (`"0"`, `"1"`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Document {
    pub blocks: Vec<Block>,
    #[serde(rename = "entityMap", default)]
    pub entity_map: BTreeMap<u32, Entity>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an entity by the key stored in an [`EntityRange`].
    pub fn entity(&self, key: u32) -> Option<&Entity> {
        self.entity_map.get(&key)
    }
}

/// One paragraph/heading/list-item/quote/code unit of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// Opaque identifier, unique within one document. Not meaningful across
    /// conversion calls.
    pub key: String,
    /// Plain text content; contains no markup.
    pub text: String,
    #[serde(rename = "type")]
    pub block_type: BlockType,
    /// List nesting level. Zero for everything except nested list items.
    #[serde(default)]
    pub depth: usize,
    #[serde(default)]
    pub inline_style_ranges: Vec<StyleRange>,
    #[serde(default)]
    pub entity_ranges: Vec<EntityRange>,
    #[serde(default)]
    pub data: BlockData,
}

impl Block {
    pub fn new(key: impl Into<String>, block_type: BlockType, text: impl Into<String>) -> Self {
        Block {
            key: key.into(),
            text: text.into(),
            block_type,
            depth: 0,
            inline_style_ranges: Vec::new(),
            entity_ranges: Vec::new(),
            data: BlockData::new(),
        }
    }

    /// Length of the block text in Unicode scalar values, the unit all
    /// range offsets are expressed in.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// The `language` metadata of a `code-block`, if any.
    pub fn language(&self) -> Option<&str> {
        self.data.get("language").map(String::as_str)
    }

    /// The entity range covering `offset`, if any. Entity ranges within a
    /// block never overlap, so at most one can match.
    pub fn entity_range_at(&self, offset: usize) -> Option<&EntityRange> {
        self.entity_ranges
            .iter()
            .find(|r| r.offset <= offset && offset < r.offset + r.length)
    }

    /// All styles active at `offset`, deduplicated and in style order.
    /// Ranges of the same style need not be adjacent in the range list.
    pub fn styles_at(&self, offset: usize) -> Vec<InlineStyle> {
        let mut styles: Vec<InlineStyle> = self
            .inline_style_ranges
            .iter()
            .filter(|r| r.offset <= offset && offset < r.offset + r.length)
            .map(|r| r.style)
            .collect();
        styles.sort();
        styles.dedup();
        styles
    }
}

/// The enumerated block kinds the model supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockType {
    Unstyled,
    HeaderOne,
    HeaderTwo,
    HeaderThree,
    Blockquote,
    UnorderedListItem,
    OrderedListItem,
    CodeBlock,
}

impl BlockType {
    pub fn is_list_item(self) -> bool {
        matches!(self, BlockType::UnorderedListItem | BlockType::OrderedListItem)
    }

    /// Heading level (1-3) for header block types.
    pub fn heading_level(self) -> Option<u8> {
        match self {
            BlockType::HeaderOne => Some(1),
            BlockType::HeaderTwo => Some(2),
            BlockType::HeaderThree => Some(3),
            _ => None,
        }
    }
}

/// An inline style annotation over a character range of a block's text.
/// Ranges of different styles may overlap freely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleRange {
    pub offset: usize,
    pub length: usize,
    pub style: InlineStyle,
}

impl StyleRange {
    pub fn new(offset: usize, length: usize, style: InlineStyle) -> Self {
        StyleRange {
            offset,
            length,
            style,
        }
    }

    pub fn end(&self) -> usize {
        self.offset + self.length
    }
}

/// The inline styles expressible in the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InlineStyle {
    Bold,
    Italic,
    Code,
}

/// A character range of a block's text annotated with a shared entity.
/// Entity ranges within one block do not overlap each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRange {
    pub offset: usize,
    pub length: usize,
    /// Key into the document's entity map.
    pub key: u32,
}

impl EntityRange {
    pub fn new(offset: usize, length: usize, key: u32) -> Self {
        EntityRange {
            offset,
            length,
            key,
        }
    }

    pub fn end(&self) -> usize {
        self.offset + self.length
    }
}

/// A shared annotation record referenced by entity ranges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    pub mutability: Mutability,
    #[serde(default)]
    pub data: EntityData,
}

impl Entity {
    /// A mutable LINK entity pointing at `url`.
    pub fn link(url: impl Into<String>) -> Self {
        let mut data = EntityData::new();
        data.insert("url".to_string(), url.into());
        Entity {
            entity_type: EntityType::Link,
            mutability: Mutability::Mutable,
            data,
        }
    }

    /// The `url` payload of a LINK entity, if present.
    pub fn url(&self) -> Option<&str> {
        self.data.get("url").map(String::as_str)
    }
}

/// Entity kinds. Links are the only kind the conversion pipelines produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    Link,
}

/// Whether editing the annotated text keeps the entity attached.
/// Carried through conversions but not interpreted by them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Mutability {
    Mutable,
    Immutable,
}
