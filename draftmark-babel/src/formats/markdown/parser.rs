//! Markdown parsing (Markdown → Document import)
//!
//! Converts CommonMark Markdown to the flat Document model.
//! Pipeline: Markdown string → Comrak AST → flat blocks with char-offset ranges.
//!
//! Parsing is total: comrak accepts any byte sequence, and every construct
//! the model cannot express degrades to literal unstyled text, so there is
//! no failure path in this direction.

use crate::common::spans::{coalesce_entity_ranges, coalesce_style_ranges};
use crate::formats::markdown::ParseOptions;
use comrak::nodes::{AstNode, ListType, NodeValue};
use comrak::{parse_document, Arena, ComrakOptions};
use draftmark_core::{
    Block, BlockType, Document, Entity, EntityRange, InlineStyle, KeySequence, StyleRange,
};
use std::collections::{BTreeMap, HashMap};

/// Parse a Markdown string into a Document with default options.
pub fn parse_from_markdown(source: &str) -> Document {
    parse_from_markdown_with(source, &ParseOptions::default())
}

/// Parse a Markdown string into a Document.
pub fn parse_from_markdown_with(source: &str, options: &ParseOptions) -> Document {
    let arena = Arena::new();
    let root = parse_document(&arena, source, &default_comrak_options());

    let mut lowering = Lowering::new(options);
    for child in root.children() {
        lowering.lower_node(child);
    }
    lowering.into_document()
}

/// Shared comrak configuration for both directions.
///
/// Tables are the one GFM extension we enable; strikethrough and autolink
/// stay off so `~~text~~` and bare URLs survive as literal text (the model
/// has no style or entity to carry them).
pub(crate) fn default_comrak_options() -> ComrakOptions<'static> {
    let mut options = ComrakOptions::default();
    options.extension.table = true;
    options
}

/// Assigns entity keys in first-seen order, de-duplicating links by url.
struct EntityInterner {
    by_url: HashMap<String, u32>,
    entities: BTreeMap<u32, Entity>,
}

impl EntityInterner {
    fn new() -> Self {
        EntityInterner {
            by_url: HashMap::new(),
            entities: BTreeMap::new(),
        }
    }

    fn intern_link(&mut self, url: &str) -> u32 {
        if let Some(&key) = self.by_url.get(url) {
            return key;
        }
        let key = self.entities.len() as u32;
        self.entities.insert(key, Entity::link(url));
        self.by_url.insert(url.to_string(), key);
        key
    }
}

/// Per-call lowering state: the blocks built so far, the key sequence, and
/// the entity interner.
struct Lowering<'o> {
    options: &'o ParseOptions,
    keys: KeySequence,
    blocks: Vec<Block>,
    entities: EntityInterner,
}

impl<'o> Lowering<'o> {
    fn new(options: &'o ParseOptions) -> Self {
        Lowering {
            options,
            keys: KeySequence::new(),
            blocks: Vec::new(),
            entities: EntityInterner::new(),
        }
    }

    fn into_document(mut self) -> Document {
        // A document always has at least one block.
        if self.blocks.is_empty() {
            let key = self.keys.next_key();
            self.blocks.push(Block::new(key, BlockType::Unstyled, ""));
        }
        Document {
            blocks: self.blocks,
            entity_map: self.entities.entities,
        }
    }

    fn paragraph_sink(&self) -> InlineSink {
        InlineSink::new(if self.options.hard_breaks { "\n" } else { " " }, "\n")
    }

    fn lower_node<'a>(&mut self, node: &'a AstNode<'a>) {
        let node_data = node.data.borrow();

        match &node_data.value {
            NodeValue::Paragraph => {
                let mut sink = self.paragraph_sink();
                for child in node.children() {
                    sink.collect(child, &mut self.entities);
                }
                self.push_block(BlockType::Unstyled, 0, sink);
            }

            NodeValue::Heading(heading) => {
                let block_type = match heading.level {
                    1 => BlockType::HeaderOne,
                    2 => BlockType::HeaderTwo,
                    // The model stops at level three.
                    _ => BlockType::HeaderThree,
                };
                // ATX headings are single-line; breaks collapse to spaces.
                let mut sink = InlineSink::new(" ", " ");
                for child in node.children() {
                    sink.collect(child, &mut self.entities);
                }
                self.push_block(block_type, 0, sink);
            }

            NodeValue::BlockQuote => {
                // The model has no nested quote structure: each quoted
                // paragraph becomes its own blockquote block, everything
                // else inside the quote lowers as if unquoted.
                for child in node.children() {
                    if matches!(child.data.borrow().value, NodeValue::Paragraph) {
                        let mut sink = self.paragraph_sink();
                        for inline in child.children() {
                            sink.collect(inline, &mut self.entities);
                        }
                        self.push_block(BlockType::Blockquote, 0, sink);
                    } else {
                        self.lower_node(child);
                    }
                }
            }

            NodeValue::List(list) => {
                let ordered = matches!(list.list_type, ListType::Ordered);
                self.lower_list(node, 0, ordered);
            }

            NodeValue::CodeBlock(code_block) => {
                let text = code_block
                    .literal
                    .strip_suffix('\n')
                    .unwrap_or(&code_block.literal)
                    .to_string();
                let key = self.keys.next_key();
                let mut block = Block::new(key, BlockType::CodeBlock, text);
                if let Some(language) = code_block.info.split_whitespace().next() {
                    block
                        .data
                        .insert("language".to_string(), language.to_string());
                }
                let len = block.char_len();
                if len > 0 {
                    block
                        .inline_style_ranges
                        .push(StyleRange::new(0, len, InlineStyle::Code));
                }
                self.blocks.push(block);
            }

            NodeValue::ThematicBreak => {
                self.literal_block("---".to_string());
            }

            NodeValue::HtmlBlock(html) => {
                self.literal_block(html.literal.trim_end().to_string());
            }

            NodeValue::Table(_) => {
                // Tables have no model counterpart; flatten each row to a
                // pipe-joined text line.
                let mut lines = Vec::new();
                for row in node.children() {
                    let cells: Vec<String> = row
                        .children()
                        .map(|cell| collect_text(cell).trim().to_string())
                        .collect();
                    lines.push(cells.join(" | "));
                }
                self.literal_block(lines.join("\n"));
            }

            NodeValue::Document => {
                for child in node.children() {
                    self.lower_node(child);
                }
            }

            _ => {
                // Anything unrecognized degrades to its literal text.
                let text = collect_text(node);
                if !text.trim().is_empty() {
                    self.literal_block(text.trim_end().to_string());
                }
            }
        }
    }

    fn lower_list<'a>(&mut self, node: &'a AstNode<'a>, depth: usize, ordered: bool) {
        for item in node.children() {
            self.lower_item(item, depth, ordered);
        }
    }

    fn lower_item<'a>(&mut self, item: &'a AstNode<'a>, depth: usize, ordered: bool) {
        let mut sink = self.paragraph_sink();
        let mut deferred: Vec<&'a AstNode<'a>> = Vec::new();

        for child in item.children() {
            if matches!(child.data.borrow().value, NodeValue::Paragraph) {
                // A loose item with several paragraphs keeps one block;
                // the paragraphs join as hard breaks.
                if !sink.is_empty() {
                    sink.push_text("\n");
                }
                for inline in child.children() {
                    sink.collect(inline, &mut self.entities);
                }
            } else {
                deferred.push(child);
            }
        }

        let block_type = if ordered {
            BlockType::OrderedListItem
        } else {
            BlockType::UnorderedListItem
        };
        self.push_block(block_type, depth, sink);

        // Nested lists continue one level deeper; any other block content
        // inside the item loses its nesting and lowers as a sibling.
        for child in deferred {
            let child_data = child.data.borrow();
            if let NodeValue::List(list) = &child_data.value {
                let nested_ordered = matches!(list.list_type, ListType::Ordered);
                drop(child_data);
                self.lower_list(child, depth + 1, nested_ordered);
            } else {
                drop(child_data);
                self.lower_node(child);
            }
        }
    }

    fn push_block(&mut self, block_type: BlockType, depth: usize, sink: InlineSink) {
        let key = self.keys.next_key();
        let mut block = Block::new(key, block_type, sink.text);
        block.depth = depth;
        block.inline_style_ranges = coalesce_style_ranges(&sink.styles);
        block.entity_ranges = coalesce_entity_ranges(&sink.entity_ranges);
        self.blocks.push(block);
    }

    fn literal_block(&mut self, text: String) {
        let key = self.keys.next_key();
        self.blocks.push(Block::new(key, BlockType::Unstyled, text));
    }
}

/// Accumulates one block's flat text while recording style and entity
/// ranges as character offsets into it.
struct InlineSink {
    text: String,
    len: usize,
    styles: Vec<StyleRange>,
    entity_ranges: Vec<EntityRange>,
    soft_break: &'static str,
    line_break: &'static str,
}

impl InlineSink {
    fn new(soft_break: &'static str, line_break: &'static str) -> Self {
        InlineSink {
            text: String::new(),
            len: 0,
            styles: Vec::new(),
            entity_ranges: Vec::new(),
            soft_break,
            line_break,
        }
    }

    fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn push_text(&mut self, text: &str) {
        self.text.push_str(text);
        self.len += text.chars().count();
    }

    fn collect<'a>(&mut self, node: &'a AstNode<'a>, entities: &mut EntityInterner) {
        let node_data = node.data.borrow();

        match &node_data.value {
            NodeValue::Text(text) => self.push_text(text),

            NodeValue::SoftBreak => self.push_text(self.soft_break),
            NodeValue::LineBreak => self.push_text(self.line_break),

            NodeValue::Code(code) => {
                let start = self.len;
                self.push_text(&code.literal);
                if self.len > start {
                    self.styles
                        .push(StyleRange::new(start, self.len - start, InlineStyle::Code));
                }
            }

            NodeValue::Strong => {
                let start = self.len;
                for child in node.children() {
                    self.collect(child, entities);
                }
                if self.len > start {
                    self.styles
                        .push(StyleRange::new(start, self.len - start, InlineStyle::Bold));
                }
            }

            NodeValue::Emph => {
                let start = self.len;
                for child in node.children() {
                    self.collect(child, entities);
                }
                if self.len > start {
                    self.styles.push(StyleRange::new(
                        start,
                        self.len - start,
                        InlineStyle::Italic,
                    ));
                }
            }

            NodeValue::Link(link) => {
                let start = self.len;
                for child in node.children() {
                    self.collect(child, entities);
                }
                if self.len == start {
                    // Empty link text: keep the target readable.
                    self.push_text(&link.url);
                }
                let key = entities.intern_link(&link.url);
                self.entity_ranges
                    .push(EntityRange::new(start, self.len - start, key));
            }

            NodeValue::Image(_) => {
                // Images degrade to their alt text.
                for child in node.children() {
                    self.collect(child, entities);
                }
            }

            NodeValue::HtmlInline(html) => self.push_text(html),

            _ => {
                // Unknown inline containers contribute their text only.
                for child in node.children() {
                    self.collect(child, entities);
                }
            }
        }
    }
}

/// Plain text of a node and its descendants, markup stripped.
fn collect_text<'a>(node: &'a AstNode<'a>) -> String {
    let mut output = String::new();
    collect_text_into(node, &mut output);
    output
}

fn collect_text_into<'a>(node: &'a AstNode<'a>, output: &mut String) {
    match &node.data.borrow().value {
        NodeValue::Text(text) => output.push_str(text),
        NodeValue::Code(code) => output.push_str(&code.literal),
        NodeValue::HtmlInline(html) => output.push_str(html),
        NodeValue::SoftBreak | NodeValue::LineBreak => output.push(' '),
        _ => {
            for child in node.children() {
                collect_text_into(child, output);
            }
        }
    }
}
