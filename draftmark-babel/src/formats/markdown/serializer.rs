//! Markdown serialization (Document → Markdown export)
//!
//! Converts the flat Document model to CommonMark Markdown.
//! Pipeline: Document → span trees per block → Comrak AST → Markdown string
//!
//! The renderer is one linear pass over the block sequence. Inline ranges
//! are resolved to nested spans by [`crate::common::spans`]; list nesting
//! is rebuilt from the per-block depth integers with an explicit stack of
//! open lists, so ordered runs renumber from 1 without recursion.

use crate::common::spans::{
    coalesce_entity_ranges, coalesce_style_ranges, hoist_edge_whitespace, resolve_spans,
    trim_emphasis_ranges, InlineNode, LinkSpan,
};
use crate::error::FormatError;
use crate::formats::markdown::parser::default_comrak_options;
use comrak::nodes::{
    Ast, AstNode, ListDelimType, ListType, NodeCode, NodeCodeBlock, NodeHeading, NodeLink,
    NodeList, NodeValue,
};
use comrak::{format_commonmark, Arena};
use draftmark_core::{Block, BlockType, Document, InlineStyle};
use std::cell::RefCell;

/// Serialize a Document to Markdown.
///
/// Fails only when the document violates the model invariants; every
/// structurally valid document renders.
pub fn serialize_to_markdown(doc: &Document) -> Result<String, FormatError> {
    doc.validate()?;

    let arena = Arena::new();
    let root = build_comrak_ast(&arena, doc);

    let mut output = Vec::new();
    format_commonmark(root, &default_comrak_options(), &mut output).map_err(|e| {
        FormatError::SerializationError(format!("Comrak serialization failed: {e}"))
    })?;

    let markdown = String::from_utf8(output)
        .map_err(|e| FormatError::SerializationError(format!("UTF-8 conversion failed: {e}")))?;

    // Remove Comrak's "end list" HTML comments which appear between adjacent lists
    Ok(markdown.replace("<!-- end list -->\n\n", ""))
}

/// How `\n` in block text is emitted.
#[derive(Clone, Copy)]
enum BreakStyle {
    /// Backslash hard break within the same paragraph.
    Hard,
    /// Collapse to a space (ATX headings are single-line).
    Space,
}

fn new_node<'a>(arena: &'a Arena<AstNode<'a>>, value: NodeValue) -> &'a AstNode<'a> {
    arena.alloc(AstNode::new(RefCell::new(Ast::new(value, (0, 0).into()))))
}

/// Build a Comrak AST from the flat block sequence
fn build_comrak_ast<'a>(arena: &'a Arena<AstNode<'a>>, doc: &Document) -> &'a AstNode<'a> {
    let root = new_node(arena, NodeValue::Document);
    let mut lists = ListStack::new();

    for block in &doc.blocks {
        match block.block_type {
            BlockType::HeaderOne | BlockType::HeaderTwo | BlockType::HeaderThree => {
                lists.close_all();
                let level = block
                    .block_type
                    .heading_level()
                    .expect("header block types have a level");
                let heading = new_node(
                    arena,
                    NodeValue::Heading(NodeHeading {
                        level,
                        setext: false,
                    }),
                );
                root.append(heading);
                append_inlines(arena, heading, &block_inlines(block, doc), BreakStyle::Space);
            }

            BlockType::Unstyled => {
                lists.close_all();
                let paragraph = new_node(arena, NodeValue::Paragraph);
                root.append(paragraph);
                append_inlines(arena, paragraph, &block_inlines(block, doc), BreakStyle::Hard);
            }

            BlockType::Blockquote => {
                lists.close_all();
                let quote = new_node(arena, NodeValue::BlockQuote);
                root.append(quote);
                let paragraph = new_node(arena, NodeValue::Paragraph);
                quote.append(paragraph);
                append_inlines(arena, paragraph, &block_inlines(block, doc), BreakStyle::Hard);
            }

            BlockType::CodeBlock => {
                lists.close_all();
                // Inline style ranges are ignored: the whole block is
                // already monospaced.
                let literal = if block.text.is_empty() {
                    String::new()
                } else {
                    format!("{}\n", block.text)
                };
                let code = new_node(
                    arena,
                    NodeValue::CodeBlock(NodeCodeBlock {
                        fenced: true,
                        fence_char: b'`',
                        fence_length: 3,
                        fence_offset: 0,
                        info: block.language().unwrap_or_default().to_string(),
                        literal,
                    }),
                );
                root.append(code);
            }

            BlockType::UnorderedListItem | BlockType::OrderedListItem => {
                let ordered = block.block_type == BlockType::OrderedListItem;
                let item = lists.open_item(arena, root, ordered, block.depth);
                let paragraph = new_node(arena, NodeValue::Paragraph);
                item.append(paragraph);
                append_inlines(arena, paragraph, &block_inlines(block, doc), BreakStyle::Hard);
            }
        }
    }

    root
}

/// One open list per depth while walking a run of list-item blocks.
struct OpenList<'a> {
    list: &'a AstNode<'a>,
    ordered: bool,
    last_item: Option<&'a AstNode<'a>>,
}

/// Explicit stack replacing the recursion a tree-shaped renderer would use:
/// list nesting is recovered from the flat per-block depth integers.
struct ListStack<'a> {
    levels: Vec<OpenList<'a>>,
}

impl<'a> ListStack<'a> {
    fn new() -> Self {
        ListStack { levels: Vec::new() }
    }

    /// A non-list block interrupts every open list run.
    fn close_all(&mut self) {
        self.levels.clear();
    }

    /// Append an item for a list block at `depth`, opening or closing lists
    /// as needed, and return the item node.
    fn open_item(
        &mut self,
        arena: &'a Arena<AstNode<'a>>,
        root: &'a AstNode<'a>,
        ordered: bool,
        depth: usize,
    ) -> &'a AstNode<'a> {
        // Depth may skip levels; clamp to one deeper than what is open.
        let depth = depth.min(self.levels.len());
        self.levels.truncate(depth + 1);

        // A marker change at this depth starts a sibling list, which also
        // restarts ordered numbering.
        if self.levels.len() == depth + 1 && self.levels[depth].ordered != ordered {
            self.levels.truncate(depth);
        }

        if self.levels.len() == depth {
            let parent = match depth.checked_sub(1).and_then(|d| self.levels.get(d)) {
                Some(level) => level.last_item.expect("open list level has an item"),
                None => root,
            };
            let list = new_node(arena, NodeValue::List(list_data(ordered)));
            parent.append(list);
            self.levels.push(OpenList {
                list,
                ordered,
                last_item: None,
            });
        }

        let item = new_node(arena, NodeValue::Item(list_data(ordered)));
        self.levels[depth].list.append(item);
        self.levels[depth].last_item = Some(item);
        item
    }
}

fn list_data(ordered: bool) -> NodeList {
    NodeList {
        list_type: if ordered {
            ListType::Ordered
        } else {
            ListType::Bullet
        },
        marker_offset: 0,
        padding: 0,
        start: 1,
        delimiter: ListDelimType::Period,
        bullet_char: b'-',
        tight: true, // Tight lists avoid blank lines between items
    }
}

/// Resolve a block's flat ranges into a span tree.
fn block_inlines(block: &Block, doc: &Document) -> Vec<InlineNode> {
    let styles = trim_emphasis_ranges(
        &block.text,
        coalesce_style_ranges(&block.inline_style_ranges),
    );
    let links: Vec<LinkSpan> = coalesce_entity_ranges(&block.entity_ranges)
        .into_iter()
        .filter_map(|range| {
            // Validation guarantees the key resolves; an entity without a
            // url keeps its text but drops the link.
            doc.entity(range.key).and_then(|e| e.url()).map(|url| LinkSpan {
                offset: range.offset,
                length: range.length,
                key: range.key,
                url: url.to_string(),
            })
        })
        .collect();
    hoist_edge_whitespace(resolve_spans(&block.text, &styles, &links))
}

/// Append a span tree as comrak inline nodes under `parent`.
fn append_inlines<'a>(
    arena: &'a Arena<AstNode<'a>>,
    parent: &'a AstNode<'a>,
    nodes: &[InlineNode],
    breaks: BreakStyle,
) {
    for node in nodes {
        match node {
            InlineNode::Text(text) => append_text(arena, parent, text, breaks),

            InlineNode::Styled(InlineStyle::Bold, children) => {
                let strong = new_node(arena, NodeValue::Strong);
                parent.append(strong);
                append_inlines(arena, strong, children, breaks);
            }

            InlineNode::Styled(InlineStyle::Italic, children) => {
                let emph = new_node(arena, NodeValue::Emph);
                parent.append(emph);
                append_inlines(arena, emph, children, breaks);
            }

            InlineNode::Styled(InlineStyle::Code, children) => {
                // Code spans are leaves; inline code cannot span lines.
                let literal: String = children
                    .iter()
                    .map(InlineNode::plain_text)
                    .collect::<String>()
                    .replace('\n', " ");
                let code = new_node(
                    arena,
                    NodeValue::Code(NodeCode {
                        num_backticks: 1,
                        literal,
                    }),
                );
                parent.append(code);
            }

            InlineNode::Link { url, children } => {
                let link = new_node(
                    arena,
                    NodeValue::Link(NodeLink {
                        url: url.clone(),
                        title: String::new(),
                    }),
                );
                parent.append(link);
                append_inlines(arena, link, children, breaks);
            }
        }
    }
}

fn append_text<'a>(
    arena: &'a Arena<AstNode<'a>>,
    parent: &'a AstNode<'a>,
    text: &str,
    breaks: BreakStyle,
) {
    for (i, part) in text.split('\n').enumerate() {
        if i > 0 {
            let break_node = match breaks {
                BreakStyle::Hard => new_node(arena, NodeValue::LineBreak),
                BreakStyle::Space => new_node(arena, NodeValue::Text(" ".to_string())),
            };
            parent.append(break_node);
        }
        if !part.is_empty() {
            parent.append(new_node(arena, NodeValue::Text(part.to_string())));
        }
    }
}
