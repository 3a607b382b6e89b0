//! Export tests for Markdown format (Document → Markdown)
//!
//! Rendering details like emphasis delimiter choice and escaping belong to
//! Comrak, so most assertions re-parse the rendered Markdown and check the
//! recovered block structure instead of pinning exact output strings.

use draftmark_babel::{document_to_markdown, markdown_to_document};
use draftmark_core::{
    Block, BlockType, Document, Entity, EntityRange, InlineStyle, StyleRange,
};

fn doc_of(blocks: Vec<Block>) -> Document {
    let mut doc = Document::new();
    doc.blocks = blocks;
    doc
}

/// The /to scenario: one fully decorated paragraph followed by every
/// supported block type.
fn complex_document() -> Document {
    let mut paragraph = Block::new(
        "g0002",
        BlockType::Unstyled,
        "A paragraph with some italic and bold text, some inline code and a link. \
         It also has a link to a YouTube video, which should be rendered as an \
         embed and linkified https://www.youtube.com/watch?v=BmlBxJOb1lY, and it \
         mentions @mxstbr",
    );
    paragraph.inline_style_ranges = vec![
        StyleRange::new(22, 6, InlineStyle::Italic),
        StyleRange::new(33, 4, InlineStyle::Bold),
        StyleRange::new(49, 11, InlineStyle::Code),
    ];
    paragraph.entity_ranges = vec![EntityRange::new(67, 4, 0)];

    let mut code = Block::new("g000a", BlockType::CodeBlock, "const code = true;");
    code.inline_style_ranges = vec![StyleRange::new(0, 18, InlineStyle::Code)];
    code.data
        .insert("language".to_string(), "javascript".to_string());

    let mut doc = doc_of(vec![
        paragraph,
        Block::new("g0003", BlockType::HeaderOne, "Heading 1"),
        Block::new("g0004", BlockType::HeaderTwo, "Heading 2"),
        Block::new("g0005", BlockType::HeaderThree, "Heading 3"),
        Block::new("g0006", BlockType::Blockquote, "A blockquote"),
        Block::new("g0007", BlockType::UnorderedListItem, "An"),
        Block::new("g0008", BlockType::UnorderedListItem, "unordered"),
        Block::new("g0009", BlockType::UnorderedListItem, "list"),
        code,
        Block::new("g000b", BlockType::OrderedListItem, "An"),
        Block::new("g000c", BlockType::OrderedListItem, "ordered"),
        Block::new("g000d", BlockType::OrderedListItem, "list"),
    ]);
    doc.entity_map.insert(0, Entity::link("https://google.com"));
    doc
}

/// Block shape without the block keys, which change on every parse.
fn shape(doc: &Document) -> Vec<(BlockType, String, usize, Vec<StyleRange>, Vec<EntityRange>)> {
    doc.blocks
        .iter()
        .map(|b| {
            (
                b.block_type,
                b.text.clone(),
                b.depth,
                b.inline_style_ranges.clone(),
                b.entity_ranges.clone(),
            )
        })
        .collect()
}

#[test]
fn test_complex_document_renders_expected_constructs() {
    let md = document_to_markdown(&complex_document()).unwrap();

    assert!(md.starts_with("A paragraph with some"));
    assert!(md.contains("**bold**"));
    assert!(md.contains("`inline code`"));
    assert!(md.contains("[link](https://google.com)"));
    assert!(md.contains("# Heading 1"));
    assert!(md.contains("## Heading 2"));
    assert!(md.contains("### Heading 3"));
    assert!(md.contains("> A blockquote"));
    assert!(md.contains("- An\n- unordered\n- list"));
    assert!(md.contains("const code = true;"));
    assert!(md.contains("javascript"));
    // Comrak pads ordered markers to a four-column indent.
    assert!(md.contains("1.  An\n2.  ordered\n3.  list"));
}

#[test]
fn test_complex_document_survives_reparse() {
    let doc = complex_document();
    let md = document_to_markdown(&doc).unwrap();
    let reparsed = markdown_to_document(&md);

    assert_eq!(shape(&reparsed), shape(&doc));
    assert_eq!(
        reparsed.entity(0).and_then(Entity::url),
        Some("https://google.com")
    );
}

#[test]
fn test_ordered_runs_renumber_from_one() {
    let md = document_to_markdown(&doc_of(vec![
        Block::new("a", BlockType::OrderedListItem, "first"),
        Block::new("b", BlockType::OrderedListItem, "second"),
        Block::new("c", BlockType::Unstyled, "between"),
        Block::new("d", BlockType::OrderedListItem, "restart"),
    ]))
    .unwrap();

    assert!(md.contains("1.  first\n2.  second"));
    // The interrupted run starts counting again.
    assert!(md.contains("1.  restart"));
}

#[test]
fn test_nested_list_depths_round_trip() {
    let mut nested = Block::new("b", BlockType::UnorderedListItem, "nested");
    nested.depth = 1;
    let mut nested_two = Block::new("c", BlockType::UnorderedListItem, "nested two");
    nested_two.depth = 1;

    let doc = doc_of(vec![
        Block::new("a", BlockType::UnorderedListItem, "top"),
        nested,
        nested_two,
        Block::new("d", BlockType::UnorderedListItem, "top two"),
    ]);
    let md = document_to_markdown(&doc).unwrap();
    let reparsed = markdown_to_document(&md);

    let depths: Vec<(usize, &str)> = reparsed
        .blocks
        .iter()
        .map(|b| (b.depth, b.text.as_str()))
        .collect();
    assert_eq!(
        depths,
        [(0, "top"), (1, "nested"), (1, "nested two"), (0, "top two")]
    );
}

#[test]
fn test_depth_jump_clamps_to_next_level() {
    let mut deep = Block::new("b", BlockType::UnorderedListItem, "deep");
    deep.depth = 3;

    let doc = doc_of(vec![
        Block::new("a", BlockType::UnorderedListItem, "top"),
        deep,
    ]);
    let md = document_to_markdown(&doc).unwrap();
    let reparsed = markdown_to_document(&md);

    let depths: Vec<usize> = reparsed.blocks.iter().map(|b| b.depth).collect();
    assert_eq!(depths, [0, 1]);
}

#[test]
fn test_marker_change_starts_sibling_list() {
    let doc = doc_of(vec![
        Block::new("a", BlockType::UnorderedListItem, "bullet"),
        Block::new("b", BlockType::OrderedListItem, "number"),
    ]);
    let md = document_to_markdown(&doc).unwrap();
    let reparsed = markdown_to_document(&md);

    let types: Vec<BlockType> = reparsed.blocks.iter().map(|b| b.block_type).collect();
    assert_eq!(
        types,
        [BlockType::UnorderedListItem, BlockType::OrderedListItem]
    );
    assert!(md.contains("1.  number"));
}

#[test]
fn test_newline_in_paragraph_renders_hard_break() {
    let doc = doc_of(vec![Block::new(
        "a",
        BlockType::Unstyled,
        "line one\nline two",
    )]);
    let md = document_to_markdown(&doc).unwrap();
    let reparsed = markdown_to_document(&md);

    // One paragraph block, break preserved.
    assert_eq!(reparsed.blocks.len(), 1);
    assert_eq!(reparsed.blocks[0].text, "line one\nline two");
}

#[test]
fn test_newline_in_heading_collapses_to_space() {
    let doc = doc_of(vec![Block::new(
        "a",
        BlockType::HeaderOne,
        "Head\nline",
    )]);
    let md = document_to_markdown(&doc).unwrap();
    assert!(md.starts_with("# Head line"));
}

#[test]
fn test_emphasis_trimmed_to_word_edges() {
    // The bold range covers " bold " including both spaces; delimiters
    // flanked by whitespace would not re-parse as emphasis.
    let mut block = Block::new("a", BlockType::Unstyled, "some bold text");
    block.inline_style_ranges = vec![StyleRange::new(4, 6, InlineStyle::Bold)];
    let md = document_to_markdown(&doc_of(vec![block])).unwrap();
    let reparsed = markdown_to_document(&md);

    assert_eq!(reparsed.blocks[0].text, "some bold text");
    assert_eq!(
        reparsed.blocks[0].inline_style_ranges,
        vec![StyleRange::new(5, 4, InlineStyle::Bold)]
    );
}

#[test]
fn test_interleaved_ranges_reparse_to_same_words() {
    // Crossing bold and italic cannot nest; export splits the italic run
    // into repeated delimiter pairs. Every styled word keeps its styling
    // through a round trip; only the whitespace between the split spans
    // loses the (invisible) italic flag.
    let mut block = Block::new("a", BlockType::Unstyled, "one two three");
    block.inline_style_ranges = vec![
        StyleRange::new(0, 8, InlineStyle::Bold),
        StyleRange::new(4, 9, InlineStyle::Italic),
    ];
    let doc = doc_of(vec![block]);
    let md = document_to_markdown(&doc).unwrap();
    let reparsed = markdown_to_document(&md);

    assert_eq!(reparsed.blocks[0].text, "one two three");
    assert_eq!(
        reparsed.blocks[0].inline_style_ranges,
        vec![
            StyleRange::new(0, 7, InlineStyle::Bold),
            StyleRange::new(4, 3, InlineStyle::Italic),
            StyleRange::new(8, 5, InlineStyle::Italic),
        ]
    );
}

#[test]
fn test_entity_without_url_renders_as_plain_text() {
    let mut block = Block::new("a", BlockType::Unstyled, "not a link");
    block.entity_ranges = vec![EntityRange::new(0, 3, 0)];
    let mut doc = doc_of(vec![block]);
    doc.entity_map.insert(
        0,
        Entity {
            entity_type: draftmark_core::EntityType::Link,
            mutability: draftmark_core::Mutability::Mutable,
            data: Default::default(),
        },
    );

    let md = document_to_markdown(&doc).unwrap();
    assert!(!md.contains('['));
    assert!(md.starts_with("not a link"));
}
