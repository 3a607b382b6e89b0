//! Round-trip tests: export followed by import reaches a fixpoint.
//!
//! Keys are regenerated on every parse, so documents are compared by
//! block shape. The strong property is on the Markdown side: rendering
//! the re-parsed document must reproduce the first rendering exactly.

use draftmark_babel::{document_to_markdown, markdown_to_document};
use draftmark_core::{Block, BlockType, Document, InlineStyle, StyleRange};
use proptest::prelude::*;

fn rerender(doc: &Document) -> (String, String) {
    let md = document_to_markdown(doc).unwrap();
    let reparsed = markdown_to_document(&md);
    let md_again = document_to_markdown(&reparsed).unwrap();
    (md, md_again)
}

#[test]
fn test_markdown_fixpoint_for_mixed_blocks() {
    let mut styled = Block::new("a", BlockType::Unstyled, "plain bold plain");
    styled.inline_style_ranges = vec![StyleRange::new(6, 4, InlineStyle::Bold)];

    let mut code = Block::new("e", BlockType::CodeBlock, "fn main() {}");
    code.data.insert("language".to_string(), "rust".to_string());

    let mut doc = Document::new();
    doc.blocks = vec![
        styled,
        Block::new("b", BlockType::HeaderTwo, "Section"),
        Block::new("c", BlockType::Blockquote, "quoted"),
        Block::new("d", BlockType::UnorderedListItem, "item"),
        code,
    ];

    let (md, md_again) = rerender(&doc);
    assert_eq!(md, md_again);
}

#[test]
fn test_markdown_fixpoint_for_interleaved_styles() {
    // The first render splits the crossing ranges; from then on the
    // conversion is stable.
    let mut block = Block::new("a", BlockType::Unstyled, "one two three");
    block.inline_style_ranges = vec![
        StyleRange::new(0, 8, InlineStyle::Bold),
        StyleRange::new(4, 9, InlineStyle::Italic),
    ];
    let mut doc = Document::new();
    doc.blocks = vec![block];

    let (md, md_again) = rerender(&doc);
    assert_eq!(md, md_again);
}

#[test]
fn test_parse_render_parse_preserves_block_shape() {
    let md = "# Title\n\nSome *styled* and **bold** text with `code`.\n\n- a\n- b\n";
    let first = markdown_to_document(md);
    let second = markdown_to_document(&document_to_markdown(&first).unwrap());

    let shape = |doc: &Document| {
        doc.blocks
            .iter()
            .map(|b| {
                (
                    b.block_type,
                    b.text.clone(),
                    b.depth,
                    b.inline_style_ranges.clone(),
                )
            })
            .collect::<Vec<_>>()
    };
    assert_eq!(shape(&first), shape(&second));
}

prop_compose! {
    /// Space-separated lowercase words, no markdown metacharacters.
    fn word_text()(words in prop::collection::vec("[a-z]{1,8}", 1..6)) -> String {
        words.join(" ")
    }
}

proptest! {
    #[test]
    fn roundtrip_plain_paragraphs(texts in prop::collection::vec(word_text(), 1..5)) {
        let mut doc = Document::new();
        for (i, text) in texts.iter().enumerate() {
            doc.blocks.push(Block::new(format!("k{i}"), BlockType::Unstyled, text.clone()));
        }

        let md = document_to_markdown(&doc).unwrap();
        let reparsed = markdown_to_document(&md);

        let texts_again: Vec<String> = reparsed.blocks.iter().map(|b| b.text.clone()).collect();
        prop_assert_eq!(&texts_again, &texts);
        prop_assert_eq!(document_to_markdown(&reparsed).unwrap(), md);
    }

    #[test]
    fn roundtrip_bold_first_word(text in word_text()) {
        let first_word = text.split(' ').next().unwrap().to_string();
        let mut block = Block::new("k0", BlockType::Unstyled, text.clone());
        block.inline_style_ranges =
            vec![StyleRange::new(0, first_word.chars().count(), InlineStyle::Bold)];
        let mut doc = Document::new();
        doc.blocks = vec![block];

        let md = document_to_markdown(&doc).unwrap();
        let reparsed = markdown_to_document(&md);

        prop_assert_eq!(&reparsed.blocks[0].text, &text);
        prop_assert_eq!(
            &reparsed.blocks[0].inline_style_ranges,
            &doc.blocks[0].inline_style_ranges
        );
    }
}
