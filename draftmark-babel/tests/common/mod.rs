//! Tests for the flat ranges <-> nested span tree conversion.

use draftmark_babel::common::spans::{
    coalesce_style_ranges, resolve_spans, InlineNode, LinkSpan,
};
use draftmark_core::{InlineStyle, StyleRange};

fn text(s: &str) -> InlineNode {
    InlineNode::Text(s.to_string())
}

fn plain(nodes: &[InlineNode]) -> String {
    nodes.iter().map(InlineNode::plain_text).collect()
}

#[test]
fn test_resolution_preserves_text() {
    let input = "A paragraph with some italic and bold text";
    let styles = vec![
        StyleRange::new(22, 6, InlineStyle::Italic),
        StyleRange::new(33, 4, InlineStyle::Bold),
    ];
    let tree = resolve_spans(input, &styles, &[]);
    assert_eq!(plain(&tree), input);
}

#[test]
fn test_disjoint_ranges_become_sibling_spans() {
    let tree = resolve_spans(
        "one two three",
        &[
            StyleRange::new(0, 3, InlineStyle::Bold),
            StyleRange::new(8, 5, InlineStyle::Italic),
        ],
        &[],
    );
    assert_eq!(
        tree,
        vec![
            InlineNode::Styled(InlineStyle::Bold, vec![text("one")]),
            text(" two "),
            InlineNode::Styled(InlineStyle::Italic, vec![text("three")]),
        ]
    );
}

#[test]
fn test_contained_range_nests() {
    // Bold covers the whole text, italic a middle word.
    let tree = resolve_spans(
        "one two three",
        &[
            StyleRange::new(0, 13, InlineStyle::Bold),
            StyleRange::new(4, 3, InlineStyle::Italic),
        ],
        &[],
    );
    assert_eq!(
        tree,
        vec![InlineNode::Styled(
            InlineStyle::Bold,
            vec![
                text("one "),
                InlineNode::Styled(InlineStyle::Italic, vec![text("two")]),
                text(" three"),
            ]
        )]
    );
}

#[test]
fn test_interleaved_ranges_split_into_delimiter_pairs() {
    // Bold 0..8 and italic 4..13 cross; neither contains the other, so
    // the overlap region is emitted nested and the italic span reopens.
    let tree = resolve_spans(
        "one two three",
        &[
            StyleRange::new(0, 8, InlineStyle::Bold),
            StyleRange::new(4, 9, InlineStyle::Italic),
        ],
        &[],
    );
    assert_eq!(plain(&tree), "one two three");
    assert_eq!(
        tree,
        vec![
            InlineNode::Styled(
                InlineStyle::Bold,
                vec![
                    text("one "),
                    InlineNode::Styled(InlineStyle::Italic, vec![text("two ")]),
                ]
            ),
            InlineNode::Styled(InlineStyle::Italic, vec![text("three")]),
        ]
    );
}

#[test]
fn test_link_wraps_styles_over_same_range() {
    let links = vec![LinkSpan {
        offset: 0,
        length: 4,
        key: 0,
        url: "https://example.com".to_string(),
    }];
    let tree = resolve_spans(
        "docs",
        &[StyleRange::new(0, 4, InlineStyle::Bold)],
        &links,
    );
    assert_eq!(
        tree,
        vec![InlineNode::Link {
            url: "https://example.com".to_string(),
            children: vec![InlineNode::Styled(InlineStyle::Bold, vec![text("docs")])],
        }]
    );
}

#[test]
fn test_coalesce_undoes_delimiter_splitting() {
    // Two touching bold ranges come back as one, which is what re-parsing
    // split delimiter pairs produces.
    let merged = coalesce_style_ranges(&[
        StyleRange::new(0, 4, InlineStyle::Bold),
        StyleRange::new(4, 3, InlineStyle::Bold),
    ]);
    assert_eq!(merged, vec![StyleRange::new(0, 7, InlineStyle::Bold)]);
}
