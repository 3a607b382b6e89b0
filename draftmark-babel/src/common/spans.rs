//! Overlap resolution for inline annotation ranges.
//!
//! # The High-Level Concept
//!
//! Style and entity ranges are flat intervals over a block's text and may
//! overlap arbitrarily (bold over italic, a link crossing a bold boundary).
//! Markup delimiters, on the other hand, must nest. The resolver splits the
//! text at every interval boundary and rebuilds a well-nested span tree,
//! force-closing and reopening annotations where intervals genuinely
//! interleave. Interleaved input therefore comes out as repeated delimiter
//! pairs; the output is not always minimal, but it always re-parses to the
//! same annotation set.
//!
//! # The Algorithm
//!
//! 1. Collect all interval boundaries (plus 0 and the text length) into a
//!    sorted cut list; consecutive cuts delimit segments over which the
//!    active annotation set is constant.
//! 2. Walk the segments with a stack of open spans. For each segment:
//!    - keep the longest stack prefix whose annotations are still active,
//!      close everything above it (innermost first),
//!    - open the missing annotations, longest-running first so that spans
//!      ending later sit outermost,
//!    - append the segment text to the innermost open span.
//! 3. Close whatever remains open at the end of the text.
//!
//! Code spans are the one special case: markdown recognizes nothing inside
//! backticks, so a code span can never contain another span. Whenever a new
//! annotation has to open while a code span is on the stack, the code span
//! is closed first and reopened innermost.
//!
//! The inverse direction lives here too: [`coalesce_style_ranges`] and
//! [`coalesce_entity_ranges`] merge touching or overlapping intervals of
//! the same annotation, restoring the minimal interval set after a parse of
//! split-up delimiters.

use draftmark_core::{EntityRange, InlineStyle, StyleRange};

/// A link annotation with its entity's target resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSpan {
    pub offset: usize,
    pub length: usize,
    pub key: u32,
    pub url: String,
}

impl LinkSpan {
    pub fn end(&self) -> usize {
        self.offset + self.length
    }
}

/// Nested inline content produced by resolving flat ranges.
#[derive(Debug, Clone, PartialEq)]
pub enum InlineNode {
    Text(String),
    Styled(InlineStyle, Vec<InlineNode>),
    Link { url: String, children: Vec<InlineNode> },
}

impl InlineNode {
    /// The plain text under this node, annotations stripped.
    pub fn plain_text(&self) -> String {
        match self {
            InlineNode::Text(text) => text.clone(),
            InlineNode::Styled(_, children) | InlineNode::Link { children, .. } => {
                children.iter().map(InlineNode::plain_text).collect()
            }
        }
    }
}

/// One annotation layer during resolution.
#[derive(Debug, Clone, PartialEq)]
enum Annotation {
    Style(InlineStyle),
    Link { key: u32, url: String },
}

impl Annotation {
    fn is_code(&self) -> bool {
        matches!(self, Annotation::Style(InlineStyle::Code))
    }

    /// Opening order among annotations starting at the same cut with equal
    /// run length: links outermost, then bold, italic, code.
    fn open_rank(&self) -> u8 {
        match self {
            Annotation::Link { .. } => 0,
            Annotation::Style(InlineStyle::Bold) => 1,
            Annotation::Style(InlineStyle::Italic) => 2,
            Annotation::Style(InlineStyle::Code) => 3,
        }
    }
}

struct Interval {
    start: usize,
    end: usize,
    annotation: Annotation,
}

struct Frame {
    annotation: Annotation,
    children: Vec<InlineNode>,
}

/// Resolve flat style and link intervals over `text` into a span tree.
///
/// Style ranges should already be coalesced (disjoint per style); offsets
/// are in characters and are clamped to the text length.
pub fn resolve_spans(text: &str, styles: &[StyleRange], links: &[LinkSpan]) -> Vec<InlineNode> {
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();

    let mut intervals = Vec::new();
    for range in styles {
        let end = range.end().min(len);
        if range.offset < end {
            intervals.push(Interval {
                start: range.offset,
                end,
                annotation: Annotation::Style(range.style),
            });
        }
    }
    for link in links {
        let end = link.end().min(len);
        if link.offset < end {
            intervals.push(Interval {
                start: link.offset,
                end,
                annotation: Annotation::Link {
                    key: link.key,
                    url: link.url.clone(),
                },
            });
        }
    }

    let mut cuts: Vec<usize> = intervals
        .iter()
        .flat_map(|iv| [iv.start, iv.end])
        .chain([0, len])
        .collect();
    cuts.sort_unstable();
    cuts.dedup();

    let mut root: Vec<InlineNode> = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();

    for window in cuts.windows(2) {
        let (start, end) = (window[0], window[1]);

        // Annotations covering this whole segment, with how far each runs.
        let desired: Vec<(Annotation, usize)> = intervals
            .iter()
            .filter(|iv| iv.start <= start && end <= iv.end)
            .map(|iv| (iv.annotation.clone(), iv.end))
            .collect();

        let mut keep = 0;
        while keep < stack.len() && desired.iter().any(|(ann, _)| *ann == stack[keep].annotation) {
            keep += 1;
        }

        let needs_open = desired
            .iter()
            .any(|(ann, _)| !stack[..keep].iter().any(|f| f.annotation == *ann));
        if needs_open {
            // Nothing may open inside a code span; reopen it innermost.
            if let Some(code_idx) = stack[..keep].iter().position(|f| f.annotation.is_code()) {
                keep = keep.min(code_idx);
            }
        }

        while stack.len() > keep {
            close_top(&mut stack, &mut root);
        }

        let mut to_open: Vec<(Annotation, usize)> = desired
            .into_iter()
            .filter(|(ann, _)| !stack.iter().any(|f| f.annotation == *ann))
            .collect();
        to_open.sort_by_key(|(ann, run_end)| {
            (ann.is_code(), std::cmp::Reverse(*run_end), ann.open_rank())
        });
        for (annotation, _) in to_open {
            stack.push(Frame {
                annotation,
                children: Vec::new(),
            });
        }

        let segment: String = chars[start..end].iter().collect();
        push_node(&mut stack, &mut root, InlineNode::Text(segment));
    }

    while !stack.is_empty() {
        close_top(&mut stack, &mut root);
    }

    root
}

fn close_top(stack: &mut Vec<Frame>, root: &mut Vec<InlineNode>) {
    let frame = stack.pop().expect("a frame to close");
    let node = match frame.annotation {
        Annotation::Style(style) => InlineNode::Styled(style, frame.children),
        Annotation::Link { url, .. } => InlineNode::Link {
            url,
            children: frame.children,
        },
    };
    push_node(stack, root, node);
}

fn push_node(stack: &mut Vec<Frame>, root: &mut Vec<InlineNode>, node: InlineNode) {
    let target = match stack.last_mut() {
        Some(frame) => &mut frame.children,
        None => root,
    };
    if let InlineNode::Text(text) = &node {
        if let Some(InlineNode::Text(prev)) = target.last_mut() {
            prev.push_str(text);
            return;
        }
    }
    target.push(node);
}

/// Merge touching or overlapping ranges of the same style into one.
/// Zero-length ranges are dropped; the result is sorted by offset.
pub fn coalesce_style_ranges(ranges: &[StyleRange]) -> Vec<StyleRange> {
    let mut sorted: Vec<StyleRange> = ranges.iter().copied().filter(|r| r.length > 0).collect();
    sorted.sort_by_key(|r| (r.style, r.offset, r.length));

    let mut merged: Vec<StyleRange> = Vec::new();
    for range in sorted {
        match merged.last_mut() {
            Some(prev) if prev.style == range.style && range.offset <= prev.end() => {
                let end = prev.end().max(range.end());
                prev.length = end - prev.offset;
            }
            _ => merged.push(range),
        }
    }

    merged.sort_by_key(|r| (r.offset, r.end(), r.style));
    merged
}

/// Merge touching or overlapping ranges referencing the same entity.
/// Zero-length ranges are dropped; the result is sorted by offset.
pub fn coalesce_entity_ranges(ranges: &[EntityRange]) -> Vec<EntityRange> {
    let mut sorted: Vec<EntityRange> = ranges.iter().copied().filter(|r| r.length > 0).collect();
    sorted.sort_by_key(|r| (r.key, r.offset, r.length));

    let mut merged: Vec<EntityRange> = Vec::new();
    for range in sorted {
        match merged.last_mut() {
            Some(prev) if prev.key == range.key && range.offset <= prev.end() => {
                let end = prev.end().max(range.end());
                prev.length = end - prev.offset;
            }
            _ => merged.push(range),
        }
    }

    merged.sort_by_key(|r| (r.offset, r.end(), r.key));
    merged
}

/// Shrink emphasis ranges so their delimiters land against non-whitespace.
///
/// `**bold **` is not strong emphasis under CommonMark's flanking rules, so
/// whitespace at the edges of a bold or italic range is emitted as plain
/// text instead. Code ranges keep their whitespace verbatim. Ranges that
/// shrink to nothing are dropped.
pub fn trim_emphasis_ranges(text: &str, ranges: Vec<StyleRange>) -> Vec<StyleRange> {
    let chars: Vec<char> = text.chars().collect();
    ranges
        .into_iter()
        .filter_map(|range| {
            if range.style == InlineStyle::Code {
                return Some(range);
            }
            let mut start = range.offset.min(chars.len());
            let mut end = range.end().min(chars.len());
            while start < end && chars[start].is_whitespace() {
                start += 1;
            }
            while end > start && chars[end - 1].is_whitespace() {
                end -= 1;
            }
            if start < end {
                Some(StyleRange::new(start, end - start, range.style))
            } else {
                None
            }
        })
        .collect()
}

/// Move whitespace at the edges of emphasis spans out of the span.
///
/// Splitting interleaved ranges can leave a reopened span that starts or
/// ends on whitespace even after [`trim_emphasis_ranges`], and emphasis
/// delimiters against whitespace do not re-parse. Code spans keep their
/// edges verbatim; links tolerate edge whitespace and are only recursed
/// into.
pub fn hoist_edge_whitespace(nodes: Vec<InlineNode>) -> Vec<InlineNode> {
    let mut out: Vec<InlineNode> = Vec::new();
    for node in nodes {
        match node {
            InlineNode::Styled(style, children) if style != InlineStyle::Code => {
                let mut children = hoist_edge_whitespace(children);
                let mut lead = String::new();
                let mut trail = String::new();

                if let Some(InlineNode::Text(first)) = children.first_mut() {
                    let cut = first.len() - first.trim_start().len();
                    if cut > 0 {
                        lead = first.drain(..cut).collect();
                    }
                }
                if matches!(children.first(), Some(InlineNode::Text(t)) if t.is_empty()) {
                    children.remove(0);
                }
                if let Some(InlineNode::Text(last)) = children.last_mut() {
                    let keep = last.trim_end().len();
                    if keep < last.len() {
                        trail = last.split_off(keep);
                    }
                }
                if matches!(children.last(), Some(InlineNode::Text(t)) if t.is_empty()) {
                    children.pop();
                }

                if !lead.is_empty() {
                    push_sibling(&mut out, InlineNode::Text(lead));
                }
                if !children.is_empty() {
                    out.push(InlineNode::Styled(style, children));
                }
                if !trail.is_empty() {
                    push_sibling(&mut out, InlineNode::Text(trail));
                }
            }
            InlineNode::Link { url, children } => {
                out.push(InlineNode::Link {
                    url,
                    children: hoist_edge_whitespace(children),
                });
            }
            other => push_sibling(&mut out, other),
        }
    }
    out
}

fn push_sibling(nodes: &mut Vec<InlineNode>, node: InlineNode) {
    if let InlineNode::Text(text) = &node {
        if let Some(InlineNode::Text(prev)) = nodes.last_mut() {
            prev.push_str(text);
            return;
        }
    }
    nodes.push(node);
}
