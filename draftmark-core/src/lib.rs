//! Core document model for the draftmark toolchain.
//!
//! A [`Document`] is a flat, ordered sequence of [`Block`]s plus a map of
//! shared [`Entity`] records. Styling never lives in the text itself: each
//! block carries plain text and a set of character ranges
//! ([`StyleRange`] / [`EntityRange`]) that annotate it. Offsets and lengths
//! are counted in Unicode scalar values, not bytes.
//!
//! The model is deliberately behavior-free: construction, structural
//! queries, and invariant validation only. All conversion logic (Markdown
//! in particular) lives in draftmark-babel.
//!
//! Documents are per-call values. Both conversion pipelines build a fresh
//! `Document` and discard it after use; nothing in this crate holds state
//! between calls.

pub mod document;
pub mod keys;
pub mod validate;

pub use document::{
    Block, BlockData, BlockType, Document, Entity, EntityData, EntityRange, EntityType,
    InlineStyle, Mutability, StyleRange,
};
pub use keys::KeySequence;
pub use validate::ValidationError;
