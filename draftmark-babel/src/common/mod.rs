//! Format-agnostic conversion machinery.
//!
//! The hard part of the flat document model is that inline annotations are
//! arbitrary, possibly overlapping character intervals, while every markup
//! format wants a nested tree. The [`spans`] module owns that conversion in
//! both directions: interval coalescing for parsers, and interval-to-tree
//! resolution for serializers.

pub mod spans;
