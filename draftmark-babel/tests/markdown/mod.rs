//! Markdown format tests
//!
//! Tests for bidirectional Markdown ↔ Document conversion.

mod export;
mod roundtrip;
