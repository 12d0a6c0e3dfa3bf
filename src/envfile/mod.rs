//! Flat `KEY=value` configuration documents.
//!
//! One file may host several unrelated sections, so edits touch a single
//! line and leave every other byte alone.

pub mod document;
pub mod upsert;

pub use document::{FileDocument, KvDocument};
pub use upsert::{append_line, parse, upsert};
