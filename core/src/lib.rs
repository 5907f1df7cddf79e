//! In-memory inverted index with postfix Boolean retrieval and
//! document-frequency reports.
//!
//! The index has two phases: it is built by a sequential fold of
//! [`InvertedIndex::add_document`] calls, then queried read-only. Queries and
//! frequency reports borrow the index immutably and may run from several
//! threads at once; interleaving them with `add_document` is not supported.

pub mod error;
pub mod index;
pub mod ingest;
pub mod postings;
pub mod query;
pub mod ranking;
pub mod tokenizer;

pub use error::{Error, QueryFault, Result};
pub use index::InvertedIndex;
pub use ingest::Document;
pub use query::{BooleanQuery, Operator, QueryEngine};
pub use ranking::{FrequencyRanker, FrequencyReport, TermFrequency};

/// Dense, zero-based document id assigned in arrival order.
pub type DocId = u32;
