//! Question/answer sources and the corpus that merges them.
//!
//! A [`Source`] yields a mapping from question text to answer text. The
//! [`Corpus`] loads an ordered list of sources, skips the ones that fail, and
//! exposes the merged mapping as the unit of search.
//!
//! ```
//! use corpus::Corpus;
//!
//! let corpus = Corpus::from_pairs([
//!     ("What is your name?", "Assistant"),
//!     ("What time is it?", "Unknown"),
//! ]);
//! assert_eq!(corpus.len(), 2);
//! assert_eq!(corpus.answer_for("What time is it?"), Some("Unknown"));
//! ```

mod corpus;
mod csv_source;
mod error;
mod excel_source;
mod http;
mod memory;
mod source;

pub use crate::corpus::{Corpus, LoadReport, SourceFailure};
pub use crate::csv_source::{CsvFileSource, RemoteCsvSource};
pub use crate::error::SourceError;
pub use crate::excel_source::{ExcelFileSource, RemoteExcelSource};
pub use crate::memory::InMemorySource;
pub use crate::source::Source;
