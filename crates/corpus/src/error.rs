use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures raised while a source produces its question/answer pairs.
///
/// A failing source is logged and skipped by [`Corpus::load_all`](crate::Corpus::load_all);
/// it never aborts the aggregation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SourceError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed csv from {origin}: {source}")]
    Csv {
        origin: String,
        #[source]
        source: csv::Error,
    },

    #[error("unreadable spreadsheet {origin}: {source}")]
    Spreadsheet {
        origin: String,
        #[source]
        source: calamine::Error,
    },

    #[error("spreadsheet {origin} has no worksheets")]
    EmptyWorkbook { origin: String },

    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected status {status} from {url}")]
    Status { url: String, status: u16 },
}
