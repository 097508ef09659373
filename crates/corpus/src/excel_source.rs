//! Excel-backed sources.
//!
//! Only the first worksheet is read. Column A is the question and column B
//! the answer; rows whose answer cell is missing are skipped. Any workbook
//! format calamine detects (xlsx, xlsm, xls, ods) is accepted.

use std::collections::HashMap;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use tracing::debug;

use crate::error::SourceError;
use crate::http;
use crate::source::Source;

/// Parse question/answer pairs out of workbook bytes.
pub(crate) fn parse_workbook(
    bytes: Vec<u8>,
    origin: &str,
) -> Result<HashMap<String, String>, SourceError> {
    let spreadsheet_err = |source| SourceError::Spreadsheet {
        origin: origin.to_string(),
        source,
    };

    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(spreadsheet_err)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| SourceError::EmptyWorkbook {
            origin: origin.to_string(),
        })?
        .map_err(spreadsheet_err)?;

    Ok(pairs_from_range(&range, origin))
}

fn pairs_from_range(range: &Range<Data>, origin: &str) -> HashMap<String, String> {
    // A range starts at its first used cell, so an empty column A shifts it.
    let first_col = range.start().map_or(0, |(_, col)| col as usize);
    let cell = |row: &[Data], col: usize| -> String {
        match col.checked_sub(first_col).and_then(|idx| row.get(idx)) {
            None | Some(Data::Empty) => String::new(),
            Some(data) => data.to_string(),
        }
    };

    let mut pairs = HashMap::new();
    let mut skipped = 0usize;
    for row in range.rows() {
        // Trailing blanks don't count, so a row needs a used cell past column A.
        let reaches_answer = row
            .iter()
            .enumerate()
            .any(|(idx, data)| idx + first_col >= 1 && !matches!(data, Data::Empty));
        if !reaches_answer {
            skipped += 1;
            continue;
        }
        pairs.insert(cell(row, 0), cell(row, 1));
    }

    if skipped > 0 {
        debug!(origin, skipped, "excel_short_rows_skipped");
    }
    pairs
}

/// Excel workbook on the local filesystem.
#[derive(Debug, Clone)]
pub struct ExcelFileSource {
    path: PathBuf,
    name: String,
    questions: HashMap<String, String>,
}

impl ExcelFileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        Self {
            name: path.display().to_string(),
            path,
            questions: HashMap::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl Source for ExcelFileSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn load_questions(&mut self) -> Result<(), SourceError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| SourceError::Io {
                path: self.path.clone(),
                source,
            })?;
        self.questions = parse_workbook(bytes, &self.name)?;
        Ok(())
    }

    fn all_questions(&self) -> &HashMap<String, String> {
        &self.questions
    }
}

/// Excel workbook fetched over HTTP(S). Non-200 responses fail the load.
#[derive(Debug, Clone)]
pub struct RemoteExcelSource {
    url: String,
    client: reqwest::Client,
    questions: HashMap<String, String>,
}

impl RemoteExcelSource {
    pub fn new(url: impl Into<String>) -> Result<Self, SourceError> {
        let url = url.into();
        let client = http::default_client(&url)?;
        Ok(Self::with_client(url, client))
    }

    pub fn with_client(url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            url: url.into(),
            client,
            questions: HashMap::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Source for RemoteExcelSource {
    fn name(&self) -> &str {
        &self.url
    }

    async fn load_questions(&mut self) -> Result<(), SourceError> {
        let body = http::fetch(&self.client, &self.url).await?;
        self.questions = parse_workbook(body, &self.url)?;
        Ok(())
    }

    fn all_questions(&self) -> &HashMap<String, String> {
        &self.questions
    }
}
