//! CSV-backed sources.
//!
//! Both variants read the same layout: no header row, column 0 is the
//! question and column 1 the answer. Rows with fewer than two columns are
//! skipped and extra columns are ignored.

use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::error::SourceError;
use crate::http;
use crate::source::Source;

/// Parse question/answer pairs out of CSV bytes.
pub(crate) fn parse_pairs<R: Read>(
    reader: R,
    origin: &str,
) -> Result<HashMap<String, String>, SourceError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut pairs = HashMap::new();
    let mut skipped = 0usize;
    for record in rdr.records() {
        let record = record.map_err(|source| SourceError::Csv {
            origin: origin.to_string(),
            source,
        })?;
        match (record.get(0), record.get(1)) {
            (Some(question), Some(answer)) => {
                pairs.insert(question.to_string(), answer.to_string());
            }
            _ => skipped += 1,
        }
    }

    if skipped > 0 {
        debug!(origin, skipped, "csv_short_rows_skipped");
    }
    Ok(pairs)
}

/// CSV file on the local filesystem.
#[derive(Debug, Clone)]
pub struct CsvFileSource {
    path: PathBuf,
    name: String,
    questions: HashMap<String, String>,
}

impl CsvFileSource {
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
impl Source for CsvFileSource {
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
        self.questions = parse_pairs(bytes.as_slice(), &self.name)?;
        Ok(())
    }

    fn all_questions(&self) -> &HashMap<String, String> {
        &self.questions
    }
}

/// CSV file fetched over HTTP(S) with a GET request.
///
/// Any status other than `200 OK` is a load failure.
#[derive(Debug, Clone)]
pub struct RemoteCsvSource {
    url: String,
    client: reqwest::Client,
    questions: HashMap<String, String>,
}

impl RemoteCsvSource {
    /// Remote source with a dedicated client and a 30 second request timeout.
    pub fn new(url: impl Into<String>) -> Result<Self, SourceError> {
        let url = url.into();
        let client = http::default_client(&url)?;
        Ok(Self::with_client(url, client))
    }

    /// Remote source sharing an existing client.
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
impl Source for RemoteCsvSource {
    fn name(&self) -> &str {
        &self.url
    }

    async fn load_questions(&mut self) -> Result<(), SourceError> {
        let body = http::fetch(&self.client, &self.url).await?;
        self.questions = parse_pairs(body.as_slice(), &self.url)?;
        Ok(())
    }

    fn all_questions(&self) -> &HashMap<String, String> {
        &self.questions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn write_csv(content: &[u8]) -> tempfile::NamedTempFile {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), content).unwrap();
        file
    }

    /// Serve a single HTTP response on an ephemeral port and return its URL.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 2048];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });
        format!("http://{addr}/faq.csv")
    }

    #[test]
    fn parse_skips_short_rows_and_extra_columns() {
        let csv = "What is your name?,Assistant\nlonely\nOpening hours,9 to 5,ignored\n";
        let pairs = parse_pairs(csv.as_bytes(), "inline").unwrap();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs["What is your name?"], "Assistant");
        assert_eq!(pairs["Opening hours"], "9 to 5");
    }

    #[test]
    fn parse_handles_quoted_fields_and_thai() {
        let csv = "\"Where, exactly?\",\"Bangkok, Thailand\"\nคุณชื่ออะไร,ผู้ช่วย\n";
        let pairs = parse_pairs(csv.as_bytes(), "inline").unwrap();
        assert_eq!(pairs["Where, exactly?"], "Bangkok, Thailand");
        assert_eq!(pairs["คุณชื่ออะไร"], "ผู้ช่วย");
    }

    #[test]
    fn parse_rejects_invalid_utf8() {
        let err = parse_pairs(&[0xff, 0xfe, b',', b'a', b'\n'][..], "bad").unwrap_err();
        assert!(matches!(err, SourceError::Csv { .. }));
    }

    #[tokio::test]
    async fn file_source_loads_and_reloads_idempotently() {
        let file = write_csv(b"q1,a1\nq2,a2\n");
        let mut source = CsvFileSource::new(file.path());
        source.load_questions().await.unwrap();
        let first = source.all_questions().clone();
        source.load_questions().await.unwrap();
        assert_eq!(&first, source.all_questions());
        assert_eq!(first.len(), 2);
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = CsvFileSource::new(dir.path().join("absent.csv"));
        let err = source.load_questions().await.unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));
        assert!(source.all_questions().is_empty());
    }

    #[tokio::test]
    async fn remote_source_reads_body_on_200() {
        let url = serve_once("200 OK", "What time is it?,Unknown\n").await;
        let mut source = RemoteCsvSource::new(url).unwrap();
        source.load_questions().await.unwrap();
        assert_eq!(source.find_answer("time"), Some("Unknown"));
    }

    #[tokio::test]
    async fn remote_source_rejects_non_200() {
        let url = serve_once("404 Not Found", "").await;
        let mut source = RemoteCsvSource::new(url).unwrap();
        let err = source.load_questions().await.unwrap_err();
        assert!(matches!(err, SourceError::Status { status: 404, .. }));
    }
}
