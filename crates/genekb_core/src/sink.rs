//! Append-only persistence for reports and knowledge files.
//!
//! # Responsibility
//! - Create the target directory on demand.
//! - Write a one-time header when the target is absent or empty.
//! - Append content without touching anything already in the file.
//!
//! # Invariants
//! - Files are only ever opened in append mode; nothing is truncated.
//! - Existing content is never read; only existence and size are checked.
//! - A failed write is not rolled back.

use crate::report::default_header;
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Title of the comment header written at the top of knowledge files.
pub const KNOWLEDGE_TITLE: &str = "GENE KNOWLEDGE BASE";

/// Outcome of one successful append.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppendAck {
    pub path: PathBuf,
    /// Whether this append wrote the file header.
    pub wrote_header: bool,
    /// Bytes written, header included.
    pub bytes_written: usize,
}

/// Persistence failures, tagged with the path involved.
#[derive(Debug)]
pub enum SinkError {
    CreateDir { path: PathBuf, source: io::Error },
    Open { path: PathBuf, source: io::Error },
    Write { path: PathBuf, source: io::Error },
}

impl Display for SinkError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CreateDir { path, source } => {
                write!(f, "failed to create directory `{}`: {source}", path.display())
            }
            Self::Open { path, source } => {
                write!(f, "failed to open `{}` for append: {source}", path.display())
            }
            Self::Write { path, source } => {
                write!(f, "failed to write `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for SinkError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CreateDir { source, .. } | Self::Open { source, .. } | Self::Write { source, .. } => {
                Some(source)
            }
        }
    }
}

/// Appends `content` to `path`, writing `header` first on a fresh target.
///
/// # Errors
/// - `SinkError::CreateDir` when the parent directory cannot be created.
/// - `SinkError::Open`/`SinkError::Write` on file failures.
pub fn append_with_header(path: &Path, header: &str, content: &str) -> Result<AppendAck, SinkError> {
    let result = append_inner(path, header, content);
    match &result {
        Ok(ack) => info!(
            "event=sink_append module=sink status=ok path={} header={} bytes={}",
            ack.path.display(),
            ack.wrote_header,
            ack.bytes_written
        ),
        Err(err) => error!(
            "event=sink_append module=sink status=error path={} error={}",
            path.display(),
            err
        ),
    }
    result
}

fn append_inner(path: &Path, header: &str, content: &str) -> Result<AppendAck, SinkError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| SinkError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let write_header = needs_header(path);
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| SinkError::Open {
            path: path.to_path_buf(),
            source,
        })?;

    let mut bytes_written = 0;
    if write_header {
        write_chunk(&mut file, path, header)?;
        bytes_written += header.len();
    }
    write_chunk(&mut file, path, content)?;
    bytes_written += content.len();

    Ok(AppendAck {
        path: path.to_path_buf(),
        wrote_header: write_header,
        bytes_written,
    })
}

fn needs_header(path: &Path) -> bool {
    fs::metadata(path).map_or(true, |meta| meta.len() == 0)
}

fn write_chunk(file: &mut fs::File, path: &Path, chunk: &str) -> Result<(), SinkError> {
    file.write_all(chunk.as_bytes())
        .map_err(|source| SinkError::Write {
            path: path.to_path_buf(),
            source,
        })
}

/// Appends a report block to `<dir>/<file_name>` under the report header.
pub fn append_report(dir: &Path, file_name: &str, content: &str) -> Result<AppendAck, SinkError> {
    append_with_header(&dir.join(file_name), &default_header(), content)
}

/// Appends relation text to `<dir>/<file_name>` under a comment header.
pub fn append_knowledge(
    dir: &Path,
    file_name: &str,
    content: &str,
) -> Result<AppendAck, SinkError> {
    append_with_header(&dir.join(file_name), &knowledge_header(), content)
}

/// Comment header for knowledge files; ignored by expression readers.
pub fn knowledge_header() -> String {
    format!("; {KNOWLEDGE_TITLE}\n\n")
}

#[cfg(test)]
mod tests {
    use super::{append_with_header, knowledge_header, SinkError};
    use crate::model::expr::parse_nodes;
    use std::fs;

    #[test]
    fn creates_nested_directories() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("a").join("b").join("out.txt");
        let ack = append_with_header(&path, "H\n", "body").expect("append succeeds");
        assert!(ack.wrote_header);
        assert_eq!(ack.bytes_written, 6);
        assert_eq!(fs::read_to_string(&path).expect("read back"), "H\nbody");
    }

    #[test]
    fn empty_existing_file_still_gets_header() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("empty.txt");
        fs::write(&path, "").expect("create empty file");
        let ack = append_with_header(&path, "H\n", "x").expect("append succeeds");
        assert!(ack.wrote_header);
        assert_eq!(fs::read_to_string(&path).expect("read back"), "H\nx");
    }

    #[test]
    fn reports_directory_failure_as_value() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").expect("create blocker file");
        let err = append_with_header(&blocker.join("out.txt"), "H", "x")
            .expect_err("parent is a file");
        assert!(matches!(err, SinkError::CreateDir { .. }));
        assert!(err.to_string().contains("failed to create directory"));
    }

    #[test]
    fn knowledge_header_is_a_comment() {
        let nodes = parse_nodes(&knowledge_header()).expect("header parses");
        assert!(nodes.is_empty());
    }
}
