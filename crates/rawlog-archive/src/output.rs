//! Output filenames and raw file emission.

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs::{self, File};
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};

use crate::TRACING_TARGET_OUTPUT;
use crate::error::{Error, Result, WriteError};
use crate::key::ParsedKey;

/// Extension of every extracted file.
pub const RAW_EXTENSION: &str = "raw";

impl ParsedKey {
    /// Deterministic output name:
    /// `<origin>_<tags>_<epoch seconds>_<segment id>`.
    ///
    /// An empty tag set leaves a doubled `_` after the origin.
    pub fn filename(&self) -> String {
        format!(
            "{}_{}_{}_{}",
            self.origin(),
            self.tags(),
            self.timestamp().as_second(),
            self.segment_id()
        )
    }

    pub fn filename_with_ext(&self, ext: &str) -> String {
        format!("{}.{ext}", self.filename())
    }
}

/// A file produced for one object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    pub path: PathBuf,
    /// Number of lines written.
    pub lines: usize,
    /// Number of bytes written, newlines included.
    pub bytes: u64,
}

/// Writes extracted lines into `<dir>/<filename>.raw`.
#[derive(Debug, Clone)]
pub struct OutputWriter {
    dir: PathBuf,
}

impl OutputWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Creates the output directory and its parents if missing.
    pub async fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| Error::OutputDir {
                path: self.dir.clone(),
                source,
            })
    }

    /// Destination path for `key`.
    pub fn path_for(&self, key: &ParsedKey) -> PathBuf {
        self.dir.join(key.filename_with_ext(RAW_EXTENSION))
    }

    /// Writes `lines`, each followed by `\n`, to a freshly truncated file.
    ///
    /// The file handle lives only for the duration of this call. If writing
    /// fails after the file was created, the partial file is removed.
    pub async fn write(&self, key: &ParsedKey, lines: &[String]) -> Result<WrittenFile, WriteError> {
        let path = self.path_for(key);

        let file = match File::create(&path).await {
            Ok(file) => file,
            Err(source) => return Err(WriteError { path, source }),
        };

        self.write_to(path, file, lines).await
    }

    /// Drains `lines` into `sink`, which backs the already created `path`.
    async fn write_to<W>(&self, path: PathBuf, sink: W, lines: &[String]) -> Result<WrittenFile, WriteError>
    where
        W: AsyncWrite + Unpin,
    {
        match write_lines(sink, lines).await {
            Ok(bytes) => Ok(WrittenFile {
                path,
                lines: lines.len(),
                bytes,
            }),
            Err(source) => {
                if let Err(error) = fs::remove_file(&path).await {
                    tracing::debug!(
                        target: TRACING_TARGET_OUTPUT,
                        path = %path.display(),
                        error = %error,
                        "could not remove partial output"
                    );
                }
                Err(WriteError { path, source })
            }
        }
    }
}

/// Consumes `sink` so it is closed before any cleanup.
async fn write_lines<W>(sink: W, lines: &[String]) -> io::Result<u64>
where
    W: AsyncWrite + Unpin,
{
    let mut writer = BufWriter::new(sink);
    let mut bytes = 0u64;

    for line in lines {
        writer.write_all(line.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        bytes += line.len() as u64 + 1;
    }

    writer.flush().await?;
    Ok(bytes)
}
