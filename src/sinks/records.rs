use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::sync::Mutex;

use crate::domain::OutcomeRecord;
use crate::error::{AppError, AppResult, SinkError};

/// Durable, line-oriented sink for outcome records.
///
/// Every append serializes the record up front and then writes and flushes
/// the whole line while holding the lock, so lines from concurrent workers
/// never interleave. Request execution itself is never serialized.
#[derive(Debug)]
pub struct RecordSink {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
    written: AtomicU64,
}

impl RecordSink {
    /// Creates (or truncates) the record stream at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be created.
    pub async fn create(path: &Path) -> AppResult<Self> {
        let file = File::create(path).await.map_err(|err| {
            AppError::sink(SinkError::Create {
                path: path.to_path_buf(),
                source: err,
            })
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: Mutex::new(BufWriter::new(file)),
            written: AtomicU64::new(0),
        })
    }

    /// Appends one record as a single JSON line.
    ///
    /// # Errors
    ///
    /// Returns an error when the record cannot be serialized or written.
    pub async fn append(&self, record: &OutcomeRecord) -> AppResult<()> {
        let mut line = serde_json::to_vec(record)
            .map_err(|err| AppError::sink(SinkError::Serialize { source: err }))?;
        line.push(b'\n');

        let mut writer = self.writer.lock().await;
        writer
            .write_all(&line)
            .await
            .map_err(|err| self.write_error(err))?;
        writer.flush().await.map_err(|err| self.write_error(err))?;
        drop(writer);

        self.written.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Flushes buffered bytes and syncs the file to disk.
    ///
    /// # Errors
    ///
    /// Returns an error when the flush or sync fails.
    pub async fn finish(&self) -> AppResult<()> {
        let mut writer = self.writer.lock().await;
        writer.flush().await.map_err(|err| self.write_error(err))?;
        writer
            .get_mut()
            .sync_all()
            .await
            .map_err(|err| self.write_error(err))
    }

    #[must_use]
    pub fn written(&self) -> u64 {
        self.written.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_error(&self, err: std::io::Error) -> AppError {
        AppError::sink(SinkError::Write {
            path: self.path.clone(),
            source: err,
        })
    }
}

/// Reads every record back from a stream written by [`RecordSink`].
///
/// Blank lines are skipped; a malformed line is an error.
///
/// # Errors
///
/// Returns an error when the file cannot be read or a line fails to parse.
pub async fn read_records(path: &Path) -> AppResult<Vec<OutcomeRecord>> {
    let read_error = |err: std::io::Error| {
        AppError::sink(SinkError::Read {
            path: path.to_path_buf(),
            source: err,
        })
    };
    let file = File::open(path).await.map_err(read_error)?;
    let mut lines = BufReader::new(file).lines();
    let mut records = Vec::new();
    let mut line_number: usize = 0;
    while let Some(line) = lines.next_line().await.map_err(read_error)? {
        line_number = line_number.saturating_add(1);
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line).map_err(|err| {
            AppError::sink(SinkError::Parse {
                path: path.to_path_buf(),
                line: line_number,
                source: err,
            })
        })?;
        records.push(record);
    }
    Ok(records)
}
