//! Append-only JSONL run record store

use async_trait::async_trait;
use pagecast_domain::{RecordError, RunRecord, RunRecordStore};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// One JSON object per line, in insertion order.
///
/// The file (and its parent directories) is created on the first write, so
/// reading a store that was never written to yields no records.
#[derive(Debug, Clone)]
pub struct JsonlRunRecordStore {
    path: PathBuf,
    file: Arc<Mutex<Option<File>>>,
}

impl JsonlRunRecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file: Arc::new(Mutex::new(None)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn open(&self) -> Result<File, RecordError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;

        Ok(file)
    }
}

#[async_trait]
impl RunRecordStore for JsonlRunRecordStore {
    async fn record(&self, record: &RunRecord) -> Result<(), RecordError> {
        let mut line =
            serde_json::to_string(record).map_err(|e| RecordError::Serialization(e.to_string()))?;
        line.push('\n');

        let mut guard = self.file.lock().await;
        if guard.is_none() {
            *guard = Some(self.open().await?);
        }

        if let Some(file) = guard.as_mut() {
            file.write_all(line.as_bytes()).await?;
            file.flush().await?;
        }

        tracing::debug!(path = %self.path.display(), id = %record.id, "Run record appended");
        Ok(())
    }

    async fn read_all(&self) -> Result<Vec<RunRecord>, RecordError> {
        let contents = match fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(vec![]),
            Err(error) => return Err(error.into()),
        };

        contents
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(index, line)| {
                serde_json::from_str(line).map_err(|e| RecordError::Corrupt {
                    line: index + 1,
                    message: e.to_string(),
                })
            })
            .collect()
    }
}
