use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use super::RecordSink;
use crate::page_extractor::PageRecord;

/// Dataset file holding one JSON object per line
///
/// Opened in append mode; concurrent pushes are serialized so lines never
/// interleave.
pub struct JsonLinesSink {
    path: PathBuf,
    file: Mutex<File>,
}

impl JsonLinesSink {
    /// Open (or create) `path` for appending, creating parent directories
    ///
    /// # Errors
    ///
    /// Fails when the directory or the file cannot be created.
    pub async fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .with_context(|| format!("Failed to open dataset file {}", path.display()))?;

        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSink for JsonLinesSink {
    async fn push(&self, record: &PageRecord) -> Result<()> {
        let mut line = serde_json::to_string(record).context("Failed to serialize record")?;
        line.push('\n');

        let mut file = self.file.lock().await;
        file.write_all(line.as_bytes())
            .await
            .with_context(|| format!("Failed to append to {}", self.path.display()))?;
        file.flush().await.context("Failed to flush dataset file")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page_extractor::{ErrorRecord, PageProfile};

    #[tokio::test]
    async fn appends_one_line_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("dataset.jsonl");

        let sink = JsonLinesSink::create(&path).await.unwrap();
        let profile = PageProfile {
            page_url: "https://www.facebook.com/acme".into(),
            title: Some("Acme".into()),
            ..PageProfile::default()
        };
        sink.push(&profile.into()).await.unwrap();
        sink.push(&ErrorRecord::new("https://www.facebook.com/gone", None, "boom").into())
            .await
            .unwrap();
        drop(sink);

        // Reopening appends instead of truncating
        let sink = JsonLinesSink::create(&path).await.unwrap();
        sink.push(&ErrorRecord::new("https://www.facebook.com/again", None, "boom").into())
            .await
            .unwrap();

        let contents = tokio::fs::read_to_string(&path).await.unwrap();
        let records: Vec<PageRecord> = contents
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(records.len(), 3);
        assert!(!records[0].is_error());
        assert!(records[1].is_error());
        assert_eq!(records[2].page_url(), "https://www.facebook.com/again");
    }
}
