// Append-only JSON lines trace file
use crate::application::sinks::{TraceEntry, TraceSink};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

pub struct JsonLinesTraceSink {
    path: PathBuf,
    // Serializes appends so concurrent requests never interleave partial lines
    write_lock: Mutex<()>,
}

impl JsonLinesTraceSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    async fn append(&self, entry: &TraceEntry) -> Result<()> {
        let mut line = serde_json::to_string(entry).context("Failed to serialize trace entry")?;
        line.push('\n');

        let _guard = self.write_lock.lock().await;
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir)
                .await
                .with_context(|| format!("Failed to create trace directory {}", dir.display()))?;
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .with_context(|| format!("Failed to open trace file {}", self.path.display()))?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        Ok(())
    }
}

#[async_trait]
impl TraceSink for JsonLinesTraceSink {
    async fn record(&self, entry: TraceEntry) {
        if let Err(e) = self.append(&entry).await {
            tracing::error!(error = %format!("{:#}", e), url = %entry.url, "Failed to write to trace file");
        }
    }
}
