//! Background analysis with stale-result suppression.
//!
//! The scheduler is owned by the caller's task and is the only writer of
//! the "current request". Workers never look at it: each one reports back
//! through a channel, tagged with the generation it was started for, and
//! the caller's task compares that tag when it drains the channel. A
//! superseded worker still runs to completion; only its result is dropped.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::extract::Extractor;
use crate::record::MetadataRecord;

struct Request {
    path: PathBuf,
    generation: u64,
}

struct Completion {
    generation: u64,
    record: MetadataRecord,
}

/// Runs one extraction per selection off the caller's task.
///
/// Must be used from within a Tokio runtime.
pub struct AnalysisScheduler {
    extractor: Arc<Extractor>,
    generation: u64,
    current: Option<Request>,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
}

impl AnalysisScheduler {
    pub fn new(extractor: Arc<Extractor>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            extractor,
            generation: 0,
            current: None,
            tx,
            rx,
        }
    }

    /// Start analysing `path`, superseding any in-flight request.
    ///
    /// Returns `false` (and does nothing) when `path` is already the
    /// in-flight request.
    pub fn submit(&mut self, path: impl Into<PathBuf>) -> bool {
        let path = path.into();
        let path = std::path::absolute(&path).unwrap_or(path);
        if let Some(current) = &self.current
            && current.path == path
        {
            debug!(path = %path.display(), "analysis already in flight");
            return false;
        }

        self.generation += 1;
        let generation = self.generation;
        if let Some(previous) = self.current.replace(Request {
            path: path.clone(),
            generation,
        }) {
            debug!(
                superseded = %previous.path.display(),
                path = %path.display(),
                "newer selection supersedes in-flight analysis"
            );
        }

        let extractor = Arc::clone(&self.extractor);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let worker_path = path.clone();
            let record = match tokio::task::spawn_blocking(move || extractor.extract(&worker_path))
                .await
            {
                Ok(record) => record,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "analysis worker did not complete");
                    MetadataRecord::failed(&path, format!("analysis task failed: {e}"))
                }
            };
            // The receiver lives as long as the scheduler; a send error
            // only means the caller is gone.
            let _ = tx.send(Completion { generation, record });
        });
        true
    }

    /// Wait for the result of the current request.
    ///
    /// Results of superseded requests are discarded on the way. Returns
    /// `None` immediately when nothing is in flight.
    pub async fn next_record(&mut self) -> Option<MetadataRecord> {
        while self.current.is_some() {
            let completion = self.rx.recv().await?;
            if let Some(record) = self.accept(completion) {
                return Some(record);
            }
        }
        None
    }

    /// Non-blocking variant of [`next_record`](Self::next_record).
    pub fn try_next_record(&mut self) -> Option<MetadataRecord> {
        while let Ok(completion) = self.rx.try_recv() {
            if let Some(record) = self.accept(completion) {
                return Some(record);
            }
        }
        None
    }

    /// Path of the in-flight request, if any.
    pub fn current_path(&self) -> Option<&Path> {
        self.current.as_ref().map(|r| r.path.as_path())
    }

    pub fn is_idle(&self) -> bool {
        self.current.is_none()
    }

    fn accept(&mut self, completion: Completion) -> Option<MetadataRecord> {
        match &self.current {
            Some(current) if current.generation == completion.generation => {
                self.current = None;
                Some(completion.record)
            }
            _ => {
                debug!(
                    path = %completion.record.path.display(),
                    generation = completion.generation,
                    "discarding stale analysis result"
                );
                None
            }
        }
    }
}
