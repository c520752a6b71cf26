//! Snapshot egress: where captured snapshots go.
//!
//! [`SnapshotSink::Inline`] writes on the stepping thread.
//! [`SnapshotSink::Background`] hands each [`SnapshotJob`] to a dedicated
//! writer thread over a bounded crossbeam channel; when the queue is full
//! the driver blocks until the writer catches up. Neither mode touches
//! numeric state.

use std::path::PathBuf;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender};
use tracing::{info, warn};

use crate::snapshot::{write_snapshot, SnapshotJob};

/// Jobs the writer thread may have queued before the driver blocks.
pub const BACKGROUND_QUEUE_DEPTH: usize = 16;

/// Snapshot outcomes for one run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SnapshotStats {
    /// Files written.
    pub written: u64,
    /// Snapshots skipped after an error.
    pub skipped: u64,
}

impl SnapshotStats {
    fn write(&mut self, dir: &std::path::Path, job: &SnapshotJob) {
        match write_snapshot(dir, job) {
            Ok(path) => {
                self.written += 1;
                info!(time = job.time, path = %path.display(), "snapshot saved");
            }
            Err(e) => {
                self.skipped += 1;
                warn!(time = job.time, error = %e, "snapshot skipped");
            }
        }
    }
}

/// Destination for captured snapshots.
pub enum SnapshotSink {
    /// Write synchronously on the calling thread.
    Inline {
        /// Output directory.
        dir: PathBuf,
        /// Running totals.
        stats: SnapshotStats,
    },
    /// Write on a background thread.
    Background(BackgroundWriter),
}

impl SnapshotSink {
    /// Synchronous sink writing into `dir`.
    pub fn inline(dir: impl Into<PathBuf>) -> Self {
        Self::Inline {
            dir: dir.into(),
            stats: SnapshotStats::default(),
        }
    }

    /// Background sink writing into `dir`.
    ///
    /// Falls back to an inline sink if the writer thread cannot be
    /// spawned.
    pub fn background(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        match BackgroundWriter::spawn(dir.clone()) {
            Ok(writer) => Self::Background(writer),
            Err(e) => {
                warn!(error = %e, "snapshot writer thread unavailable, writing inline");
                Self::inline(dir)
            }
        }
    }

    /// Hand off one snapshot.
    pub fn submit(&mut self, job: SnapshotJob) {
        match self {
            Self::Inline { dir, stats } => stats.write(dir, &job),
            Self::Background(writer) => writer.submit(job),
        }
    }

    /// Flush outstanding work and return the totals.
    ///
    /// For a background sink this closes the queue and joins the writer.
    pub fn finish(self) -> SnapshotStats {
        match self {
            Self::Inline { stats, .. } => stats,
            Self::Background(writer) => writer.finish(),
        }
    }
}

/// A writer thread fed through a bounded channel.
pub struct BackgroundWriter {
    tx: Option<Sender<SnapshotJob>>,
    handle: Option<JoinHandle<SnapshotStats>>,
    /// Jobs that could not be sent because the thread had already exited.
    lost: u64,
}

impl BackgroundWriter {
    /// Spawn the writer thread.
    pub fn spawn(dir: PathBuf) -> std::io::Result<Self> {
        let (tx, rx) = crossbeam_channel::bounded(BACKGROUND_QUEUE_DEPTH);
        let handle = thread::Builder::new()
            .name("pipeflow-snapshots".into())
            .spawn(move || writer_loop(dir, rx))?;
        Ok(Self {
            tx: Some(tx),
            handle: Some(handle),
            lost: 0,
        })
    }

    /// Queue one snapshot, blocking while the queue is full.
    pub fn submit(&mut self, job: SnapshotJob) {
        let sent = self.tx.as_ref().map(|tx| tx.send(job).is_ok());
        if sent != Some(true) {
            self.lost += 1;
            warn!("snapshot writer thread is gone, snapshot skipped");
        }
    }

    /// Close the queue, wait for the writer, and return the totals.
    pub fn finish(mut self) -> SnapshotStats {
        self.shutdown()
    }

    fn shutdown(&mut self) -> SnapshotStats {
        // Dropping the sender ends the writer loop once the queue drains.
        self.tx.take();
        let mut stats = match self.handle.take().map(JoinHandle::join) {
            Some(Ok(stats)) => stats,
            Some(Err(_)) => {
                warn!("snapshot writer thread panicked");
                SnapshotStats::default()
            }
            None => SnapshotStats::default(),
        };
        stats.skipped += self.lost;
        stats
    }
}

impl Drop for BackgroundWriter {
    fn drop(&mut self) {
        if self.handle.is_some() {
            self.shutdown();
        }
    }
}

fn writer_loop(dir: PathBuf, rx: Receiver<SnapshotJob>) -> SnapshotStats {
    let mut stats = SnapshotStats::default();
    while let Ok(job) = rx.recv() {
        stats.write(&dir, &job);
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{file_name, SnapshotRow};
    use std::fs;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "pipeflow-egress-{name}-{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    fn job(time: f64) -> SnapshotJob {
        SnapshotJob {
            time,
            rows: vec![SnapshotRow {
                index: 0,
                density: 1.0,
                velocity: 0.0,
                pressure: 2.0,
            }],
        }
    }

    #[test]
    fn inline_sink_writes_immediately() {
        let dir = scratch_dir("inline");
        let mut sink = SnapshotSink::inline(&dir);
        sink.submit(job(0.5));
        assert!(dir.join(file_name(0.5)).exists());
        let stats = sink.finish();
        assert_eq!(stats, SnapshotStats { written: 1, skipped: 0 });
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn background_sink_drains_queue_on_finish() {
        let dir = scratch_dir("background");
        let mut sink = SnapshotSink::background(&dir);
        for k in 1..=40 {
            sink.submit(job(k as f64 * 0.1));
        }
        let stats = sink.finish();
        assert_eq!(stats.written, 40);
        assert_eq!(stats.skipped, 0);
        assert_eq!(fs::read_dir(&dir).unwrap().count(), 40);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn failed_writes_are_counted_not_fatal() {
        let dir = scratch_dir("blocked");
        fs::write(&dir, b"file in the way").unwrap();
        let mut sink = SnapshotSink::background(&dir);
        sink.submit(job(0.1));
        sink.submit(job(0.2));
        let stats = sink.finish();
        assert_eq!(stats, SnapshotStats { written: 0, skipped: 2 });
        let _ = fs::remove_file(&dir);
    }
}
