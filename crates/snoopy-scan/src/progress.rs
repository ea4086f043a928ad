//! Walk progress reporting.

use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Progress information at one point of a walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanProgress {
    /// Number of folders scanned so far.
    pub folders_scanned: u64,
    /// Number of files seen so far (ignored ones included).
    pub files_scanned: u64,
    /// Total bytes of the files seen so far.
    pub bytes_scanned: u64,
    /// Number of enumeration failures.
    pub errors_count: u64,
}

impl ScanProgress {
    /// Get total items scanned (files + folders).
    pub fn total_items(&self) -> u64 {
        self.files_scanned + self.folders_scanned
    }
}

/// Counters updated by the walker and read by observers on other threads.
#[derive(Debug, Default)]
pub struct WalkProgress {
    folders: AtomicU64,
    files: AtomicU64,
    bytes: AtomicU64,
    errors: AtomicU64,
}

impl WalkProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reset(&self) {
        self.folders.store(0, Ordering::Relaxed);
        self.files.store(0, Ordering::Relaxed);
        self.bytes.store(0, Ordering::Relaxed);
        self.errors.store(0, Ordering::Relaxed);
    }

    pub(crate) fn record_folder(&self) {
        self.folders.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_file(&self, size: u64) {
        self.files.fetch_add(1, Ordering::Relaxed);
        self.bytes.fetch_add(size, Ordering::Relaxed);
    }

    pub(crate) fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ScanProgress {
        ScanProgress {
            folders_scanned: self.folders.load(Ordering::Relaxed),
            files_scanned: self.files.load(Ordering::Relaxed),
            bytes_scanned: self.bytes.load(Ordering::Relaxed),
            errors_count: self.errors.load(Ordering::Relaxed),
        }
    }
}

/// What the ticker repaints on each tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TickerStyle {
    /// Elapsed seconds.
    #[default]
    Elapsed,
    /// "Working on it" with growing dots.
    Dots,
    /// "Working on it" with a rotating bar.
    Rotate,
    /// Elapsed seconds with folder, file and error counters.
    Counters,
}

impl TickerStyle {
    fn frame(self, tick: usize, elapsed: Duration, progress: ScanProgress) -> String {
        const DOTS: [&str; 4] = ["", ".", "..", "..."];
        const BARS: [&str; 4] = ["|", "/", "-", "\\"];
        match self {
            TickerStyle::Elapsed => format!("Elapsed [sec]: {:.1}", elapsed.as_secs_f64()),
            TickerStyle::Dots => format!("Working on it{}", DOTS[tick % DOTS.len()]),
            TickerStyle::Rotate => format!("Working on it {}", BARS[tick % BARS.len()]),
            TickerStyle::Counters => format!(
                "Elapsed [sec]: {:.1} | Folders: {} | Files: {} | Errors: {}",
                elapsed.as_secs_f64(),
                progress.folders_scanned,
                progress.files_scanned,
                progress.errors_count
            ),
        }
    }
}

const CLEAR_LINE: &str = "\x1b[2K";

/// Background thread repainting a single status line.
///
/// Reads only the shared counters. Stopping signals the thread, joins it,
/// and clears the status line.
pub struct Ticker {
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    /// Start repainting on stderr every `interval`.
    pub fn start(progress: Arc<WalkProgress>, style: TickerStyle, interval: Duration) -> Self {
        Self::start_with_writer(progress, style, interval, std::io::stderr())
    }

    /// Start repainting on `writer` every `interval`.
    pub fn start_with_writer<W>(
        progress: Arc<WalkProgress>,
        style: TickerStyle,
        interval: Duration,
        mut writer: W,
    ) -> Self
    where
        W: Write + Send + 'static,
    {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let handle = thread::spawn(move || {
            let start = Instant::now();
            let mut tick = 0usize;
            loop {
                let frame = style.frame(tick, start.elapsed(), progress.snapshot());
                let _ = write!(writer, "\r{CLEAR_LINE}{frame}");
                let _ = writer.flush();
                tick += 1;

                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => continue,
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            let _ = write!(writer, "\r{CLEAR_LINE}");
            let _ = writer.flush();
        });

        Self {
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        }
    }

    /// Signal the thread and wait for it to finish.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::warn!("progress ticker thread panicked");
            }
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.shutdown();
    }
}
