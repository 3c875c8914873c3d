//! Shared helpers for syncwatcher's integration tests.

pub mod builders;
pub mod fake_executor;
pub mod fake_registrar;

use std::io;
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{fmt, EnvFilter};

static TRACING: Once = Once::new();

/// Route `tracing` output through the test harness's capture.
///
/// Captured logs only show up for failing tests (or with `--nocapture`).
/// The filter is taken from `RUST_LOG`, defaulting to `syncwatcher=debug`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("syncwatcher=debug"));
        let _ = fmt().with_env_filter(filter).with_test_writer().try_init();
    });
}

/// Re-check `cond` every 25 ms until it holds or `limit` has passed.
///
/// Returns whether it ended up holding. Meant for real-filesystem tests,
/// where event delivery latency is outside the test's control.
pub async fn eventually(limit: Duration, mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + limit;
    loop {
        if cond() {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        sleep(Duration::from_millis(25)).await;
    }
}

/// In-memory log sink for asserting on what was (or was not) logged.
///
/// [`LogCapture::install`] makes it the subscriber for the current thread
/// only, so use it from a current-thread runtime when spawned tasks log.
#[derive(Clone, Default)]
pub struct LogCapture {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture every event at TRACE and above until the guard is dropped.
    pub fn install(&self) -> DefaultGuard {
        let subscriber = fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::TRACE)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buf.lock().unwrap()).into_owned()
    }

    /// Captured lines that contain every one of `needles`.
    pub fn lines_with(&self, needles: &[&str]) -> Vec<String> {
        self.contents()
            .lines()
            .filter(|line| needles.iter().all(|n| line.contains(n)))
            .map(str::to_string)
            .collect()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.lock().unwrap().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
