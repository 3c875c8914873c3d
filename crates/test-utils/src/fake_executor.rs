use std::collections::HashMap;
use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::Semaphore;
use syncwatcher::errors::{Result, SyncWatcherError};
use syncwatcher::exec::{ExecutionResult, ScriptRequest, ScriptRunner};
use syncwatcher::types::SYNC_DIR_ENV;

#[derive(Default)]
struct Inner {
    started: Mutex<Vec<ScriptRequest>>,
    finished: Mutex<Vec<ScriptRequest>>,
    gates: Mutex<HashMap<String, Arc<Semaphore>>>,
    exit_code: AtomicI32,
    fail_to_start: AtomicBool,
}

/// A fake runner that:
/// - records every request it is asked to run
/// - completes immediately with exit code 0, unless told otherwise
/// - can hold runs for a given `syncdir` until the test releases them.
#[derive(Clone, Default)]
pub struct RecordingRunner {
    inner: Arc<Inner>,
}

fn sync_dir_of(request: &ScriptRequest) -> String {
    request
        .env
        .get(SYNC_DIR_ENV)
        .map(|v| v.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn key(root: impl AsRef<Path>) -> String {
    root.as_ref().to_string_lossy().into_owned()
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Block runs whose `syncdir` is `root` until [`release`](Self::release).
    pub fn hold(&self, root: impl AsRef<Path>) {
        self.inner
            .gates
            .lock()
            .unwrap()
            .insert(key(root), Arc::new(Semaphore::new(0)));
    }

    /// Let one held run for `root` finish.
    pub fn release(&self, root: impl AsRef<Path>) {
        if let Some(gate) = self.inner.gates.lock().unwrap().get(&key(root)) {
            gate.add_permits(1);
        }
    }

    pub fn set_exit_code(&self, code: i32) {
        self.inner.exit_code.store(code, Ordering::SeqCst);
    }

    pub fn set_fail_to_start(&self, fail: bool) {
        self.inner.fail_to_start.store(fail, Ordering::SeqCst);
    }

    pub fn started(&self) -> usize {
        self.inner.started.lock().unwrap().len()
    }

    pub fn finished(&self) -> usize {
        self.inner.finished.lock().unwrap().len()
    }

    pub fn started_for(&self, root: impl AsRef<Path>) -> usize {
        let root = key(root);
        self.inner
            .started
            .lock()
            .unwrap()
            .iter()
            .filter(|r| sync_dir_of(r) == root)
            .count()
    }

    pub fn requests(&self) -> Vec<ScriptRequest> {
        self.inner.started.lock().unwrap().clone()
    }
}

impl ScriptRunner for RecordingRunner {
    fn run<'a>(
        &'a self,
        request: &'a ScriptRequest,
    ) -> Pin<Box<dyn Future<Output = Result<ExecutionResult>> + Send + 'a>> {
        Box::pin(async move {
            self.inner.started.lock().unwrap().push(request.clone());

            let gate = self
                .inner
                .gates
                .lock()
                .unwrap()
                .get(&sync_dir_of(request))
                .cloned();
            if let Some(gate) = gate {
                gate.acquire().await.expect("gate semaphore closed").forget();
            }

            self.inner.finished.lock().unwrap().push(request.clone());

            if self.inner.fail_to_start.load(Ordering::SeqCst) {
                return Err(SyncWatcherError::ScriptExecutionError(
                    "interpreter not found".to_string(),
                ));
            }

            Ok(ExecutionResult {
                exit_code: self.inner.exit_code.load(Ordering::SeqCst),
                stdout: b"ok\n".to_vec(),
                stderr: Vec::new(),
            })
        })
    }
}
