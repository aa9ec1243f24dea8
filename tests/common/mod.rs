//! Shared test doubles for facade-level tests

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use recorder_core::{
    Configuration, EncodingEngine, EngineHandle, EngineStatus, Recorder, RecorderError,
    RecorderEvent, RecorderResult,
};

/// Scripted engine: records every call, fails once where instructed
#[derive(Default)]
pub struct MockEngine {
    pub fail_init: Mutex<Option<RecorderError>>,
    pub fail_start: Mutex<Option<RecorderError>>,
    pub fail_pause: Mutex<Option<RecorderError>>,
    pub fail_resume: Mutex<Option<RecorderError>>,
    pub fail_adjust: Mutex<Option<RecorderError>>,
    pub fail_stop: Mutex<Option<RecorderError>>,
    pub status: Mutex<EngineStatus>,
    pub applied_bitrate_kbps: Mutex<Option<u32>>,
    pub last_output: Mutex<Option<PathBuf>>,
    calls: Mutex<Vec<String>>,
}

impl MockEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(status: EngineStatus) -> Self {
        let engine = Self::default();
        *engine.status.lock() = status;
        engine
    }

    pub fn set_status(&self, status: EngineStatus) {
        *self.status.lock() = status;
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self, name: &str) -> usize {
        self.calls.lock().iter().filter(|c| *c == name).count()
    }

    fn record(&self, call: &str) {
        self.calls.lock().push(call.to_string());
    }

    fn scripted(&self, slot: &Mutex<Option<RecorderError>>) -> RecorderResult<()> {
        match slot.lock().take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl EncodingEngine for MockEngine {
    async fn init(&self, _config: &Configuration) -> RecorderResult<EngineHandle> {
        self.record("init");
        self.scripted(&self.fail_init)?;
        Ok(EngineHandle::new())
    }

    async fn start(&self, _handle: &EngineHandle, output_path: &Path) -> RecorderResult<()> {
        self.record("start");
        self.scripted(&self.fail_start)?;
        *self.last_output.lock() = Some(output_path.to_path_buf());
        Ok(())
    }

    async fn pause(&self, _handle: &EngineHandle) -> RecorderResult<()> {
        self.record("pause");
        self.scripted(&self.fail_pause)
    }

    async fn resume(&self, _handle: &EngineHandle) -> RecorderResult<()> {
        self.record("resume");
        self.scripted(&self.fail_resume)
    }

    async fn adjust_bitrate(&self, _handle: &EngineHandle, bitrate_kbps: u32) -> RecorderResult<()> {
        self.record("adjust_bitrate");
        self.scripted(&self.fail_adjust)?;
        *self.applied_bitrate_kbps.lock() = Some(bitrate_kbps);
        Ok(())
    }

    async fn stop(&self, _handle: &EngineHandle) -> RecorderResult<()> {
        self.record("stop");
        self.scripted(&self.fail_stop)
    }

    async fn query_status(&self, _handle: &EngineHandle) -> EngineStatus {
        *self.status.lock()
    }
}

/// Observer capturing every dispatched event for assertions
pub struct EventLog {
    events: Arc<Mutex<Vec<RecorderEvent>>>,
}

impl EventLog {
    pub fn attach(recorder: &Recorder) -> Self {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        recorder.register_observer(move |event| sink.lock().push(event.clone()));
        Self { events }
    }

    pub fn events(&self) -> Vec<RecorderEvent> {
        self.events.lock().clone()
    }

    pub fn codes(&self) -> Vec<i32> {
        self.events.lock().iter().map(|e| e.code).collect()
    }

    pub fn last(&self) -> Option<RecorderEvent> {
        self.events.lock().last().cloned()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}
