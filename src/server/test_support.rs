//! Test doubles shared by the server tests.

use actix::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::server::game_session::messages::ServerEvent;
use crate::server::recorder::{MatchRecorder, MatchResult, RecordError};
use crate::server::store::{KvBackend, MemoryBackend, SessionStore, StateStore, StoreError};

pub fn memory_store() -> SessionStore {
    SessionStore::new(StateStore::new(Box::new(MemoryBackend::new())).start())
}

/// Give queued `do_send`s time to land.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(20)).await;
}

/// Stands in for a WebSocket connection: keeps every event it receives.
pub struct Collector {
    addr: Addr<CollectorActor>,
    events: Arc<Mutex<Vec<ServerEvent>>>,
}

struct CollectorActor {
    events: Arc<Mutex<Vec<ServerEvent>>>,
}

impl Actor for CollectorActor {
    type Context = Context<Self>;
}

impl Handler<ServerEvent> for CollectorActor {
    type Result = ();

    fn handle(&mut self, msg: ServerEvent, _: &mut Context<Self>) {
        self.events.lock().unwrap().push(msg);
    }
}

#[derive(Message)]
#[rtype(result = "()")]
struct StopCollector;

impl Handler<StopCollector> for CollectorActor {
    type Result = ();

    fn handle(&mut self, _: StopCollector, ctx: &mut Context<Self>) {
        ctx.stop();
    }
}

impl Collector {
    pub fn start() -> Self {
        let events = Arc::new(Mutex::new(Vec::new()));
        let addr = CollectorActor { events: events.clone() }.start();
        Self { addr, events }
    }

    pub fn recipient(&self) -> Recipient<ServerEvent> {
        self.addr.clone().recipient()
    }

    pub fn events(&self) -> Vec<ServerEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn stop(&self) {
        self.addr.do_send(StopCollector);
    }
}

/// Switch shared with a `FlakyBackend` turning its failures on and off.
#[derive(Clone)]
pub struct FailSwitch(Arc<AtomicBool>);

impl FailSwitch {
    pub fn set(&self, failing: bool) {
        self.0.store(failing, Ordering::SeqCst);
    }
}

/// Backend that fails every operation while its switch is on.
pub struct FlakyBackend<B> {
    inner: B,
    failing: Arc<AtomicBool>,
}

impl<B: KvBackend> FlakyBackend<B> {
    pub fn new(inner: B) -> (Self, FailSwitch) {
        let failing = Arc::new(AtomicBool::new(false));
        (Self { inner, failing: failing.clone() }, FailSwitch(failing))
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(StoreError::Backend("injected failure".into()))
        } else {
            Ok(())
        }
    }
}

impl<B: KvBackend> KvBackend for FlakyBackend<B> {
    fn get(&mut self, key: &str) -> Result<Option<String>, StoreError> {
        self.check()?;
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.check()?;
        self.inner.set(key, value)
    }

    fn delete(&mut self, key: &str) -> Result<(), StoreError> {
        self.check()?;
        self.inner.delete(key)
    }

    fn compare_and_set(
        &mut self,
        key: &str,
        expected: Option<&str>,
        new: Option<String>,
    ) -> Result<bool, StoreError> {
        self.check()?;
        self.inner.compare_and_set(key, expected, new)
    }
}

/// Keeps recorded results in memory; can be told to fail.
#[derive(Default)]
pub struct RecordingRecorder {
    results: Mutex<Vec<MatchResult>>,
    failing: AtomicBool,
}

impl RecordingRecorder {
    pub fn results(&self) -> Vec<MatchResult> {
        self.results.lock().unwrap().clone()
    }

    pub fn fail(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl MatchRecorder for RecordingRecorder {
    fn record(&self, result: &MatchResult) -> Result<(), RecordError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(RecordError::Io(std::io::Error::other("recorder offline")));
        }
        self.results.lock().unwrap().push(result.clone());
        Ok(())
    }
}
