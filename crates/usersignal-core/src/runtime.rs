//! Serialized event loop.
//!
//! One logical thread of state mutation: the loop pulls continuations off
//! the queue and runs the router to completion for each before touching the
//! next. Bridge queries run on background tasks, but their results only
//! ever re-enter through the queue -- this loop is the single writer of
//! `AppState` by construction.

use std::sync::Arc;

use tracing::debug;

use crate::bridge::{BridgeAdapter, NativeBridge};
use crate::collaborators::{
    AdModel, LogSink, MemoryLogSink, NoopAdModel, NoopPresenter, NoopSettingsStore,
    NotificationPresenter, SettingsStore, StaticTabs, StaticWindows, TabRegistry, WindowRegistry,
};
use crate::config::CoreConfig;
use crate::continuation::{
    Continuation, ContinuationEmitter, ContinuationQueue, WeakContinuationEmitter,
};
use crate::events::Event;
use crate::router::{route, RouterContext};
use crate::state::AppState;

/// The wired-in collaborator set for one loop.
pub struct Collaborators {
    pub bridge: Arc<dyn NativeBridge>,
    pub presenter: Arc<dyn NotificationPresenter>,
    pub settings: Arc<dyn SettingsStore>,
    pub log_sink: Arc<dyn LogSink>,
    pub tabs: Arc<dyn TabRegistry>,
    pub windows: Arc<dyn WindowRegistry>,
    pub ad_model: Arc<dyn AdModel>,
}

impl Collaborators {
    /// No-op collaborators around the given bridge; replay and tests.
    pub fn detached(bridge: Arc<dyn NativeBridge>) -> Self {
        Self {
            bridge,
            presenter: Arc::new(NoopPresenter),
            settings: Arc::new(NoopSettingsStore),
            log_sink: Arc::new(MemoryLogSink::default()),
            tabs: Arc::new(StaticTabs::default()),
            windows: Arc::new(StaticWindows::default()),
            ad_model: Arc::new(NoopAdModel),
        }
    }
}

/// Owns the state snapshot and the receiving half of the continuation
/// queue. External producers feed events in through cloned emitters.
///
/// The loop itself holds only a weak emitter handle; `driver` backs the
/// caller-driven `dispatch`/`settle` API and is released when `run` takes
/// over, so the channel closes once the last external emitter (and any
/// in-flight bridge completion) is gone.
pub struct EventLoop {
    state: AppState,
    config: CoreConfig,
    emitter: WeakContinuationEmitter,
    driver: Option<ContinuationEmitter>,
    queue: ContinuationQueue,
    adapter: BridgeAdapter,
    collab: Collaborators,
    shutting_down: bool,
}

impl EventLoop {
    pub fn new(config: CoreConfig, collab: Collaborators) -> Self {
        let (driver, queue) = ContinuationEmitter::channel();
        let emitter = driver.downgrade();
        let adapter = BridgeAdapter::new(Arc::clone(&collab.bridge), emitter.clone());
        Self {
            state: AppState::default(),
            config,
            emitter,
            driver: Some(driver),
            queue,
            adapter,
            collab,
            shutting_down: false,
        }
    }

    /// Handle for external event producers.
    pub fn emitter(&self) -> ContinuationEmitter {
        self.driver
            .clone()
            .expect("driver handle exists until run() consumes the loop")
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn into_state(self) -> AppState {
        self.state
    }

    /// Route one external event now, on the caller's turn.
    pub fn dispatch(&mut self, event: Event) {
        self.step(Continuation::Event(event));
    }

    /// One serialized dispatch turn. The strong emitter lives only for the
    /// turn; once the channel has closed, late emissions are dropped with a
    /// warning rather than resurrecting the loop.
    fn step(&mut self, continuation: Continuation) {
        let emitter = self
            .emitter
            .upgrade()
            .unwrap_or_else(ContinuationEmitter::closed);
        let state = std::mem::take(&mut self.state);
        self.state = match continuation {
            Continuation::Event(event) => {
                if matches!(event, Event::ShuttingDown) {
                    self.shutting_down = true;
                }
                let cx = RouterContext {
                    config: &self.config,
                    emitter: &emitter,
                    bridge: &self.adapter,
                    presenter: self.collab.presenter.as_ref(),
                    settings: self.collab.settings.as_ref(),
                    log_sink: self.collab.log_sink.as_ref(),
                    tabs: self.collab.tabs.as_ref(),
                    windows: self.collab.windows.as_ref(),
                    ad_model: self.collab.ad_model.as_ref(),
                };
                route(state, event, &cx)
            }
            Continuation::Report(reason) => {
                debug!(?reason, "delivering report to the ad pipeline");
                self.collab
                    .ad_model
                    .generate_ad_reporting_event(state, reason)
            }
        };
    }

    /// Run until `ShuttingDown` has been routed (continuations already
    /// queued at that point still drain), or until the queue closes because
    /// every external emitter and in-flight bridge completion is gone.
    pub async fn run(mut self) -> AppState {
        // Park on weak handles only; external producers own liveness now.
        self.driver = None;
        while let Some(continuation) = self.queue.next().await {
            self.step(continuation);
            if self.shutting_down {
                break;
            }
        }
        while let Some(continuation) = self.queue.try_next() {
            self.step(continuation);
        }
        self.state
    }

    /// Process continuations until the queue stays empty, yielding so
    /// spawned bridge completions can land. Replay and tests; assumes
    /// queries resolve without external waits.
    pub async fn settle(&mut self) {
        loop {
            while let Some(continuation) = self.queue.try_next() {
                self.step(continuation);
            }
            tokio::task::yield_now().await;
            match self.queue.try_next() {
                Some(continuation) => self.step(continuation),
                None => break,
            }
        }
    }
}
