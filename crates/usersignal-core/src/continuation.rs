//! Continuation queue: how handlers schedule work for a later turn.
//!
//! A handler never calls back into the router; it emits a continuation and
//! returns. The event loop consumes the queue one continuation at a time,
//! so re-entry is always a separate, serialized router invocation.
//!
//! Ordering contract: continuations from the same handler invocation are
//! delivered in emit order (the channel is FIFO per sender). Two
//! independent sources -- say, two in-flight bridge queries -- may
//! interleave arbitrarily.

use tokio::sync::mpsc;
use tracing::warn;

use crate::events::{Event, ReportReason};

#[derive(Debug, Clone, PartialEq)]
pub enum Continuation {
    /// Re-enters the router on a later turn.
    Event(Event),
    /// Consumed by the external ad-reporting pipeline.
    Report(ReportReason),
}

/// Sending half, cloned into handlers and bridge completion tasks.
#[derive(Debug, Clone)]
pub struct ContinuationEmitter {
    tx: mpsc::UnboundedSender<Continuation>,
}

impl ContinuationEmitter {
    pub fn channel() -> (ContinuationEmitter, ContinuationQueue) {
        let (tx, rx) = mpsc::unbounded_channel();
        (ContinuationEmitter { tx }, ContinuationQueue { rx })
    }

    /// Enqueue an event for re-entrant dispatch.
    pub fn emit(&self, event: Event) {
        self.send(Continuation::Event(event));
    }

    /// Enqueue a reporting continuation for the ad-reporting pipeline.
    pub fn report(&self, reason: ReportReason) {
        self.send(Continuation::Report(reason));
    }

    /// Weak handle that does not keep the channel open. The loop parks on
    /// one of these so that dropping every strong emitter winds it down.
    pub fn downgrade(&self) -> WeakContinuationEmitter {
        WeakContinuationEmitter {
            tx: self.tx.downgrade(),
        }
    }

    /// Emitter over an already-closed channel; every send is dropped with a
    /// warning. Stands in while the live channel winds down.
    pub(crate) fn closed() -> Self {
        let (tx, _) = mpsc::unbounded_channel();
        ContinuationEmitter { tx }
    }

    fn send(&self, continuation: Continuation) {
        if let Err(e) = self.tx.send(continuation) {
            // Only possible while the loop winds down.
            warn!(dropped = ?e.0, "continuation dropped: router loop is gone");
        }
    }
}

/// Non-owning emitter handle; upgrade per use.
#[derive(Debug, Clone)]
pub struct WeakContinuationEmitter {
    tx: mpsc::WeakUnboundedSender<Continuation>,
}

impl WeakContinuationEmitter {
    /// `None` once every strong emitter is gone and the channel has closed.
    pub fn upgrade(&self) -> Option<ContinuationEmitter> {
        self.tx.upgrade().map(|tx| ContinuationEmitter { tx })
    }
}

/// Receiving half, owned by the event loop. Exactly one exists per loop.
#[derive(Debug)]
pub struct ContinuationQueue {
    rx: mpsc::UnboundedReceiver<Continuation>,
}

impl ContinuationQueue {
    pub async fn next(&mut self) -> Option<Continuation> {
        self.rx.recv().await
    }

    pub fn try_next(&mut self) -> Option<Continuation> {
        self.rx.try_recv().ok()
    }
}
