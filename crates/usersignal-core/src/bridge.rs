//! Native notification bridge adapter.
//!
//! Wraps the two OS-level queries and turns each completion into exactly
//! one report continuation. Queries are single-shot: no retry, no timeout.
//! A hung native call stalls its own report forever but never blocks the
//! router, which returned as soon as the query was issued.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::continuation::WeakContinuationEmitter;
use crate::error::BridgeError;
use crate::events::Event;

/// The OS-level notification permission/configuration query service.
#[async_trait]
pub trait NativeBridge: Send + Sync + 'static {
    /// Whether the native notification subsystem is set up for this app.
    async fn query_configured(&self) -> Result<bool, BridgeError>;

    /// Whether the user has granted notification permission.
    async fn query_enabled(&self) -> Result<bool, BridgeError>;
}

/// Bridge with canned answers, for tests and offline replay.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedBridge {
    pub configured: bool,
    pub enabled: bool,
}

#[async_trait]
impl NativeBridge for FixedBridge {
    async fn query_configured(&self) -> Result<bool, BridgeError> {
        Ok(self.configured)
    }

    async fn query_enabled(&self) -> Result<bool, BridgeError> {
        Ok(self.enabled)
    }
}

/// Issues bridge queries off the serialized section and feeds the answers
/// back in as continuation events.
///
/// Holds only a weak emitter handle: an idle adapter never keeps the loop
/// alive, while an in-flight query carries a strong clone so its report is
/// delivered before the loop can wind down.
pub struct BridgeAdapter {
    bridge: Arc<dyn NativeBridge>,
    emitter: WeakContinuationEmitter,
}

impl BridgeAdapter {
    pub fn new(bridge: Arc<dyn NativeBridge>, emitter: WeakContinuationEmitter) -> Self {
        Self { bridge, emitter }
    }

    /// Fire the "configured" query. The completion emits one
    /// `NativeNotificationConfigurationReport { ok }` with
    /// `ok = !error && result`; an error is indistinguishable from "not ok".
    pub fn check_configured(&self) {
        let Some(emitter) = self.emitter.upgrade() else {
            return; // loop already gone; nobody would receive the report
        };
        let bridge = Arc::clone(&self.bridge);
        tokio::spawn(async move {
            let result = bridge.query_configured().await;
            debug!(?result, "configured query completed");
            let ok = matches!(result, Ok(true));
            emitter.emit(Event::NativeNotificationConfigurationReport { ok });
        });
    }

    /// Fire the "enabled" query; completion emits one
    /// `NativeNotificationAllowedReport { ok }`.
    pub fn check_allowed(&self) {
        let Some(emitter) = self.emitter.upgrade() else {
            return;
        };
        let bridge = Arc::clone(&self.bridge);
        tokio::spawn(async move {
            let result = bridge.query_enabled().await;
            debug!(?result, "enabled query completed");
            let ok = matches!(result, Ok(true));
            emitter.emit(Event::NativeNotificationAllowedReport { ok });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::continuation::{Continuation, ContinuationEmitter};

    struct BrokenBridge;

    #[async_trait]
    impl NativeBridge for BrokenBridge {
        async fn query_configured(&self) -> Result<bool, BridgeError> {
            Err(BridgeError::Unavailable)
        }

        async fn query_enabled(&self) -> Result<bool, BridgeError> {
            Err(BridgeError::QueryFailed("permission service down".into()))
        }
    }

    #[tokio::test]
    async fn configured_query_reports_ok() {
        let (emitter, mut queue) = ContinuationEmitter::channel();
        let adapter = BridgeAdapter::new(
            Arc::new(FixedBridge {
                configured: true,
                enabled: false,
            }),
            emitter.downgrade(),
        );
        adapter.check_configured();
        assert_eq!(
            queue.next().await,
            Some(Continuation::Event(
                Event::NativeNotificationConfigurationReport { ok: true }
            ))
        );
        // Single-shot: exactly one continuation per query.
        assert_eq!(queue.try_next(), None);
    }

    #[tokio::test]
    async fn enabled_query_reports_ok() {
        let (emitter, mut queue) = ContinuationEmitter::channel();
        let adapter = BridgeAdapter::new(
            Arc::new(FixedBridge {
                configured: false,
                enabled: true,
            }),
            emitter.downgrade(),
        );
        adapter.check_allowed();
        assert_eq!(
            queue.next().await,
            Some(Continuation::Event(Event::NativeNotificationAllowedReport {
                ok: true
            }))
        );
    }

    #[tokio::test]
    async fn queries_after_the_loop_is_gone_are_dropped() {
        let (emitter, queue) = ContinuationEmitter::channel();
        let adapter = BridgeAdapter::new(Arc::new(FixedBridge::default()), emitter.downgrade());
        drop(emitter);
        drop(queue);
        // Nothing to deliver to; must not spawn or panic.
        adapter.check_configured();
        adapter.check_allowed();
    }

    #[tokio::test]
    async fn errors_collapse_to_not_ok() {
        let (emitter, mut queue) = ContinuationEmitter::channel();
        let adapter = BridgeAdapter::new(Arc::new(BrokenBridge), emitter.downgrade());
        adapter.check_configured();
        adapter.check_allowed();

        let mut reports = vec![queue.next().await.unwrap(), queue.next().await.unwrap()];
        // Two independent queries may interleave; sort out which is which.
        reports.sort_by_key(|c| {
            matches!(
                c,
                Continuation::Event(Event::NativeNotificationAllowedReport { .. })
            )
        });
        assert_eq!(
            reports,
            vec![
                Continuation::Event(Event::NativeNotificationConfigurationReport { ok: false }),
                Continuation::Event(Event::NativeNotificationAllowedReport { ok: false }),
            ]
        );
        assert_eq!(queue.try_next(), None);
    }
}
