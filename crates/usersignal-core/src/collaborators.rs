//! Collaborator seams.
//!
//! Everything the router delegates to but does not own: the ad-model
//! engine, notification presentation, the settings store, the log sink and
//! the tab/window registries. Each is a trait object so the host wires in
//! real services and tests wire in recorders.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};

use crate::events::{NotificationOptions, ReportReason, SettingKey};
use crate::state::{AppState, TabId, TabSnapshot, WindowId, WindowSnapshot};

/// The ad-classification engine seam.
///
/// Mutators take the current state snapshot and return the next one, or
/// perform a declared fire-and-forget side effect. Every method defaults to
/// a no-op so partial engines (and tests) implement only what they watch.
pub trait AdModel: Send + Sync {
    /// Set up (or reset, when `enabled` flips) the engine's model region.
    fn initialize(&self, state: AppState, enabled: Option<bool>) -> AppState {
        let _ = enabled;
        state
    }

    /// Feed the reporting pipeline one reason-tagged entry. Runs inside the
    /// serialized loop, so it observes the state committed by the emitting
    /// turn.
    fn generate_ad_reporting_event(&self, state: AppState, reason: ReportReason) -> AppState {
        let _ = reason;
        state
    }

    fn tab_update(&self, state: AppState, tab: Option<&TabSnapshot>) -> AppState {
        let _ = tab;
        state
    }

    fn test_shopping_data(&self, state: AppState, url: &str) -> AppState {
        let _ = url;
        state
    }

    fn test_search_state(&self, state: AppState, url: &str) -> AppState {
        let _ = url;
        state
    }

    fn classify_page(
        &self,
        state: AppState,
        data: &serde_json::Value,
        window_id: WindowId,
    ) -> AppState {
        let _ = (data, window_id);
        state
    }

    fn update_timing_model(&self, state: AppState) -> AppState {
        state
    }

    fn remove_history_site(&self, state: AppState, url: &str) -> AppState {
        let _ = url;
        state
    }

    fn remove_all_history(&self, state: AppState) -> AppState {
        state
    }

    fn confirm_ad_uuid_if_ad_enabled(&self, state: AppState) -> AppState {
        state
    }

    fn collect_activity(&self, state: AppState) -> AppState {
        state
    }

    /// Retry/backoff parameters pass through unchanged.
    fn upload_logs(&self, state: AppState, stamp: DateTime<Utc>, retry_in_ms: u64) -> AppState {
        let _ = (stamp, retry_in_ms);
        state
    }

    fn download_surveys(&self, state: AppState, entries: &[serde_json::Value]) -> AppState {
        let _ = entries;
        state
    }

    /// Fire-and-forget; the value re-enters later as `OnAdsSsidReceived`.
    fn retrieve_ssid(&self) {}

    fn record_un_idle(&self, state: AppState) -> AppState {
        state
    }

    /// Synchronous flush of cached engine data before process exit.
    fn save_cached_info(&self, state: AppState) -> AppState {
        state
    }

    fn change_locale(&self, state: AppState, locale: &str) -> AppState {
        // The locale field itself lives in core sub-state; engines layer
        // their own retargeting on top.
        state.set_locale(locale)
    }
}

/// Engine that does nothing beyond the trait defaults.
pub struct NoopAdModel;

impl AdModel for NoopAdModel {}

/// Notification presentation collaborator.
pub trait NotificationPresenter: Send + Sync {
    fn present(&self, options: &NotificationOptions);
}

pub struct NoopPresenter;

impl NotificationPresenter for NoopPresenter {
    fn present(&self, _options: &NotificationOptions) {}
}

/// Persistent settings store. Fire-and-forget: the store echoes changes
/// back into the router as `ChangeSetting` events on its own schedule.
pub trait SettingsStore: Send + Sync {
    fn change_setting(&self, key: &SettingKey, value: &serde_json::Value);
}

pub struct NoopSettingsStore;

impl SettingsStore for NoopSettingsStore {
    fn change_setting(&self, _key: &SettingKey, _value: &serde_json::Value) {}
}

/// Order-preserving sink for user-model log entries.
pub trait LogSink: Send + Sync {
    fn append_value(&self, event_name: &str, data: &serde_json::Value);
}

/// Collects entries in memory; used by replay and tests.
#[derive(Default)]
pub struct MemoryLogSink {
    entries: Mutex<Vec<(String, serde_json::Value)>>,
}

impl MemoryLogSink {
    pub fn entries(&self) -> Vec<(String, serde_json::Value)> {
        self.entries.lock().expect("log sink poisoned").clone()
    }
}

impl LogSink for MemoryLogSink {
    fn append_value(&self, event_name: &str, data: &serde_json::Value) {
        self.entries
            .lock()
            .expect("log sink poisoned")
            .push((event_name.to_string(), data.clone()));
    }
}

/// Tab registry owned by the host; the router only reads snapshots.
pub trait TabRegistry: Send + Sync {
    fn by_tab_id(&self, id: TabId) -> Option<TabSnapshot>;
}

/// Window registry owned by the host.
pub trait WindowRegistry: Send + Sync {
    fn active_window(&self) -> Option<WindowSnapshot>;
}

/// Fixed set of tabs, for tests and replay.
#[derive(Default)]
pub struct StaticTabs {
    tabs: HashMap<TabId, TabSnapshot>,
}

impl StaticTabs {
    pub fn new(tabs: impl IntoIterator<Item = TabSnapshot>) -> Self {
        Self {
            tabs: tabs.into_iter().map(|t| (t.id, t)).collect(),
        }
    }
}

impl TabRegistry for StaticTabs {
    fn by_tab_id(&self, id: TabId) -> Option<TabSnapshot> {
        self.tabs.get(&id).cloned()
    }
}

/// Fixed active window, for tests and replay.
#[derive(Default)]
pub struct StaticWindows {
    pub active: Option<WindowSnapshot>,
}

impl WindowRegistry for StaticWindows {
    fn active_window(&self) -> Option<WindowSnapshot> {
        self.active.clone()
    }
}
