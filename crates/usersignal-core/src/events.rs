use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{TabId, TabSnapshot};

/// Every external occurrence enters the router as an Event.
/// The host app produces them; handlers re-enter the router by emitting
/// continuations carrying further events.
///
/// Events are immutable once constructed and carry no ordering token --
/// ordering is established solely by router invocation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// Hand a notification to the presentation collaborator.
    NativeNotificationCreate { options: NotificationOptions },
    /// Ask the native bridge whether the notification subsystem is set up.
    /// The answer re-enters as `NativeNotificationConfigurationReport`.
    NativeNotificationConfigurationCheck,
    NativeNotificationConfigurationReport {
        ok: bool,
    },
    /// Ask the native bridge whether the user granted permission.
    /// The answer re-enters as `NativeNotificationAllowedReport`.
    NativeNotificationAllowedCheck,
    NativeNotificationAllowedReport {
        ok: bool,
    },
    /// Fires once, at startup. Initializes the user-model sub-state.
    SetState,
    WindowUpdated,
    /// Fires on every tab change; often with partial payloads.
    TabUpdated {
        #[serde(default)]
        change_info: Option<ChangeInfo>,
        #[serde(default)]
        tab: Option<TabSnapshot>,
    },
    RemoveHistorySite {
        url: String,
    },
    OnClearBrowsingData,
    /// Tab switching. The tab is resolved through the registry at dispatch
    /// time; a missing tab is a silent no-op.
    TabActivateRequested {
        tab_id: TabId,
    },
    IdleStateChanged {
        idle_state: IdleState,
    },
    /// Scraped page content is ready for classification.
    TextScraperDataAvailable {
        tab_id: TabId,
        #[serde(default)]
        data: serde_json::Value,
    },
    ShuttingDown,
    AddAutofillAddress {
        url: String,
    },
    AddAutofillCreditCard {
        url: String,
    },
    /// A setting changed somewhere in the host app. Every key passes through
    /// here; only the ads keys have an inner branch.
    ChangeSetting {
        key: SettingKey,
        value: serde_json::Value,
    },
    OnUserModelLog {
        event_name: String,
        #[serde(default)]
        data: serde_json::Value,
    },
    OnUserModelCollectActivity,
    OnUserModelUploadLogs {
        stamp: DateTime<Utc>,
        retry_in_ms: u64,
    },
    OnUserModelDownloadSurveys {
        entries: Vec<serde_json::Value>,
    },
    /// Triggers SSID retrieval; the value re-enters as `OnAdsSsidReceived`.
    NetworkConnected,
    OnAdsSsidReceived {
        value: String,
    },

    // Broadcast by the host app but not consumed by this router.
    NetworkDisconnected,
    WindowClosed,
}

/// Reason tag carried by a reporting continuation into the external
/// ad-reporting pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportReason {
    Restart,
    Foreground,
    Background,
    Load,
    Blur,
    Focus,
    Settings,
    Notify,
}

/// Settings keys with an inner dispatch branch, plus a pass-through arm for
/// every other key the host app pipes through.
///
/// On the wire every key is a bare string: the three ads keys by name,
/// anything else as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SettingKey {
    AdsEnabled,
    AdsPlace,
    AdsLocale,
    Other(String),
}

impl SettingKey {
    pub fn as_str(&self) -> &str {
        match self {
            SettingKey::AdsEnabled => "ads-enabled",
            SettingKey::AdsPlace => "ads-place",
            SettingKey::AdsLocale => "ads-locale",
            SettingKey::Other(key) => key,
        }
    }
}

impl From<&str> for SettingKey {
    fn from(raw: &str) -> Self {
        match raw {
            "ads-enabled" => SettingKey::AdsEnabled,
            "ads-place" => SettingKey::AdsPlace,
            "ads-locale" => SettingKey::AdsLocale,
            _ => SettingKey::Other(raw.to_string()),
        }
    }
}

impl Serialize for SettingKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SettingKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(SettingKey::from(raw.as_str()))
    }
}

/// OS idle detector states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdleState {
    Active,
    Idle,
    Locked,
}

/// Tab load progress as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TabLoadStatus {
    Loading,
    Complete,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeInfo {
    #[serde(default)]
    pub status: Option<TabLoadStatus>,
}

/// Payload handed to the notification presentation collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationOptions {
    pub title: String,
    #[serde(default)]
    pub body: String,
    /// Opaque payload echoed back on notification interaction.
    #[serde(default)]
    pub data: serde_json::Value,
}
