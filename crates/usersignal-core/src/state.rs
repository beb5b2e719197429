//! Application state tree and the core sub-state mutators.
//!
//! The whole tree is an immutable value threaded through the router by
//! ownership transfer: every router call and every mutator consumes the
//! previous snapshot and returns the next one. Nothing holds a long-lived
//! reference into it, so exactly one writer exists at any time.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::CoreConfig;

/// Opaque tab identifier assigned by the host browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(pub i64);

/// Opaque window identifier assigned by the host browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(pub i64);

/// Point-in-time view of a tab, read from the external registry at dispatch
/// time. The core never owns tab data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabSnapshot {
    pub id: TabId,
    pub window_id: WindowId,
    pub url: String,
    #[serde(default)]
    pub active: bool,
}

/// Point-in-time view of a window, read from the external registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowSnapshot {
    pub id: WindowId,
    #[serde(default)]
    pub focused: bool,
}

/// The user-model region of the state tree.
///
/// Created once by `SetState`; absent before that. Mutators that run only
/// after initialization in practice assume presence and fail loudly
/// otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserModelState {
    /// The native notification subsystem is set up. Tracks the last
    /// configuration report unconditionally.
    pub configured: bool,
    /// The user has granted notification permission.
    pub allowed: bool,
    pub ssid: Option<String>,
    pub ad_place: Option<String>,
    pub locale: String,
    /// URL -> purchase-intent flag, set by autofill signals.
    #[serde(default)]
    pub purchase_intent_flags: HashMap<String, bool>,
    /// Region owned by the ad-classification engine; passed through
    /// untouched by this core.
    #[serde(default)]
    pub model_data: serde_json::Value,
}

impl UserModelState {
    pub fn from_config(config: &CoreConfig) -> Self {
        Self {
            configured: false,
            allowed: false,
            ssid: None,
            ad_place: config.ad_place.clone(),
            locale: config.locale.clone(),
            purchase_intent_flags: HashMap::new(),
            model_data: serde_json::Value::Null,
        }
    }
}

/// The whole application state tree.
///
/// Only the user-model region is owned here; everything else the host app
/// tracks rides along in `external` and is never touched by this core.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    #[serde(default)]
    pub user_model: Option<UserModelState>,
    /// Regions owned by other parts of the host app; pass-through only.
    #[serde(default)]
    pub external: serde_json::Value,
}

impl AppState {
    /// Create the user-model region if it does not exist yet. Idempotent:
    /// a second `SetState` leaves an existing region alone.
    pub fn init_user_model(mut self, config: &CoreConfig) -> Self {
        if self.user_model.is_none() {
            self.user_model = Some(UserModelState::from_config(config));
        }
        self
    }

    pub fn try_user_model(&self) -> Option<&UserModelState> {
        self.user_model.as_ref()
    }

    /// Panics if `SetState` has not been routed yet. Event-ordering
    /// discipline, not reactive handling, prevents this.
    pub fn user_model(&self) -> &UserModelState {
        self.user_model
            .as_ref()
            .expect("user model not initialized: SetState must be routed first")
    }

    fn user_model_mut(&mut self) -> &mut UserModelState {
        self.user_model
            .as_mut()
            .expect("user model not initialized: SetState must be routed first")
    }

    // ── Sub-state mutators ───────────────────────────────────────────

    pub fn set_configured(mut self, ok: bool) -> Self {
        self.user_model_mut().configured = ok;
        self
    }

    pub fn set_allowed(mut self, ok: bool) -> Self {
        self.user_model_mut().allowed = ok;
        self
    }

    pub fn set_ssid(mut self, ssid: impl Into<String>) -> Self {
        self.user_model_mut().ssid = Some(ssid.into());
        self
    }

    pub fn set_ad_place(mut self, place: impl Into<String>) -> Self {
        self.user_model_mut().ad_place = Some(place.into());
        self
    }

    pub fn set_locale(mut self, locale: impl Into<String>) -> Self {
        self.user_model_mut().locale = locale.into();
        self
    }

    /// Record that the user is likely buying something at `url`.
    pub fn flag_purchase_intent(mut self, url: impl Into<String>) -> Self {
        self.user_model_mut()
            .purchase_intent_flags
            .insert(url.into(), true);
        self
    }
}
