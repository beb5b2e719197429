//! The event router.
//!
//! `route` is a total, deterministic function from `(state, event)` to the
//! next state. Side effects -- bridge queries, continuation emission,
//! collaborator calls -- are permitted but never feed back into the return
//! value of the same call; anything depending on an async result re-enters
//! on a later turn as a continuation event.

use tracing::debug;

use crate::bridge::BridgeAdapter;
use crate::collaborators::{
    AdModel, LogSink, NotificationPresenter, SettingsStore, TabRegistry, WindowRegistry,
};
use crate::config::CoreConfig;
use crate::continuation::ContinuationEmitter;
use crate::events::{Event, IdleState, ReportReason, SettingKey, TabLoadStatus};
use crate::state::AppState;

/// Everything a handler may reach besides the state snapshot itself.
/// Borrowed for the duration of one dispatch turn.
pub struct RouterContext<'a> {
    pub config: &'a CoreConfig,
    pub emitter: &'a ContinuationEmitter,
    pub bridge: &'a BridgeAdapter,
    pub presenter: &'a dyn NotificationPresenter,
    pub settings: &'a dyn SettingsStore,
    pub log_sink: &'a dyn LogSink,
    pub tabs: &'a dyn TabRegistry,
    pub windows: &'a dyn WindowRegistry,
    pub ad_model: &'a dyn AdModel,
}

/// Dispatch one event. Consumes the previous state snapshot and returns
/// the next; kinds this router does not consume return the snapshot
/// unchanged and emit nothing.
pub fn route(state: AppState, event: Event, cx: &RouterContext<'_>) -> AppState {
    match event {
        Event::NativeNotificationCreate { options } => {
            cx.presenter.present(&options);
            state
        }

        Event::NativeNotificationConfigurationCheck => {
            cx.bridge.check_configured();
            state
        }

        Event::NativeNotificationConfigurationReport { ok } => {
            if !ok {
                // Disabling the feature is an independent side effect, not a
                // precondition for the flag write below.
                cx.settings
                    .change_setting(&SettingKey::AdsEnabled, &serde_json::Value::Bool(false));
                cx.emitter.emit(Event::ChangeSetting {
                    key: SettingKey::AdsEnabled,
                    value: serde_json::Value::Bool(false),
                });
            }
            // The flag tracks the last report unconditionally.
            state.set_configured(ok)
        }

        Event::NativeNotificationAllowedCheck => {
            cx.bridge.check_allowed();
            state
        }

        Event::NativeNotificationAllowedReport { ok } => state.set_allowed(ok),

        Event::SetState => {
            let state = state.init_user_model(cx.config);
            let state = cx.ad_model.initialize(state, None);
            cx.emitter.report(ReportReason::Restart);
            state
        }

        Event::WindowUpdated => {
            let focused = cx
                .windows
                .active_window()
                .map(|w| w.focused)
                .unwrap_or(false);
            cx.emitter.report(if focused {
                ReportReason::Foreground
            } else {
                ReportReason::Background
            });
            state
        }

        Event::TabUpdated { change_info, tab } => {
            let complete =
                change_info.as_ref().and_then(|c| c.status) == Some(TabLoadStatus::Complete);
            if complete {
                cx.emitter.report(ReportReason::Load);
            }
            let blurred = tab.as_ref().is_some_and(|t| !t.active);
            let state = cx.ad_model.tab_update(state, tab.as_ref());
            if blurred {
                cx.emitter.report(ReportReason::Blur);
            }
            state
        }

        Event::RemoveHistorySite { url } => {
            debug!(%url, "removing history site");
            cx.ad_model.remove_history_site(state, &url)
        }

        Event::OnClearBrowsingData => {
            let state = cx.ad_model.remove_all_history(state);
            cx.ad_model.confirm_ad_uuid_if_ad_enabled(state)
        }

        Event::TabActivateRequested { tab_id } => {
            // May race with tab removal; a missing tab is a silent no-op.
            let Some(tab) = cx.tabs.by_tab_id(tab_id) else {
                return state;
            };
            let state = cx.ad_model.tab_update(state, Some(&tab));
            let state = cx.ad_model.test_shopping_data(state, &tab.url);
            let state = cx.ad_model.test_search_state(state, &tab.url);
            // Postcondition: the focus report is emitted after the tab
            // update, never before.
            cx.emitter.report(ReportReason::Focus);
            state
        }

        Event::IdleStateChanged { idle_state } => {
            debug!(?idle_state, "idle state changed");
            if idle_state == IdleState::Active {
                let state = cx.ad_model.record_un_idle(state);
                cx.emitter.emit(Event::NativeNotificationAllowedCheck);
                return state;
            }
            state
        }

        Event::TextScraperDataAvailable { tab_id, data } => {
            let Some(tab) = cx.tabs.by_tab_id(tab_id) else {
                return state;
            };
            // Classification observes shopping/search results from this same
            // dispatch, so the order below is fixed.
            let state = cx.ad_model.test_shopping_data(state, &tab.url);
            let state = cx.ad_model.test_search_state(state, &tab.url);
            let state = cx.ad_model.classify_page(state, &data, tab.window_id);
            cx.ad_model.update_timing_model(state)
        }

        Event::ShuttingDown => cx.ad_model.save_cached_info(state),

        Event::AddAutofillAddress { url } | Event::AddAutofillCreditCard { url } => {
            state.flag_purchase_intent(url)
        }

        Event::ChangeSetting { key, value } => {
            let state = match &key {
                SettingKey::AdsEnabled => cx.ad_model.initialize(state, value.as_bool()),
                SettingKey::AdsPlace => match value.as_str() {
                    Some(place) => state.set_ad_place(place),
                    None => state,
                },
                SettingKey::AdsLocale => match value.as_str() {
                    Some(locale) => cx.ad_model.change_locale(state, locale),
                    None => state,
                },
                SettingKey::Other(_) => state,
            };
            // Postcondition: the settings report is emitted after the inner
            // dispatch -- the report reads values the branch may change.
            cx.emitter.report(ReportReason::Settings);
            state
        }

        Event::OnUserModelLog { event_name, data } => {
            cx.log_sink.append_value(&event_name, &data);
            cx.emitter.report(ReportReason::Notify);
            state
        }

        Event::OnUserModelCollectActivity => cx.ad_model.collect_activity(state),

        Event::OnUserModelUploadLogs { stamp, retry_in_ms } => {
            cx.ad_model.upload_logs(state, stamp, retry_in_ms)
        }

        Event::OnUserModelDownloadSurveys { entries } => {
            cx.ad_model.download_surveys(state, &entries)
        }

        Event::NetworkConnected => {
            cx.ad_model.retrieve_ssid();
            state
        }

        Event::OnAdsSsidReceived { value } => state.set_ssid(value),

        // Broadcast kinds with no handler here. Listed explicitly so adding
        // an event variant forces a decision in this match.
        Event::NetworkDisconnected | Event::WindowClosed => state,
    }
}
