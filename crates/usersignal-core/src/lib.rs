//! # Usersignal Core Library
//!
//! State-transition core for tracking user behavior signals (page loads,
//! tab focus, settings changes, idle transitions) and native notification
//! permissions. External occurrences enter as uniformly-shaped events; the
//! router derives the next immutable state snapshot and schedules any
//! asynchronous follow-up as a continuation that re-enters on a later turn.
//!
//! ## Architecture
//!
//! - **Event Router**: a total function `(state, event) -> state` over a
//!   closed event enum; side effects never feed its own return value
//! - **Continuation queue**: handlers schedule re-entrant events and
//!   reporting continuations instead of calling back into the router
//! - **Native Bridge**: async single-shot permission/configuration queries
//!   whose answers re-enter as report events
//! - **Collaborator seams**: the ad-model engine, settings store, log sink
//!   and tab/window registries are trait objects owned by the host
//!
//! ## Key Components
//!
//! - [`route`]: the dispatch function
//! - [`EventLoop`]: serialized single-writer dispatch loop
//! - [`AppState`] / [`UserModelState`]: the owned state region
//! - [`BridgeAdapter`]: native query fan-out and report re-entry

pub mod bridge;
pub mod collaborators;
pub mod config;
pub mod continuation;
pub mod error;
pub mod events;
pub mod router;
pub mod runtime;
pub mod state;

pub use bridge::{BridgeAdapter, FixedBridge, NativeBridge};
pub use collaborators::{
    AdModel, LogSink, MemoryLogSink, NoopAdModel, NoopPresenter, NoopSettingsStore,
    NotificationPresenter, SettingsStore, StaticTabs, StaticWindows, TabRegistry, WindowRegistry,
};
pub use config::CoreConfig;
pub use continuation::{
    Continuation, ContinuationEmitter, ContinuationQueue, WeakContinuationEmitter,
};
pub use error::{BridgeError, ConfigError, CoreError};
pub use events::{
    ChangeInfo, Event, IdleState, NotificationOptions, ReportReason, SettingKey, TabLoadStatus,
};
pub use router::{route, RouterContext};
pub use runtime::{Collaborators, EventLoop};
pub use state::{AppState, TabId, TabSnapshot, UserModelState, WindowId, WindowSnapshot};
