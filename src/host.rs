//! Optional bridge to a containing shell that offers a message channel and a
//! key/value state slot. The controller treats the bridge as always present;
//! [`NoHost`] stands in when nothing embeds it.

use std::sync::Mutex;

use serde::Serialize;
use serde_json::Value;

use crate::models::ConnectionStatus;

pub trait HostBridge: Send + Sync {
    fn post_message(&self, message: Value);
    fn get_state(&self) -> Option<Value>;
    fn set_state(&self, state: Value);
}

/// Notifications posted to the host whenever visible state changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostEvent {
    StatusChanged { status: ConnectionStatus },
    SessionChanged { message_count: usize },
}

/// Null bridge: posts go nowhere and there is no stored state.
pub struct NoHost;

impl HostBridge for NoHost {
    fn post_message(&self, _message: Value) {}

    fn get_state(&self) -> Option<Value> {
        None
    }

    fn set_state(&self, _state: Value) {}
}

/// In-process bridge that keeps the state slot and every posted message.
#[derive(Default)]
pub struct MemoryHost {
    state: Mutex<Option<Value>>,
    posted: Mutex<Vec<Value>>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: Value) -> Self {
        Self { state: Mutex::new(Some(state)), posted: Mutex::default() }
    }

    pub fn posted(&self) -> Vec<Value> {
        self.posted.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

impl HostBridge for MemoryHost {
    fn post_message(&self, message: Value) {
        if let Ok(mut posted) = self.posted.lock() {
            posted.push(message);
        }
    }

    fn get_state(&self) -> Option<Value> {
        self.state.lock().ok().and_then(|s| s.clone())
    }

    fn set_state(&self, state: Value) {
        if let Ok(mut slot) = self.state.lock() {
            *slot = Some(state);
        }
    }
}
