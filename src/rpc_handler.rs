//! RPC method handler for the tabmem JSON-RPC protocol.
//!
//! Extracted from `rpc_server.rs` so it can be unit-tested independently.
//! The `handle_method` function dispatches JSON-RPC method calls to the `App`.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::{json, Value};
use tokio::sync::Mutex;

use crate::app::App;
use crate::types::event::{HostEvent, RefreshHint};
use crate::types::memory::ProcessId;
use crate::types::tab::{TabDescriptor, TabId};

fn to_value<T: Serialize>(value: &T) -> Result<Value, String> {
    serde_json::to_value(value).map_err(|e| format!("serialization error: {}", e))
}

/// Builds a `HostEvent` of the given kind from the request params.
fn parse_event(kind: &str, params: &Value) -> Result<HostEvent, String> {
    let mut obj = match params {
        Value::Object(map) => map.clone(),
        _ => return Err("params must be an object".to_string()),
    };
    obj.insert("type".to_string(), Value::String(kind.to_string()));
    serde_json::from_value(Value::Object(obj)).map_err(|e| format!("invalid {} event: {}", kind, e))
}

fn parse_ids(params: &Value) -> Result<Vec<TabId>, String> {
    let ids = params.get("ids").ok_or("missing ids")?;
    serde_json::from_value(ids.clone()).map_err(|e| format!("invalid ids: {}", e))
}

/// Applies an event and reports what the caller should do about stats.
///
/// Immediate refreshes are done here; delayed ones are returned as `delayMs`
/// for the server loop to schedule.
async fn dispatch_event(app: &Mutex<App>, kind: &str, params: &Value) -> Result<Value, String> {
    let event = parse_event(kind, params)?;
    let mut a = app.lock().await;
    match a.handle_event(&event) {
        RefreshHint::Now => {
            let stats = a.refresh_stats().await;
            Ok(json!({"ok": true, "refresh": "now", "stats": to_value(&stats)?}))
        }
        RefreshHint::AfterMs(delay) => Ok(json!({"ok": true, "refresh": "delayed", "delayMs": delay})),
        RefreshHint::None => Ok(json!({"ok": true, "refresh": "none"})),
    }
}

/// Dispatch a JSON-RPC method call to the appropriate handler.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub async fn handle_method(app: &Mutex<App>, method: &str, params: &Value) -> Result<Value, String> {
    match method {
        "ping" => Ok(json!({"pong": true})),

        // ─── Stats ───
        "stats.get" => {
            let a = app.lock().await;
            to_value(a.stats())
        }
        "stats.refresh" => {
            let mut a = app.lock().await;
            let stats = a.refresh_stats().await;
            to_value(&stats)
        }
        "memory.summary" => {
            let a = app.lock().await;
            to_value(&a.summarize().await)
        }
        "memory.report" => {
            let a = app.lock().await;
            to_value(&a.memory_report().await)
        }

        // ─── Tabs ───
        "access_times.get" => {
            let a = app.lock().await;
            to_value(&a.access_times())
        }
        "tabs.staleness" => {
            let a = app.lock().await;
            let tabs = a.staleness_listing().await;
            Ok(json!({"tabs": to_value(&tabs)?}))
        }
        "tabs.info" => {
            let a = app.lock().await;
            to_value(&a.tab_info().await)
        }
        "tabs.sync" => {
            let tabs = params.get("tabs").ok_or("missing tabs")?;
            let tabs: Vec<TabDescriptor> =
                serde_json::from_value(tabs.clone()).map_err(|e| format!("invalid tabs: {}", e))?;
            let mut a = app.lock().await;
            a.sync_tabs(tabs);
            let stats = a.refresh_stats().await;
            to_value(&stats)
        }
        "tabs.close_duplicates" => {
            let mut a = app.lock().await;
            let outcome = a
                .close_duplicates()
                .await
                .map_err(|e| format!("failed to close duplicate tabs: {}", e))?;
            if outcome.closed_count > 0 {
                a.refresh_stats().await;
            }
            to_value(&outcome)
        }
        "tabs.close" => {
            let ids = parse_ids(params)?;
            if ids.is_empty() {
                return Err("ids must not be empty".to_string());
            }
            let mut a = app.lock().await;
            let outcome = a
                .close_tabs(&ids)
                .await
                .map_err(|e| format!("failed to close tabs: {}", e))?;
            a.refresh_stats().await;
            to_value(&outcome)
        }

        // ─── Host events ───
        "event.tab_created" => dispatch_event(app, "tab_created", params).await,
        "event.tab_removed" => dispatch_event(app, "tab_removed", params).await,
        "event.tab_updated" => dispatch_event(app, "tab_updated", params).await,
        "event.tab_activated" => dispatch_event(app, "tab_activated", params).await,
        "event.window_focus_changed" => dispatch_event(app, "window_focus_changed", params).await,

        // ─── Process registry ───
        "process.update" => {
            let tabs: HashMap<TabId, ProcessId> = match params.get("tabs") {
                Some(v) => serde_json::from_value(v.clone())
                    .map_err(|e| format!("invalid tabs: {}", e))?,
                None => HashMap::new(),
            };
            let processes: HashMap<ProcessId, u64> = match params.get("processes") {
                Some(v) => serde_json::from_value(v.clone())
                    .map_err(|e| format!("invalid processes: {}", e))?,
                None => HashMap::new(),
            };
            let a = app.lock().await;
            a.processes.update(tabs, processes);
            Ok(json!({"ok": true}))
        }
        "process.clear" => {
            let a = app.lock().await;
            a.processes.clear();
            Ok(json!({"ok": true}))
        }

        // ─── Settings ───
        "settings.get" => {
            let a = app.lock().await;
            to_value(a.settings())
        }
        "settings.set" => {
            let key = params.get("key").and_then(|v| v.as_str()).ok_or("missing key")?;
            let value = params.get("value").cloned().ok_or("missing value")?;
            let mut a = app.lock().await;
            a.set_setting(key, value).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }

        _ => Err(format!("unknown method: {}", method)),
    }
}
