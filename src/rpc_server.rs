//! tabmem RPC Server: JSON-RPC over stdin/stdout for the extension's native host.
//!
//! Protocol: one JSON object per line (newline-delimited JSON).
//! Request:  {"id":1, "method":"stats.refresh", "params":{}}
//! Response: {"id":1, "result":{...}} or {"id":1, "error":"..."}
//! Push:     {"event":"stats", "stats":{...}, "badge":{...}} after periodic or delayed refreshes
//!
//! Logs go to stderr; stdout carries only protocol lines.

use std::time::{Duration, Instant};

use serde_json::{json, Value};
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;
use tokio::time::Interval;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use tabmem::app::App;
use tabmem::managers::tab_registry::TabRegistryTrait;
use tabmem::rpc_handler::handle_method;

/// Simple rate limiter: max requests per one-second window.
struct RateLimiter {
    window_start: Instant,
    request_count: u32,
    max_per_second: u32,
}

impl RateLimiter {
    fn new(max_per_second: u32) -> Self {
        Self { window_start: Instant::now(), request_count: 0, max_per_second }
    }

    /// Returns true if the request is allowed, false if rate-limited.
    fn check(&mut self) -> bool {
        if self.window_start.elapsed().as_secs() >= 1 {
            self.window_start = Instant::now();
            self.request_count = 0;
        }
        self.request_count += 1;
        self.request_count <= self.max_per_second
    }

    /// Changes the limit; the current window keeps its count.
    fn set_limit(&mut self, max_per_second: u32) {
        self.max_per_second = max_per_second;
    }
}

/// Result of handling one request line.
struct LineOutcome {
    response: Value,
    /// Debounced refresh the handler asked for.
    delay_ms: Option<u64>,
    /// True after a successful `settings.set`.
    settings_changed: bool,
}

impl LineOutcome {
    fn error(id: Value, message: String) -> Self {
        Self {
            response: json!({"id": id, "error": message}),
            delay_ms: None,
            settings_changed: false,
        }
    }
}

async fn write_line(stdout: &mut io::Stdout, value: &Value) -> std::io::Result<()> {
    let mut line = value.to_string();
    line.push('\n');
    stdout.write_all(line.as_bytes()).await?;
    stdout.flush().await
}

async fn push_stats(app: &Mutex<App>, stdout: &mut io::Stdout) -> std::io::Result<()> {
    let (stats, badge) = {
        let mut a = app.lock().await;
        let stats = a.refresh_stats().await;
        (stats, a.tabs.badge())
    };
    write_line(stdout, &json!({"event": "stats", "stats": stats, "badge": badge})).await
}

async fn handle_line(app: &Mutex<App>, line: &str, limiter: &mut RateLimiter) -> LineOutcome {
    let req: Value = match serde_json::from_str(line) {
        Ok(v) => v,
        Err(e) => return LineOutcome::error(Value::Null, format!("parse error: {}", e)),
    };

    let id = req.get("id").cloned().unwrap_or(Value::Null);
    if !limiter.check() {
        return LineOutcome::error(id, "rate limit exceeded".to_string());
    }

    let method = req.get("method").and_then(|v| v.as_str()).unwrap_or("");
    let params = req.get("params").cloned().unwrap_or(json!({}));

    match handle_method(app, method, &params).await {
        Ok(val) => LineOutcome {
            delay_ms: val.get("delayMs").and_then(|v| v.as_u64()),
            settings_changed: method == "settings.set",
            response: json!({"id": id, "result": val}),
        },
        Err(err) => {
            tracing::debug!(method, error = %err, "request failed");
            LineOutcome::error(id, err)
        }
    }
}

/// Re-reads the refresh interval and request limit after a settings change.
async fn apply_runtime_settings(app: &Mutex<App>, limiter: &mut RateLimiter, ticker: &mut Interval) {
    let (interval_secs, max_per_second) = {
        let a = app.lock().await;
        let settings = a.settings();
        (settings.refresh.interval_secs, settings.rpc.max_requests_per_second)
    };
    limiter.set_limit(max_per_second);

    let period = Duration::from_secs(interval_secs);
    if ticker.period() != period {
        tracing::info!(interval_secs, "refresh interval changed");
        *ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
    }
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let app = match App::from_config(std::env::args().nth(1)) {
        Ok(app) => app,
        Err(e) => {
            tracing::error!(error = %e, "failed to load settings");
            std::process::exit(1);
        }
    };
    let interval_secs = app.settings().refresh.interval_secs;
    let mut limiter = RateLimiter::new(app.settings().rpc.max_requests_per_second);
    let app = Mutex::new(app);

    let mut stdout = io::stdout();
    write_line(&mut stdout, &json!({"event": "ready", "version": env!("CARGO_PKG_VERSION")})).await?;
    tracing::info!(interval_secs, "tabmem rpc server ready");

    let mut lines = BufReader::new(io::stdin()).lines();
    let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
    // Pending debounced refresh requested by an activation or focus event.
    let mut pending: Option<tokio::time::Instant> = None;

    loop {
        let deadline = pending;
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if line.trim().is_empty() {
                    continue;
                }
                let outcome = handle_line(&app, &line, &mut limiter).await;
                write_line(&mut stdout, &outcome.response).await?;
                if let Some(ms) = outcome.delay_ms {
                    pending = Some(tokio::time::Instant::now() + Duration::from_millis(ms));
                }
                if outcome.settings_changed {
                    apply_runtime_settings(&app, &mut limiter, &mut ticker).await;
                }
            }
            _ = ticker.tick() => {
                push_stats(&app, &mut stdout).await?;
            }
            _ = tokio::time::sleep_until(deadline.unwrap_or_else(tokio::time::Instant::now)), if deadline.is_some() => {
                pending = None;
                push_stats(&app, &mut stdout).await?;
            }
        }
    }

    tracing::info!("stdin closed, shutting down");
    Ok(())
}
