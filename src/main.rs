//! tabmem console report.
//!
//! Reads a JSON snapshot of tabs from the file given as the first argument (or
//! stdin), estimates every tab and prints them largest first with a total.
//!
//! Accepted input: a bare array of tab descriptors, or
//! `{"tabs": [...], "accessTimes": {"<tabId>": <ms since epoch>}}`.

use std::collections::HashMap;
use std::io::Read;
use std::sync::Arc;

use serde::Deserialize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use tabmem::managers::access_tracker::AccessSnapshot;
use tabmem::services::aggregator;
use tabmem::services::clock::{Clock, SystemClock};
use tabmem::services::estimator::MemoryEstimator;
use tabmem::services::jitter::RingJitter;
use tabmem::types::tab::{TabDescriptor, TabId};

#[derive(Deserialize)]
#[serde(untagged)]
enum SnapshotInput {
    Tabs(Vec<TabDescriptor>),
    Full {
        tabs: Vec<TabDescriptor>,
        #[serde(default, rename = "accessTimes")]
        access_times: HashMap<TabId, i64>,
    },
}

fn read_input() -> Result<String, Box<dyn std::error::Error>> {
    let mut raw = String::new();
    match std::env::args().nth(1) {
        Some(path) if path != "-" => raw = std::fs::read_to_string(path)?,
        _ => {
            std::io::stdin().read_to_string(&mut raw)?;
        }
    }
    Ok(raw)
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max).collect();
    out.push_str("...");
    out
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let (tabs, access_times) = match serde_json::from_str(&read_input()?)? {
        SnapshotInput::Tabs(tabs) => (tabs, HashMap::new()),
        SnapshotInput::Full { tabs, access_times } => (tabs, access_times),
    };

    let access = AccessSnapshot::new(access_times, SystemClock.now_ms());
    let estimator = MemoryEstimator::new(Arc::new(RingJitter::new()));
    let summary = aggregator::summarize(&tabs, &access, &estimator, None).await;
    let titles: HashMap<TabId, &str> = tabs.iter().map(|t| (t.id, t.title.as_str())).collect();

    println!("{:>8}  {:>7}  {:>9}  TITLE", "TAB", "MB", "LAST SEEN");
    for record in &summary.ranked_tabs {
        println!(
            "{:>8}  {:>7.0}  {:>9}  {}{}",
            record.tab_id,
            record.memory_mb,
            record.staleness_formatted.as_deref().unwrap_or("-"),
            truncate(titles.get(&record.tab_id).copied().unwrap_or(""), 50),
            if record.active { " *" } else { "" },
        );
    }
    println!();
    println!("{} tabs, ~{} MB estimated", summary.ranked_tabs.len(), summary.total_mb);

    let duplicates = aggregator::find_duplicates(&tabs, &access);
    if !duplicates.closable.is_empty() {
        println!("{} duplicate tabs could be closed: {:?}", duplicates.closable.len(), duplicates.closable);
    }
    Ok(())
}
