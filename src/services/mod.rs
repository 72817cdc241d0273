// tabmem services
// Estimation engine, aggregation, badge rendering, settings, and injectable clock/jitter sources.

pub mod aggregator;
pub mod badge;
pub mod clock;
pub mod estimator;
pub mod jitter;
pub mod precise_adapter;
pub mod settings_engine;
