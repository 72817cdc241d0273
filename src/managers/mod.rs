// tabmem managers
// Stateful components fed by host events: access times, tab mirror, process table.

pub mod access_tracker;
pub mod event_dispatcher;
pub mod process_table;
pub mod tab_registry;
