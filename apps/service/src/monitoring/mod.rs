/// Host-reachability polling engine.
///
/// This module owns everything between the parsed config and the published
/// snapshot:
/// - Probing each enabled host over TCP with a bounded timeout
/// - Merging parsed entries with the enabled/disabled overrides
/// - Scheduling poll cycles at the configured refresh interval
/// - Aggregating per-host results into a global status and publishing it
pub mod engine;
pub mod probe;
pub mod registry;
pub mod scheduler;
pub mod types;
