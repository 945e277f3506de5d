//! Core domain logic for the hbnb console.
//! This crate owns the record model, the JSON file store and the command
//! processor that drives both.

pub mod config;
pub mod console;
pub mod literal;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use config::{ConfigError, ConsoleConfig};
pub use console::{Console, ConsoleError, Diagnostic, Flow};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::record::{AttributeInput, Record, RecordId, StoreKey};
pub use model::schema::{FieldType, RecordKind};
pub use service::record_service::{AttributeChange, RecordService, UpdateOutcome};
pub use store::json_store::JsonFileStore;
pub use store::{RecordStore, RemovedRecord, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
