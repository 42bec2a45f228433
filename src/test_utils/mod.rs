//! Test utilities for apiserver-gen
//!
//! - [`init_test_logging`] - one-time tracing setup for tests
//! - [`fixtures`] - schema documents and entries shaped like the API server's
//! - [`fakes`] - in-process stand-ins for the model generator and renderer
//!
//! ```rust,no_run
//! use apiserver_gen::test_utils::{fakes::EventLog, fixtures, init_test_logging};
//!
//! init_test_logging(None);
//! let document = fixtures::sample_document();
//! let log = EventLog::default();
//! ```

pub mod fakes;
pub mod fixtures;

pub use fakes::{Event, EventLog, FakeGenerator, RecordingRenderer};

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

static INIT_LOGGING: Once = Once::new();

/// Install a test-friendly subscriber once per process.
///
/// `level` wins over `RUST_LOG`; with neither, logging stays off.
///
/// ```bash
/// RUST_LOG=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}
