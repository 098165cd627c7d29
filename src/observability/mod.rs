//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events (cycle span with run_id, wallet span with number/address)
//!     → metrics.rs (counters)
//!
//! Consumers:
//!     → terminal (fmt layer)
//!     → Prometheus scrape (optional)
//! ```

pub mod logging;
pub mod metrics;
