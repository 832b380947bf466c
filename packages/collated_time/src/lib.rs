#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Low-overhead timing of nested code sections, collated per request and shipped to a
//! profiling data aggregator over UDP.
//!
//! The core functionality includes:
//! - [`Session`] - Times named, possibly nested sections of one request
//! - [`RunningStat`] - Constant-memory accumulator of count, mean, variance, min and max
//! - [`Snapshot`] - The collated per-section data of a finalized session
//! - [`Report`] - Per-section summaries for local display or logging
//! - [`Transmitter`] - Best-effort delivery of a snapshot to the aggregator
//!
//! A section measured once is kept as plain values. From the second measurement on it is
//! held as a pair of [`RunningStat`] accumulators (processor time and wall-clock time), so
//! memory use does not grow with the number of calls.
//!
//! Profiling must never break the code being profiled. No operation in this package
//! returns an error: mismatched `open()`/`close()` pairs are dropped and reported to a
//! [`DiagnosticSink`], and transmission problems are silently absorbed.
//!
//! # Simple usage
//!
//! ```
//! use collated_time::{Session, Transmitter};
//!
//! # fn main() {
//! let session = Session::new();
//!
//! session.open("-total");
//! for _ in 0..10 {
//!     let _query = session.section("db_query");
//!     // Perform the work being timed.
//! }
//! session.close("-total");
//!
//! let report = session.to_report();
//! for section in report.sections() {
//!     println!("{}: {} calls, {:.3} ms", section.name(), section.calls(), section.elapsed_ms());
//! }
//!
//! let transmitter = Transmitter::builder()
//!     .host("127.0.0.1")
//!     .port(3811)
//!     .build();
//! let _delivery = session.transmit(&transmitter);
//! # }
//! ```
//!
//! # Wire format
//!
//! Each section becomes one MessagePack array. Arrays are packed back to back into datagrams
//! of at most [`MAX_FRAME_LEN`] bytes. See the [`wire`] module for the field layout.
//!
//! # Threading
//!
//! A [`Session`] belongs to the thread that executes the profiled request and cannot be
//! sent to or shared with other threads. Concurrent requests each use their own session.
//! A [`Transmitter`] holds only configuration and can be shared freely.

mod batch;
mod collator;
mod config;
mod diagnostics;
mod error;
mod pal;
mod report;
mod running_stat;
mod section_stack;
mod session;
mod transmitter;
pub mod wire;

pub use collator::{Entry, Snapshot, Timings};
pub use config::{AggregatorAddress, DEFAULT_HOST, DEFAULT_PORT};
pub use diagnostics::{CHANNEL_UNBALANCED, DiagnosticSink, TracingDiagnostics};
pub use report::{Report, ReportSection};
pub use running_stat::RunningStat;
pub use session::{Section, Session};
pub use transmitter::{Delivery, Transmitter, TransmitterBuilder};
pub use wire::MAX_FRAME_LEN;
