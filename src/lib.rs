// src/lib.rs
//! GPS Logger Library
//!
//! Reads NMEA sentences from a serial GPS receiver, assembles completed
//! position fixes and appends them to a CSV log.

pub mod config;
pub mod error;
pub mod fix;
pub mod logger;
pub mod nmea;
pub mod sink;

// Re-export main types for convenience
pub use config::LoggerConfig;
pub use error::{GpsError, Result};
pub use fix::{CompletedFix, FixAssembler};
pub use logger::GpsLogger;
pub use sink::CsvSink;
