// src/nmea/mod.rs
//! NMEA sentence classification, extraction and normalization

pub mod sentence;
pub mod time;
pub mod units;

pub use sentence::{classify, extract, FieldSet, SentenceKind};
