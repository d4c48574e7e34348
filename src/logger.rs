// src/logger.rs
//! Ingestion pipeline coordination
//!
//! One reader, one classify/extract/normalize/assemble chain, one sink,
//! processed strictly in order, frame by frame. There is no parallel
//! fan-out; emitted fixes match the temporal order of the sentences
//! that completed them.

use crate::{
    config::LoggerConfig,
    error::{GpsError, Result},
    fix::{CompletedFix, FixAssembler},
    nmea::{self, FieldSet, SentenceKind},
    sink::CsvSink,
};
use log::{debug, error, info, warn};
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::timeout;
use tokio_serial::SerialPortBuilderExt;

/// How long one read may block before the loop rechecks the running
/// flag. A timeout with no data is "no frame this cycle", not an error.
const READ_TIMEOUT: Duration = Duration::from_millis(1000);

/// Run one frame through the classify/extract/normalize/assemble chain.
///
/// Every non-fatal condition (unrecognized kind, malformed fields, no
/// fix yet, void time data, invalid time fields) is logged and dropped;
/// nothing unwinds past the frame boundary.
pub fn process_line(assembler: &mut FixAssembler, line: &str) -> Option<CompletedFix> {
    let kind = nmea::classify(line);
    if kind == SentenceKind::Unrecognized {
        return None;
    }

    match nmea::extract(line, kind) {
        Ok(FieldSet::Position {
            latitude,
            lat_hemisphere,
            longitude,
            lon_hemisphere,
            altitude_meters,
        }) => {
            let lat = nmea::units::to_decimal(latitude, lat_hemisphere);
            let lon = nmea::units::to_decimal(longitude, lon_hemisphere);
            assembler.apply_position(lat, lon, altitude_meters)
        }
        Ok(FieldSet::Time { utc_time, utc_date }) => {
            match nmea::time::normalize_timestamp(utc_time, utc_date) {
                Ok(ts) => assembler.apply_time(ts),
                Err(e) => {
                    debug!("Skipping timestamp: {}", e);
                    None
                }
            }
        }
        Ok(FieldSet::NoFix) => {
            debug!("No fix yet, waiting for satellites");
            None
        }
        Ok(FieldSet::Inactive) => {
            debug!("Void time data, waiting for active status");
            None
        }
        Err(e) => {
            debug!("Dropping frame: {}", e);
            None
        }
    }
}

/// Reads NMEA sentences from a serial port and records completed fixes.
pub struct GpsLogger {
    running: Arc<AtomicBool>,
}

impl GpsLogger {
    pub fn new() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Stop the logger after the in-flight read completes.
    pub fn stop(&self) {
        self.running.store(false, Ordering::Relaxed);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Run the ingestion loop until interrupted or the transport fails.
    ///
    /// Transport read errors are fatal and shut the loop down; sink
    /// failures lose that cycle's fix and the loop continues. The
    /// serial port is released on every exit path by scope.
    pub async fn run(&self, config: &LoggerConfig) -> Result<()> {
        info!(
            "Connecting to GPS on {} at {} baud",
            config.serial_port, config.baudrate
        );

        let serial = tokio_serial::new(&config.serial_port, config.baudrate)
            .timeout(READ_TIMEOUT)
            .open_native_async()
            .map_err(|e| {
                GpsError::Connection(format!(
                    "Failed to open serial port {}: {}",
                    config.serial_port, e
                ))
            })?;

        info!("Connected, logging fixes to {}", config.output_path.display());

        // Ctrl+C flips the running flag; the loop exits after the read
        // in flight, never mid-frame.
        let running = Arc::clone(&self.running);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Interrupt received, shutting down");
                running.store(false, Ordering::Relaxed);
            }
        });

        let sink = CsvSink::new(&config.output_path);
        let mut assembler = FixAssembler::new();
        let mut reader = BufReader::new(serial);
        let mut buf: Vec<u8> = Vec::new();

        while self.running.load(Ordering::Relaxed) {
            match timeout(READ_TIMEOUT, reader.read_until(b'\n', &mut buf)).await {
                // No complete frame this cycle; partial bytes stay
                // buffered for the next read.
                Err(_) => continue,
                Ok(Ok(0)) => {
                    info!("Serial stream closed");
                    break;
                }
                Ok(Ok(_)) => {
                    // Lossy decode: undecodable bytes become U+FFFD
                    // rather than aborting the read.
                    let decoded = String::from_utf8_lossy(&buf);
                    let line = decoded.trim();

                    if let Some(fix) = process_line(&mut assembler, line) {
                        match sink.append(&fix) {
                            Ok(()) => info!("Recorded fix at {}", fix.timestamp),
                            Err(e) => warn!("Fix lost, failed to append: {}", e),
                        }
                    }

                    buf.clear();
                }
                Ok(Err(e)) => {
                    error!("Serial read failed: {}", e);
                    return Err(GpsError::Io(e));
                }
            }
        }

        info!("GPS logger stopped");
        Ok(())
    }
}

impl Default for GpsLogger {
    fn default() -> Self {
        Self::new()
    }
}

/// List available serial ports
pub fn list_serial_ports() -> Result<()> {
    let ports = tokio_serial::available_ports()
        .map_err(|e| GpsError::Other(format!("Failed to list serial ports: {}", e)))?;

    if ports.is_empty() {
        println!("No serial ports found.");
    } else {
        println!("Available serial ports:");
        for port in ports {
            println!("  {} - {:?}", port.port_name, port.port_type);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fix::FixState;
    use crate::sink::CSV_HEADER;

    const GGA_VALID: &str = "$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47";
    const GGA_NO_FIX: &str = "$GPGGA,123519,,,,,0,00,,,M,,M,,*66";
    const RMC_ACTIVE: &str = "$GPRMC,092751,A,4807.038,N,01131.000,E,022.4,084.4,180994,003.1,W*6A";
    const RMC_VOID: &str = "$GPRMC,092751,V,,,,,,,180994,,*6A";
    const GSV: &str = "$GPGSV,3,1,12,01,40,083,46,02,17,308,41,12,07,344,39,14,22,228,45*75";

    #[test]
    fn test_position_then_time_emits_one_fix() {
        let mut assembler = FixAssembler::new();

        assert!(process_line(&mut assembler, GGA_VALID).is_none());
        let fix = process_line(&mut assembler, RMC_ACTIVE).expect("both halves present");

        assert_eq!(fix.timestamp, "09:18:2094 05:27:51 AM EDT");
        assert_eq!(fix.latitude, "48.117300");
        assert_eq!(fix.longitude, "11.516667");
        assert_eq!(fix.altitude, "1789.37 ft");
        assert_eq!(assembler.state(), FixState::Empty);
    }

    #[test]
    fn test_time_then_position_emits_one_fix() {
        let mut assembler = FixAssembler::new();

        assert!(process_line(&mut assembler, RMC_ACTIVE).is_none());
        assert!(process_line(&mut assembler, GGA_VALID).is_some());
        assert_eq!(assembler.state(), FixState::Empty);
    }

    #[test]
    fn test_no_fix_sentence_leaves_state_unchanged() {
        let mut assembler = FixAssembler::new();

        assert!(process_line(&mut assembler, GGA_NO_FIX).is_none());
        assert_eq!(assembler.state(), FixState::Empty);

        // An active time fix afterwards still cannot complete: the
        // no-fix sentence must not have set latitude or longitude
        assert!(process_line(&mut assembler, RMC_ACTIVE).is_none());
        assert_eq!(assembler.state(), FixState::Partial);
    }

    #[test]
    fn test_void_and_unrecognized_frames_are_dropped() {
        let mut assembler = FixAssembler::new();

        assert!(process_line(&mut assembler, RMC_VOID).is_none());
        assert!(process_line(&mut assembler, GSV).is_none());
        assert!(process_line(&mut assembler, "").is_none());
        assert!(process_line(&mut assembler, "garbage \u{FFFD} bytes").is_none());
        assert_eq!(assembler.state(), FixState::Empty);
    }

    #[test]
    fn test_malformed_frame_never_mutates_state() {
        let mut assembler = FixAssembler::new();

        assert!(process_line(&mut assembler, "$GPGGA,123519,4807.038").is_none());
        assert!(process_line(&mut assembler, "$GPRMC,092751,A").is_none());
        assert_eq!(assembler.state(), FixState::Empty);
    }

    #[test]
    fn test_scripted_sequence_appends_one_record() {
        let dir = tempfile::tempdir().unwrap();
        let sink = CsvSink::new(dir.path().join("gps_data.csv"));
        let mut assembler = FixAssembler::new();

        for line in [GSV, GGA_VALID, RMC_VOID, RMC_ACTIVE] {
            if let Some(fix) = process_line(&mut assembler, line) {
                sink.append(&fix).unwrap();
            }
        }

        let contents = std::fs::read_to_string(sink.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(
            lines[1],
            "09:18:2094 05:27:51 AM EDT,48.117300,11.516667,1789.37 ft"
        );
    }

    #[test]
    fn test_scripted_no_fix_sequence_appends_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let sink = CsvSink::new(dir.path().join("gps_data.csv"));
        let mut assembler = FixAssembler::new();

        for line in [GGA_NO_FIX, RMC_ACTIVE] {
            if let Some(fix) = process_line(&mut assembler, line) {
                sink.append(&fix).unwrap();
            }
        }

        assert!(!sink.path().exists());
    }
}
